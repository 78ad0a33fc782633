//! Command-line interface implementation for mason.
//! Provides argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments structure for mason.
#[derive(Parser, Debug)]
#[command(author, version, about = "mason: generator-based file scaffolding tool", long_about = None)]
pub struct Args {
    /// Project root containing the generator catalog; may also be a
    /// remote package reference
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub root: String,

    /// Directory the generated files are written into
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out: PathBuf,

    /// Log every file write and shell command instead of applying it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Generator to run; omit to list available generators
    #[arg(value_name = "GENERATOR")]
    pub generator: Option<String>,

    /// Values bound, in order, to the generator's declared arguments
    #[arg(value_name = "ARGS")]
    pub values: Vec<String>,
}

/// Parses command line arguments and returns the Args structure.
pub fn get_args() -> Args {
    Args::parse()
}
