//! Error handling for the mason application.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for mason operations.
///
/// Every failing step surfaces its error immediately to the caller; no step
/// retries. Output files written before a failure are left in place.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// Represents a malformed or unreadable catalog document
    #[error("Catalog error: {0}")]
    ConfigParseError(String),

    /// An include reference could not be turned into a local directory
    #[error("Cannot resolve include '{reference}': {reason}")]
    ResolveError { reference: String, reason: String },

    /// An unknown generator name, from the command line or a `use` entry
    #[error("Generator not found: {name}")]
    GeneratorNotFound { name: String },

    /// Two resolved generators ended up with the same qualified name
    #[error("Duplicate generator: {name}")]
    DuplicateGenerator { name: String },

    /// A `use` chain reached a generator already running
    #[error("Cyclic use chain: {chain}")]
    CyclicUse { chain: String },

    /// A declared argument is absent or empty in the bound configuration
    #[error("Missing argument: {name}")]
    MissingArgument { name: String },

    /// A template path contains an unclosed `[` placeholder
    #[error("Unterminated open bracket in path: {path}")]
    UnterminatedBracket { path: String },

    /// A template path contains a `]` with no matching `[`
    #[error("Unexpected closing bracket in path: {path}")]
    UnexpectedBracket { path: String },

    /// A path placeholder names a key absent from the configuration map
    #[error("Missing config value '{key}' in path: {path}")]
    MissingConfigValue { key: String, path: String },

    /// Represents errors raised while rendering template content
    #[error("Template error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    /// A script hook failed or returned an unexpected shape
    #[error("Script hook error: {0}")]
    ScriptError(String),

    /// A post-command exited with a non-zero status
    #[error("Command '{command}' failed: {status}")]
    CommandError { command: String, status: std::process::ExitStatus },
}

/// Convenience type alias for Results with mason's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program
/// with a non-zero status.
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("{}", err);
    std::process::exit(1);
}
