//! mason's main application entry point and orchestration logic.
//! Handles command-line argument parsing, catalog resolution, generator
//! selection and execution.

use mason::{
    cli::{get_args, Args},
    config::ConfigMap,
    error::{default_error_handler, Result},
    fileops::{ExecutionMode, FileOps},
    generator::Runner,
    logger::init_logger,
    renderer::MiniJinjaRenderer,
    resolver::{
        default_cache_dir, find, resolve_catalog, IncludeResolver, PackageResolver,
        ResolvedGenerator,
    },
    script::HookScriptEngine,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Prints every resolved generator with its (possibly inherited) argument
/// signature, in resolution order.
fn list_generators(generators: &[ResolvedGenerator]) {
    println!("Available generators:");
    for generator in generators {
        let mut line = format!("* {}", generator.cmd);
        for arg in &generator.cfg.args {
            line.push_str(&format!(" [{}]", arg));
        }
        println!("{}", line);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Resolves the root directory (which may itself be a package reference)
/// 2. Flattens the catalog and its includes into the generator set
/// 3. Without a generator name, lists the set and exits
/// 4. Binds positional values to the generator's arguments
/// 5. Runs the generator against the output directory
fn run(args: Args) -> Result<()> {
    let mode = if args.dry_run { ExecutionMode::DryRun } else { ExecutionMode::Apply };

    let resolver = PackageResolver::new(default_cache_dir());
    let current_dir = std::env::current_dir()?;
    let root_dir = resolver.resolve(&args.root, &[current_dir])?;

    let generators = resolve_catalog(&resolver, &root_dir)?;

    let Some(name) = args.generator else {
        list_generators(&generators);
        return Ok(());
    };

    let target = find(&generators, &name)?;

    let mut config = ConfigMap::new();
    config.insert("outDir".to_string(), args.out.display().to_string());
    for (key, value) in target.cfg.args.iter().zip(args.values) {
        config.insert(key.clone(), value);
    }

    let renderer = MiniJinjaRenderer::new();
    let scripts = HookScriptEngine::new();
    let files = FileOps::new(mode);

    let runner = Runner::new(&generators, &renderer, &scripts, &files, &args.out);
    runner.run(target, &mut config)?;

    println!("Generation completed successfully in {}.", args.out.display());
    Ok(())
}
