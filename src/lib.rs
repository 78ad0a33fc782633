//! mason is a generator-based scaffolding engine.
//! A catalog document declares named generators whose parameterized template
//! trees are rendered into a target project, with optional script hooks and
//! post-commands composed through `use` delegation.

/// Command-line interface module for the mason application
pub mod cli;

/// Catalog document model and parsing
/// Supports JSON and YAML formats (g.json, g.yml, g.yaml)
pub mod config;

/// Common constants used throughout the application
pub mod constants;

/// Error types and handling for the mason application
pub mod error;

/// Mode-aware file operations (dry-run support)
pub mod fileops;

/// Generator execution: delegation, tree rendering, transforms and
/// post-commands
pub mod generator;

/// Logger configuration
pub mod logger;

/// Per-file path and content rendering
pub mod processor;

/// Template rendering engine
pub mod renderer;

/// Catalog resolution: includes, namespacing and the flat generator set
pub mod resolver;

/// Script hook execution
pub mod script;

/// Shell command execution for post-commands
pub mod shell;
