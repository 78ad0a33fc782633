//! Common constants used throughout the mason application.

/// Supported catalog document file names, probed in order
pub const CATALOG_FILES: [&str; 3] = ["g.json", "g.yml", "g.yaml"];

/// Directory holding per-generator assets, relative to a catalog document
pub const GENERATOR_DIR: &str = ".g";

/// Template tree subdirectory inside a generator's asset directory
pub const TEMPLATE_SUBDIR: &str = "tpl";

/// Hook program file name inside a generator's asset directory
pub const HOOKS_FILE: &str = "hooks";

/// Suffix marking a file whose contents are rendered rather than copied
pub const TEMPLATE_SUFFIX: &str = ".tpl";
