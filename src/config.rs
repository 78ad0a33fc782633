//! Catalog document handling for mason.
//! This module provides the in-memory model of a generator catalog and the
//! loading/parsing of catalog documents in JSON or YAML form.

use crate::constants::CATALOG_FILES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// The configuration map threaded through argument binding, script hooks,
/// path rendering, content rendering and post-command templating.
///
/// Merge semantics are append-only: later writes overwrite earlier ones for
/// the same key, nothing is ever removed.
pub type ConfigMap = IndexMap<String, String>;

/// A single generator definition as authored in a catalog document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorSpec {
    /// Unique name within the declaring catalog
    pub name: String,

    /// Required configuration keys; order defines positional CLI binding
    #[serde(default)]
    pub args: Vec<String>,

    /// Hook-name to output-file pairs applied after rendering
    #[serde(default)]
    pub transforms: Vec<IndexMap<String, String>>,

    /// Other generators to run, in order, instead of this one's own tree.
    /// A delegating generator inherits the argument list of its first entry.
    #[serde(default, rename = "use")]
    pub use_: Vec<String>,

    /// Command templates executed in the output directory after rendering
    #[serde(default)]
    pub post: Vec<String>,
}

/// Parsed form of one catalog document.
///
/// Parsed once from a byte source and immediately expanded by the catalog
/// resolver; never mutated after expansion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Catalog {
    /// Schema version tag, currently informational only
    #[serde(default)]
    pub version: String,

    /// Generators declared by this document, in order
    #[serde(default)]
    pub generators: Vec<GeneratorSpec>,

    /// Namespace label to include reference, empty label meaning "no prefix"
    #[serde(default)]
    pub include: IndexMap<String, String>,
}

/// Loads a catalog document from a directory, trying multiple file formats.
/// Supports: g.json, g.yml, g.yaml
///
/// # Errors
/// * `Error::ConfigParseError` if no catalog file exists in the directory
pub fn load_catalog<P: AsRef<Path>>(dir: P) -> Result<String> {
    for file in CATALOG_FILES {
        let catalog_path = dir.as_ref().join(file);
        if catalog_path.exists() {
            debug!("Loading catalog from {}", catalog_path.display());
            return std::fs::read_to_string(&catalog_path).map_err(Error::IoError);
        }
    }

    Err(Error::ConfigParseError(format!(
        "no catalog document found in '{}' (tried: {})",
        dir.as_ref().display(),
        CATALOG_FILES.join(", ")
    )))
}

/// Parses catalog content, trying JSON first and falling back to YAML.
///
/// # Errors
/// * `Error::ConfigParseError` if the content matches neither format
pub fn parse_catalog(content: &str) -> Result<Catalog> {
    match serde_json::from_str(content) {
        Ok(catalog) => Ok(catalog),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigParseError(format!("invalid catalog document: {}", e))),
    }
}
