//! File operations for mason.
//! All mutating filesystem effects go through `FileOps`, which carries the
//! execution mode decided at startup: in dry-run mode effects are logged
//! instead of applied.

use crate::error::{Error, Result};
use log::info;
use std::fs;
use std::path::Path;

/// How mutating collaborators behave for the duration of a run.
///
/// Threaded into each collaborator at construction time rather than read
/// from ambient process state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Apply effects to the filesystem and shell
    #[default]
    Apply,
    /// Log every effect without applying it
    DryRun,
}

impl ExecutionMode {
    pub fn is_dry_run(self) -> bool {
        matches!(self, ExecutionMode::DryRun)
    }
}

/// Mode-aware file writing and copying.
pub struct FileOps {
    mode: ExecutionMode,
}

impl FileOps {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Writes text content to `path`, creating parent directories first.
    pub fn write_file(&self, path: &Path, content: &str) -> Result<()> {
        if self.mode.is_dry_run() {
            info!("dry-run: would write '{}'", path.display());
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
        fs::write(path, content).map_err(Error::IoError)
    }

    /// Copies `source` to `dest` byte for byte, creating parent directories
    /// first.
    pub fn copy_file(&self, source: &Path, dest: &Path) -> Result<()> {
        if self.mode.is_dry_run() {
            info!("dry-run: would copy '{}' to '{}'", source.display(), dest.display());
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
        fs::copy(source, dest).map(|_| ()).map_err(Error::IoError)
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(Error::IoError)
}
