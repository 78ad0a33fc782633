//! Post-command execution for mason.
//! Rendered command strings run through `sh -c` in the output directory
//! with inherited stdio.

use crate::error::{Error, Result};
use crate::fileops::ExecutionMode;
use log::info;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shell command runner bound to a working directory.
pub struct ShellRunner {
    work_dir: PathBuf,
    mode: ExecutionMode,
}

impl ShellRunner {
    pub fn new<P: AsRef<Path>>(work_dir: P, mode: ExecutionMode) -> Self {
        Self { work_dir: work_dir.as_ref().to_path_buf(), mode }
    }

    /// Runs one command.
    ///
    /// # Errors
    /// * `Error::CommandError` if the command exits with a non-zero status
    pub fn run(&self, command: &str) -> Result<()> {
        if self.mode.is_dry_run() {
            info!("dry-run: would run '{}'", command);
            return Ok(());
        }

        info!("Running command: {}", command);

        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.work_dir)
            .status()
            .map_err(Error::IoError)?;

        if !status.success() {
            return Err(Error::CommandError { command: command.to_string(), status });
        }

        Ok(())
    }
}
