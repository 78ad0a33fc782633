//! Script hook execution for mason.
//! A generator's hook program (`.g/<name>/hooks`) is run as a child process
//! with a JSON-over-stdio protocol: the config hook receives the current
//! configuration map and returns additional pairs; a transform hook receives
//! a generated file's text plus the map and returns the replacement text.

use crate::config::ConfigMap;
use crate::error::{Error, Result};
use log::debug;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Narrow capability interface to the script sandbox, so it can be swapped
/// or mocked without touching the pipeline.
pub trait ScriptEngine {
    /// Runs the config hook with the current map, returning additional or
    /// overriding key/value pairs. A missing hook program contributes
    /// nothing.
    fn eval_config(&self, script: &Path, config: &ConfigMap) -> Result<ConfigMap>;

    /// Runs the named transform hook against a generated file's text.
    fn eval_transform(
        &self,
        script: &Path,
        hook: &str,
        input: &str,
        config: &ConfigMap,
    ) -> Result<String>;
}

/// Hook programs executed as child processes.
///
/// A fresh process is spawned per call; hooks retain no state across calls
/// within a generator run.
pub struct HookScriptEngine;

impl HookScriptEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HookScriptEngine {
    fn default() -> Self {
        HookScriptEngine::new()
    }
}

impl ScriptEngine for HookScriptEngine {
    fn eval_config(&self, script: &Path, config: &ConfigMap) -> Result<ConfigMap> {
        if !script.exists() {
            debug!("No hook program at '{}'", script.display());
            return Ok(ConfigMap::new());
        }

        let payload = serde_json::to_string(config)
            .map_err(|e| Error::ScriptError(format!("cannot encode config: {}", e)))?;
        let stdout = run_hook(script, &["config"], &payload)?;

        serde_json::from_str(&stdout).map_err(|e| {
            Error::ScriptError(format!(
                "config hook '{}' returned invalid output: {}",
                script.display(),
                e
            ))
        })
    }

    fn eval_transform(
        &self,
        script: &Path,
        hook: &str,
        input: &str,
        config: &ConfigMap,
    ) -> Result<String> {
        if !script.exists() {
            return Err(Error::ScriptError(format!(
                "transform '{}' requires a hook program at '{}'",
                hook,
                script.display()
            )));
        }

        let payload = serde_json::json!({ "content": input, "config": config });
        run_hook(script, &["transform", hook], &payload.to_string())
    }
}

/// Spawns the hook program, feeds the payload to its stdin and returns its
/// stdout as text. Stderr is inherited so hook diagnostics reach the user.
fn run_hook(script: &Path, args: &[&str], payload: &str) -> Result<String> {
    let mut child = Command::new(script)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| {
            Error::ScriptError(format!("cannot execute '{}': {}", script.display(), e))
        })?;

    // A hook is free to ignore its stdin and exit early; only real write
    // failures are errors.
    if let Some(mut stdin) = child.stdin.take() {
        if let Err(e) = stdin.write_all(payload.as_bytes()) {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(Error::IoError(e));
            }
        }
    }

    let output = child.wait_with_output().map_err(Error::IoError)?;

    if !output.status.success() {
        return Err(Error::ScriptError(format!(
            "hook '{}' failed with {}",
            script.display(),
            output.status
        )));
    }

    String::from_utf8(output.stdout).map_err(|_| {
        Error::ScriptError(format!("hook '{}' returned non-UTF-8 output", script.display()))
    })
}
