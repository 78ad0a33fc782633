//! Generator execution for mason.
//! Runs a resolved generator: either delegating to other generators via its
//! `use` list, or rendering its own template tree, then applying transform
//! hooks and post-commands.

use crate::config::ConfigMap;
use crate::error::{Error, Result};
use crate::fileops::{read_file, FileOps};
use crate::processor::Processor;
use crate::renderer::{context_from, TemplateRenderer};
use crate::resolver::{find, ResolvedGenerator};
use crate::script::ScriptEngine;
use crate::shell::ShellRunner;
use log::{info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Executes generators against one shared configuration map.
///
/// Borrows the resolved catalog read-only to look up `use` targets.
pub struct Runner<'a> {
    generators: &'a [ResolvedGenerator],
    renderer: &'a dyn TemplateRenderer,
    scripts: &'a dyn ScriptEngine,
    files: &'a FileOps,
    shell: ShellRunner,
    output_dir: PathBuf,
}

impl<'a> Runner<'a> {
    pub fn new(
        generators: &'a [ResolvedGenerator],
        renderer: &'a dyn TemplateRenderer,
        scripts: &'a dyn ScriptEngine,
        files: &'a FileOps,
        output_dir: &Path,
    ) -> Self {
        Self {
            generators,
            renderer,
            scripts,
            files,
            shell: ShellRunner::new(output_dir, files.mode()),
            output_dir: output_dir.to_path_buf(),
        }
    }

    /// Runs one generator to completion.
    ///
    /// Delegates mutate the same map, so configuration written by earlier
    /// `use` targets is visible to later ones and to the caller.
    pub fn run(&self, target: &ResolvedGenerator, config: &mut ConfigMap) -> Result<()> {
        let mut active = Vec::new();
        self.run_generator(target, config, &mut active)
    }

    fn run_generator(
        &self,
        target: &ResolvedGenerator,
        config: &mut ConfigMap,
        active: &mut Vec<String>,
    ) -> Result<()> {
        if active.iter().any(|cmd| *cmd == target.cmd) {
            let mut chain = active.join(" -> ");
            chain.push_str(" -> ");
            chain.push_str(&target.cmd);
            return Err(Error::CyclicUse { chain });
        }
        active.push(target.cmd.clone());

        info!("Running generator: {}", target.cmd);

        if target.cfg.use_.is_empty() {
            self.run_leaf(target, config)?;
        } else {
            // A delegating generator renders no tree of its own; its
            // transforms and post-commands still apply below.
            for name in &target.cfg.use_ {
                let delegate = find(self.generators, name)?;
                self.run_generator(delegate, config, active)?;
            }
        }

        self.apply_transforms(target, config)?;
        self.run_post(target, config)?;

        active.pop();
        Ok(())
    }

    fn run_leaf(&self, target: &ResolvedGenerator, config: &mut ConfigMap) -> Result<()> {
        for arg in &target.cfg.args {
            if config.get(arg).map_or(true, |value| value.is_empty()) {
                return Err(Error::MissingArgument { name: arg.clone() });
            }
        }

        let extra = self.scripts.eval_config(&target.hooks_file(), config)?;
        for (key, value) in extra {
            config.insert(key, value);
        }

        let context = context_from(config);
        let processor = Processor::new(self.renderer, self.files, &self.output_dir);
        let template_dir = target.template_dir();

        for entry in WalkDir::new(&template_dir).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::IoError(e.into()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&template_dir)
                .map_err(|e| Error::ConfigParseError(e.to_string()))?
                .to_str()
                .ok_or_else(|| {
                    Error::ConfigParseError(format!(
                        "invalid template path: {}",
                        entry.path().display()
                    ))
                })?
                .to_string();

            let written = processor.process(entry.path(), &relative_path, config, &context)?;
            info!("Rendered: {}", written.display());
        }

        Ok(())
    }

    fn apply_transforms(&self, target: &ResolvedGenerator, config: &ConfigMap) -> Result<()> {
        if target.cfg.transforms.is_empty() {
            return Ok(());
        }

        let script = target.hooks_file();
        for transform in &target.cfg.transforms {
            for (hook, relative_path) in transform {
                let path = self.output_dir.join(relative_path);
                if !path.exists() {
                    // The only tolerated failure: a transform may target a
                    // file an earlier step chose not to produce.
                    warn!("Transform target does not exist, skipping: {}", path.display());
                    continue;
                }

                let input = read_file(&path)?;
                let output = self.scripts.eval_transform(&script, hook, &input, config)?;
                self.files.write_file(&path, &output)?;
            }
        }

        Ok(())
    }

    fn run_post(&self, target: &ResolvedGenerator, config: &ConfigMap) -> Result<()> {
        let context = context_from(config);
        for post in &target.cfg.post {
            let command = self.renderer.render(post, &context)?;
            self.shell.run(&command)?;
        }

        Ok(())
    }
}
