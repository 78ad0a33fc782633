//! Per-file template processing for mason.
//! Turns a template-relative path into a concrete output path by expanding
//! bracket placeholders, then renders or copies the file's contents.

use crate::config::ConfigMap;
use crate::constants::TEMPLATE_SUFFIX;
use crate::error::{Error, Result};
use crate::fileops::{read_file, FileOps};
use crate::renderer::TemplateRenderer;
use std::path::{Path, PathBuf};

/// Expands `[key]` placeholders in a template-relative path against the
/// configuration map. Text outside brackets is copied literally; nesting is
/// disallowed.
///
/// # Errors
/// * `Error::UnterminatedBracket` for an unclosed `[`
/// * `Error::UnexpectedBracket` for a `]` with no opener
/// * `Error::MissingConfigValue` for a key absent from the map
pub fn render_path(template_path: &str, config: &ConfigMap) -> Result<String> {
    let mut target = String::new();
    let mut key = String::new();
    let mut in_brackets = false;

    for ch in template_path.chars() {
        match ch {
            '[' => {
                if in_brackets {
                    return Err(Error::UnterminatedBracket {
                        path: template_path.to_string(),
                    });
                }
                in_brackets = true;
            }
            ']' => {
                if !in_brackets {
                    return Err(Error::UnexpectedBracket {
                        path: template_path.to_string(),
                    });
                }
                in_brackets = false;
                let value = config.get(&key).ok_or_else(|| Error::MissingConfigValue {
                    key: key.clone(),
                    path: template_path.to_string(),
                })?;
                target.push_str(value);
                key.clear();
            }
            _ => {
                if in_brackets {
                    key.push(ch);
                } else {
                    target.push(ch);
                }
            }
        }
    }

    if in_brackets {
        return Err(Error::UnterminatedBracket { path: template_path.to_string() });
    }

    Ok(target)
}

/// Joins a rendered relative path under the output directory, stripping the
/// template suffix. Returns the target path and whether the file's contents
/// should be rendered rather than copied.
pub fn resolve_target_path(rendered: &str, output_dir: &Path) -> (PathBuf, bool) {
    match rendered.strip_suffix(TEMPLATE_SUFFIX) {
        Some(stripped) => (output_dir.join(stripped), true),
        None => (output_dir.join(rendered), false),
    }
}

/// Per-file pipeline: path rendering, then content rendering or copy.
pub struct Processor<'a> {
    renderer: &'a dyn TemplateRenderer,
    files: &'a FileOps,
    output_dir: &'a Path,
}

impl<'a> Processor<'a> {
    pub fn new(
        renderer: &'a dyn TemplateRenderer,
        files: &'a FileOps,
        output_dir: &'a Path,
    ) -> Self {
        Self { renderer, files, output_dir }
    }

    /// Processes one template file.
    ///
    /// Files carrying the template suffix are rendered against `context`;
    /// anything else is copied byte for byte, so binary assets can live in
    /// the same tree. Parent directories are created before the write.
    ///
    /// # Returns
    /// * `Result<PathBuf>` - The concrete output path that was produced
    pub fn process(
        &self,
        source: &Path,
        relative_path: &str,
        config: &ConfigMap,
        context: &serde_json::Value,
    ) -> Result<PathBuf> {
        let rendered = render_path(relative_path, config)?;
        let (target, is_template) = resolve_target_path(&rendered, self.output_dir);

        if is_template {
            let content = read_file(source)?;
            let output = self.renderer.render(&content, context)?;
            self.files.write_file(&target, &output)?;
        } else {
            self.files.copy_file(source, &target)?;
        }

        Ok(target)
    }
}
