//! Template rendering functionality for mason.
//! Wraps MiniJinja behind a trait so the engine can be swapped in tests,
//! and exposes case-conversion filters to template authors.

use crate::config::ConfigMap;
use crate::error::{Error, Result};
use minijinja::{Environment, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
///
/// Undefined variables are a rendering error, never a silent blank.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.add_filter("camel_case", |value: String| cruet::to_camel_case(&value));
        env.add_filter("pascal_case", |value: String| cruet::to_pascal_case(&value));
        env.add_filter("snake_case", |value: String| cruet::to_snake_case(&value));
        env.add_filter("kebab_case", |value: String| cruet::to_kebab_case(&value));
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// Renders a template string using MiniJinja.
    ///
    /// # Errors
    /// * `Error::MinijinjaError` if:
    ///   - Template parsing fails
    ///   - Template rendering fails, including undefined variables
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let mut env = self.env.clone();
        env.add_template("temp", template).map_err(Error::MinijinjaError)?;

        let tmpl = env.get_template("temp").map_err(Error::MinijinjaError)?;

        tmpl.render(context).map_err(Error::MinijinjaError)
    }
}

/// Builds a rendering context from a configuration map.
pub fn context_from(config: &ConfigMap) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, value) in config {
        map.insert(key.clone(), serde_json::Value::String(value.clone()));
    }
    serde_json::Value::Object(map)
}
