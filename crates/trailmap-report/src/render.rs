//! Renderer trait and the JSON renderer.

use std::path::Path;

use anyhow::{Context, Result};

use crate::context::TemplateContext;
use crate::html::HtmlRenderer;

/// Turns a template context into a document.
pub trait Renderer: Send + Sync {
    /// Format name (e.g. "html").
    fn name(&self) -> &str;

    /// Extension for files written by this renderer, without the dot.
    fn file_extension(&self) -> &str;

    fn render(&self, context: &TemplateContext) -> Result<String>;
}

/// Writes the context itself as pretty-printed JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn name(&self) -> &str {
        "json"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn render(&self, context: &TemplateContext) -> Result<String> {
        serde_json::to_string_pretty(context).context("failed to serialize template context")
    }
}

/// Look up a renderer by format name.
pub fn renderer_for(format: &str) -> Result<Box<dyn Renderer>> {
    match format.trim().to_lowercase().as_str() {
        "json" => Ok(Box::new(JsonRenderer)),
        "html" => Ok(Box::new(HtmlRenderer::default())),
        other => anyhow::bail!("unknown report format: '{other}' (expected json or html)"),
    }
}

/// Render `context` and write it to `path`, creating parent directories.
pub fn write_report(renderer: &dyn Renderer, context: &TemplateContext, path: &Path) -> Result<()> {
    let output = renderer.render(context)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, output)
        .with_context(|| format!("failed to write {} report to {}", renderer.name(), path.display()))?;
    Ok(())
}
