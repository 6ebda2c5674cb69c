//! trailmap-report — turns dashboards into rendered reports.
//!
//! A dashboard is first flattened into a plain key-value [`context::TemplateContext`],
//! which any [`render::Renderer`] can consume.

pub mod context;
pub mod html;
pub mod render;

pub use context::TemplateContext;
pub use html::HtmlRenderer;
pub use render::{renderer_for, write_report, JsonRenderer, Renderer};
