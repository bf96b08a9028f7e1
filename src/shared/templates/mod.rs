//! HTML fragments rendered with Jinja2 syntax.
//!
//! Templates live in `templates/` and are compiled into the binary.

pub mod engine;

pub use engine::{render_template, TemplateError};
