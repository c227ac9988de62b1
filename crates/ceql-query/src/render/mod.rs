//! Target renderers for the CEQL AST.
//!
//! Renderers convert the attribute-agnostic AST into a target query string.

mod cqp;
mod escape;

pub use cqp::CqpRenderer;
pub use escape::{escape_literal, render_pattern};

use crate::ast::Query;
use crate::error::CompileResult;

/// Trait for rendering the AST to a target query language.
pub trait QueryRenderer: Send + Sync {
    /// Unique name for this renderer
    fn name(&self) -> &str;

    /// Render the query to a target query string
    fn render(&self, query: &Query) -> CompileResult<String>;
}
