//! Scope every phrase query to a structural attribute.

use crate::error::CompileResult;
use crate::extension::{Node, Production, RenderContext, RenderExtension};

/// Appends `within <scope>` to phrase queries, e.g. `[word="a"] within s`.
///
/// The scope is checked against the binding's structural attributes each
/// time it is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithinScope {
    scope: String,
}

impl WithinScope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl RenderExtension for WithinScope {
    fn name(&self) -> &str {
        "within-scope"
    }

    fn production(&self) -> Production {
        Production::Phrase
    }

    fn apply(
        &self,
        rendered: String,
        _node: Node<'_>,
        ctx: &RenderContext<'_>,
    ) -> CompileResult<String> {
        ctx.binding.check_scope(&self.scope)?;
        Ok(format!("{} within {}", rendered, self.scope))
    }
}
