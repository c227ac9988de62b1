//! Render extensions.
//!
//! Every renderer production (term, phrase, proximity, whole query) can be
//! decorated. The renderer produces its base output first, then hands it to
//! each extension registered for that production, in registration order.
//! With no extensions registered the base output is returned untouched.

mod within;

pub use within::WithinScope;

use crate::ast::{Query, Term};
use crate::config::AttributeBinding;
use crate::error::CompileResult;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// A renderer production that extensions can decorate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Production {
    /// A single bracketed term
    Term,
    /// A space-separated sequence of terms
    Phrase,
    /// A `MU(meet ...)` proximity expression
    Proximity,
    /// The finished query
    Query,
}

/// The AST node a production rendered.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    Term(&'a Term),
    Phrase(&'a [Term]),
    Proximity {
        left: &'a Term,
        right: &'a Term,
        min: u32,
        max: u32,
    },
    Query(&'a Query),
}

impl Node<'_> {
    pub fn production(&self) -> Production {
        match self {
            Node::Term(_) => Production::Term,
            Node::Phrase(_) => Production::Phrase,
            Node::Proximity { .. } => Production::Proximity,
            Node::Query(_) => Production::Query,
        }
    }
}

/// Read-only state available to extensions.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub binding: &'a AttributeBinding,
}

/// Trait for render extensions.
///
/// An extension receives the rendering produced so far and returns the
/// rendering to pass on. It never has to reproduce the base output itself.
pub trait RenderExtension: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Production this extension decorates
    fn production(&self) -> Production;

    /// Transform the rendering of `node`
    fn apply(
        &self,
        rendered: String,
        node: Node<'_>,
        ctx: &RenderContext<'_>,
    ) -> CompileResult<String>;
}

/// Extension backed by a closure.
pub struct FnExtension<F> {
    name: String,
    production: Production,
    f: F,
}

impl<F> FnExtension<F>
where
    F: Fn(String, Node<'_>, &RenderContext<'_>) -> CompileResult<String> + Send + Sync,
{
    pub fn new(name: impl Into<String>, production: Production, f: F) -> Self {
        Self {
            name: name.into(),
            production,
            f,
        }
    }
}

impl<F> RenderExtension for FnExtension<F>
where
    F: Fn(String, Node<'_>, &RenderContext<'_>) -> CompileResult<String> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn production(&self) -> Production {
        self.production
    }

    fn apply(
        &self,
        rendered: String,
        node: Node<'_>,
        ctx: &RenderContext<'_>,
    ) -> CompileResult<String> {
        (self.f)(rendered, node, ctx)
    }
}

/// Registry of render extensions, kept in registration order.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Arc<dyn RenderExtension>>,
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.extension_names())
            .finish()
    }
}

impl ExtensionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an extension
    pub fn register(&mut self, extension: Arc<dyn RenderExtension>) {
        self.extensions.push(extension);
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Names of registered extensions, in order
    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    /// Run every extension registered for the node's production over `rendered`
    pub fn apply(
        &self,
        rendered: String,
        node: Node<'_>,
        ctx: &RenderContext<'_>,
    ) -> CompileResult<String> {
        let production = node.production();
        self.extensions
            .iter()
            .filter(|ext| ext.production() == production)
            .try_fold(rendered, |acc, ext| {
                trace!(extension = ext.name(), ?production, "applying render extension");
                ext.apply(acc, node, ctx)
            })
    }
}

/// Builder for ergonomic registry construction
#[derive(Default)]
pub struct ExtensionRegistryBuilder {
    extensions: Vec<Arc<dyn RenderExtension>>,
}

impl ExtensionRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an extension
    pub fn with_extension(mut self, extension: impl RenderExtension + 'static) -> Self {
        self.extensions.push(Arc::new(extension));
        self
    }

    /// Add a closure extension
    pub fn with_fn<F>(self, name: impl Into<String>, production: Production, f: F) -> Self
    where
        F: Fn(String, Node<'_>, &RenderContext<'_>) -> CompileResult<String>
            + Send
            + Sync
            + 'static,
    {
        self.with_extension(FnExtension::new(name, production, f))
    }

    /// Build the registry
    pub fn build(self) -> ExtensionRegistry {
        let mut registry = ExtensionRegistry::new();
        for extension in self.extensions {
            registry.register(extension);
        }
        registry
    }
}
