//! The compiler facade: configuration, extensions and diagnostics around
//! the parse → render → validate pipeline.

use crate::config::{AttributeBinding, CaseMode, ConfigOption};
use crate::error::{CompileResult, Diagnostic};
use crate::extension::{ExtensionRegistry, RenderExtension};
use crate::render::{CqpRenderer, QueryRenderer};
use crate::syntax;
use crate::validate::validate_output;
use std::sync::Arc;
use tracing::debug;

/// Compiles CEQL queries to CQP.
///
/// Configuration persists across calls; diagnostics describe the most
/// recent call only.
#[derive(Debug, Clone, Default)]
pub struct CeqlCompiler {
    binding: AttributeBinding,
    extensions: ExtensionRegistry,
    diagnostics: Vec<Diagnostic>,
}

impl CeqlCompiler {
    /// Compiler with the default binding and no extensions
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiler with a caller-supplied binding, validated up front
    pub fn with_binding(binding: AttributeBinding) -> CompileResult<Self> {
        binding.validate()?;
        Ok(Self {
            binding,
            ..Self::default()
        })
    }

    /// Replace the extension registry
    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn binding(&self) -> &AttributeBinding {
        &self.binding
    }

    pub fn extensions(&self) -> &ExtensionRegistry {
        &self.extensions
    }

    /// Replace the whole binding. Keeps the old one if validation fails.
    pub fn set_binding(&mut self, binding: AttributeBinding) -> CompileResult<()> {
        binding.validate()?;
        self.binding = binding;
        Ok(())
    }

    /// Set one option
    pub fn configure(&mut self, option: ConfigOption) -> CompileResult<()> {
        self.binding.apply(option)
    }

    /// Set one option by name; unknown names are rejected
    pub fn configure_named(&mut self, name: &str, value: &str) -> CompileResult<()> {
        self.binding.apply_named(name, value)
    }

    /// Append a render extension
    pub fn register_extension(&mut self, extension: impl RenderExtension + 'static) {
        self.extensions.register(Arc::new(extension));
    }

    /// Compile using the binding's default case policy
    pub fn compile(&mut self, input: &str) -> Result<String, Vec<Diagnostic>> {
        self.compile_with(input, CaseMode::Default)
    }

    /// Compile with an explicit case mode for this call.
    ///
    /// On failure nothing is returned but the diagnostics, which stay
    /// available from [`CeqlCompiler::last_diagnostics`].
    pub fn compile_with(&mut self, input: &str, mode: CaseMode) -> Result<String, Vec<Diagnostic>> {
        self.diagnostics.clear();
        match self.run(input, mode) {
            Ok(output) => {
                debug!(input, output = %output, "compiled query");
                Ok(output)
            }
            Err(err) => {
                debug!(input, error = %err, "query rejected");
                self.diagnostics.push(Diagnostic::from(err));
                Err(self.diagnostics.clone())
            }
        }
    }

    /// Diagnostics from the most recent compile; empty after a success
    pub fn last_diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn run(&self, input: &str, mode: CaseMode) -> CompileResult<String> {
        let case_sensitive = mode.is_case_sensitive(&self.binding);
        let query = syntax::parse(input, case_sensitive)?;
        let renderer = CqpRenderer::new(&self.binding, &self.extensions);
        let output = renderer.render(&query)?;
        debug!(
            renderer = renderer.name(),
            extensions = self.extensions.len(),
            "rendered query"
        );
        validate_output(&output)?;
        Ok(output)
    }
}
