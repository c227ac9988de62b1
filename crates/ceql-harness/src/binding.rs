//! Loading attribute bindings from TOML files.

use crate::error::HarnessResult;
use ceql_query::{AttributeBinding, CeqlCompiler, ExtensionRegistryBuilder, WithinScope};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parse and validate a binding from TOML text
pub fn parse_binding(text: &str) -> HarnessResult<AttributeBinding> {
    let binding: AttributeBinding = toml::from_str(text)?;
    binding.validate()?;
    Ok(binding)
}

/// Load a binding file
pub fn load_binding(path: impl AsRef<Path>) -> HarnessResult<AttributeBinding> {
    let path = path.as_ref();
    debug!(path = %path.display(), "loading binding");
    let text = fs::read_to_string(path)?;
    parse_binding(&text)
}

/// Build a compiler from an optional binding file and `within` scope
pub fn build_compiler(
    binding: Option<&Path>,
    within: Option<&str>,
) -> HarnessResult<CeqlCompiler> {
    let binding = match binding {
        Some(path) => load_binding(path)?,
        None => AttributeBinding::default(),
    };
    let mut extensions = ExtensionRegistryBuilder::new();
    if let Some(scope) = within {
        extensions = extensions.with_extension(WithinScope::new(scope));
    }
    Ok(CeqlCompiler::with_binding(binding)?.with_extensions(extensions.build()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HarnessError;

    #[test]
    fn test_parse_binding() {
        let binding = parse_binding(
            r#"
                pos_attribute = "pos"
                lemma_attribute = "hw"
                s_attributes = ["s"]
            "#,
        )
        .unwrap();
        assert_eq!(binding.word_attribute, "word");
        assert_eq!(binding.lemma_attribute.as_deref(), Some("hw"));
    }

    #[test]
    fn test_invalid_identifier_rejected() {
        let err = parse_binding(r#"pos_attribute = "p o s""#).unwrap_err();
        assert!(matches!(err, HarnessError::Binding(_)));
    }

    #[test]
    fn test_bad_toml_rejected() {
        let err = parse_binding("pos_attribute = ").unwrap_err();
        assert!(matches!(err, HarnessError::BindingFile(_)));
    }

    #[test]
    fn test_build_compiler_with_within() {
        let mut compiler = build_compiler(None, Some("s")).unwrap();
        assert_eq!(
            compiler.compile("a b").unwrap(),
            r#"[word="a"%c] [word="b"%c] within s"#
        );
    }
}
