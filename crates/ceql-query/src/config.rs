//! Attribute binding: which annotation layers a corpus provides.
//!
//! The binding is supplied by the caller, usually derived from corpus
//! metadata, and read by the parser and renderer. Every option is typed and
//! checked when it is set.

use crate::error::{CompileError, CompileResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// CQP attribute identifiers
static IDENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_\-]*$").unwrap());

/// Annotation layer names and case policy for one corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeBinding {
    /// Word-form layer. Default: "word"
    #[serde(default = "default_word_attribute")]
    pub word_attribute: String,

    /// Part-of-speech layer, matched by `word_TAG`
    #[serde(default)]
    pub pos_attribute: Option<String>,

    /// Lemma layer, matched by `{lemma}`
    #[serde(default)]
    pub lemma_attribute: Option<String>,

    /// Simplified part-of-speech layer
    #[serde(default)]
    pub simple_pos_attribute: Option<String>,

    /// Simple tag -> regex over full tags
    #[serde(default)]
    pub simple_pos_map: BTreeMap<String, String>,

    /// Combined lemma/tag layer
    #[serde(default)]
    pub combo_attribute: Option<String>,

    /// Structural attributes a query may be scoped to.
    ///
    /// Empty means scope names are not restricted.
    #[serde(default)]
    pub s_attributes: BTreeSet<String>,

    /// Match case-insensitively unless a call says otherwise. Default: true
    #[serde(default = "default_ignore_case")]
    pub default_ignore_case: bool,
}

fn default_word_attribute() -> String {
    "word".to_string()
}

fn default_ignore_case() -> bool {
    true
}

impl Default for AttributeBinding {
    fn default() -> Self {
        Self {
            word_attribute: default_word_attribute(),
            pos_attribute: None,
            lemma_attribute: None,
            simple_pos_attribute: None,
            simple_pos_map: BTreeMap::new(),
            combo_attribute: None,
            s_attributes: BTreeSet::new(),
            default_ignore_case: default_ignore_case(),
        }
    }
}

/// One recognised configuration option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
    WordAttribute(String),
    PosAttribute(String),
    LemmaAttribute(String),
    SimplePosAttribute {
        attribute: String,
        mapping: BTreeMap<String, String>,
    },
    ComboAttribute(String),
    SAttributes(BTreeSet<String>),
    DefaultIgnoreCase(bool),
}

/// Case handling for a single compile call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Use the binding's `default_ignore_case`
    #[default]
    Default,
    Sensitive,
    Insensitive,
}

impl CaseMode {
    /// Whether terms compiled under this mode are case-sensitive
    pub fn is_case_sensitive(self, binding: &AttributeBinding) -> bool {
        match self {
            Self::Default => !binding.default_ignore_case,
            Self::Sensitive => true,
            Self::Insensitive => false,
        }
    }
}

/// Check that `name` can be used as a CQP attribute name
pub fn validate_identifier(what: &str, name: &str) -> CompileResult<()> {
    if IDENT_RE.is_match(name) {
        Ok(())
    } else {
        Err(CompileError::config(format!(
            "{} `{}` is not a valid attribute name",
            what, name
        )))
    }
}

fn parse_bool(name: &str, value: &str) -> CompileResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CompileError::config(format!(
            "option `{}` expects a boolean, got `{}`",
            name, other
        ))),
    }
}

fn parse_name_list(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse `N=NN.*, V=VV.*` into a mapping table
fn parse_mapping(value: &str) -> CompileResult<BTreeMap<String, String>> {
    let mut mapping = BTreeMap::new();
    for entry in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, pattern) = entry.split_once('=').ok_or_else(|| {
            CompileError::config(format!(
                "mapping entry `{}` must look like SIMPLE=PATTERN",
                entry
            ))
        })?;
        mapping.insert(key.trim().to_string(), pattern.trim().to_string());
    }
    Ok(mapping)
}

impl AttributeBinding {
    /// Check every field; used for bindings built outside `apply`
    pub fn validate(&self) -> CompileResult<()> {
        validate_identifier("word attribute", &self.word_attribute)?;
        for (what, attr) in [
            ("part-of-speech attribute", &self.pos_attribute),
            ("lemma attribute", &self.lemma_attribute),
            ("simple part-of-speech attribute", &self.simple_pos_attribute),
            ("combination attribute", &self.combo_attribute),
        ] {
            if let Some(name) = attr {
                validate_identifier(what, name)?;
            }
        }
        for name in &self.s_attributes {
            validate_identifier("structural attribute", name)?;
        }
        for (key, pattern) in &self.simple_pos_map {
            if key.is_empty() || pattern.is_empty() {
                return Err(CompileError::config(
                    "simple part-of-speech mapping entries need a tag and a pattern",
                ));
            }
        }
        Ok(())
    }

    /// Validate and apply one option. The binding is unchanged on error.
    pub fn apply(&mut self, option: ConfigOption) -> CompileResult<()> {
        let mut next = self.clone();
        match option {
            ConfigOption::WordAttribute(name) => next.word_attribute = name,
            ConfigOption::PosAttribute(name) => next.pos_attribute = Some(name),
            ConfigOption::LemmaAttribute(name) => next.lemma_attribute = Some(name),
            ConfigOption::SimplePosAttribute { attribute, mapping } => {
                next.simple_pos_attribute = Some(attribute);
                next.simple_pos_map = mapping;
            }
            ConfigOption::ComboAttribute(name) => next.combo_attribute = Some(name),
            ConfigOption::SAttributes(names) => next.s_attributes = names,
            ConfigOption::DefaultIgnoreCase(flag) => next.default_ignore_case = flag,
        }
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Turn a string-keyed option into a typed one.
    ///
    /// Unknown option names are rejected.
    pub fn parse_option(name: &str, value: &str) -> CompileResult<ConfigOption> {
        let value_trimmed = value.trim();
        let option = match name {
            "word_attribute" => ConfigOption::WordAttribute(value_trimmed.to_string()),
            "pos_attribute" => ConfigOption::PosAttribute(value_trimmed.to_string()),
            "lemma_attribute" => ConfigOption::LemmaAttribute(value_trimmed.to_string()),
            "simple_pos_attribute" => ConfigOption::SimplePosAttribute {
                attribute: value_trimmed.to_string(),
                mapping: BTreeMap::new(),
            },
            "combo_attribute" => ConfigOption::ComboAttribute(value_trimmed.to_string()),
            "s_attributes" => ConfigOption::SAttributes(parse_name_list(value)),
            "default_ignore_case" => ConfigOption::DefaultIgnoreCase(parse_bool(name, value)?),
            other => {
                return Err(CompileError::config(format!(
                    "unknown configuration option `{}`",
                    other
                )))
            }
        };
        Ok(option)
    }

    /// Apply a string-keyed option.
    ///
    /// `simple_pos_map` is accepted here as well and replaces the mapping
    /// table while keeping the attribute name.
    pub fn apply_named(&mut self, name: &str, value: &str) -> CompileResult<()> {
        if name == "simple_pos_map" {
            let mapping = parse_mapping(value)?;
            let attribute = self.simple_pos_attribute.clone().ok_or_else(|| {
                CompileError::config("set simple_pos_attribute before simple_pos_map")
            })?;
            return self.apply(ConfigOption::SimplePosAttribute { attribute, mapping });
        }
        let option = Self::parse_option(name, value)?;
        // Setting the attribute by name alone keeps an existing table.
        if let ConfigOption::SimplePosAttribute { attribute, .. } = option {
            let mapping = self.simple_pos_map.clone();
            return self.apply(ConfigOption::SimplePosAttribute { attribute, mapping });
        }
        self.apply(option)
    }

    pub fn pos_attribute(&self) -> CompileResult<&str> {
        self.pos_attribute.as_deref().ok_or_else(|| {
            CompileError::config("tagged words need a part-of-speech attribute, but none is configured")
        })
    }

    pub fn lemma_attribute(&self) -> CompileResult<&str> {
        self.lemma_attribute.as_deref().ok_or_else(|| {
            CompileError::config("lemma queries need a lemma attribute, but none is configured")
        })
    }

    /// Regex over full tags for a simplified tag, if mapped
    pub fn simple_pos_pattern(&self, simple_tag: &str) -> Option<&str> {
        self.simple_pos_map.get(simple_tag).map(String::as_str)
    }

    /// Check that a query may be scoped to the structural attribute `name`.
    ///
    /// An empty permitted set accepts any well-formed name.
    pub fn check_scope(&self, name: &str) -> CompileResult<()> {
        if !IDENT_RE.is_match(name) {
            return Err(CompileError::scope(format!(
                "`{}` is not a valid structural attribute name",
                name
            )));
        }
        if !self.s_attributes.is_empty() && !self.s_attributes.contains(name) {
            return Err(CompileError::scope(format!(
                "structural attribute `{}` is not available (expected one of: {})",
                name,
                self.s_attributes
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )));
        }
        Ok(())
    }
}
