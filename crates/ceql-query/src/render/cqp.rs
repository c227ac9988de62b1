//! CQP query renderer.
//!
//! Renders the CEQL AST to CQP syntax:
//! - one bracketed condition per term: `[word="x"%c]`
//! - tag constraints joined inside the same bracket: `[word="x"%c & pos="NN1"]`
//! - phrases as space-separated terms
//! - proximity as `MU(meet <left> <right> <min> <max>)`

use crate::ast::{LiteralOrWildcard, Query, Term, WordMatch};
use crate::config::AttributeBinding;
use crate::error::{CompileError, CompileResult};
use crate::extension::{ExtensionRegistry, Node, RenderContext};
use crate::render::escape::{escape_literal, render_pattern};
use crate::render::QueryRenderer;

/// CQP case-insensitivity flag
const IGNORE_CASE_FLAG: &str = "%c";

/// CQP renderer for one attribute binding and extension set.
pub struct CqpRenderer<'a> {
    binding: &'a AttributeBinding,
    extensions: &'a ExtensionRegistry,
}

impl<'a> CqpRenderer<'a> {
    pub fn new(binding: &'a AttributeBinding, extensions: &'a ExtensionRegistry) -> Self {
        Self {
            binding,
            extensions,
        }
    }

    fn context(&self) -> RenderContext<'a> {
        RenderContext {
            binding: self.binding,
        }
    }

    fn condition(attribute: &str, pattern: &LiteralOrWildcard, case_sensitive: bool) -> String {
        let flag = if case_sensitive { "" } else { IGNORE_CASE_FLAG };
        format!("{}=\"{}\"{}", attribute, render_pattern(pattern), flag)
    }

    fn word_condition(&self, word: &WordMatch) -> String {
        Self::condition(
            &self.binding.word_attribute,
            &word.pattern,
            word.case_sensitive,
        )
    }

    /// Render one term as a bracketed condition
    pub fn render_term(&self, term: &Term) -> CompileResult<String> {
        let base = match term {
            Term::Word(word) => format!("[{}]", self.word_condition(word)),
            Term::Lemma {
                pattern,
                case_sensitive,
            } => {
                let attribute = self.binding.lemma_attribute()?;
                format!("[{}]", Self::condition(attribute, pattern, *case_sensitive))
            }
            Term::TaggedWord { word, tag } => {
                let pos = self.binding.pos_attribute()?;
                format!(
                    "[{} & {}=\"{}\"]",
                    self.word_condition(word),
                    pos,
                    escape_literal(tag)
                )
            }
        };
        self.extensions.apply(base, Node::Term(term), &self.context())
    }

    /// Render a sequence of adjacent terms
    pub fn render_phrase(&self, terms: &[Term]) -> CompileResult<String> {
        if terms.is_empty() {
            return Err(CompileError::render("cannot render an empty phrase"));
        }
        let base = terms
            .iter()
            .map(|term| self.render_term(term))
            .collect::<CompileResult<Vec<_>>>()?
            .join(" ");
        self.extensions
            .apply(base, Node::Phrase(terms), &self.context())
    }

    /// Render two terms within a distance window
    pub fn render_proximity(
        &self,
        left: &Term,
        right: &Term,
        min: u32,
        max: u32,
    ) -> CompileResult<String> {
        if min > max {
            return Err(CompileError::render(format!(
                "proximity window {}..{} is empty",
                min, max
            )));
        }
        let base = format!(
            "MU(meet {} {} {} {})",
            self.render_term(left)?,
            self.render_term(right)?,
            min,
            max
        );
        self.extensions.apply(
            base,
            Node::Proximity {
                left,
                right,
                min,
                max,
            },
            &self.context(),
        )
    }
}

impl QueryRenderer for CqpRenderer<'_> {
    fn name(&self) -> &str {
        "cqp"
    }

    fn render(&self, query: &Query) -> CompileResult<String> {
        let base = match query {
            Query::Sequence(terms) => self.render_phrase(terms)?,
            Query::Proximity {
                left,
                right,
                min,
                max,
            } => self.render_proximity(left, right, *min, *max)?,
        };
        self.extensions
            .apply(base, Node::Query(query), &self.context())
    }
}
