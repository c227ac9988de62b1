//! Abstract syntax tree for parsed CEQL queries.
//!
//! The tree holds raw literal text only. Escaping, wildcard expansion and
//! attribute names are the renderer's business, so the same tree can be
//! rendered against any attribute binding.

use serde::Serialize;

/// A literal, or a literal prefix followed by an open-ended wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LiteralOrWildcard {
    /// Exact text: `elephant`
    Literal(String),
    /// Prefix plus wildcard suffix: `elephant*`
    Prefix(String),
}

impl LiteralOrWildcard {
    /// The literal text without the wildcard marker
    pub fn text(&self) -> &str {
        match self {
            Self::Literal(text) | Self::Prefix(text) => text,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Prefix(_))
    }
}

/// Constraint on the word-form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordMatch {
    pub pattern: LiteralOrWildcard,
    pub case_sensitive: bool,
}

/// A single-token constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Term {
    /// `word` or `word*`
    Word(WordMatch),
    /// `{lemma}`
    Lemma {
        pattern: LiteralOrWildcard,
        case_sensitive: bool,
    },
    /// `word_TAG`
    TaggedWord { word: WordMatch, tag: String },
}

/// Top-level query node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Query {
    /// Consecutive tokens
    Sequence(Vec<Term>),
    /// Two terms within a token-distance window
    Proximity {
        left: Term,
        right: Term,
        min: u32,
        max: u32,
    },
}

impl Query {
    /// Number of terms in the query
    pub fn term_count(&self) -> usize {
        match self {
            Self::Sequence(terms) => terms.len(),
            Self::Proximity { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_text_strips_nothing() {
        let lit = LiteralOrWildcard::Literal("a.b".to_string());
        assert_eq!(lit.text(), "a.b");
        assert!(!lit.is_wildcard());
    }

    #[test]
    fn test_prefix_is_wildcard() {
        let prefix = LiteralOrWildcard::Prefix("eleph".to_string());
        assert_eq!(prefix.text(), "eleph");
        assert!(prefix.is_wildcard());
    }

    #[test]
    fn test_term_count() {
        let word = Term::Word(WordMatch {
            pattern: LiteralOrWildcard::Literal("a".to_string()),
            case_sensitive: false,
        });
        let seq = Query::Sequence(vec![word.clone(), word.clone(), word.clone()]);
        assert_eq!(seq.term_count(), 3);

        let prox = Query::Proximity {
            left: word.clone(),
            right: word,
            min: 1,
            max: 4,
        };
        assert_eq!(prox.term_count(), 2);
    }
}
