//! CEQL surface syntax: lexer and parser.

mod lexer;
mod parser;

pub use lexer::{lex, SpannedToken, Token};
pub use parser::parse_tokens;

use crate::ast::Query;
use crate::error::CompileResult;
use tracing::trace;

/// Lex and parse a CEQL query.
///
/// `case_sensitive` is recorded on every word and lemma term.
pub fn parse(input: &str, case_sensitive: bool) -> CompileResult<Query> {
    let tokens = lex(input)?;
    trace!(count = tokens.len(), "lexed query");
    parse_tokens(&tokens, case_sensitive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;

    #[test]
    fn test_parse_reports_lex_errors_first() {
        let err = parse("{a b", false).unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Lex);
    }

    #[test]
    fn test_parse_phrase_term_count() {
        let query = parse("the {cat} sat_VVD on*", false).unwrap();
        assert_eq!(query.term_count(), 4);
    }
}
