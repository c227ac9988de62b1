//! LL(1) parser from CEQL tokens to the query AST.
//!
//! ```text
//! query            := proximity_query | phrase_query
//! phrase_query     := term (SEP term)*
//! proximity_query  := term PROX_OP term
//! term             := lemma_term | word_term
//! lemma_term       := '{' WORD ['*'] '}'
//! word_term        := WORD ['*'] [ '_' TAG ]
//! ```
//!
//! The parser stops at the first malformed construct; there is no recovery.

use crate::ast::{LiteralOrWildcard, Query, Term, WordMatch};
use crate::error::{CompileError, CompileResult};
use crate::syntax::lexer::{SpannedToken, Token};
use tracing::trace;

/// Where the parser is between terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    TermExpected,
    AfterTerm,
    SeparatorSeen,
    ProximityOpSeen,
    Done,
}

struct QueryParser<'t, 'src> {
    tokens: &'t [SpannedToken<'src>],
    pos: usize,
    end: usize,
    case_sensitive: bool,
}

impl<'t, 'src> QueryParser<'t, 'src> {
    fn new(tokens: &'t [SpannedToken<'src>], case_sensitive: bool) -> Self {
        let end = tokens.last().map_or(0, |t| t.offset);
        Self {
            tokens,
            pos: 0,
            end,
            case_sensitive,
        }
    }

    /// Current token; past the end this keeps returning `EndOfInput`.
    fn peek(&self) -> SpannedToken<'src> {
        self.tokens.get(self.pos).copied().unwrap_or(SpannedToken {
            token: Token::EndOfInput,
            offset: self.end,
        })
    }

    fn bump(&mut self) -> SpannedToken<'src> {
        let tok = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn skip_whitespace(&mut self) {
        while self.peek().token == Token::Whitespace {
            self.bump();
        }
    }

    fn parse_query(&mut self) -> CompileResult<Query> {
        let mut state = ParseState::Start;
        let mut terms: Vec<Term> = Vec::new();
        let mut proximity: Option<(u32, usize)> = None;

        loop {
            trace!(?state, pos = self.pos, "parser step");
            state = match state {
                ParseState::Start => {
                    self.skip_whitespace();
                    if self.peek().token == Token::EndOfInput {
                        return Err(CompileError::syntax(
                            "empty query: nothing to search for",
                            self.peek().offset,
                        ));
                    }
                    ParseState::TermExpected
                }
                ParseState::TermExpected => {
                    terms.push(self.parse_term()?);
                    ParseState::AfterTerm
                }
                ParseState::AfterTerm => {
                    let tok = self.peek();
                    match tok.token {
                        Token::Whitespace => {
                            self.bump();
                            ParseState::SeparatorSeen
                        }
                        Token::ProximityOp(_) => ParseState::ProximityOpSeen,
                        Token::EndOfInput => ParseState::Done,
                        Token::Underscore => {
                            return Err(CompileError::syntax(
                                "tag separator `_` must directly follow a word",
                                tok.offset,
                            ))
                        }
                        other => {
                            return Err(CompileError::syntax(
                                format!(
                                    "unexpected {} after a term; separate terms with a space",
                                    other.describe()
                                ),
                                tok.offset,
                            ))
                        }
                    }
                }
                ParseState::SeparatorSeen => {
                    let tok = self.peek();
                    match tok.token {
                        Token::EndOfInput => ParseState::Done,
                        Token::ProximityOp(_) => ParseState::ProximityOpSeen,
                        _ if proximity.is_some() => {
                            return Err(CompileError::syntax(
                                "a proximity query takes exactly one term on each side of the operator",
                                tok.offset,
                            ))
                        }
                        _ => ParseState::TermExpected,
                    }
                }
                ParseState::ProximityOpSeen => {
                    let tok = self.bump();
                    let Token::ProximityOp(max) = tok.token else {
                        return Err(CompileError::syntax(
                            format!("expected a proximity operator, found {}", tok.token.describe()),
                            tok.offset,
                        ));
                    };
                    if proximity.is_some() {
                        return Err(CompileError::syntax(
                            "proximity operators cannot be chained",
                            tok.offset,
                        ));
                    }
                    if terms.len() != 1 {
                        return Err(CompileError::syntax(
                            "a proximity query takes exactly one term on each side of the operator",
                            tok.offset,
                        ));
                    }
                    if max == 0 {
                        return Err(CompileError::syntax(
                            "proximity distance must be at least 1",
                            tok.offset,
                        ));
                    }
                    proximity = Some((max, tok.offset));
                    self.skip_whitespace();
                    if self.peek().token == Token::EndOfInput {
                        return Err(CompileError::syntax(
                            "missing term after proximity operator",
                            self.peek().offset,
                        ));
                    }
                    ParseState::TermExpected
                }
                ParseState::Done => break,
            };
        }

        match proximity {
            None => Ok(Query::Sequence(terms)),
            Some((max, offset)) => {
                let mut iter = terms.into_iter();
                match (iter.next(), iter.next(), iter.next()) {
                    (Some(left), Some(right), None) => Ok(Query::Proximity {
                        left,
                        right,
                        min: 1,
                        max,
                    }),
                    _ => Err(CompileError::syntax(
                        "a proximity query takes exactly one term on each side of the operator",
                        offset,
                    )),
                }
            }
        }
    }

    fn parse_term(&mut self) -> CompileResult<Term> {
        let tok = self.peek();
        match tok.token {
            Token::BraceOpen => self.parse_lemma(),
            Token::Word(_) => self.parse_word(),
            Token::WildcardStar => Err(CompileError::syntax(
                "wildcard `*` must follow a word",
                tok.offset,
            )),
            Token::Underscore | Token::TagLiteral(_) => Err(CompileError::syntax(
                "tag separator `_` has no word before it",
                tok.offset,
            )),
            Token::ProximityOp(_) => Err(CompileError::syntax(
                "proximity operator needs a term on its left",
                tok.offset,
            )),
            other => Err(CompileError::syntax(
                format!("expected a word or {{lemma}}, found {}", other.describe()),
                tok.offset,
            )),
        }
    }

    /// WORD ['*'], shared by words and lemmas
    fn parse_pattern(&mut self) -> CompileResult<LiteralOrWildcard> {
        let tok = self.bump();
        let Token::Word(text) = tok.token else {
            return Err(CompileError::syntax(
                format!("expected a word, found {}", tok.token.describe()),
                tok.offset,
            ));
        };
        if self.peek().token != Token::WildcardStar {
            return Ok(LiteralOrWildcard::Literal(text.to_string()));
        }
        self.bump();
        let next = self.peek();
        match next.token {
            Token::WildcardStar => Err(CompileError::syntax(
                "only one wildcard `*` is allowed at the end of a word",
                next.offset,
            )),
            Token::Word(_) => Err(CompileError::syntax(
                "wildcard `*` is only allowed at the end of a word",
                next.offset,
            )),
            _ => Ok(LiteralOrWildcard::Prefix(text.to_string())),
        }
    }

    fn parse_word(&mut self) -> CompileResult<Term> {
        let word = WordMatch {
            pattern: self.parse_pattern()?,
            case_sensitive: self.case_sensitive,
        };
        if self.peek().token != Token::Underscore {
            return Ok(Term::Word(word));
        }
        let sep = self.bump();
        let tok = self.bump();
        let Token::TagLiteral(tag) = tok.token else {
            return Err(CompileError::syntax(
                "tag separator `_` must be followed by a tag",
                sep.offset,
            ));
        };
        let next = self.peek();
        if next.token == Token::WildcardStar {
            return Err(CompileError::syntax(
                "wildcards are not supported in part-of-speech tags",
                next.offset,
            ));
        }
        Ok(Term::TaggedWord {
            word,
            tag: tag.to_string(),
        })
    }

    fn parse_lemma(&mut self) -> CompileResult<Term> {
        let open = self.bump();
        let tok = self.peek();
        match tok.token {
            Token::Word(_) => {}
            Token::BraceClose => {
                return Err(CompileError::syntax("empty lemma `{}`", open.offset));
            }
            Token::WildcardStar => {
                return Err(CompileError::syntax(
                    "wildcard `*` must follow a word",
                    tok.offset,
                ));
            }
            other => {
                return Err(CompileError::syntax(
                    format!("expected a lemma after `{{`, found {}", other.describe()),
                    tok.offset,
                ));
            }
        }
        let pattern = self.parse_pattern()?;
        let close = self.bump();
        if close.token != Token::BraceClose {
            return Err(CompileError::syntax(
                format!(
                    "a lemma must be a single word inside braces, found {}",
                    close.token.describe()
                ),
                close.offset,
            ));
        }
        Ok(Term::Lemma {
            pattern,
            case_sensitive: self.case_sensitive,
        })
    }
}

/// Parse a token stream into a query.
///
/// `case_sensitive` is stamped onto every word and lemma term.
pub fn parse_tokens(tokens: &[SpannedToken<'_>], case_sensitive: bool) -> CompileResult<Query> {
    QueryParser::new(tokens, case_sensitive).parse_query()
}
