//! CEQL lexer.
//!
//! A chumsky pass splits the input into coarse lexemes (word chunks,
//! whitespace runs, operators, stray characters). A second pass splits tag
//! suffixes off word chunks, converts proximity distances and checks brace
//! balance.

use crate::error::{CompileError, CompileResult};
use chumsky::extra;
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;

/// Extra type for parsers - uses Rich errors for better messages
pub type Extra<'src> = extra::Err<Rich<'src, char>>;

/// A CEQL token. Text borrows from the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'src> {
    Word(&'src str),
    /// `_` separating a word from its tag
    Underscore,
    TagLiteral(&'src str),
    WildcardStar,
    BraceOpen,
    BraceClose,
    /// `>>N>>`, carrying the maximum distance
    ProximityOp(u32),
    Whitespace,
    EndOfInput,
}

impl Token<'_> {
    /// Short description for diagnostics
    pub fn describe(&self) -> String {
        match self {
            Token::Word(text) => format!("word `{}`", text),
            Token::Underscore => "tag separator `_`".to_string(),
            Token::TagLiteral(tag) => format!("tag `{}`", tag),
            Token::WildcardStar => "wildcard `*`".to_string(),
            Token::BraceOpen => "`{`".to_string(),
            Token::BraceClose => "`}`".to_string(),
            Token::ProximityOp(n) => format!("proximity operator `>>{}>>`", n),
            Token::Whitespace => "whitespace".to_string(),
            Token::EndOfInput => "end of query".to_string(),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'src> {
    pub token: Token<'src>,
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme<'src> {
    Chunk(&'src str),
    Distance(&'src str),
    Whitespace,
    Star,
    Open,
    Close,
    Stray(char),
}

fn is_word_char(c: &char) -> bool {
    !(c.is_whitespace() || c.is_control() || matches!(c, '{' | '}' | '*' | '<' | '>'))
}

/// Parser for the proximity operator: >>5>>
fn proximity_op<'src>() -> impl Parser<'src, &'src str, Lexeme<'src>, Extra<'src>> + Clone {
    just(">>")
        .ignore_then(
            any()
                .filter(|c: &char| c.is_ascii_digit())
                .repeated()
                .at_least(1)
                .to_slice(),
        )
        .then_ignore(just(">>"))
        .map(Lexeme::Distance)
        .labelled("proximity operator like >>5>>")
}

fn lexeme<'src>() -> impl Parser<'src, &'src str, (Lexeme<'src>, SimpleSpan), Extra<'src>> + Clone
{
    let whitespace = any()
        .filter(|c: &char| c.is_whitespace())
        .repeated()
        .at_least(1)
        .to(Lexeme::Whitespace)
        .labelled("whitespace");

    let word = any()
        .filter(is_word_char)
        .repeated()
        .at_least(1)
        .to_slice()
        .map(Lexeme::Chunk)
        .labelled("word");

    choice((
        proximity_op(),
        whitespace,
        just('*').to(Lexeme::Star),
        just('{').to(Lexeme::Open),
        just('}').to(Lexeme::Close),
        word,
        any().map(Lexeme::Stray),
    ))
    .map_with(|lexeme, e| (lexeme, e.span()))
}

fn lexer<'src>(
) -> impl Parser<'src, &'src str, Vec<(Lexeme<'src>, SimpleSpan)>, Extra<'src>> {
    lexeme().repeated().collect::<Vec<_>>().then_ignore(end())
}

fn lex_error(errs: &[Rich<'_, char>]) -> CompileError {
    match errs.first() {
        Some(err) => {
            let message = match err.found() {
                Some(c) => format!("unexpected character '{}'", c),
                None => "unexpected end of query".to_string(),
            };
            CompileError::lex(message, err.span().start)
        }
        None => CompileError::lex("query could not be tokenised", 0),
    }
}

/// Split a word chunk at its rightmost underscore when the remainder is an
/// alphanumeric tag. Other underscores stay in the word.
fn push_chunk<'src>(chunk: &'src str, offset: usize, tokens: &mut Vec<SpannedToken<'src>>) {
    if let Some(idx) = chunk.rfind('_') {
        let tag = &chunk[idx + 1..];
        if !tag.is_empty() && tag.chars().all(char::is_alphanumeric) {
            if idx > 0 {
                tokens.push(SpannedToken {
                    token: Token::Word(&chunk[..idx]),
                    offset,
                });
            }
            tokens.push(SpannedToken {
                token: Token::Underscore,
                offset: offset + idx,
            });
            tokens.push(SpannedToken {
                token: Token::TagLiteral(tag),
                offset: offset + idx + 1,
            });
            return;
        }
    }
    tokens.push(SpannedToken {
        token: Token::Word(chunk),
        offset,
    });
}

fn check_braces(tokens: &[SpannedToken<'_>]) -> CompileResult<()> {
    let mut open: Vec<usize> = Vec::new();
    for tok in tokens {
        match tok.token {
            Token::BraceOpen => open.push(tok.offset),
            Token::BraceClose => {
                if open.pop().is_none() {
                    return Err(CompileError::lex(
                        "unmatched closing brace '}'",
                        tok.offset,
                    ));
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(offset) => Err(CompileError::lex(
            "unterminated brace: '{' is never closed",
            offset,
        )),
        None => Ok(()),
    }
}

/// Tokenise a CEQL query. The result always ends with `EndOfInput`.
pub fn lex(input: &str) -> CompileResult<Vec<SpannedToken<'_>>> {
    let lexemes = lexer()
        .parse(input)
        .into_result()
        .map_err(|errs| lex_error(&errs))?;

    let mut tokens = Vec::with_capacity(lexemes.len() + 1);
    for (lexeme, span) in lexemes {
        let offset = span.start;
        let token = match lexeme {
            Lexeme::Chunk(chunk) => {
                push_chunk(chunk, offset, &mut tokens);
                continue;
            }
            Lexeme::Distance(digits) => {
                let distance = digits.parse::<u32>().map_err(|_| {
                    CompileError::lex(
                        format!("proximity distance `{}` is too large", digits),
                        offset + 2,
                    )
                })?;
                Token::ProximityOp(distance)
            }
            Lexeme::Whitespace => Token::Whitespace,
            Lexeme::Star => Token::WildcardStar,
            Lexeme::Open => Token::BraceOpen,
            Lexeme::Close => Token::BraceClose,
            Lexeme::Stray(c) if c == '<' || c == '>' => {
                return Err(CompileError::lex(
                    format!(
                        "unrecognized character '{}' (only valid in a proximity operator like >>5>>)",
                        c
                    ),
                    offset,
                ))
            }
            Lexeme::Stray(c) => {
                return Err(CompileError::lex(
                    format!("unrecognized character {:?}", c),
                    offset,
                ))
            }
        };
        tokens.push(SpannedToken { token, offset });
    }

    check_braces(&tokens)?;

    tokens.push(SpannedToken {
        token: Token::EndOfInput,
        offset: input.len(),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;

    fn kinds(input: &str) -> Vec<Token<'_>> {
        lex(input).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_lex_single_word() {
        assert_eq!(
            kinds("elephant"),
            vec![Token::Word("elephant"), Token::EndOfInput]
        );
    }

    #[test]
    fn test_lex_wildcard_suffix() {
        assert_eq!(
            kinds("elephant*"),
            vec![Token::Word("elephant"), Token::WildcardStar, Token::EndOfInput]
        );
    }

    #[test]
    fn test_lex_lemma() {
        assert_eq!(
            kinds("{break}"),
            vec![
                Token::BraceOpen,
                Token::Word("break"),
                Token::BraceClose,
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_lex_whitespace_run_is_one_token() {
        assert_eq!(
            kinds("by  \t your"),
            vec![
                Token::Word("by"),
                Token::Whitespace,
                Token::Word("your"),
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_lex_tagged_proximity() {
        assert_eq!(
            kinds("said_VVD >>6>> that_CST"),
            vec![
                Token::Word("said"),
                Token::Underscore,
                Token::TagLiteral("VVD"),
                Token::Whitespace,
                Token::ProximityOp(6),
                Token::Whitespace,
                Token::Word("that"),
                Token::Underscore,
                Token::TagLiteral("CST"),
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_lex_rightmost_underscore_wins() {
        assert_eq!(
            kinds("a_b_NN1"),
            vec![
                Token::Word("a_b"),
                Token::Underscore,
                Token::TagLiteral("NN1"),
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_lex_literal_underscores() {
        assert_eq!(kinds("foo_"), vec![Token::Word("foo_"), Token::EndOfInput]);
        assert_eq!(
            kinds("x_y.z"),
            vec![Token::Word("x_y.z"), Token::EndOfInput]
        );
    }

    #[test]
    fn test_lex_offsets() {
        let tokens = lex("go_VV  {run}").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|t| t.offset).collect();
        assert_eq!(offsets, vec![0, 2, 3, 5, 7, 8, 11, 12]);
    }

    #[test]
    fn test_lex_unicode_word() {
        assert_eq!(
            kinds("naïve_JJ"),
            vec![
                Token::Word("naïve"),
                Token::Underscore,
                Token::TagLiteral("JJ"),
                Token::EndOfInput
            ]
        );
    }

    #[test]
    fn test_lex_empty_input() {
        assert_eq!(kinds(""), vec![Token::EndOfInput]);
    }

    #[test]
    fn test_lex_unterminated_brace() {
        let err = lex("{break").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Lex);
        assert_eq!(err.position(), Some(0));
        assert!(err.to_string().contains("unterminated brace"));
    }

    #[test]
    fn test_lex_unmatched_close_brace() {
        let err = lex("break}").unwrap_err();
        assert_eq!(err.position(), Some(5));
        assert!(err.to_string().contains("unmatched closing brace"));
    }

    #[test]
    fn test_lex_stray_angle_bracket() {
        let err = lex("a > b").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Lex);
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_lex_unclosed_proximity_operator() {
        let err = lex("a >>6 b").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Lex);
        assert_eq!(err.position(), Some(2));
    }

    #[test]
    fn test_lex_distance_overflow() {
        let err = lex("a >>99999999999>> b").unwrap_err();
        assert!(err.to_string().contains("too large"));
        assert_eq!(err.position(), Some(4));
    }

    #[test]
    fn test_lex_control_character() {
        let err = lex("a\u{7}b").unwrap_err();
        assert_eq!(err.kind(), DiagnosticKind::Lex);
        assert_eq!(err.position(), Some(1));
    }
}
