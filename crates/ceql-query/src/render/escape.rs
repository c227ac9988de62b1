//! Literal escaping and wildcard expansion for CQP regular expressions.

use crate::ast::LiteralOrWildcard;

/// Characters with a meaning in CQP regexes or string literals
const CQP_SPECIAL: &[char] = &[
    '\\', '.', '?', '*', '+', '|', '(', ')', '[', ']', '{', '}', '^', '$', '"',
];

/// Quantifier the CEQL wildcard turns into
const WILDCARD_REGEX: &str = ".*";

/// Escape `text` so CQP matches it literally
pub fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        if CQP_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Regex source for a literal or wildcard pattern
pub fn render_pattern(pattern: &LiteralOrWildcard) -> String {
    match pattern {
        LiteralOrWildcard::Literal(text) => escape_literal(text),
        LiteralOrWildcard::Prefix(text) => {
            let mut out = escape_literal(text);
            out.push_str(WILDCARD_REGEX);
            out
        }
    }
}
