//! Output validation.
//!
//! Checks that a rendered query is well-formed CQP before it leaves the
//! compiler: string literals close and brackets/parentheses outside string
//! literals balance. Escaped characters inside literals are ignored.

use crate::error::{CompileError, CompileResult};

/// Validate a rendered CQP query
pub fn validate_output(output: &str) -> CompileResult<()> {
    if output.trim().is_empty() {
        return Err(CompileError::render("rendered query is empty"));
    }

    let mut open: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut chars = output.chars();

    while let Some(c) = chars.next() {
        if in_string {
            match c {
                '\\' => {
                    chars.next();
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '(' => open.push(c),
            ']' | ')' => {
                let expected = if c == ']' { '[' } else { '(' };
                if open.pop() != Some(expected) {
                    return Err(CompileError::render(format!(
                        "rendered query has an unbalanced '{}': {}",
                        c, output
                    )));
                }
            }
            _ => {}
        }
    }

    if in_string {
        return Err(CompileError::render(format!(
            "rendered query has an unterminated string literal: {}",
            output
        )));
    }
    if let Some(c) = open.last() {
        return Err(CompileError::render(format!(
            "rendered query has an unclosed '{}': {}",
            c, output
        )));
    }
    Ok(())
}

/// Whether brackets and parentheses outside string literals balance
pub fn is_balanced(output: &str) -> bool {
    validate_output(output).is_ok()
}
