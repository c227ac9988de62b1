//! Property tests: determinism, bracket balance, escaping safety and
//! extension transparency.

use ceql_query::validate::is_balanced;
use ceql_query::{
    CaseMode, CeqlCompiler, ExtensionRegistry, ExtensionRegistryBuilder, WithinScope,
};
use proptest::prelude::*;

const SPECIAL: &[char] = &[
    '\\', '.', '?', '*', '+', '|', '(', ')', '[', ']', '{', '}', '^', '$', '"',
];

fn compiler() -> CeqlCompiler {
    let mut compiler = CeqlCompiler::new();
    compiler.configure_named("pos_attribute", "pos").unwrap();
    compiler.configure_named("lemma_attribute", "lemma").unwrap();
    compiler
}

/// Undo CQP escaping; `None` if a special character appears unescaped
fn unescape_strict(literal: &str) -> Option<String> {
    let mut out = String::new();
    let mut chars = literal.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else if SPECIAL.contains(&c) {
            return None;
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn term_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,8}",
        "[a-zA-Z]{1,8}\\*",
        "\\{[a-z]{1,8}\\}",
        "[a-z]{1,8}_[A-Z]{2,3}[0-9]?",
    ]
}

fn query_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::collection::vec(term_strategy(), 1..5).prop_map(|terms| terms.join(" ")),
        (term_strategy(), 1u32..20, term_strategy())
            .prop_map(|(l, n, r)| format!("{l} >>{n}>> {r}")),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn compile_never_panics(input in any::<String>()) {
        let mut compiler = compiler();
        let result = compiler.compile(&input);
        prop_assert_eq!(result.is_err(), !compiler.last_diagnostics().is_empty());
    }

    #[test]
    fn compile_is_deterministic(input in "[a-z_{}*> 0-9.()]{0,24}") {
        let mut compiler = compiler();
        let first = compiler.compile(&input);
        let second = compiler.compile(&input);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn well_formed_queries_compile_balanced(input in query_strategy()) {
        let mut compiler = compiler();
        let output = compiler.compile(&input);
        prop_assert!(output.is_ok(), "{:?} -> {:?}", input, output);
        let output = output.unwrap();
        prop_assert!(is_balanced(&output));
        prop_assert_eq!(output.matches('[').count(), output.matches(']').count());
        prop_assert_eq!(output.matches('(').count(), output.matches(')').count());
    }

    #[test]
    fn successful_outputs_are_balanced(input in "[a-z_{}*>\\[\\]() 0-9.]{0,24}") {
        let mut compiler = compiler();
        if let Ok(output) = compiler.compile(&input) {
            prop_assert!(is_balanced(&output), "{:?} -> {}", input, output);
        }
    }

    #[test]
    fn metacharacters_stay_literal(word in "[a-zA-Z.+?|()^$\"\\[\\]\\\\]{1,10}") {
        let mut compiler = compiler();
        let output = compiler.compile_with(&word, CaseMode::Sensitive).unwrap();
        let literal = output
            .strip_prefix("[word=\"")
            .and_then(|rest| rest.strip_suffix("\"]"))
            .unwrap();
        prop_assert_eq!(unescape_strict(literal), Some(word));
    }

    #[test]
    fn wildcard_is_the_only_active_regex(word in "[a-z.+?]{1,8}") {
        let mut compiler = compiler();
        let output = compiler.compile_with(&format!("{word}*"), CaseMode::Sensitive).unwrap();
        let literal = output
            .strip_prefix("[word=\"")
            .and_then(|rest| rest.strip_suffix(".*\"]"))
            .unwrap();
        prop_assert_eq!(unescape_strict(literal), Some(word));
    }

    #[test]
    fn zero_extensions_reproduce_base_output(input in query_strategy()) {
        let mut base = compiler();
        let mut empty = compiler().with_extensions(ExtensionRegistry::new());
        prop_assert_eq!(base.compile(&input), empty.compile(&input));
    }

    #[test]
    fn within_appends_exactly_once_to_phrases(
        words in prop::collection::vec("[a-z]{1,8}", 1..5)
    ) {
        let input = words.join(" ");
        let mut base = compiler();
        let mut scoped = compiler().with_extensions(
            ExtensionRegistryBuilder::new()
                .with_extension(WithinScope::new("s"))
                .build(),
        );
        let plain = base.compile(&input).unwrap();
        prop_assert_eq!(scoped.compile(&input).unwrap(), format!("{plain} within s"));
    }
}
