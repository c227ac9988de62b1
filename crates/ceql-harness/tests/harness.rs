//! Harness end to end: binding file and sample file on disk.

use ceql_harness::{build_compiler, load_samples, HarnessError, RunnerConfig, SampleRunner};
use std::io::Write;
use tempfile::NamedTempFile;

const BINDING: &str = r#"
word_attribute = "word"
pos_attribute = "pos"
lemma_attribute = "hw"
s_attributes = ["s", "u"]
"#;

const SAMPLES: &str = "\
#tag\t[word=\"#tag\"%c]\tsq_nocase\t3
elephant\t[word=\"elephant\"%c]\tsq_nocase\t120
Elephant*\t[word=\"Elephant.*\"]\tsq_case\t4
{break}\t[hw=\"break\"%c]\tsq_nocase\t30
by your favour\t[word=\"by\"%c] [word=\"your\"%c] [word=\"favour\"%c]\tsq_nocase\t2
said_VVD >>6>> that_CST\tMU(meet [word=\"said\"%c & pos=\"VVD\"] [word=\"that\"%c & pos=\"CST\"] 1 6)\tsq_nocase\t9
\tnull\tsq_nocase\t1
a < b\tnull\tsq_nocase\t1
";

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn all_samples_pass() {
    let binding = write_temp(BINDING);
    let samples = write_temp(SAMPLES);

    let compiler = build_compiler(Some(binding.path()), None).unwrap();
    let samples = load_samples(samples.path()).unwrap();
    assert_eq!(samples.len(), 8);

    let summary = SampleRunner::new(compiler, RunnerConfig::default()).run(&samples);
    assert!(summary.is_success(), "{}", summary);
    assert_eq!(summary.weighted_total, 170);
    assert_eq!(summary.weighted_passed, 170);
}

#[test]
fn regression_is_reported() {
    let binding = write_temp(BINDING);
    let samples = write_temp(SAMPLES);

    // Scoping changes every phrase, single words included
    let compiler = build_compiler(Some(binding.path()), Some("s")).unwrap();
    let samples = load_samples(samples.path()).unwrap();
    let summary = SampleRunner::new(compiler, RunnerConfig::default()).run(&samples);

    assert_eq!(summary.failed, 5);
    assert!(!summary.aborted);
    assert_eq!(summary.failures[0].input, "#tag");
    assert_eq!(
        summary.failures[4].actual.as_deref(),
        Some(r#"[word="by"%c] [word="your"%c] [word="favour"%c] within s"#)
    );
    assert_eq!(summary.weighted_passed, 11);
}

#[test]
fn consecutive_failures_abort_the_run() {
    let binding = write_temp(BINDING);
    let samples = write_temp(SAMPLES);

    let compiler = build_compiler(Some(binding.path()), Some("s")).unwrap();
    let samples = load_samples(samples.path()).unwrap();
    let config = RunnerConfig {
        max_consecutive_failures: 3,
        show_progress: false,
    };
    let summary = SampleRunner::new(compiler, config).run(&samples);

    assert!(summary.aborted);
    assert_eq!(summary.total, 3);
    assert!(!summary.is_success());
}

#[test]
fn scope_outside_binding_fails_closed() {
    let binding = write_temp(BINDING);
    let mut compiler = build_compiler(Some(binding.path()), Some("chapter")).unwrap();
    assert!(compiler.compile("by your").is_err());
    assert!(compiler.compile("elephant").is_err());
    assert!(compiler.compile("by >>2>> your").is_ok());
}

#[test]
fn missing_files_are_errors() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.tsv");
    assert!(matches!(load_samples(&missing), Err(HarnessError::Io(_))));
    assert!(matches!(
        build_compiler(Some(&missing), None),
        Err(HarnessError::Io(_))
    ));
}
