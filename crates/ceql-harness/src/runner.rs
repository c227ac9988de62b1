//! Sample runner.
//!
//! Compiles every sample with one reused compiler and compares the output
//! with the recorded expectation. Stops early after a configurable run of
//! consecutive failures.

use crate::samples::Sample;
use ceql_query::CeqlCompiler;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, warn};

/// Runner settings
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Abort after this many failures in a row (0 = never abort)
    pub max_consecutive_failures: usize,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_consecutive_failures: 10,
            show_progress: false,
        }
    }
}

/// A sample whose result did not match its expectation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SampleFailure {
    pub line: u64,
    pub input: String,
    pub expected: Option<String>,
    /// Compiled output, if the compile succeeded
    pub actual: Option<String>,
    /// First diagnostic, if the compile failed
    pub diagnostic: Option<String>,
}

impl fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "line {}: {:?}", self.line, self.input)?;
        writeln!(
            f,
            "  expected: {}",
            self.expected.as_deref().unwrap_or("<rejection>")
        )?;
        match (&self.actual, &self.diagnostic) {
            (Some(actual), _) => write!(f, "  actual:   {}", actual),
            (None, Some(diagnostic)) => write!(f, "  actual:   rejected ({})", diagnostic),
            (None, None) => write!(f, "  actual:   rejected"),
        }
    }
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Samples actually checked
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Sum of frequencies over checked samples, saturating at `u64::MAX`
    pub weighted_total: u64,
    pub weighted_passed: u64,
    /// True if the run stopped on the consecutive-failure limit
    pub aborted: bool,
    pub failures: Vec<SampleFailure>,
}

impl RunSummary {
    /// Share of samples that passed
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.passed as f64 / self.total as f64
        }
    }

    /// Share of weighted frequency that passed
    pub fn weighted_pass_rate(&self) -> f64 {
        if self.weighted_total == 0 {
            0.0
        } else {
            self.weighted_passed as f64 / self.weighted_total as f64
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.aborted
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for failure in &self.failures {
            writeln!(f, "{}", failure)?;
        }
        if self.aborted {
            writeln!(f, "aborted: too many consecutive failures")?;
        }
        writeln!(
            f,
            "{} samples: {} passed, {} failed ({:.1}%)",
            self.total,
            self.passed,
            self.failed,
            self.pass_rate() * 100.0
        )?;
        write!(
            f,
            "weighted: {} of {} ({:.1}%)",
            self.weighted_passed,
            self.weighted_total,
            self.weighted_pass_rate() * 100.0
        )
    }
}

/// Checks samples against a single compiler instance
pub struct SampleRunner {
    compiler: CeqlCompiler,
    config: RunnerConfig,
}

impl SampleRunner {
    pub fn new(compiler: CeqlCompiler, config: RunnerConfig) -> Self {
        Self { compiler, config }
    }

    /// Check one sample; `None` means it passed
    pub fn check(&mut self, sample: &Sample) -> Option<SampleFailure> {
        let result = self
            .compiler
            .compile_with(&sample.input, sample.mode.case_mode());

        let passed = match (&result, &sample.expected) {
            (Ok(actual), Some(expected)) => actual == expected,
            (Err(_), None) => true,
            _ => false,
        };
        if passed {
            return None;
        }

        let (actual, diagnostic) = match result {
            Ok(output) => (Some(output), None),
            Err(diagnostics) => (None, diagnostics.first().map(|d| d.to_string())),
        };
        Some(SampleFailure {
            line: sample.line,
            input: sample.input.clone(),
            expected: sample.expected.clone(),
            actual,
            diagnostic,
        })
    }

    /// Check samples in order
    pub fn run(&mut self, samples: &[Sample]) -> RunSummary {
        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(samples.len() as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut summary = RunSummary::default();
        let mut consecutive = 0usize;

        for sample in samples {
            summary.total += 1;
            summary.weighted_total = summary.weighted_total.saturating_add(sample.frequency);

            match self.check(sample) {
                None => {
                    summary.passed += 1;
                    summary.weighted_passed =
                        summary.weighted_passed.saturating_add(sample.frequency);
                    consecutive = 0;
                }
                Some(failure) => {
                    warn!(line = failure.line, input = %failure.input, "sample failed");
                    summary.failed += 1;
                    summary.failures.push(failure);
                    consecutive += 1;
                }
            }
            progress.inc(1);

            let limit = self.config.max_consecutive_failures;
            if limit > 0 && consecutive >= limit {
                info!(limit, "stopping after consecutive failures");
                summary.aborted = true;
                break;
            }
        }

        progress.finish_and_clear();
        debug!(
            total = summary.total,
            passed = summary.passed,
            failed = summary.failed,
            "run complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::SampleMode;

    fn sample(line: u64, input: &str, expected: Option<&str>, frequency: u64) -> Sample {
        Sample {
            line,
            input: input.to_string(),
            expected: expected.map(str::to_string),
            mode: SampleMode::NoCase,
            frequency,
        }
    }

    fn runner(max_consecutive_failures: usize) -> SampleRunner {
        SampleRunner::new(
            CeqlCompiler::new(),
            RunnerConfig {
                max_consecutive_failures,
                show_progress: false,
            },
        )
    }

    #[test]
    fn test_pass_and_expected_rejection() {
        let samples = vec![
            sample(1, "elephant", Some(r#"[word="elephant"%c]"#), 5),
            sample(2, "", None, 2),
        ];
        let summary = runner(0).run(&samples);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.weighted_passed, 7);
        assert!(summary.is_success());
    }

    #[test]
    fn test_failures_are_recorded() {
        let samples = vec![
            sample(1, "elephant", Some(r#"[word="elephant"]"#), 3),
            sample(2, "{break", Some(r#"[lemma="break"%c]"#), 1),
            sample(3, "dog", None, 1),
            sample(4, "cat", Some(r#"[word="cat"%c]"#), 10),
        ];
        let summary = runner(0).run(&samples);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.weighted_total, 15);
        assert_eq!(summary.weighted_passed, 10);
        assert!(!summary.aborted);

        assert_eq!(
            summary.failures[0].actual.as_deref(),
            Some(r#"[word="elephant"%c]"#)
        );
        assert!(summary.failures[1].actual.is_none());
        assert!(summary.failures[1].diagnostic.is_some());
        assert_eq!(summary.failures[2].actual.as_deref(), Some(r#"[word="dog"%c]"#));
    }

    #[test]
    fn test_abort_after_consecutive_failures() {
        let samples = vec![
            sample(1, "a", None, 1),
            sample(2, "b", Some(r#"[word="b"%c]"#), 1),
            sample(3, "c", None, 1),
            sample(4, "d", None, 1),
            sample(5, "e", Some(r#"[word="e"%c]"#), 1),
        ];
        let summary = runner(2).run(&samples);
        assert!(summary.aborted);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.passed, 1);
    }

    #[test]
    fn test_zero_limit_never_aborts() {
        let samples: Vec<_> = (1..=20).map(|i| sample(i, "x", None, 1)).collect();
        let summary = runner(0).run(&samples);
        assert!(!summary.aborted);
        assert_eq!(summary.failed, 20);
    }

    #[test]
    fn test_summary_display_and_json() {
        let samples = vec![sample(7, "x", None, 4)];
        let summary = runner(0).run(&samples);

        let text = summary.to_string();
        assert!(text.contains("line 7"));
        assert!(text.contains("1 samples: 0 passed, 1 failed"));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["failed"], 1);
        assert_eq!(json["weighted_total"], 4);
        assert_eq!(json["failures"][0]["actual"], r#"[word="x"%c]"#);
    }

    #[test]
    fn test_weighted_totals_saturate() {
        let samples = vec![
            sample(1, "a", Some(r#"[word="a"%c]"#), u64::MAX),
            sample(2, "b", Some(r#"[word="b"%c]"#), 1),
            sample(3, "c", None, u64::MAX),
        ];
        let summary = runner(0).run(&samples);
        assert_eq!(summary.weighted_total, u64::MAX);
        assert_eq!(summary.weighted_passed, u64::MAX);
        assert_eq!(summary.weighted_pass_rate(), 1.0);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn test_empty_run() {
        let summary = runner(3).run(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.pass_rate(), 0.0);
        assert!(summary.is_success());
    }
}
