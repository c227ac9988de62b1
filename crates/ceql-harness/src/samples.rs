//! Regression sample files.
//!
//! One sample per line, tab-separated:
//!
//! ```text
//! input <TAB> expected <TAB> mode <TAB> frequency
//! ```
//!
//! `expected` is the CQP the input must compile to, or `null` when the
//! input must be rejected. `mode` is `sq_nocase` or `sq_case`. `frequency`
//! weights the sample in the summary. Blank lines are skipped; there is no
//! comment syntax, since `#` can start a valid query.

use crate::error::{HarnessError, HarnessResult};
use ceql_query::CaseMode;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Marker for "this input must not compile"
pub const NULL_EXPECTED: &str = "null";

/// Query mode a sample was recorded under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SampleMode {
    /// Case-sensitive simple query
    #[serde(rename = "sq_case")]
    Case,
    /// Case-insensitive simple query
    #[serde(rename = "sq_nocase")]
    NoCase,
}

impl SampleMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "sq_case" => Some(Self::Case),
            "sq_nocase" => Some(Self::NoCase),
            _ => None,
        }
    }

    pub fn case_mode(self) -> CaseMode {
        match self {
            Self::Case => CaseMode::Sensitive,
            Self::NoCase => CaseMode::Insensitive,
        }
    }
}

/// A single regression sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Line in the sample file
    pub line: u64,
    /// CEQL input
    pub input: String,
    /// Expected CQP; `None` means the compile must fail
    pub expected: Option<String>,
    pub mode: SampleMode,
    /// How often the query occurs in the source log
    pub frequency: u64,
}

/// Read samples from tab-separated text
pub fn read_samples(reader: impl Read) -> HarnessResult<Vec<Sample>> {
    let mut tsv = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quoting(false)
        .flexible(true)
        .from_reader(reader);

    let mut samples = Vec::new();
    for record in tsv.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() == 1 && record.get(0).unwrap_or_default().trim().is_empty() {
            continue;
        }

        if record.len() != 4 {
            return Err(HarnessError::malformed(
                line,
                format!("expected 4 tab-separated fields, found {}", record.len()),
            ));
        }

        let input = record.get(0).unwrap_or_default().to_string();
        let expected = match record.get(1).unwrap_or_default() {
            NULL_EXPECTED => None,
            cqp => Some(cqp.to_string()),
        };
        let mode_field = record.get(2).unwrap_or_default();
        let mode = SampleMode::parse(mode_field).ok_or_else(|| {
            HarnessError::malformed(
                line,
                format!("unknown mode `{}` (expected sq_case or sq_nocase)", mode_field),
            )
        })?;
        let frequency_field = record.get(3).unwrap_or_default().trim();
        let frequency = frequency_field.parse::<u64>().map_err(|_| {
            HarnessError::malformed(
                line,
                format!("frequency `{}` is not a non-negative integer", frequency_field),
            )
        })?;

        samples.push(Sample {
            line,
            input,
            expected,
            mode,
            frequency,
        });
    }
    Ok(samples)
}

/// Load samples from a file
pub fn load_samples(path: impl AsRef<Path>) -> HarnessResult<Vec<Sample>> {
    let file = File::open(path)?;
    read_samples(file)
}
