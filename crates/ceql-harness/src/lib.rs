//! Regression harness for the CEQL compiler.
//!
//! Reads tab-separated sample files of recorded queries and their expected
//! CQP, runs them through [`ceql_query::CeqlCompiler`] and reports the
//! pass rate.

pub mod binding;
pub mod error;
pub mod runner;
pub mod samples;

pub use binding::{build_compiler, load_binding, parse_binding};
pub use error::{HarnessError, HarnessResult};
pub use runner::{RunSummary, RunnerConfig, SampleFailure, SampleRunner};
pub use samples::{load_samples, read_samples, Sample, SampleMode};
