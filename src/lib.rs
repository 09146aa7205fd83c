//! covsum - Cobertura coverage summaries for CI
//!
//! A library for turning a Cobertura coverage report into the HTML table
//! shown in a CI job summary:
//! - Hierarchical coverage model (run → packages → classes → lines)
//! - Streaming Cobertura XML reader
//! - Aggregation and rendering of per-package and per-class coverage
//! - Job summary sinks (`$GITHUB_STEP_SUMMARY` file or stdout)

pub mod config;
pub mod console;
pub mod coverage;
pub mod error;
pub mod messages;
pub mod report;
pub mod runner;
pub mod summary;

pub use coverage::{
    ClassNode, CoberturaFile, CoverageRoot, CoverageSource, LineRecord, PackageNode, SampleCoverage,
};
pub use error::CoverageError;
pub use messages::Messages;
pub use report::{format_coverage, render};
pub use runner::{exit_code, RunDetails, Runner, FAILURE_EXIT_CODE};
pub use summary::{SinkTarget, StepSummaryFile, Stdout, SummarySink};
