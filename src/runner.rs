use anyhow::Result;

use crate::coverage::CoverageSource;
use crate::report;
use crate::summary::{compose_summary, SummarySink};

/// Process exit code for a failed run
pub const FAILURE_EXIT_CODE: i32 = 1;

/// Exit code for the outcome of a run
pub fn exit_code(outcome: &Result<RunDetails>) -> i32 {
    match outcome {
        Ok(details) => details.exit_code,
        Err(_) => FAILURE_EXIT_CODE,
    }
}

/// Outcome of a summary run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDetails {
    pub exit_code: i32,
}

pub struct Runner<'a> {
    heading: &'a str,
}

impl<'a> Runner<'a> {
    pub fn new(heading: &'a str) -> Self {
        Self { heading }
    }

    /// Load coverage, render it and hand the summary to the sink.
    ///
    /// Nothing reaches the sink unless the whole report rendered.
    pub fn run(&self, source: &dyn CoverageSource, sink: &mut dyn SummarySink) -> Result<RunDetails> {
        let root = source.load()?;
        let table = report::render(&root)?;
        sink.write(&compose_summary(self.heading, &table))?;

        Ok(RunDetails { exit_code: 0 })
    }
}
