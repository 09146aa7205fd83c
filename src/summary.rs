//! Job summary sinks
//!
//! The rendered markup is appended to the file GitHub Actions exposes as
//! `$GITHUB_STEP_SUMMARY`, or printed to stdout when no summary file is set.

use anyhow::{Context, Result};
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config;

pub const STEP_SUMMARY_ENV: &str = "GITHUB_STEP_SUMMARY";
pub const DEFAULT_HEADING: &str = "Parasoft Coverage";

/// Destination for the finished summary markup
pub trait SummarySink {
    fn write(&mut self, markup: &str) -> Result<()>;
}

/// Appends to a job summary file, creating it if needed
#[derive(Debug, Clone)]
pub struct StepSummaryFile {
    path: PathBuf,
}

impl StepSummaryFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Summary file named by `$GITHUB_STEP_SUMMARY`, if set
    pub fn from_env() -> Option<Self> {
        env::var(STEP_SUMMARY_ENV)
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SummarySink for StepSummaryFile {
    fn write(&mut self, markup: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open summary file: {}", self.path.display()))?;
        file.write_all(markup.as_bytes())
            .with_context(|| format!("Failed to write summary file: {}", self.path.display()))?;
        Ok(())
    }
}

/// Prints the summary to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl SummarySink for Stdout {
    fn write(&mut self, markup: &str) -> Result<()> {
        let mut out = std::io::stdout().lock();
        out.write_all(markup.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Where the summary goes, in order of precedence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    /// `--stdout`
    Stdout,
    /// `--summary-file` or `report.summary_file`
    File(PathBuf),
    /// `$GITHUB_STEP_SUMMARY`
    StepSummary(PathBuf),
    /// Nothing configured, falls back to stdout
    Unset,
}

impl SinkTarget {
    /// Pick the destination: `--stdout`, then `--summary-file`, then the
    /// configured file, then `$GITHUB_STEP_SUMMARY`
    pub fn select(
        stdout: bool,
        summary_file: Option<&Path>,
        configured: Option<&str>,
        step_summary: Option<StepSummaryFile>,
    ) -> Result<Self> {
        if stdout {
            return Ok(SinkTarget::Stdout);
        }
        if let Some(path) = summary_file {
            return Ok(SinkTarget::File(path.to_path_buf()));
        }
        if let Some(raw) = configured {
            return Ok(SinkTarget::File(config::expand_path(raw)?));
        }
        Ok(match step_summary {
            Some(sink) => SinkTarget::StepSummary(sink.path),
            None => SinkTarget::Unset,
        })
    }

    pub fn uses_stdout(&self) -> bool {
        matches!(self, SinkTarget::Stdout | SinkTarget::Unset)
    }

    pub fn open(&self) -> Box<dyn SummarySink> {
        match self {
            SinkTarget::Stdout | SinkTarget::Unset => Box::new(Stdout),
            SinkTarget::File(path) | SinkTarget::StepSummary(path) => {
                Box::new(StepSummaryFile::new(path))
            }
        }
    }
}

/// Heading followed by the rendered table, as one summary block
pub fn compose_summary(heading: &str, table: &str) -> String {
    format!("<h1>{}</h1>\n{}\n", heading, table)
}
