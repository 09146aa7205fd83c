use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::summary::DEFAULT_HEADING;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Heading placed above the coverage table
    #[serde(default = "default_heading")]
    pub heading: String,
    /// Cobertura report path or glob pattern
    #[serde(default)]
    pub input: Option<String>,
    /// Message catalog overriding the built-in one
    #[serde(default)]
    pub messages: Option<String>,
    /// Summary file to append to instead of $GITHUB_STEP_SUMMARY
    #[serde(default)]
    pub summary_file: Option<String>,
}

fn default_heading() -> String {
    DEFAULT_HEADING.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            heading: default_heading(),
            input: None,
            messages: None,
            summary_file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.report.heading.trim().is_empty() {
            anyhow::bail!("report.heading must not be empty");
        }

        for (key, value) in [
            ("report.input", &self.report.input),
            ("report.messages", &self.report.messages),
            ("report.summary_file", &self.report.summary_file),
        ] {
            if let Some(v) = value {
                if v.trim().is_empty() {
                    anyhow::bail!("{} must not be empty", key);
                }
            }
        }

        Ok(())
    }
}

/// Expand `$VAR`, `${VAR}` and `~` in a configured path
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .with_context(|| format!("Failed to expand path: {}", raw))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Resolve a report path that may be a glob pattern to a single file
pub fn resolve_input(raw: &str) -> Result<PathBuf> {
    let expanded = expand_path(raw)?;
    let pattern = expanded.to_string_lossy();

    if !pattern.contains(['*', '?', '[']) {
        return Ok(expanded);
    }

    let mut matches: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("Invalid report pattern: {}", pattern))?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .collect();
    matches.sort();

    matches
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("No coverage report matches '{}'", pattern))
}
