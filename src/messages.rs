//! User-facing message catalog

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::CoverageError;

const DEFAULT_MESSAGES: &str = include_str!("../messages/messages.json");

/// Display strings keyed by symbolic message name
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Messages {
    pub run_failed: String,
    pub exit_code: String,
    pub missing_coverage_data: String,
    pub invalid_package_data: String,
    pub invalid_coverage_rate: String,
    pub negative_coverage_values: String,
}

impl Messages {
    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read messages file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse messages file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Look up a message by its symbolic key
    pub fn get(&self, key: &str) -> Option<&str> {
        let text = match key {
            "run_failed" => &self.run_failed,
            "exit_code" => &self.exit_code,
            "missing_coverage_data" => &self.missing_coverage_data,
            "invalid_package_data" => &self.invalid_package_data,
            "invalid_coverage_rate" => &self.invalid_coverage_rate,
            "negative_coverage_values" => &self.negative_coverage_values,
            _ => return None,
        };
        Some(text.as_str())
    }

    pub fn describe(&self, error: &CoverageError) -> &str {
        self.get(error.key()).unwrap_or_default()
    }

    /// Lines logged when a run fails: `run_failed`, the catalog text for a
    /// coverage error anywhere in the chain, then the error chain itself
    pub fn failure_report(&self, error: &anyhow::Error) -> Vec<String> {
        let mut lines = vec![self.run_failed.clone()];
        if let Some(coverage_error) = error.downcast_ref::<CoverageError>() {
            lines.push(self.describe(coverage_error).to_string());
        }
        lines.push(format!("{:#}", error));
        lines
    }
}

impl Default for Messages {
    fn default() -> Self {
        // The embedded catalog is checked by test_default_catalog
        serde_json::from_str(DEFAULT_MESSAGES).unwrap_or_else(|_| Self {
            run_failed: "run_failed".to_string(),
            exit_code: "exit_code".to_string(),
            missing_coverage_data: "missing_coverage_data".to_string(),
            invalid_package_data: "invalid_package_data".to_string(),
            invalid_coverage_rate: "invalid_coverage_rate".to_string(),
            negative_coverage_values: "negative_coverage_values".to_string(),
        })
    }
}
