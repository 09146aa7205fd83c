//! Error types for coverage validation and rendering

use thiserror::Error;

/// Errors raised while validating or rendering a coverage run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoverageError {
    /// No coverage root, or a root without packages
    #[error("coverage data is missing")]
    MissingCoverageData,

    /// A package entry could not be resolved
    #[error("invalid package data: {package:?}")]
    InvalidPackageData { package: String },

    /// Covered or total line count below zero
    #[error("negative coverage values: {covered}/{total}")]
    NegativeCoverageValues { covered: i64, total: i64 },

    /// Line rate outside [0, 1]
    #[error("coverage rate out of range: {rate}")]
    InvalidCoverageRate { rate: f64 },
}

impl CoverageError {
    /// Symbolic message-catalog key for this error
    pub fn key(&self) -> &'static str {
        match self {
            CoverageError::MissingCoverageData => "missing_coverage_data",
            CoverageError::InvalidPackageData { .. } => "invalid_package_data",
            CoverageError::NegativeCoverageValues { .. } => "negative_coverage_values",
            CoverageError::InvalidCoverageRate { .. } => "invalid_coverage_rate",
        }
    }
}
