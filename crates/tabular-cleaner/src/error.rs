//! Custom error types for the cleaning pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every failure is
//! terminal for a run and is surfaced to the caller; nothing is retried.
//!
//! Errors are serializable so they can be embedded in JSON output
//! (`--json`) alongside reports.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// A configured column is missing from the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A mean-based rule was configured on a column without any values.
    #[error("Cannot compute statistic for column '{0}': no non-null values")]
    MissingStatistic(String),

    /// A non-missing date value matched none of the accepted formats.
    #[error("Unparseable date '{value}' in column '{column}' at row {row}")]
    InvalidDate {
        column: String,
        row: usize,
        value: String,
    },

    /// Type conversion failed.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::MissingStatistic(_) => "MISSING_STATISTIC",
            Self::InvalidDate { .. } => "INVALID_DATE",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by the input data rather than the
    /// configuration or the environment.
    pub fn is_data_quality(&self) -> bool {
        match self {
            Self::MissingStatistic(_)
            | Self::InvalidDate { .. }
            | Self::TypeConversionFailed { .. }
            | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_data_quality(),
            _ => false,
        }
    }
}

impl From<crate::config::ConfigValidationError> for CleaningError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        CleaningError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            CleaningError::MissingStatistic("Age".to_string()).error_code(),
            "MISSING_STATISTIC"
        );
        assert_eq!(
            CleaningError::ColumnNotFound("test".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_is_data_quality() {
        let err = CleaningError::InvalidDate {
            column: "JoiningDate".to_string(),
            row: 3,
            value: "yesterday".to_string(),
        };
        assert!(err.is_data_quality());
        assert!(!CleaningError::InvalidConfig("bad".to_string()).is_data_quality());
    }

    #[test]
    fn test_error_serialization() {
        let error = CleaningError::ColumnNotFound("Age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("Age"));
    }

    #[test]
    fn test_with_context() {
        let error = CleaningError::MissingStatistic("Salary".to_string())
            .with_context("During imputation");
        assert!(error.to_string().contains("During imputation"));
        assert_eq!(error.error_code(), "MISSING_STATISTIC"); // keeps the inner code
        assert!(error.is_data_quality());
    }
}
