//! Custom error types for the stroke-risk pipeline.
//!
//! This module provides the error hierarchy used throughout the crate,
//! built with `thiserror`.
//!
//! Errors are serializable as `{code, message}` structs so the HTTP boundary
//! can return them to callers without leaking internal formatting.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for pipeline operations.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A column required by the feature schema was not found in the input.
    #[error("Column '{0}' not found in input")]
    ColumnNotFound(String),

    /// The cleaning stage failed.
    #[error("Failed to clean data: {0}")]
    CleaningFailed(String),

    /// The preprocessing stage failed.
    #[error("Failed to preprocess features: {0}")]
    PreprocessingFailed(String),

    /// Prediction was requested before the estimator was fitted.
    #[error("Estimator is not fitted")]
    NotFitted,

    /// The estimator rejected its input; surfaced unmodified.
    #[error("Estimator error: {0}")]
    Estimator(String),

    /// Invalid input data (e.g. row/label count mismatch, null labels).
    #[error("Invalid input data: {0}")]
    InvalidData(String),

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
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PipelineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for boundary handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::CleaningFailed(_) => "CLEANING_FAILED",
            Self::PreprocessingFailed(_) => "PREPROCESSING_FAILED",
            Self::NotFitted => "NOT_FITTED",
            Self::Estimator(_) => "ESTIMATOR_ERROR",
            Self::InvalidData(_) => "INVALID_DATA",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

/// Serialize implementation for the HTTP boundary.
///
/// Errors are serialized as a struct with `code` and `message` fields,
/// making them easy to handle in API clients.
impl Serialize for PipelineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PipelineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

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
        self.map_err(|e| PipelineError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(PipelineError::NotFitted.error_code(), "NOT_FITTED");
        assert_eq!(
            PipelineError::ColumnNotFound("bmi".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = PipelineError::ColumnNotFound("gender".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("gender"));
    }

    #[test]
    fn test_with_context() {
        let error = PipelineError::ColumnNotFound("age".to_string())
            .with_context("During preprocessing");
        assert!(error.to_string().contains("During preprocessing"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND"); // Preserves original code
    }
}
