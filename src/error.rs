//! Error types for the data cleaning core.
//!
//! Each core operation returns its own typed error so the hosting shell
//! can surface the kind and message verbatim. Errors serialize as
//! `{code, message}` structs for frontend display.

use polars::prelude::DataFrame;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::pipeline::CleaningStep;

/// Errors raised while loading an uploaded file into a table.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The upload contained no data (zero bytes or no data rows).
    #[error("Uploaded file is empty")]
    Empty,

    /// The declared format is not one we can read.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The file structure could not be parsed.
    #[error("Malformed {format} input: {reason}")]
    Malformed { format: String, reason: String },

    /// The bytes are not valid text in a supported encoding.
    #[error("Unsupported encoding: {0}")]
    Encoding(String),
}

impl ParseError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "EMPTY_FILE",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::Malformed { .. } => "MALFORMED_INPUT",
            Self::Encoding(_) => "UNSUPPORTED_ENCODING",
        }
    }
}

/// A cleaning step failed on a specific column.
#[derive(Error, Debug, Clone)]
#[error("Cleaning step '{step}' failed on column '{column}': {reason}")]
pub struct CleaningError {
    pub step: CleaningStep,
    pub column: String,
    pub reason: String,
}

impl CleaningError {
    pub fn new(
        step: CleaningStep,
        column: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            step,
            column: column.into(),
            reason: reason.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        "CLEANING_STEP_FAILED"
    }
}

/// Returned when the pipeline aborts mid-run.
///
/// Carries the table as it stood when the step failed, for diagnostic
/// display only; callers keep their original table untouched.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct CleaningFailure {
    /// The step failure that aborted the run.
    pub error: CleaningError,
    /// Table state at the point of failure.
    pub partial: DataFrame,
    /// Change log accumulated before the failure.
    pub changes: Vec<String>,
}

/// Errors raised while serializing a table for download.
#[derive(Error, Debug)]
pub enum ExportError {
    /// A value could not be encoded into the output stream.
    #[error("Failed to encode value: {0}")]
    Encoding(String),

    /// The CSV writer failed.
    #[error("Failed to write CSV: {0}")]
    Write(String),
}

impl ExportError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Encoding(_) => "EXPORT_ENCODING_ERROR",
            Self::Write(_) => "EXPORT_WRITE_ERROR",
        }
    }
}

macro_rules! impl_code_message_serialize {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                let mut state = serializer.serialize_struct(stringify!($ty), 2)?;
                state.serialize_field("code", &self.error_code())?;
                state.serialize_field("message", &self.to_string())?;
                state.end()
            }
        }
    };
}

impl_code_message_serialize!(ParseError);
impl_code_message_serialize!(CleaningError);
impl_code_message_serialize!(ExportError);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_codes() {
        assert_eq!(ParseError::Empty.error_code(), "EMPTY_FILE");
        assert_eq!(
            ParseError::UnsupportedFormat("pdf".to_string()).error_code(),
            "UNSUPPORTED_FORMAT"
        );
    }

    #[test]
    fn test_cleaning_error_names_step_and_column() {
        let err = CleaningError::new(CleaningStep::Scale, "age", "zero variance");
        let msg = err.to_string();
        assert!(msg.contains("scale"));
        assert!(msg.contains("age"));
        assert!(msg.contains("zero variance"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ParseError::Malformed {
            format: "csv".to_string(),
            reason: "ragged row".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("MALFORMED_INPUT"));
        assert!(json.contains("ragged row"));
    }

    #[test]
    fn test_cleaning_error_serialization() {
        let err = CleaningError::new(CleaningStep::ParseDates, "joined", "no values parsed");
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("CLEANING_STEP_FAILED"));
        assert!(json.contains("joined"));
    }
}
