//! Error types for the sentiment pipeline.
//!
//! Every variant here is fatal: the pipeline stops and no output is
//! written. Per-row scoring anomalies are not errors; see
//! [`crate::analysis::scorer`].

use std::path::PathBuf;
use thiserror::Error;

/// Fatal pipeline failures.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required column is missing from the input header.
    #[error("CSV must contain a column named '{field}'")]
    Schema { field: String },

    /// The input could not be parsed as a CSV table.
    #[error("failed to parse input as CSV: {source}")]
    Parse {
        #[source]
        source: csv::Error,
    },

    /// A data row has more fields than the header.
    #[error("line {line}: expected at most {expected} fields, found {actual}")]
    TooManyFields {
        line: u64,
        expected: usize,
        actual: usize,
    },

    /// The input has no header row at all.
    #[error("input is empty: expected a header row")]
    EmptyInput,

    /// A file could not be opened, read or written.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scores do not line up with the table they annotate.
    #[error("expected {expected} scored rows, got {actual}")]
    RowCountMismatch { expected: usize, actual: usize },

    /// The annotated table could not be serialized.
    #[error("failed to write annotated CSV: {source}")]
    Export {
        #[source]
        source: csv::Error,
    },
}

impl PipelineError {
    /// Build a schema error for a missing column.
    pub fn missing_field(field: &str) -> Self {
        PipelineError::Schema {
            field: field.to_string(),
        }
    }

    /// Whether this error is a schema violation.
    pub fn is_schema(&self) -> bool {
        matches!(self, PipelineError::Schema { .. })
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
