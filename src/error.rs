use std::path::PathBuf;

use thiserror::Error;

/// Everything that can abort a pipeline run.
///
/// None of these are recoverable: the pipeline is a single batch pass, so the
/// first error stops the remaining stages and is reported to the caller.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The source file could not be opened or read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source was readable but does not have the expected shape.
    #[error("format error: {0}")]
    Format(String),

    /// A cell could not be parsed into the type its column requires.
    #[error("cannot parse {column} at row {row}: '{value}' ({reason})")]
    Parse {
        column: String,
        row: usize,
        value: String,
        reason: String,
    },

    /// An aggregate was requested on a column that is missing or not numeric.
    #[error("column '{column}': {reason}")]
    Column { column: String, reason: String },

    /// An aggregate was requested on a partition with no usable records.
    #[error("{operation} over '{column}' needs at least one record")]
    EmptyPartition {
        operation: &'static str,
        column: String,
    },
}

impl AnalysisError {
    pub(crate) fn missing_column(column: &str) -> Self {
        Self::Column {
            column: column.to_string(),
            reason: "no such column".to_string(),
        }
    }

    pub(crate) fn not_numeric(column: &str, row: usize, value: impl ToString) -> Self {
        Self::Column {
            column: column.to_string(),
            reason: format!("row {row} holds non-numeric value '{}'", value.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
