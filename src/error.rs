//! Error types for motif discovery.
//!
//! Only boundary validation produces errors. A day whose transition graph
//! fails the degree precondition is a normal outcome (a null motif), never
//! an error, and an empty dataset simply produces an empty table.

use thiserror::Error;

/// Errors surfaced before any graph construction begins.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MotifError {
    /// A configuration value is outside its supported range.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// A required column is absent from the visit table.
    #[error("missing required column `{column}`")]
    MissingColumn { column: &'static str },

    /// A column does not have the same number of rows as the rest of the table.
    #[error("column `{column}` has {actual} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A date string could not be parsed as `YYYY-MM-DD`.
    #[error("row {row}: invalid date `{value}`")]
    InvalidDate { row: usize, value: String },
}

impl MotifError {
    pub(crate) fn invalid_argument(name: &'static str, message: impl Into<String>) -> Self {
        MotifError::InvalidArgument {
            name,
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MotifError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MotifError::invalid_argument("proportion_filter", "must be in (0, 1), got 1.5");
        assert_eq!(
            err.to_string(),
            "invalid argument `proportion_filter`: must be in (0, 1), got 1.5"
        );

        let err = MotifError::MissingColumn {
            column: "location_id",
        };
        assert!(err.to_string().contains("location_id"));
    }
}
