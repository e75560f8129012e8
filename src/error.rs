//! Error types for query translation and execution

use crate::query::ast::Operator;
use thiserror::Error;

/// Query translation and execution error type
#[derive(Error, Debug)]
pub enum QueryError {
    /// Sort direction outside of ASC/DESC
    #[error("{0} isn't a valid ordering direction")]
    UnsupportedOrdering(String),

    /// Filter operator outside of the supported set
    #[error("{0} isn't a supported filter operator")]
    UnsupportedOperator(String),

    /// A `$date` value that could not be parsed
    #[error("invalid date value {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Operator applied to the wrong kind of value
    #[error("{op} on field {field:?} expects {expected}")]
    OperandMismatch {
        field: String,
        op: Operator,
        expected: &'static str,
    },

    /// Filter document with an unexpected shape
    #[error("invalid filter document: {0}")]
    InvalidDocument(String),

    /// Document text that isn't valid JSON/YAML
    #[error("failed to parse document: {0}")]
    Document(#[from] serde_yaml::Error),

    /// Output that couldn't be serialized
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying rusqlite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
