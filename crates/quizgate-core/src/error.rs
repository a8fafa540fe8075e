//! Error types for candidate validation and request decoding.
//!
//! Per-candidate failures never escape the batch engine as `Err`; they are
//! carried as values and rendered into the batch warning trail.

use thiserror::Error;

/// Why a candidate could not be turned into a [`Question`](crate::model::Question).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The candidate does not decode into any known variant (missing field,
    /// wrong JSON type, unknown `type` tag).
    #[error("{0}")]
    Malformed(String),

    /// A decoded field violates a cardinality, range, or cross-field rule.
    #[error("{path}: {message}")]
    Constraint { path: String, message: String },
}

impl SchemaError {
    pub fn constraint(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaError::Constraint {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The offending field path, when the violation is tied to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            SchemaError::Constraint { path, .. } => Some(path),
            SchemaError::Malformed(_) => None,
        }
    }
}

/// Errors from decoding or checking a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request body is not valid JSON for the request shape.
    #[error("invalid request: {0}")]
    Malformed(String),

    /// `params.count` is outside 1..=20.
    #[error("params.count must be between 1 and 20, got {0}")]
    CountOutOfRange(u32),

    /// `params.questionTypes` names a type that does not exist.
    #[error("params.questionTypes contains unknown type: {0}")]
    UnknownQuestionType(String),
}
