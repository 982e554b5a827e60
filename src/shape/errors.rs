//! # Shape Errors

use thiserror::Error;

/// Result type for shape set operations
pub type ShapeResult<T> = Result<T, ShapeError>;

/// Shape set errors
///
/// These indicate a broken schema definition, never bad input values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape '{0}' is not defined in this shape set")]
    UnknownShape(String),

    #[error("shape '{0}' is already defined")]
    DuplicateShape(String),

    #[error("shape '{owner}' references undefined shape '{target}'")]
    DanglingRef { owner: String, target: String },

    #[error("malformed shape definition: {0}")]
    Malformed(String),
}
