//! # Parameter Validation Errors
//!
//! Message wording is contractual: callers display and sometimes parse it.

use std::fmt;

use thiserror::Error;

use super::value::Value;
use crate::shape::ShapeError;

/// Result type for validation operations
pub type ParamResult<T> = Result<T, ParamError>;

/// A single path-qualified violation.
///
/// Ordering within a report is depth-first, pre-order over the value tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected {context} to be {expected}, got value {value_repr} (class: {class_name}) instead.")]
    TypeMismatch {
        context: String,
        expected: &'static str,
        value_repr: String,
        class_name: String,
    },

    #[error("missing required parameter {context}[{member:?}]")]
    MissingRequired { context: String, member: String },

    #[error("unexpected value at {context}[{member:?}]")]
    UnexpectedMember { context: String, member: String },
}

impl ValidationError {
    /// Records a value whose runtime type does not match the shape kind.
    pub fn type_mismatch(context: &str, expected: &'static str, value: &Value) -> Self {
        ValidationError::TypeMismatch {
            context: context.to_string(),
            expected,
            value_repr: value.repr(),
            class_name: value.class_name().to_string(),
        }
    }

    /// Records a required structure member that is absent or null.
    pub fn missing_required(context: &str, member: &str) -> Self {
        ValidationError::MissingRequired {
            context: context.to_string(),
            member: member.to_string(),
        }
    }

    /// Records a structure key the shape does not declare.
    pub fn unexpected_member(context: &str, member: &str) -> Self {
        ValidationError::UnexpectedMember {
            context: context.to_string(),
            member: member.to_string(),
        }
    }

    /// Returns the context path the violation is anchored at.
    pub fn context(&self) -> &str {
        match self {
            ValidationError::TypeMismatch { context, .. }
            | ValidationError::MissingRequired { context, .. }
            | ValidationError::UnexpectedMember { context, .. } => context,
        }
    }
}

/// The aggregate failure raised once per validation pass.
///
/// Exactly one violation renders as the raw message; several render as a
/// counted summary with one bulleted line per violation, in collection order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidParameterError {
    errors: Vec<ValidationError>,
}

impl InvalidParameterError {
    /// Wraps the violations collected by one pass.
    pub fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self { errors }
    }

    /// Returns the violations in collection order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns true if no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for InvalidParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.len() == 1 {
            return write!(f, "{}", self.errors[0]);
        }
        write!(f, "parameter validator found {} errors:", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for InvalidParameterError {}

/// Failure surface of a validation call.
///
/// `Invalid` is recoverable by the caller (fix the request and retry);
/// `Fault` means the shape graph itself is broken and is raised immediately
/// without collecting anything.
#[derive(Debug, Error)]
pub enum ParamError {
    #[error(transparent)]
    Invalid(#[from] InvalidParameterError),

    #[error("shape graph fault: {0}")]
    Fault(#[from] ShapeError),
}
