//! Parameter validation subsystem for preflight
//!
//! Pre-flight gate for outgoing requests: a value tree is checked against a
//! shape graph before anything is dispatched, and every violation from one
//! pass is surfaced in a single path-qualified report.
//!
//! # Design Principles
//!
//! - Collect everything, raise once
//! - Paths name the exact location of each violation
//! - Exact type matching, never coercion
//! - Absence and explicit null are equivalent

mod errors;
mod validator;
mod value;

pub use errors::{InvalidParameterError, ParamError, ParamResult, ValidationError};
pub use validator::{validate, ParamValidator, ValidatorOptions};
pub use value::{Blob, BlobSource, Record, Value};
