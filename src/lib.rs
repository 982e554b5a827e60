//! preflight - A strict, deterministic, schema-driven parameter validator
//!
//! Checks a nested value tree against a shape graph before a request is
//! dispatched, collecting every violation in a single pass.

pub mod observability;
pub mod params;
pub mod shape;
