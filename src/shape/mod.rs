//! Shape graph subsystem for preflight
//!
//! Shapes describe the expected structural type of a value: a structure with
//! named members, a homogeneous list, a string-keyed map, or a scalar leaf.
//!
//! # Design Principles
//!
//! - Closed set of shape kinds, dispatched by exhaustive match
//! - References resolve by identifier through a registry, so shape graphs
//!   may be cyclic
//! - Shapes are immutable once defined and safe to share across threads
//! - Referential integrity is checked at load time, not discovered mid-walk

mod errors;
mod set;
mod types;

pub use errors::{ShapeError, ShapeResult};
pub use set::ShapeSet;
pub use types::{Shape, ShapeRef};
