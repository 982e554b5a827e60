//! Shape registry
//!
//! Shapes are defined once, keyed by identifier, and resolved through the
//! set for the lifetime of the process. Cyclic graphs are ordinary here: a
//! member ref may target its own ancestor, and resolution only happens while
//! walking a finite value tree.

use std::collections::BTreeMap;

use super::errors::{ShapeError, ShapeResult};
use super::types::{Shape, ShapeRef};
use crate::observability::{log_event_with_fields, Event};

/// Registry of shapes keyed by identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeSet {
    shapes: BTreeMap<String, Shape>,
}

impl ShapeSet {
    /// Creates an empty shape set.
    pub fn new() -> Self {
        Self {
            shapes: BTreeMap::new(),
        }
    }

    /// Defines a shape under the given identifier.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::DuplicateShape` if the identifier is taken.
    pub fn define(&mut self, id: impl Into<String>, shape: Shape) -> ShapeResult<()> {
        let id = id.into();
        if self.shapes.contains_key(&id) {
            return Err(ShapeError::DuplicateShape(id));
        }
        self.shapes.insert(id, shape);
        Ok(())
    }

    /// Looks up a shape by identifier.
    pub fn get(&self, id: &str) -> Option<&Shape> {
        self.shapes.get(id)
    }

    /// Resolves a reference to its target shape.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::UnknownShape` if the target is not defined.
    pub fn resolve(&self, shape_ref: &ShapeRef) -> ShapeResult<&Shape> {
        self.shapes
            .get(&shape_ref.target)
            .ok_or_else(|| ShapeError::UnknownShape(shape_ref.target.clone()))
    }

    /// Verifies that every reference held by every defined shape resolves.
    ///
    /// Run after assembling a set by hand; `from_json_str` runs it
    /// automatically. A set that passes cannot fault during traversal.
    pub fn check_integrity(&self) -> ShapeResult<()> {
        for (id, shape) in &self.shapes {
            for shape_ref in shape.refs() {
                if !self.shapes.contains_key(&shape_ref.target) {
                    return Err(ShapeError::DanglingRef {
                        owner: id.clone(),
                        target: shape_ref.target.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Parses a shape set from a JSON object of `identifier -> shape`
    /// definitions and checks referential integrity.
    ///
    /// The text comes from the caller; this crate owns no file format.
    ///
    /// # Errors
    ///
    /// Returns `ShapeError::Malformed` on invalid JSON and
    /// `ShapeError::DanglingRef` on an unresolvable target.
    pub fn from_json_str(definitions: &str) -> ShapeResult<Self> {
        let shapes: BTreeMap<String, Shape> = serde_json::from_str(definitions)
            .map_err(|e| ShapeError::Malformed(e.to_string()))?;
        let set = Self { shapes };
        set.check_integrity()?;

        let count = set.len().to_string();
        log_event_with_fields(Event::ShapeSetLoaded, &[("shapes", count.as_str())]);
        Ok(set)
    }

    /// Returns the number of defined shapes.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Returns true if no shapes are defined.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
