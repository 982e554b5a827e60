//! Shape type definitions
//!
//! Supported kinds:
//! - structure: named members with a declared set of required member names
//! - list: homogeneous sequence with a single member shape
//! - map: string-keyed mapping with key and value shapes
//! - scalar leaves: string, integer, float, timestamp, boolean, blob

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Reference to a shape in a [`ShapeSet`](super::ShapeSet), plus
/// reference-level metadata.
///
/// References carry an identifier rather than owning the target shape, which
/// is what allows a structure member to point back at an ancestor shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeRef {
    /// Identifier of the referenced shape
    pub target: String,
    /// Foreign record type accepted in place of a plain map.
    ///
    /// When set on a ref to a structure or map shape, a record value whose
    /// type name matches is admitted as if it were a map. The record itself
    /// is the adapter: callers extract a key/value view up front instead of
    /// the validator probing arbitrary objects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepts_record: Option<String>,
}

impl ShapeRef {
    /// Creates a reference to the shape with the given identifier.
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            accepts_record: None,
        }
    }

    /// Creates a reference that also admits a foreign record type.
    pub fn accepting_record(target: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            accepts_record: Some(record_type.into()),
        }
    }
}

/// Expected structural type of a value.
///
/// The kind set is closed: dispatch is a single exhaustive match, so an
/// unhandled kind is a compile error rather than a runtime fault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Shape {
    /// Named-member record with a declared subset of required member names
    Structure {
        /// Member name to member shape reference
        #[serde(default)]
        members: BTreeMap<String, ShapeRef>,
        /// Member names that must be present and non-null
        #[serde(default)]
        required: BTreeSet<String>,
    },
    /// Homogeneous sequence
    List {
        /// Element shape
        member: ShapeRef,
    },
    /// String-keyed mapping
    Map {
        /// Key shape
        key: ShapeRef,
        /// Value shape
        value: ShapeRef,
    },
    /// UTF-8 text
    String,
    /// Integral number (never a float, never a numeric string)
    Integer,
    /// Floating-point number
    Float,
    /// Date-time value
    Timestamp,
    /// Exactly true or false
    Boolean,
    /// Text or a readable, seekable byte stream of known size
    Blob,
}

impl Shape {
    /// Builds a structure shape from member and required-name iterators.
    pub fn structure<S: Into<String>>(
        members: impl IntoIterator<Item = (S, ShapeRef)>,
        required: impl IntoIterator<Item = S>,
    ) -> Self {
        Shape::Structure {
            members: members
                .into_iter()
                .map(|(name, shape_ref)| (name.into(), shape_ref))
                .collect(),
            required: required.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a list shape.
    pub fn list(member: ShapeRef) -> Self {
        Shape::List { member }
    }

    /// Builds a map shape.
    pub fn map(key: ShapeRef, value: ShapeRef) -> Self {
        Shape::Map { key, value }
    }

    /// Returns the lowercase kind tag used in shape definitions.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Structure { .. } => "structure",
            Shape::List { .. } => "list",
            Shape::Map { .. } => "map",
            Shape::String => "string",
            Shape::Integer => "integer",
            Shape::Float => "float",
            Shape::Timestamp => "timestamp",
            Shape::Boolean => "boolean",
            Shape::Blob => "blob",
        }
    }

    /// Returns the article-qualified description used in type-mismatch
    /// messages. Callers parse these messages, so the wording is contractual.
    pub fn expectation(&self) -> &'static str {
        match self {
            Shape::Structure { .. } | Shape::Map { .. } => "a hash",
            Shape::List { .. } => "an array",
            Shape::String => "a string",
            Shape::Integer => "an integer",
            Shape::Float => "a float",
            Shape::Timestamp => "a timestamp",
            Shape::Boolean => "a boolean",
            Shape::Blob => "a string or IO-like object",
        }
    }

    /// Iterates every reference held by this shape.
    pub fn refs(&self) -> Vec<&ShapeRef> {
        match self {
            Shape::Structure { members, .. } => members.values().collect(),
            Shape::List { member } => vec![member],
            Shape::Map { key, value } => vec![key, value],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_structure() -> Shape {
        Shape::Structure {
            members: BTreeMap::new(),
            required: BTreeSet::new(),
        }
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Shape::String.kind_name(), "string");
        assert_eq!(Shape::Integer.kind_name(), "integer");
        assert_eq!(Shape::list(ShapeRef::new("S")).kind_name(), "list");
        assert_eq!(empty_structure().kind_name(), "structure");
    }

    #[test]
    fn test_expectations() {
        assert_eq!(empty_structure().expectation(), "a hash");
        assert_eq!(Shape::list(ShapeRef::new("S")).expectation(), "an array");
        assert_eq!(Shape::Integer.expectation(), "an integer");
        assert_eq!(Shape::Blob.expectation(), "a string or IO-like object");
    }

    #[test]
    fn test_structure_builder() {
        let shape = Shape::structure(
            [("id", ShapeRef::new("Id")), ("count", ShapeRef::new("Count"))],
            ["id"],
        );
        match shape {
            Shape::Structure { members, required } => {
                assert_eq!(members.len(), 2);
                assert_eq!(members["id"].target, "Id");
                assert!(required.contains("id"));
                assert!(!required.contains("count"));
            }
            _ => panic!("expected structure"),
        }
    }

    #[test]
    fn test_shape_deserializes_from_tagged_json() {
        let shape: Shape = serde_json::from_str(
            r#"{
                "type": "structure",
                "members": { "id": { "target": "Id" } },
                "required": ["id"]
            }"#,
        )
        .unwrap();
        match shape {
            Shape::Structure { members, required } => {
                assert_eq!(members["id"].target, "Id");
                assert_eq!(required.len(), 1);
            }
            _ => panic!("expected structure"),
        }

        let shape: Shape = serde_json::from_str(r#"{ "type": "integer" }"#).unwrap();
        assert_eq!(shape, Shape::Integer);
    }

    #[test]
    fn test_ref_record_marker() {
        let plain = ShapeRef::new("Endpoint");
        assert_eq!(plain.accepts_record, None);

        let marked = ShapeRef::accepting_record("Endpoint", "EndpointRecord");
        assert_eq!(marked.accepts_record.as_deref(), Some("EndpointRecord"));
    }

    #[test]
    fn test_refs_enumeration() {
        let shape = Shape::map(ShapeRef::new("K"), ShapeRef::new("V"));
        let targets: Vec<&str> = shape.refs().iter().map(|r| r.target.as_str()).collect();
        assert_eq!(targets, ["K", "V"]);
        assert!(Shape::Boolean.refs().is_empty());
    }
}
