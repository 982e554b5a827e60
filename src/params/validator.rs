//! Recursive descent validator
//!
//! Validation semantics:
//! - One full depth-first pass; every violation is collected, then the call
//!   fails exactly once with the aggregate
//! - A structural mismatch prunes its own subtree only; siblings and
//!   ancestors keep being checked
//! - Recursion follows the value tree, so cyclic shape graphs terminate
//! - No mutation, no coercion, no partial success
//!
//! Forbidden behaviors:
//! - Failing on the first violation
//! - Treating a broken shape graph as a value problem (it aborts instead)
//! - Truthy/falsy or numeric-string coercion

use std::collections::{BTreeMap, BTreeSet};

use super::errors::{InvalidParameterError, ParamError, ParamResult, ValidationError};
use super::value::Value;
use crate::observability::{log_event_with_fields, Event};
use crate::shape::{Shape, ShapeRef, ShapeResult, ShapeSet};

/// Validator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Whether required structure members are enforced. Defaults to true.
    pub validate_required: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            validate_required: true,
        }
    }
}

/// Validates `params` against the shape referenced by `top`, logging the
/// outcome of rejected passes.
///
/// Convenience wrapper over [`ParamValidator`]; embedding callers that want
/// a silent library construct the validator directly.
///
/// # Errors
///
/// Returns `ParamError::Invalid` when the value tree violates the shape and
/// `ParamError::Fault` when a reference fails to resolve.
pub fn validate(
    shapes: &ShapeSet,
    top: &ShapeRef,
    params: &Value,
    options: ValidatorOptions,
) -> ParamResult<()> {
    let result = ParamValidator::new(shapes, top, options).validate(params);
    match &result {
        Err(ParamError::Invalid(invalid)) => {
            let count = invalid.len().to_string();
            log_event_with_fields(Event::ValidationRejected, &[("error_count", count.as_str())]);
        }
        Err(ParamError::Fault(fault)) => {
            let detail = fault.to_string();
            log_event_with_fields(Event::ShapeFault, &[("detail", detail.as_str())]);
        }
        Ok(()) => {}
    }
    result
}

/// Pre-flight validator for one top-level shape reference.
///
/// Holds no state across calls beyond its configuration; distinct calls are
/// independent and the shape set is never written.
pub struct ParamValidator<'a> {
    shapes: &'a ShapeSet,
    top: &'a ShapeRef,
    validate_required: bool,
}

impl<'a> ParamValidator<'a> {
    /// Creates a validator for the given top-level reference.
    pub fn new(shapes: &'a ShapeSet, top: &'a ShapeRef, options: ValidatorOptions) -> Self {
        Self {
            shapes,
            top,
            validate_required: options.validate_required,
        }
    }

    /// Runs one validation pass over `params`.
    ///
    /// The top-level context label is the literal `params`.
    ///
    /// # Errors
    ///
    /// Returns `ParamError::Invalid` carrying every collected violation, or
    /// `ParamError::Fault` if a shape reference fails to resolve (raised
    /// immediately, nothing is collected).
    pub fn validate(&self, params: &Value) -> ParamResult<()> {
        let mut errors = Vec::new();
        self.validate_ref(self.top, params, &mut errors, "params")?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(InvalidParameterError::new(errors).into())
        }
    }

    /// Dispatches on the resolved shape kind.
    fn validate_ref(
        &self,
        shape_ref: &ShapeRef,
        value: &Value,
        errors: &mut Vec<ValidationError>,
        context: &str,
    ) -> ShapeResult<()> {
        match self.shapes.resolve(shape_ref)? {
            Shape::Structure { members, required } => {
                self.validate_structure(shape_ref, members, required, value, errors, context)
            }
            Shape::List { member } => self.validate_list(member, value, errors, context),
            Shape::Map {
                key,
                value: value_ref,
            } => self.validate_map(shape_ref, key, value_ref, value, errors, context),
            scalar @ (Shape::String
            | Shape::Integer
            | Shape::Float
            | Shape::Timestamp
            | Shape::Boolean
            | Shape::Blob) => {
                self.validate_scalar(scalar, value, errors, context);
                Ok(())
            }
        }
    }

    fn validate_structure(
        &self,
        shape_ref: &ShapeRef,
        members: &BTreeMap<String, ShapeRef>,
        required: &BTreeSet<String>,
        value: &Value,
        errors: &mut Vec<ValidationError>,
        context: &str,
    ) -> ShapeResult<()> {
        let entries = match entries_view(shape_ref, value) {
            Some(entries) => entries,
            None => {
                errors.push(ValidationError::type_mismatch(context, "a hash", value));
                return Ok(());
            }
        };

        // Required checks come before member-by-member descent. An explicit
        // null counts as missing.
        if self.validate_required {
            for name in required {
                let missing = entries
                    .iter()
                    .find(|(entry_name, _)| *entry_name == name.as_str())
                    .map_or(true, |(_, entry_value)| entry_value.is_null());
                if missing {
                    errors.push(ValidationError::missing_required(context, name));
                }
            }
        }

        // Member iteration follows the value's own key order. Null entries
        // are skipped: absence and explicit null are equivalent here.
        for (name, member_value) in &entries {
            if member_value.is_null() {
                continue;
            }
            match members.get(*name) {
                Some(member_ref) => {
                    let member_context = format!("{}[{:?}]", context, name);
                    self.validate_ref(member_ref, member_value, errors, &member_context)?;
                }
                None => errors.push(ValidationError::unexpected_member(context, name)),
            }
        }
        Ok(())
    }

    fn validate_list(
        &self,
        member: &ShapeRef,
        value: &Value,
        errors: &mut Vec<ValidationError>,
        context: &str,
    ) -> ShapeResult<()> {
        let items = match value {
            Value::List(items) => items,
            _ => {
                errors.push(ValidationError::type_mismatch(context, "an array", value));
                return Ok(());
            }
        };
        for (index, item) in items.iter().enumerate() {
            let item_context = format!("{}[{}]", context, index);
            self.validate_ref(member, item, errors, &item_context)?;
        }
        Ok(())
    }

    fn validate_map(
        &self,
        shape_ref: &ShapeRef,
        key_ref: &ShapeRef,
        value_ref: &ShapeRef,
        value: &Value,
        errors: &mut Vec<ValidationError>,
        context: &str,
    ) -> ShapeResult<()> {
        let entries = match entries_view(shape_ref, value) {
            Some(entries) => entries,
            None => {
                errors.push(ValidationError::type_mismatch(context, "a hash", value));
                return Ok(());
            }
        };
        for (key, entry_value) in entries {
            let key_value = Value::String(key.to_string());
            let key_context = format!("{} {:?} key", context, key);
            self.validate_ref(key_ref, &key_value, errors, &key_context)?;

            let value_context = format!("{}[{:?}]", context, key);
            self.validate_ref(value_ref, entry_value, errors, &value_context)?;
        }
        Ok(())
    }

    fn validate_scalar(
        &self,
        kind: &Shape,
        value: &Value,
        errors: &mut Vec<ValidationError>,
        context: &str,
    ) {
        let accepted = match (kind, value) {
            (Shape::String, Value::String(_)) => true,
            (Shape::Integer, Value::Integer(_)) => true,
            (Shape::Float, Value::Float(_)) => true,
            (Shape::Timestamp, Value::Timestamp(_)) => true,
            (Shape::Boolean, Value::Boolean(_)) => true,
            (Shape::Blob, Value::String(_) | Value::Blob(_)) => true,
            _ => false,
        };
        if !accepted {
            errors.push(ValidationError::type_mismatch(
                context,
                kind.expectation(),
                value,
            ));
        }
    }
}

/// Key/value view over mapping-like values.
///
/// A map always qualifies; a record qualifies only when the governing ref
/// names its type.
fn entries_view<'v>(shape_ref: &ShapeRef, value: &'v Value) -> Option<Vec<(&'v str, &'v Value)>> {
    match value {
        Value::Map(entries) => Some(
            entries
                .iter()
                .map(|(key, entry_value)| (key.as_str(), entry_value))
                .collect(),
        ),
        Value::Record(record)
            if shape_ref.accepts_record.as_deref() == Some(record.type_name()) =>
        {
            Some(
                record
                    .entries()
                    .iter()
                    .map(|(name, entry_value)| (name.as_str(), entry_value))
                    .collect(),
            )
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::value::Record;
    use serde_json::json;

    fn scalar_set() -> ShapeSet {
        let mut set = ShapeSet::new();
        set.define("S", Shape::String).unwrap();
        set.define("I", Shape::Integer).unwrap();
        set.define("F", Shape::Float).unwrap();
        set.define("B", Shape::Boolean).unwrap();
        set.define("Blob", Shape::Blob).unwrap();
        set.define("T", Shape::Timestamp).unwrap();
        set
    }

    fn check(set: &ShapeSet, target: &str, value: &Value) -> ParamResult<()> {
        let top = ShapeRef::new(target);
        ParamValidator::new(set, &top, ValidatorOptions::default()).validate(value)
    }

    fn messages(result: ParamResult<()>) -> Vec<String> {
        match result {
            Err(ParamError::Invalid(invalid)) => {
                invalid.errors().iter().map(|e| e.to_string()).collect()
            }
            other => panic!("expected invalid parameters, got {:?}", other),
        }
    }

    #[test]
    fn test_scalar_acceptance() {
        let set = scalar_set();
        assert!(check(&set, "S", &Value::from("x")).is_ok());
        assert!(check(&set, "I", &Value::from(7i64)).is_ok());
        assert!(check(&set, "F", &Value::from(7.5)).is_ok());
        assert!(check(&set, "B", &Value::from(true)).is_ok());
    }

    #[test]
    fn test_integer_rejects_float_and_string() {
        let set = scalar_set();
        let errors = messages(check(&set, "I", &Value::from(7.0)));
        assert_eq!(
            errors,
            ["expected params to be an integer, got value 7.0 (class: Float) instead."]
        );

        let errors = messages(check(&set, "I", &Value::from("7")));
        assert_eq!(
            errors,
            ["expected params to be an integer, got value \"7\" (class: String) instead."]
        );
    }

    #[test]
    fn test_float_rejects_integer() {
        let set = scalar_set();
        let errors = messages(check(&set, "F", &Value::from(7i64)));
        assert_eq!(
            errors,
            ["expected params to be a float, got value 7 (class: Integer) instead."]
        );
    }

    #[test]
    fn test_boolean_rejects_truthy_values() {
        let set = scalar_set();
        assert!(check(&set, "B", &Value::from(false)).is_ok());
        let errors = messages(check(&set, "B", &Value::from(1i64)));
        assert_eq!(
            errors,
            ["expected params to be a boolean, got value 1 (class: Integer) instead."]
        );
    }

    #[test]
    fn test_blob_accepts_text_and_stream() {
        use crate::params::value::Blob;
        let set = scalar_set();
        assert!(check(&set, "Blob", &Value::from("payload")).is_ok());
        assert!(check(&set, "Blob", &Value::from(Blob::from_bytes(vec![1, 2]))).is_ok());

        let errors = messages(check(&set, "Blob", &Value::from(2i64)));
        assert_eq!(
            errors,
            ["expected params to be a string or IO-like object, got value 2 (class: Integer) instead."]
        );
    }

    #[test]
    fn test_map_key_and_value_contexts() {
        let mut set = scalar_set();
        set.define("M", Shape::map(ShapeRef::new("S"), ShapeRef::new("I")))
            .unwrap();

        let value = Value::from(json!({ "a": 1, "b": "nope" }));
        let errors = messages(check(&set, "M", &value));
        assert_eq!(
            errors,
            ["expected params[\"b\"] to be an integer, got value \"nope\" (class: String) instead."]
        );
    }

    #[test]
    fn test_map_key_shape_mismatch_context() {
        let mut set = scalar_set();
        set.define("M", Shape::map(ShapeRef::new("I"), ShapeRef::new("I")))
            .unwrap();

        let value = Value::from(json!({ "k": 1 }));
        let errors = messages(check(&set, "M", &value));
        assert_eq!(
            errors,
            ["expected params \"k\" key to be an integer, got value \"k\" (class: String) instead."]
        );
    }

    #[test]
    fn test_structure_prunes_but_siblings_continue() {
        let mut set = scalar_set();
        set.define(
            "Inner",
            Shape::structure([("id", ShapeRef::new("S"))], ["id"]),
        )
        .unwrap();
        set.define(
            "Outer",
            Shape::structure(
                [("left", ShapeRef::new("Inner")), ("right", ShapeRef::new("Inner"))],
                [],
            ),
        )
        .unwrap();

        // left is not a hash: pruned after one error; right is still checked.
        let value = Value::from(json!({ "left": 3, "right": {} }));
        let errors = messages(check(&set, "Outer", &value));
        assert_eq!(
            errors,
            [
                "expected params[\"left\"] to be a hash, got value 3 (class: Integer) instead.",
                "missing required parameter params[\"right\"][\"id\"]",
            ]
        );
    }

    #[test]
    fn test_record_admitted_only_with_marker() {
        let mut set = scalar_set();
        set.define(
            "Endpoint",
            Shape::structure([("host", ShapeRef::new("S"))], ["host"]),
        )
        .unwrap();

        let mut record = Record::new("EndpointRecord");
        record.insert("host", "example.com");
        let value = Value::from(record);

        let marked = ShapeRef::accepting_record("Endpoint", "EndpointRecord");
        let validator = ParamValidator::new(&set, &marked, ValidatorOptions::default());
        assert!(validator.validate(&value).is_ok());

        let unmarked = ShapeRef::new("Endpoint");
        let validator = ParamValidator::new(&set, &unmarked, ValidatorOptions::default());
        let errors = messages(validator.validate(&value));
        assert_eq!(
            errors,
            ["expected params to be a hash, got value EndpointRecord { host: \"example.com\" } (class: EndpointRecord) instead."]
        );
    }

    #[test]
    fn test_dangling_ref_aborts_without_collecting() {
        let mut set = ShapeSet::new();
        set.define(
            "Input",
            Shape::structure([("id", ShapeRef::new("Gone"))], []),
        )
        .unwrap();

        let result = check(&set, "Input", &Value::from(json!({ "id": "x" })));
        match result {
            Err(ParamError::Fault(fault)) => {
                assert_eq!(fault.to_string(), "shape 'Gone' is not defined in this shape set");
            }
            other => panic!("expected fault, got {:?}", other),
        }
    }

    #[test]
    fn test_convenience_validate_logs_and_returns() {
        let set = scalar_set();
        let top = ShapeRef::new("S");
        assert!(validate(&set, &top, &Value::from("ok"), ValidatorOptions::default()).is_ok());
        assert!(validate(&set, &top, &Value::from(1i64), ValidatorOptions::default()).is_err());
    }
}
