//! Runtime value model
//!
//! Values are structurally independent of the shape types: a value tree is
//! whatever the request builder assembled, and the validator only inspects
//! it. Nothing here mutates or coerces.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Cursor, Read, Seek};

use chrono::{DateTime, Utc};

/// Capability contract for streaming blob payloads: readable, seekable, and
/// with a known total size.
pub trait BlobSource: Read + Seek {
    /// Total number of bytes available.
    fn size(&self) -> u64;
}

impl BlobSource for Cursor<Vec<u8>> {
    fn size(&self) -> u64 {
        self.get_ref().len() as u64
    }
}

/// A streaming blob payload.
pub struct Blob {
    source: Box<dyn BlobSource>,
}

impl Blob {
    /// Wraps any source satisfying the blob capability contract.
    pub fn new(source: impl BlobSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Wraps an in-memory byte buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self::new(Cursor::new(bytes))
    }

    /// Total number of bytes available.
    pub fn size(&self) -> u64 {
        self.source.size()
    }

    /// Consumes the blob, returning the underlying source.
    pub fn into_source(self) -> Box<dyn BlobSource> {
        self.source
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Blob({} bytes)", self.size())
    }
}

/// Key/value view of a foreign record type.
///
/// The extraction is the caller's explicit adapter step: instead of the
/// validator probing arbitrary objects, the foreign type is converted to
/// named entries up front. A record is only admitted where the governing
/// shape ref names its type.
#[derive(Debug)]
pub struct Record {
    type_name: String,
    entries: Vec<(String, Value)>,
}

impl Record {
    /// Creates an empty record view for the given foreign type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            entries: Vec::new(),
        }
    }

    /// Appends an entry, preserving declaration order.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the foreign type name reported in diagnostics.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Returns the entries in declaration order.
    pub fn entries(&self) -> &[(String, Value)] {
        &self.entries
    }

    /// Looks up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(entry_name, _)| entry_name == name)
            .map(|(_, value)| value)
    }
}

/// An arbitrary nested runtime value.
///
/// Maps are `BTreeMap`s, so "the mapping's own key order" is deterministic
/// and identical inputs always produce identical diagnostics.
#[derive(Debug)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Blob(Blob),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Record(Record),
}

impl Value {
    /// Returns true for the explicit null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Runtime type label used in the `(class: ...)` segment of diagnostics.
    pub fn class_name(&self) -> &str {
        match self {
            Value::Null => "Null",
            Value::Boolean(_) => "Boolean",
            Value::Integer(_) => "Integer",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Timestamp(_) => "Timestamp",
            Value::Blob(_) => "Blob",
            Value::List(_) => "List",
            Value::Map(_) => "Map",
            Value::Record(record) => record.type_name(),
        }
    }

    /// Renders the value for the `got value ...` segment of diagnostics.
    pub fn repr(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Float(x) => format!("{:?}", x),
            Value::String(s) => format!("{:?}", s),
            Value::Timestamp(t) => t.to_rfc3339(),
            Value::Blob(blob) => format!("Blob({} bytes)", blob.size()),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(Value::repr).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{:?}: {}", key, value.repr()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Record(record) => {
                let rendered: Vec<String> = record
                    .entries()
                    .iter()
                    .map(|(name, value)| format!("{}: {}", name, value.repr()))
                    .collect();
                if rendered.is_empty() {
                    format!("{} {{}}", record.type_name())
                } else {
                    format!("{} {{ {} }}", record.type_name(), rendered.join(", "))
                }
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Blob> for Value {
    fn from(blob: Blob) -> Self {
        Value::Blob(blob)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

/// Bridge from JSON trees, so callers and tests can assemble values with
/// `serde_json::json!`. Integral numbers map to `Integer`, everything else
/// numeric to `Float`. Timestamps, blobs, and records have no JSON
/// counterpart and are constructed directly.
impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}
