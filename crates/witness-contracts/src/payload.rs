//! The tagged payload variant accepted at the facade boundary.
//!
//! Callers hand the audit log structured values, scalars, nothing at all, or
//! pre-encoded JSON text.  `Payload` names each of those shapes once, at the
//! boundary, so the rest of the pipeline never branches on runtime type:
//! the canonicalizer resolves a `Payload` into exactly one canonical text.

use serde_json::{Map, Value};

/// An event payload as supplied by the caller, before canonicalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No payload.  Canonicalizes to the literal `null`.
    Null,
    /// A single scalar value (string, number, or boolean).
    Scalar(Value),
    /// An ordered sequence of values.
    Sequence(Vec<Value>),
    /// A key-value mapping.
    Mapping(Map<String, Value>),
    /// JSON text encoded by the caller.  Must parse as valid JSON; text that
    /// does not is a caller error, not data to be stored verbatim.
    PreEncoded(String),
}

impl Payload {
    /// Wrap caller-encoded JSON text.
    pub fn pre_encoded(text: impl Into<String>) -> Self {
        Payload::PreEncoded(text.into())
    }
}

impl From<Value> for Payload {
    /// Resolve a JSON value into its payload variant.
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Payload::Null,
            Value::Array(items) => Payload::Sequence(items),
            Value::Object(map) => Payload::Mapping(map),
            scalar => Payload::Scalar(scalar),
        }
    }
}

impl From<Option<Value>> for Payload {
    fn from(value: Option<Value>) -> Self {
        value.map_or(Payload::Null, Payload::from)
    }
}
