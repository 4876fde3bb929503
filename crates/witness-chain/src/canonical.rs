//! Canonical serialization of payloads and timestamps.
//!
//! Logically identical inputs must produce byte-identical serializations so
//! the digest is reproducible across time and platforms.  Canonical JSON
//! emits map keys in sorted order with no insignificant whitespace, at every
//! nesting level.  The key sort is bytewise, which for UTF-8 equals
//! codepoint order.
//!
//! Canonical timestamps are UTC with fixed microsecond precision.  A
//! timestamp without time-zone information is rejected — a zone is never
//! assumed.

use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{Map, Value};

use witness_contracts::error::{AuditError, AuditResult};
use witness_contracts::payload::Payload;

/// Render `value` as canonical JSON.
///
/// Map keys are emitted in sorted order regardless of how the `Value` was
/// built, so the output does not depend on serde_json's map representation.
/// Scalar encoding (number formatting, string escapes) is serde_json's.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => write_array(items, out),
        Value::Object(map) => write_object(map, out),
        // Scalars (null, bool, number, string): Value's Display is already
        // the compact JSON encoding.
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_array(items: &[Value], out: &mut String) {
    out.push('[');
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        write_value(item, out);
    }
    out.push(']');
}

fn write_object(map: &Map<String, Value>, out: &mut String) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (idx, key) in keys.iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(&Value::String((*key).clone()).to_string());
        out.push(':');
        write_value(&map[key.as_str()], out);
    }
    out.push('}');
}

/// Resolve a caller-supplied `Payload` into its canonical text.
///
/// `Null` becomes the literal `null`.  Structured variants are serialized
/// canonically.  `PreEncoded` text must parse as JSON — text that does not
/// is a caller error (`InvalidPayload`), including the empty string.
pub fn canonical_payload(payload: &Payload) -> AuditResult<String> {
    match payload {
        Payload::Null => Ok("null".to_string()),
        Payload::Scalar(value) => Ok(canonical_json(value)),
        Payload::Sequence(items) => {
            let mut out = String::new();
            write_array(items, &mut out);
            Ok(out)
        }
        Payload::Mapping(map) => {
            let mut out = String::new();
            write_object(map, &mut out);
            Ok(out)
        }
        Payload::PreEncoded(text) => canonical_payload_value(text).map(|v| canonical_json(&v)),
    }
}

/// Canonicalize stored payload text for hashing.
///
/// Empty text hashes as `null` so an absent payload and an explicit null
/// payload produce identical digests.  Any other text must parse as JSON.
pub fn canonical_payload_text(text: &str) -> AuditResult<String> {
    if text.is_empty() {
        return Ok("null".to_string());
    }
    canonical_payload_value(text).map(|v| canonical_json(&v))
}

fn canonical_payload_value(text: &str) -> AuditResult<Value> {
    serde_json::from_str(text).map_err(|e| AuditError::InvalidPayload {
        reason: format!("payload text is not valid JSON: {e}"),
    })
}

/// Render a time-zone-aware timestamp in canonical form: UTC, ISO-8601,
/// fixed microsecond precision, e.g. `2024-01-01T12:00:00.000000+00:00`.
pub fn canonical_timestamp(ts: &DateTime<FixedOffset>) -> String {
    ts.with_timezone(&Utc)
        .format("%Y-%m-%dT%H:%M:%S%.6f+00:00")
        .to_string()
}

/// Parse an RFC 3339 timestamp string, requiring an explicit UTC offset.
///
/// Inputs without time-zone information — or that are not timestamps at
/// all — fail with `NaiveTimestamp`.
pub fn parse_timestamp(text: &str) -> AuditResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text).map_err(|_| AuditError::NaiveTimestamp {
        value: text.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
