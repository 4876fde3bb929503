//! # witness-contracts
//!
//! Shared types and contracts for the WITNESS audit chain.
//!
//! All crates in the workspace import from here.  No business logic lives in
//! this crate — only data definitions and error types.

pub mod error;
pub mod payload;
pub mod record;

pub use error::{AuditError, AuditResult, ChainIntegrityError, MismatchKind};
pub use payload::Payload;
pub use record::AuditRecord;

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::error::{AuditError, ChainIntegrityError, MismatchKind};
    use super::payload::Payload;
    use super::record::AuditRecord;

    // ── Payload resolution ───────────────────────────────────────────────────

    #[test]
    fn payload_from_null_value() {
        assert_eq!(Payload::from(Value::Null), Payload::Null);
    }

    #[test]
    fn payload_from_object_value() {
        let payload = Payload::from(json!({ "amount": 10 }));
        match payload {
            Payload::Mapping(map) => assert_eq!(map["amount"], json!(10)),
            other => panic!("expected Mapping, got {:?}", other),
        }
    }

    #[test]
    fn payload_from_array_value() {
        let payload = Payload::from(json!([1, 2, 3]));
        match payload {
            Payload::Sequence(items) => assert_eq!(items.len(), 3),
            other => panic!("expected Sequence, got {:?}", other),
        }
    }

    #[test]
    fn payload_from_scalar_value() {
        let payload = Payload::from(json!("heartbeat"));
        assert_eq!(payload, Payload::Scalar(json!("heartbeat")));
    }

    #[test]
    fn payload_from_absent_value_is_null() {
        assert_eq!(Payload::from(None), Payload::Null);
    }

    // ── Error display messages ───────────────────────────────────────────────

    #[test]
    fn error_naive_timestamp_display() {
        let err = AuditError::NaiveTimestamp {
            value: "2024-01-01T12:00:00".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("timezone-aware"));
        assert!(msg.contains("2024-01-01T12:00:00"));
    }

    #[test]
    fn error_invalid_payload_display() {
        let err = AuditError::InvalidPayload {
            reason: "payload text is not valid JSON".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cannot be canonicalized"));
        assert!(msg.contains("not valid JSON"));
    }

    #[test]
    fn error_empty_field_display() {
        let err = AuditError::EmptyField { field: "actor" };
        assert_eq!(err.to_string(), "actor must be a non-empty string");
    }

    #[test]
    fn error_store_unavailable_display() {
        let err = AuditError::StoreUnavailable {
            reason: "disk full".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("store unavailable"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn chain_integrity_error_names_record_and_kind() {
        let err = ChainIntegrityError {
            record_id: 2,
            expected: "aaaa".to_string(),
            found: "bbbb".to_string(),
            kind: MismatchKind::PrevHashMismatch,
        };
        let msg = err.to_string();
        assert!(msg.contains("record 2"));
        assert!(msg.contains("prev_hash mismatch"));
        assert!(msg.contains("aaaa"));
        assert!(msg.contains("bbbb"));
    }

    #[test]
    fn chain_integrity_error_converts_into_audit_error() {
        let inner = ChainIntegrityError {
            record_id: 7,
            expected: "cccc".to_string(),
            found: "dddd".to_string(),
            kind: MismatchKind::DigestMismatch,
        };
        let err: AuditError = inner.clone().into();
        match err {
            AuditError::ChainIntegrity(e) => assert_eq!(e, inner),
            other => panic!("expected ChainIntegrity, got {:?}", other),
        }
    }

    // ── Record constants ─────────────────────────────────────────────────────

    #[test]
    fn genesis_hash_is_64_zeros() {
        assert_eq!(AuditRecord::GENESIS_HASH.len(), 64);
        assert!(AuditRecord::GENESIS_HASH.chars().all(|c| c == '0'));
    }
}
