//! Chain hashing and integrity verification.
//!
//! A record's digest commits to exactly five fields.  The hash input is the
//! canonical JSON object over them, keys sorted:
//!
//!   {"action": …, "actor": …, "payload": <canonical payload text>,
//!    "prev_hash": …, "ts": …}
//!
//! The payload is embedded as its canonical *text* (a JSON string inside the
//! structure), so the digest can always be recomputed from a stored row
//! without reinterpreting the payload.

use serde_json::json;
use sha2::{Digest, Sha256};

use witness_contracts::error::{AuditError, AuditResult, ChainIntegrityError, MismatchKind};
use witness_contracts::record::AuditRecord;

use crate::canonical::{canonical_json, canonical_payload_text};

/// Compute the SHA-256 digest binding one record to the chain.
///
/// Pure function: the same inputs always produce the same digest, and the
/// store and the verifier both use it.  `payload_json` is canonicalized
/// before hashing (empty text hashes as `null`), so structurally equal
/// payloads hash identically regardless of key order or formatting.
///
/// Returns a lowercase 64-character hex string, or `InvalidPayload` when
/// `payload_json` is non-empty and not valid JSON.
pub fn compute_hash(
    prev_hash: &str,
    ts: &str,
    actor: &str,
    action: &str,
    payload_json: &str,
) -> AuditResult<String> {
    let payload = canonical_payload_text(payload_json)?;
    let structure = json!({
        "actor": actor,
        "action": action,
        "payload": payload,
        "prev_hash": prev_hash,
        "ts": ts,
    });

    let mut hasher = Sha256::new();
    hasher.update(canonical_json(&structure).as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Verify the integrity of a record sequence in ascending id order.
///
/// Walks the sequence recomputing digests and checking both invariants for
/// every record:
///
/// 1. **Linkage** — `prev_hash` equals the digest of the preceding record
///    (or `GENESIS_HASH` for the first), else `PrevHashMismatch`.
/// 2. **Digest correctness** — `this_hash` equals the digest recomputed from
///    the record's own fields, else `DigestMismatch`.
///
/// Fails at the first offending record; an empty sequence verifies
/// trivially.  Read-only and O(n) in record count.  A stored payload that no
/// longer parses as JSON surfaces as `InvalidPayload` naming the record.
pub fn verify_chain(records: &[AuditRecord]) -> AuditResult<()> {
    let mut expected = AuditRecord::GENESIS_HASH.to_string();

    for record in records {
        let candidate = compute_hash(
            &expected,
            &record.ts,
            &record.actor,
            &record.action,
            &record.payload_json,
        )
        .map_err(|e| match e {
            AuditError::InvalidPayload { reason } => AuditError::InvalidPayload {
                reason: format!("record {}: {}", record.id, reason),
            },
            other => other,
        })?;

        if record.prev_hash != expected {
            return Err(ChainIntegrityError {
                record_id: record.id,
                expected,
                found: record.prev_hash.clone(),
                kind: MismatchKind::PrevHashMismatch,
            }
            .into());
        }

        if record.this_hash != candidate {
            return Err(ChainIntegrityError {
                record_id: record.id,
                expected: candidate,
                found: record.this_hash.clone(),
                kind: MismatchKind::DigestMismatch,
            }
            .into());
        }

        expected = record.this_hash.clone();
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
