//! The persisted audit record type.
//!
//! `AuditRecord` is a single entry in the hash chain.  Every field except
//! `id` contributes to the record's digest (directly, or via `prev_hash`
//! linkage), so modifying any of them after persistence is detectable.

use serde::{Deserialize, Serialize};

/// One immutable entry in the audit chain.
///
/// Records are created exactly once, at append time, by the store; they are
/// never mutated afterwards.  `ts` and `payload_json` are stored in their
/// canonical text forms so the digest can be recomputed from the row alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Monotonically increasing sequence number, assigned by the store.
    /// Gapless in a chain that has never been truncated.
    pub id: i64,

    /// Canonical UTC ISO-8601 timestamp with microsecond precision,
    /// e.g. `2024-01-01T12:00:00.000000+00:00`.
    pub ts: String,

    /// Who or what caused the event.  Non-empty.
    pub actor: String,

    /// The event kind.  Non-empty.
    pub action: String,

    /// Canonical serialized payload, or the literal `null`.
    pub payload_json: String,

    /// Digest of the previous record, or `GENESIS_HASH` for the first record.
    pub prev_hash: String,

    /// SHA-256 digest (lowercase hex) over this record's bound fields.
    pub this_hash: String,
}

impl AuditRecord {
    /// The sentinel `prev_hash` for the first record of every chain.
    ///
    /// 64 hex zeros — a value that can never be the SHA-256 of real data,
    /// making genesis detection unambiguous.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}
