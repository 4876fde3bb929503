//! The storage seam of the WITNESS audit chain.
//!
//! `AuditStore` is the single trust boundary between the facade and
//! persistence.  Inputs arrive already canonical (the facade validates and
//! canonicalizes before any store call), so implementations own exactly
//! three things: head resolution, digest computation, and durable ordering.

use witness_contracts::error::AuditResult;
use witness_contracts::record::AuditRecord;

/// A durable, ordered, append-only record sequence.
///
/// Implementations must serialize the read-head / compute-digest / persist
/// sequence per logical chain: two concurrent appends must never both claim
/// the same `prev_hash`.  How that exclusion is achieved (an owning mutex,
/// an exclusive storage transaction, an advisory lock) is the
/// implementation's choice, but it is not optional.
pub trait AuditStore: Send + Sync {
    /// Append one record and return it with its assigned id and digests.
    ///
    /// `ts` and `payload_json` are canonical text forms.  The implementation
    /// resolves the current chain head (or `GENESIS_HASH` when empty),
    /// computes the new digest, and persists atomically: on any failure no
    /// partial record is visible and no record with a mismatched `prev_hash`
    /// is ever committed.
    fn append(
        &self,
        ts: &str,
        actor: &str,
        action: &str,
        payload_json: &str,
    ) -> AuditResult<AuditRecord>;

    /// Every record in ascending id order.
    ///
    /// Must reflect one consistent, fully-committed snapshot — never an
    /// interleaving with an in-flight append.
    fn all_records(&self) -> AuditResult<Vec<AuditRecord>>;
}
