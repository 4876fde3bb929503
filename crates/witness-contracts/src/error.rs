//! Error taxonomy for the WITNESS audit chain.
//!
//! All fallible operations return `AuditResult<T>`.  The variants keep the
//! failure classes programmatically distinguishable: input validation
//! (`NaiveTimestamp`, `InvalidPayload`, `EmptyField`) never reaches storage,
//! storage faults (`StoreUnavailable`) are retryable by the caller, and
//! integrity violations (`ChainIntegrity`) are only ever produced by
//! verification — never auto-corrected.

use thiserror::Error;

/// Which chain invariant a record violated during verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchKind {
    /// The record's `prev_hash` does not equal the digest of its predecessor.
    PrevHashMismatch,
    /// The record's `this_hash` does not equal the digest recomputed from its
    /// own fields.
    DigestMismatch,
}

impl std::fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MismatchKind::PrevHashMismatch => f.write_str("prev_hash mismatch"),
            MismatchKind::DigestMismatch => f.write_str("digest mismatch"),
        }
    }
}

/// A verification failure pinned to a single record.
///
/// `expected` and `found` carry the two digests that disagreed: for
/// `PrevHashMismatch` the expected chain head versus the stored `prev_hash`,
/// for `DigestMismatch` the recomputed digest versus the stored `this_hash`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {record_id}: {kind} (expected {expected}, found {found})")]
pub struct ChainIntegrityError {
    /// Id of the offending record.
    pub record_id: i64,
    /// The digest verification expected at this position.
    pub expected: String,
    /// The digest actually stored.
    pub found: String,
    /// Whether the linkage or the record's own digest was wrong.
    pub kind: MismatchKind,
}

/// The unified error type for the WITNESS audit chain.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The caller supplied a timestamp without time-zone information.
    /// Rejected before any hashing or persistence — a zone is never guessed.
    #[error("timestamp must be timezone-aware: '{value}'")]
    NaiveTimestamp { value: String },

    /// The payload cannot be canonicalized (e.g. textual payload that is not
    /// valid JSON).  Rejected before persistence.
    #[error("payload cannot be canonicalized: {reason}")]
    InvalidPayload { reason: String },

    /// A required free-form field (`actor` or `action`) was empty.
    #[error("{field} must be a non-empty string")]
    EmptyField { field: &'static str },

    /// The underlying store could not complete a read or write.  The caller
    /// may retry; no partial record is visible after this error.
    #[error("audit store unavailable: {reason}")]
    StoreUnavailable { reason: String },

    /// Full-chain verification detected a tampered record.
    #[error("chain integrity violation: {0}")]
    ChainIntegrity(#[from] ChainIntegrityError),
}

/// Convenience alias used throughout the WITNESS crates.
pub type AuditResult<T> = Result<T, AuditError>;
