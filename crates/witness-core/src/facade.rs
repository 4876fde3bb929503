//! The audit log facade: the sole entry point for collaborators.
//!
//! `AuditLog` owns the input boundary.  Malformed caller input (an empty
//! actor or action, a payload that cannot be canonicalized) is rejected here,
//! synchronously, and never reaches the store.  Storage failures propagate
//! unchanged, and integrity failures are only observable through an explicit
//! `verify()` — there is no repair operation.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Utc};
use tracing::{debug, info};

use witness_chain::canonical::{canonical_payload, canonical_timestamp};
use witness_chain::chain::verify_chain;
use witness_contracts::error::{AuditError, AuditResult};
use witness_contracts::payload::Payload;
use witness_contracts::record::AuditRecord;

use crate::traits::AuditStore;

/// The single entry point used by collaborators to append records and to
/// request full-chain verification.
///
/// Cheap to clone; clones share the underlying store.  The serialization of
/// concurrent appends lives in the store implementation — the facade's job
/// is to ensure only validated, canonical data ever gets there.
#[derive(Clone)]
pub struct AuditLog {
    store: Arc<dyn AuditStore>,
}

impl AuditLog {
    /// Create a facade over the given store.
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append one record to the chain.
    ///
    /// `ts` defaults to the current time in UTC when omitted.  The actor and
    /// action must be non-empty, and the payload must canonicalize; failing
    /// either check rejects the call before the store is touched, so the
    /// stored chain is unchanged.
    pub fn append(
        &self,
        actor: &str,
        action: &str,
        payload: Payload,
        ts: Option<DateTime<FixedOffset>>,
    ) -> AuditResult<AuditRecord> {
        if actor.is_empty() {
            return Err(AuditError::EmptyField { field: "actor" });
        }
        if action.is_empty() {
            return Err(AuditError::EmptyField { field: "action" });
        }

        let ts = ts.unwrap_or_else(|| Utc::now().fixed_offset());
        let canonical_ts = canonical_timestamp(&ts);
        let payload_json = canonical_payload(&payload)?;

        let record = self.store.append(&canonical_ts, actor, action, &payload_json)?;

        debug!(
            record_id = record.id,
            actor = %record.actor,
            action = %record.action,
            "audit record appended"
        );

        Ok(record)
    }

    /// Verify the integrity of the entire stored chain.
    ///
    /// Reads one consistent snapshot and replays the digest computation over
    /// it.  A failure pins the offending record; the chain is never
    /// modified — a broken chain is an operational incident, not something
    /// the log repairs.
    pub fn verify(&self) -> AuditResult<()> {
        let records = self.store.all_records()?;
        verify_chain(&records)?;

        info!(record_count = records.len(), "audit chain verified");
        Ok(())
    }

    /// Every record in ascending id order, for collaborators that project
    /// the chain (listings, exports) without validating integrity.
    pub fn all_records(&self) -> AuditResult<Vec<AuditRecord>> {
        self.store.all_records()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
