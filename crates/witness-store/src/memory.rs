//! In-memory implementation of `AuditStore`.
//!
//! `MemoryStore` is the reference implementation: a `Vec` of records plus the
//! cached head digest behind a `Mutex`.  The mutex covers the whole
//! read-head / compute / push sequence, so appends are serialized and the
//! chain cannot fork.  Useful for tests and for collaborators that need an
//! ephemeral chain.

use std::sync::{Arc, Mutex};

use witness_chain::chain::compute_hash;
use witness_contracts::error::{AuditError, AuditResult};
use witness_contracts::record::AuditRecord;
use witness_core::traits::AuditStore;

/// The mutable interior of a `MemoryStore`.
pub(crate) struct MemoryState {
    /// All records written so far, in append order.
    pub(crate) records: Vec<AuditRecord>,

    /// The `this_hash` of the last record, or `GENESIS_HASH` before any
    /// record has been written.
    pub(crate) last_hash: String,
}

/// An in-memory, append-only audit store.
///
/// Cheap to clone; clones share state and may be used from multiple threads.
#[derive(Clone)]
pub struct MemoryStore {
    pub(crate) state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store whose head is the genesis sentinel.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                records: Vec::new(),
                last_hash: AuditRecord::GENESIS_HASH.to_string(),
            })),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditStore for MemoryStore {
    /// Append one record under the state lock.
    ///
    /// Ids are assigned gapless from 1.  Fails only if the lock is poisoned
    /// or the payload text cannot be canonicalized.
    fn append(
        &self,
        ts: &str,
        actor: &str,
        action: &str,
        payload_json: &str,
    ) -> AuditResult<AuditRecord> {
        let mut state = self.state.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("audit state lock poisoned: {e}"),
        })?;

        let prev_hash = state.last_hash.clone();
        let this_hash = compute_hash(&prev_hash, ts, actor, action, payload_json)?;

        let record = AuditRecord {
            id: state.records.len() as i64 + 1,
            ts: ts.to_string(),
            actor: actor.to_string(),
            action: action.to_string(),
            payload_json: payload_json.to_string(),
            prev_hash,
            this_hash: this_hash.clone(),
        };

        state.records.push(record.clone());
        state.last_hash = this_hash;

        Ok(record)
    }

    fn all_records(&self) -> AuditResult<Vec<AuditRecord>> {
        let state = self.state.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("audit state lock poisoned: {e}"),
        })?;
        Ok(state.records.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
