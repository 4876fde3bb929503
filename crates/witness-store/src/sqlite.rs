//! SQLite-backed append-only store.
//!
//! The append path runs the entire read-head / compute-digest / insert
//! sequence inside one `BEGIN IMMEDIATE` transaction: the immediate write
//! lock serializes appenders across processes, and a process-local mutex
//! serializes them within this process.  Two concurrent appends can
//! therefore never both claim the same chain head.
//!
//! File-backed stores read on a dedicated connection.  Under WAL a SELECT
//! sees one committed snapshot and never waits behind an in-flight append,
//! so verification can run concurrently with writers.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use tracing::debug;

use witness_chain::chain::compute_hash;
use witness_contracts::error::{AuditError, AuditResult};
use witness_contracts::record::AuditRecord;
use witness_core::traits::AuditStore;

/// Schema SQL embedded at compile time.
const SCHEMA_SQL: &str = include_str!("schema.sql");

/// A durable audit store on a single SQLite database.
///
/// Cheap to clone; clones share the underlying connections and may be used
/// from multiple threads.
#[derive(Clone)]
pub struct SqliteStore {
    writer: Arc<Mutex<Connection>>,
    reader: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the audit database at `path`.
    ///
    /// Applies the schema and opens a second connection dedicated to reads.
    pub fn open(path: impl AsRef<Path>) -> AuditResult<Self> {
        let path = path.as_ref();
        let writer = Self::connect(|| Connection::open(path))?;
        let reader = Self::connect(|| Connection::open(path))?;

        Ok(Self {
            writer: Arc::new(Mutex::new(writer)),
            reader: Arc::new(Mutex::new(reader)),
        })
    }

    /// Create an in-memory store.
    ///
    /// A test convenience: the single connection is shared by the read and
    /// write paths, since an in-memory database dies with its connection.
    pub fn in_memory() -> AuditResult<Self> {
        let conn = Self::connect(Connection::open_in_memory)?;
        let shared = Arc::new(Mutex::new(conn));

        Ok(Self {
            writer: shared.clone(),
            reader: shared,
        })
    }

    fn connect(open: impl FnOnce() -> rusqlite::Result<Connection>) -> AuditResult<Connection> {
        let conn = open().map_err(storage_error)?;
        // Idempotent: applies the table if missing and the per-connection
        // pragmas either way.
        conn.execute_batch(SCHEMA_SQL).map_err(storage_error)?;
        Ok(conn)
    }
}

impl AuditStore for SqliteStore {
    /// Append one record.
    ///
    /// The head read, digest computation, and insert all happen inside a
    /// single immediate transaction; on any failure the transaction rolls
    /// back and no partial record is visible.
    fn append(
        &self,
        ts: &str,
        actor: &str,
        action: &str,
        payload_json: &str,
    ) -> AuditResult<AuditRecord> {
        let mut conn = self.writer.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("store lock poisoned: {e}"),
        })?;

        // BEGIN IMMEDIATE takes the database write lock up front, so the head
        // read below cannot race an append from another process.
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(storage_error)?;

        let head: Option<String> = tx
            .query_row(
                "SELECT this_hash FROM audit_log ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(storage_error)?;
        let prev_hash = head.unwrap_or_else(|| AuditRecord::GENESIS_HASH.to_string());

        let this_hash = compute_hash(&prev_hash, ts, actor, action, payload_json)?;

        tx.execute(
            "INSERT INTO audit_log (ts, actor, action, payload_json, prev_hash, this_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![ts, actor, action, payload_json, prev_hash, this_hash],
        )
        .map_err(storage_error)?;
        let id = tx.last_insert_rowid();

        tx.commit().map_err(storage_error)?;

        debug!(record_id = id, actor = %actor, action = %action, "audit record persisted");

        Ok(AuditRecord {
            id,
            ts: ts.to_string(),
            actor: actor.to_string(),
            action: action.to_string(),
            payload_json: payload_json.to_string(),
            prev_hash,
            this_hash,
        })
    }

    /// Every record in ascending id order, from one committed snapshot.
    fn all_records(&self) -> AuditResult<Vec<AuditRecord>> {
        let conn = self.reader.lock().map_err(|e| AuditError::StoreUnavailable {
            reason: format!("store lock poisoned: {e}"),
        })?;

        let mut stmt = conn
            .prepare(
                "SELECT id, ts, actor, action, payload_json, prev_hash, this_hash
                 FROM audit_log ORDER BY id ASC",
            )
            .map_err(storage_error)?;

        let records = stmt
            .query_map([], |row| {
                Ok(AuditRecord {
                    id: row.get(0)?,
                    ts: row.get(1)?,
                    actor: row.get(2)?,
                    action: row.get(3)?,
                    payload_json: row.get(4)?,
                    prev_hash: row.get(5)?,
                    this_hash: row.get(6)?,
                })
            })
            .map_err(storage_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(storage_error)?;

        Ok(records)
    }
}

fn storage_error(e: rusqlite::Error) -> AuditError {
    AuditError::StoreUnavailable {
        reason: e.to_string(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use serde_json::json;

    use witness_chain::canonical::parse_timestamp;
    use witness_contracts::error::{AuditError, MismatchKind};
    use witness_contracts::payload::Payload;
    use witness_contracts::record::AuditRecord;
    use witness_core::facade::AuditLog;

    use super::SqliteStore;

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn make_log() -> (AuditLog, SqliteStore) {
        let store = SqliteStore::in_memory().unwrap();
        (AuditLog::new(Arc::new(store.clone())), store)
    }

    /// Run a raw SQL statement against the store, bypassing the facade —
    /// simulating out-of-band tampering with the database file.
    fn tamper(store: &SqliteStore, sql: &str) {
        store.writer.lock().unwrap().execute(sql, []).unwrap();
    }

    // ── Append and verify ─────────────────────────────────────────────────────

    /// Appending through the facade produces a verifiable chain with genesis
    /// linkage and correct prev/this hand-off.
    #[test]
    fn append_and_verify() {
        let (log, _) = make_log();

        let first = log
            .append("svc", "create", Payload::from(json!({ "amount": 10 })), None)
            .unwrap();
        let second = log
            .append("svc", "update", Payload::pre_encoded(r#"{"status":"ok"}"#), None)
            .unwrap();
        let third = log.append("svc", "heartbeat", Payload::Null, None).unwrap();

        assert_eq!(first.prev_hash, AuditRecord::GENESIS_HASH);
        assert_eq!(second.prev_hash, first.this_hash);
        assert_eq!(third.prev_hash, second.this_hash);
        assert_eq!(third.payload_json, "null");

        log.verify().unwrap();
    }

    /// Ids are assigned in strictly ascending order with no gaps.
    #[test]
    fn ids_are_gapless_and_ascending() {
        let (log, _) = make_log();
        for i in 0..5 {
            log.append("svc", "tick", Payload::from(json!({ "n": i })), None)
                .unwrap();
        }

        let ids: Vec<i64> = log.all_records().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    // ── Tamper detection ──────────────────────────────────────────────────────

    /// Corrupting a stored prev_hash is detected at that record as a linkage
    /// failure.
    #[test]
    fn tampered_prev_hash_is_detected() {
        let (log, store) = make_log();
        log.append("user", "create", Payload::from(json!({ "amount": 10 })), None)
            .unwrap();
        log.append("user", "update", Payload::from(json!({ "amount": 20 })), None)
            .unwrap();
        log.append("user", "close", Payload::from(json!({ "amount": 30 })), None)
            .unwrap();

        tamper(&store, "UPDATE audit_log SET prev_hash = 'corrupt' WHERE id = 2");

        match log.verify() {
            Err(AuditError::ChainIntegrity(e)) => {
                assert_eq!(e.record_id, 2);
                assert_eq!(e.kind, MismatchKind::PrevHashMismatch);
            }
            other => panic!("expected ChainIntegrity, got {:?}", other),
        }
    }

    /// Corrupting a stored payload (hashes untouched) is detected at that
    /// record as a digest failure.
    #[test]
    fn tampered_payload_is_detected() {
        let (log, store) = make_log();
        log.append("user", "create", Payload::from(json!({ "amount": 10 })), None)
            .unwrap();
        log.append("user", "update", Payload::from(json!({ "amount": 20 })), None)
            .unwrap();
        log.append("user", "close", Payload::from(json!({ "amount": 30 })), None)
            .unwrap();

        tamper(
            &store,
            r#"UPDATE audit_log SET payload_json = '{"amount":999}' WHERE id = 3"#,
        );

        match log.verify() {
            Err(AuditError::ChainIntegrity(e)) => {
                assert_eq!(e.record_id, 3);
                assert_eq!(e.kind, MismatchKind::DigestMismatch);
            }
            other => panic!("expected ChainIntegrity, got {:?}", other),
        }
    }

    #[test]
    fn tampered_action_is_detected() {
        let (log, store) = make_log();
        log.append("user", "create", Payload::Null, None).unwrap();
        log.append("user", "update", Payload::Null, None).unwrap();

        tamper(&store, "UPDATE audit_log SET action = 'tampered' WHERE id = 2");

        match log.verify() {
            Err(AuditError::ChainIntegrity(e)) => {
                assert_eq!(e.record_id, 2);
                assert_eq!(e.kind, MismatchKind::DigestMismatch);
            }
            other => panic!("expected ChainIntegrity, got {:?}", other),
        }
    }

    // ── Input rejection leaves the store untouched ────────────────────────────

    /// A rejected timestamp never creates a partial record: the text fails to
    /// parse, no append happens, and the prior chain still verifies.
    #[test]
    fn rejected_naive_timestamp_leaves_store_unchanged() {
        let (log, _) = make_log();
        log.append("svc", "create", Payload::Null, None).unwrap();
        let before = log.all_records().unwrap().len();

        // The CLI / ingestion path: parse first, append only on success.
        let result = parse_timestamp("2024-01-01T12:00:00")
            .and_then(|ts| log.append("svc", "create", Payload::Null, Some(ts)));

        assert!(matches!(result, Err(AuditError::NaiveTimestamp { .. })));
        assert_eq!(log.all_records().unwrap().len(), before);
        log.verify().unwrap();
    }

    /// An invalid payload is rejected by the facade before the store call.
    #[test]
    fn rejected_payload_leaves_store_unchanged() {
        let (log, _) = make_log();
        let result = log.append("svc", "create", Payload::pre_encoded("not-json"), None);

        assert!(matches!(result, Err(AuditError::InvalidPayload { .. })));
        assert!(log.all_records().unwrap().is_empty());
    }

    // ── Concurrency ───────────────────────────────────────────────────────────

    /// N appends from C concurrent callers yield a linear chain of exactly
    /// N×C records: no forked or duplicated prev_hash, and verification
    /// succeeds.
    #[test]
    fn concurrent_appends_stay_linear() {
        const WRITERS: usize = 4;
        const APPENDS_PER_WRITER: usize = 5;

        let (log, _) = make_log();

        let handles: Vec<_> = (0..WRITERS)
            .map(|w| {
                let log = log.clone();
                thread::spawn(move || {
                    for i in 0..APPENDS_PER_WRITER {
                        log.append(
                            &format!("writer-{w}"),
                            "tick",
                            Payload::from(json!({ "n": i })),
                            None,
                        )
                        .unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let records = log.all_records().unwrap();
        assert_eq!(records.len(), WRITERS * APPENDS_PER_WRITER);

        // Every prev_hash is distinct — a duplicate would mean two appends
        // both claimed the same head.
        let prev_hashes: std::collections::HashSet<&str> =
            records.iter().map(|r| r.prev_hash.as_str()).collect();
        assert_eq!(prev_hashes.len(), records.len());

        log.verify().unwrap();
    }

    // ── Durability ────────────────────────────────────────────────────────────

    /// Records survive a close/reopen cycle, and a fresh handle appends onto
    /// the persisted head.
    #[test]
    fn reopen_preserves_chain() {
        let path = std::env::temp_dir().join(format!("witness-reopen-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let head = {
            let store = SqliteStore::open(&path).unwrap();
            let log = AuditLog::new(Arc::new(store));
            log.append("svc", "create", Payload::from(json!({ "amount": 10 })), None)
                .unwrap();
            log.append("svc", "update", Payload::from(json!({ "amount": 20 })), None)
                .unwrap()
                .this_hash
        };

        let store = SqliteStore::open(&path).unwrap();
        let log = AuditLog::new(Arc::new(store));
        log.verify().unwrap();

        let third = log.append("svc", "close", Payload::Null, None).unwrap();
        assert_eq!(third.id, 3);
        assert_eq!(third.prev_hash, head);
        log.verify().unwrap();

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(path.with_extension(format!("db{suffix}")));
        }
    }
}
