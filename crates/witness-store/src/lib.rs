//! # witness-store
//!
//! Append-only store implementations for the WITNESS audit chain.
//!
//! ## Overview
//!
//! Two implementations of `witness_core::traits::AuditStore`:
//!
//! - `SqliteStore` — durable storage on a single SQLite database.  The
//!   append sequence runs inside a `BEGIN IMMEDIATE` transaction so the
//!   chain stays linear under concurrent writers, in and across processes.
//! - `MemoryStore` — the ephemeral reference implementation, for tests and
//!   short-lived chains.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use witness_core::AuditLog;
//! use witness_store::SqliteStore;
//!
//! let store = SqliteStore::open("data/audit.db")?;
//! let log = AuditLog::new(Arc::new(store));
//! ```

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
