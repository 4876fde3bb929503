//! # witness-chain
//!
//! Canonicalization, chain hashing, and integrity verification for the
//! WITNESS audit chain.
//!
//! ## Overview
//!
//! Every audit record is bound to its predecessor by a SHA-256 digest over a
//! canonical serialization of its fields.  Tampering with any stored field —
//! even a single byte — breaks the chain and is detected by `verify_chain`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use witness_chain::{compute_hash, verify_chain};
//! use witness_contracts::AuditRecord;
//!
//! let hash = compute_hash(AuditRecord::GENESIS_HASH, ts, "svc", "create", payload)?;
//! verify_chain(&records)?;
//! ```

pub mod canonical;
pub mod chain;

pub use canonical::{
    canonical_json, canonical_payload, canonical_payload_text, canonical_timestamp,
    parse_timestamp,
};
pub use chain::{compute_hash, verify_chain};
