//! # witness-core
//!
//! The storage seam and facade of the WITNESS audit chain.
//!
//! This crate provides:
//! - The `AuditStore` trait (durable, ordered, append-only persistence)
//! - The `AuditLog` facade that collaborators call to append and verify
//!
//! ## Usage
//!
//! ```rust,ignore
//! use witness_core::{AuditLog, traits::AuditStore};
//! ```

pub mod facade;
pub mod traits;

pub use facade::AuditLog;
