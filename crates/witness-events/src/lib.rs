//! # witness-events
//!
//! Domain event helpers for the WITNESS audit chain.
//!
//! `AuthEventLogger` is the bridge between authentication flows and the
//! chain: it shapes login/logout/access-denied activity into stable payloads
//! and appends them through the `AuditLog` facade.  `EventsConfig` carries
//! the settings an event-producing service needs (database path, source
//! label), loaded from TOML or the environment.

pub mod auth;
pub mod config;

pub use auth::{AuthEvent, AuthEventKind, AuthEventLogger};
pub use config::{ConfigError, EventsConfig};
