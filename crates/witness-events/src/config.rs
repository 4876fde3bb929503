//! Configuration for services writing events to the audit chain.
//!
//! Loaded from a TOML document, with environment-variable resolution for
//! deployments that configure through the process environment instead.
//! Configuration failures stay out of the audit error taxonomy — a missing
//! config file is an operator problem, not a chain problem.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming the audit database path.
pub const DB_PATH_ENV: &str = "WITNESS_DB_PATH";

/// Environment variable naming the event source label.
pub const EVENT_SOURCE_ENV: &str = "WITNESS_EVENT_SOURCE";

/// A configuration document could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("failed to parse config TOML: {reason}")]
    Malformed { reason: String },
}

/// Settings for an event-producing service.
///
/// Example:
/// ```toml
/// database = "data/audit.db"
/// source = "gateway"
/// actor = "gateway"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct EventsConfig {
    /// Path to the SQLite database holding the audit chain.
    pub database: PathBuf,

    /// Value merged into event metadata as `source`.
    #[serde(default = "default_source")]
    pub source: String,

    /// Actor recorded for events that carry no principal of their own.
    #[serde(default = "default_actor")]
    pub actor: String,
}

fn default_source() -> String {
    "auth-service".to_string()
}

fn default_actor() -> String {
    "gateway".to_string()
}

impl EventsConfig {
    /// Parse `s` as a TOML configuration document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Malformed {
            reason: e.to_string(),
        })
    }

    /// Read the file at `path` and parse it as TOML configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Resolve configuration from the process environment, falling back to
    /// defaults (`data/audit.db`, the default source and actor).
    pub fn from_env() -> Self {
        let database = std::env::var(DB_PATH_ENV)
            .unwrap_or_else(|_| "data/audit.db".to_string())
            .into();
        let source = std::env::var(EVENT_SOURCE_ENV).unwrap_or_else(|_| default_source());

        Self {
            database,
            source,
            actor: default_actor(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
