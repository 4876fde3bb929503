//! High-level helpers for recording authentication events.
//!
//! `AuthEventLogger` turns login/logout/access-denied activity into audit
//! records with a stable camelCase payload shape, so every service writing
//! auth events to the chain produces the same wire form.  Metadata supplied
//! by the caller is preserved; the logger only fills in keys the caller left
//! out (`source`, and `route`/`failureReason` where applicable).

use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use witness_chain::canonical::canonical_timestamp;
use witness_contracts::error::{AuditError, AuditResult};
use witness_contracts::payload::Payload;
use witness_contracts::record::AuditRecord;
use witness_core::facade::AuditLog;

/// The authentication event kinds the audit chain records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthEventKind {
    LoginSuccess,
    LoginFailure,
    Logout,
    AccessDenied,
}

impl AuthEventKind {
    /// The `action` string recorded on the chain for this kind.
    pub fn action(self) -> &'static str {
        match self {
            AuthEventKind::LoginSuccess => "LOGIN_SUCCESS",
            AuthEventKind::LoginFailure => "LOGIN_FAILURE",
            AuthEventKind::Logout => "LOGOUT",
            AuthEventKind::AccessDenied => "ACCESS_DENIED",
        }
    }
}

/// Caller-supplied description of the principal and request context.
#[derive(Debug, Clone, Default)]
pub struct AuthEvent {
    /// The principal the event is about.  Empty means unauthenticated; the
    /// record's actor then falls back to `"anonymous"`.
    pub user_id: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// Free-form context.  Keys the caller sets here are never overwritten.
    pub metadata: Map<String, Value>,
    /// When the event occurred.  Defaults to now (UTC) when omitted.
    pub occurred_at: Option<DateTime<FixedOffset>>,
}

/// The wire shape persisted as the record payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthEventPayload<'a> {
    event_type: AuthEventKind,
    user_id: &'a str,
    email: Option<&'a str>,
    roles: &'a [String],
    ip: Option<&'a str>,
    user_agent: Option<&'a str>,
    metadata: &'a Map<String, Value>,
    timestamp: String,
}

/// Appends authentication events to an `AuditLog`.
pub struct AuthEventLogger {
    log: AuditLog,
    source: String,
}

impl AuthEventLogger {
    /// Create a logger stamping events with the default `auth-service` source.
    pub fn new(log: AuditLog) -> Self {
        Self::with_source(log, "auth-service")
    }

    /// Create a logger stamping events with a custom `source`.
    pub fn with_source(log: AuditLog, source: impl Into<String>) -> Self {
        Self {
            log,
            source: source.into(),
        }
    }

    /// Record a successful login.
    pub fn login_success(&self, event: &AuthEvent) -> AuditResult<AuditRecord> {
        self.record(
            AuthEventKind::LoginSuccess,
            event,
            &event.roles,
            event.email.as_deref(),
            &[],
        )
    }

    /// Record a failed login attempt.
    ///
    /// The payload's `roles` are always empty — a failed login grants no
    /// role context — and `failureReason` is merged into the metadata unless
    /// the caller already set one.
    pub fn login_failure(&self, event: &AuthEvent, failure_reason: &str) -> AuditResult<AuditRecord> {
        self.record(
            AuthEventKind::LoginFailure,
            event,
            &[],
            event.email.as_deref(),
            &[("failureReason", Value::String(failure_reason.to_string()))],
        )
    }

    /// Record a logout.
    pub fn logout(&self, event: &AuthEvent) -> AuditResult<AuditRecord> {
        self.record(
            AuthEventKind::Logout,
            event,
            &event.roles,
            event.email.as_deref(),
            &[],
        )
    }

    /// Record a denied access attempt against `route`.
    pub fn access_denied(&self, event: &AuthEvent, route: &str) -> AuditResult<AuditRecord> {
        self.record(
            AuthEventKind::AccessDenied,
            event,
            &event.roles,
            None,
            &[("route", Value::String(route.to_string()))],
        )
    }

    fn record(
        &self,
        kind: AuthEventKind,
        event: &AuthEvent,
        roles: &[String],
        email: Option<&str>,
        defaults: &[(&str, Value)],
    ) -> AuditResult<AuditRecord> {
        let occurred_at = event.occurred_at.unwrap_or_else(|| Utc::now().fixed_offset());
        let timestamp = canonical_timestamp(&occurred_at);

        let mut metadata = event.metadata.clone();
        for (key, value) in defaults {
            metadata
                .entry((*key).to_string())
                .or_insert_with(|| value.clone());
        }
        metadata
            .entry("source".to_string())
            .or_insert_with(|| Value::String(self.source.clone()));

        let payload = AuthEventPayload {
            event_type: kind,
            user_id: &event.user_id,
            email,
            roles,
            ip: event.ip_address.as_deref(),
            user_agent: event.user_agent.as_deref(),
            metadata: &metadata,
            timestamp,
        };
        let value = serde_json::to_value(&payload).map_err(|e| AuditError::InvalidPayload {
            reason: format!("auth event payload failed to serialize: {e}"),
        })?;

        let actor = if event.user_id.is_empty() {
            "anonymous"
        } else {
            event.user_id.as_str()
        };

        debug!(action = kind.action(), actor = %actor, "recording auth event");

        self.log
            .append(actor, kind.action(), Payload::from(value), Some(occurred_at))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
