//! Audit event construction for the external ledger.
//!
//! Both pipeline stages hand every decision to this module as a structured
//! event. Construction is deterministic: given identical actor, action, and
//! detail content, the event id is stable, so the ledger sink can dedupe
//! redelivered events. Only the timestamp varies, and it comes from an
//! injected [`Clock`] so tests can freeze it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::types::Outcome;

pub mod sink;

pub use sink::{AuditSink, NullSink, SinkError, WebhookSink};

/// Hex length of the content fingerprint embedded in event ids.
const FINGERPRINT_LEN: usize = 16;

/// A structured record of a security-relevant decision.
///
/// Constructed synchronously inside the deciding stage and handed to the
/// external sink; never persisted or retried by the pipeline itself.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Deterministic identifier: `{prefix}-{actor}-{fingerprint}`.
    pub event_id: String,
    /// The agent the decision was made for.
    pub actor: String,
    /// What was evaluated, e.g. `INJECTION_SCAN` or `TOOL_REQUEST_WEB_SEARCH`.
    pub action: String,
    /// Decision outcome.
    pub outcome: Outcome,
    /// Decision-specific key-value payload.
    pub details: serde_json::Value,
    /// Correlation key linking the event to an originating task; may be empty.
    pub task_id: String,
    /// UTC time of construction.
    pub timestamp: DateTime<Utc>,
}

/// Source of the current time for event construction.
pub trait Clock: Send + Sync {
    /// The current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a fixed instant, for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(
    /// The frozen instant.
    pub DateTime<Utc>,
);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Builds [`AuditEvent`]s with stable ids and an injected clock.
#[derive(Clone)]
pub struct AuditEventBuilder {
    clock: std::sync::Arc<dyn Clock>,
}

impl std::fmt::Debug for AuditEventBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditEventBuilder").finish_non_exhaustive()
    }
}

impl Default for AuditEventBuilder {
    fn default() -> Self {
        Self::new(std::sync::Arc::new(SystemClock))
    }
}

impl AuditEventBuilder {
    /// Create a builder using the given clock.
    pub fn new(clock: std::sync::Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Build an event.
    ///
    /// The id is `{prefix}-{actor}-{fp}` where `fp` is the first 16 hex
    /// characters of SHA-256 over actor, action, and the serialized
    /// details, so identical decisions produce identical ids.
    pub fn build(
        &self,
        prefix: &str,
        actor: &str,
        action: &str,
        outcome: Outcome,
        details: serde_json::Value,
        task_id: &str,
    ) -> AuditEvent {
        let fingerprint = fingerprint(actor, action, &details);
        AuditEvent {
            event_id: format!("{prefix}-{actor}-{fingerprint}"),
            actor: actor.to_owned(),
            action: action.to_owned(),
            outcome,
            details,
            task_id: task_id.to_owned(),
            timestamp: self.clock.now(),
        }
    }
}

/// Content fingerprint over (actor, action, details).
fn fingerprint(actor: &str, action: &str, details: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(actor.as_bytes());
    hasher.update(b"\n");
    hasher.update(action.as_bytes());
    hasher.update(b"\n");
    hasher.update(details.to_string().as_bytes());
    let digest = hasher.finalize();
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex.chars().take(FINGERPRINT_LEN).collect()
}
