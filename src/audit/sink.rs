//! Best-effort delivery of audit events to the external ledger.
//!
//! The pipeline makes at most one delivery attempt per event, with a short
//! bounded timeout. A slow or unreachable sink never blocks or alters a
//! security decision; retry, if any, is the sink owner's responsibility.

use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

use super::AuditEvent;

/// Delivery failure reported by a sink.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The HTTP client could not be constructed (TLS or resolver init).
    #[error("failed to build audit sink client: {0}")]
    Build(reqwest::Error),

    /// Network-level failure or timeout.
    #[error("audit sink transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The sink answered with a non-2xx status.
    #[error("audit sink rejected event with status {0}")]
    Status(u16),
}

/// A channel that accepts audit events for the external ledger.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Deliver one event. Called at most once per event.
    async fn deliver(&self, event: &AuditEvent) -> Result<(), SinkError>;
}

/// Sink that discards every event, used when no ledger webhook is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl AuditSink for NullSink {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), SinkError> {
        trace!(event_id = %event.event_id, "audit sink disabled, event dropped");
        Ok(())
    }
}

/// HTTP POST sink for the ledger webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink posting to `url` with the given request timeout.
    ///
    /// The timeout bounds every delivery attempt; a sink without one could
    /// stall the pipeline on a hung ledger endpoint.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SinkError::Build)?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl AuditSink for WebhookSink {
    async fn deliver(&self, event: &AuditEvent) -> Result<(), SinkError> {
        let response = self.client.post(&self.url).json(event).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Status(status.as_u16()));
        }
        trace!(event_id = %event.event_id, "audit event delivered");
        Ok(())
    }
}
