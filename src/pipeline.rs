//! Pipeline orchestration: inspect before any model call, authorize before
//! any tool call, forward every event to the ledger sink.
//!
//! The orchestrator is thin glue with one hard invariant: no blocked
//! inspection verdict and no denied authorization decision may reach the
//! downstream collaborators. Sink delivery is synchronous, best-effort,
//! and at most one attempt per event; a sink failure is logged and never
//! surfaced to the caller or allowed to change a decision.

use std::sync::Arc;

use tracing::warn;

use crate::audit::{AuditEvent, AuditEventBuilder, AuditSink};
use crate::guard::{InputInspector, InspectionVerdict};
use crate::policy::{AuthContext, AuthorizationDecision, ToolAuthorizer};
use crate::types::{Outcome, Tier};

/// Event id prefix for collaborator failure events.
const FAILURE_EVENT_PREFIX: &str = "ERR";

/// Result of screening one piece of input.
///
/// The cleared text is only reachable on the `Cleared` arm, so a blocked
/// verdict cannot leak its `output_text` through the pipeline surface.
#[derive(Debug, Clone)]
pub enum ScreenedInput {
    /// Input blocked: surface `message` to the caller, never the input.
    Blocked {
        /// Fixed, non-revealing block message.
        message: String,
        /// Full verdict, for callers that need the audit trail.
        verdict: InspectionVerdict,
    },
    /// Input cleared: `text` is the sanitized and/or wrapped content to
    /// forward to the model collaborator.
    Cleared {
        /// The only text that may reach the model.
        text: String,
        /// Full verdict, for callers that need warnings or the audit trail.
        verdict: InspectionVerdict,
    },
}

impl ScreenedInput {
    /// Whether the input was blocked.
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// Sequences the two security stages and emits their audit events.
pub struct Gate {
    inspector: InputInspector,
    authorizer: ToolAuthorizer,
    sink: Arc<dyn AuditSink>,
    events: AuditEventBuilder,
}

impl Gate {
    /// Assemble a gate from its stages and the ledger sink.
    pub fn new(
        inspector: InputInspector,
        authorizer: ToolAuthorizer,
        sink: Arc<dyn AuditSink>,
        events: AuditEventBuilder,
    ) -> Self {
        Self {
            inspector,
            authorizer,
            sink,
            events,
        }
    }

    /// Screen raw input before a model invocation.
    ///
    /// Emits the inspection audit event to the sink, then returns either
    /// the block message or the cleared text.
    pub async fn screen_input(&self, text: &str, origin: &str, task_id: &str) -> ScreenedInput {
        let verdict = self.inspector.inspect(text, origin, task_id);
        self.emit(&verdict.audit_event).await;

        if verdict.blocked {
            let message = verdict
                .block_message
                .clone()
                .unwrap_or_else(|| "This request was blocked. Event logged.".to_owned());
            ScreenedInput::Blocked { message, verdict }
        } else {
            ScreenedInput::Cleared {
                text: verdict.output_text.clone(),
                verdict,
            }
        }
    }

    /// Authorize a tool call before execution.
    ///
    /// Emits the authorization audit event to the sink. Callers must check
    /// `allowed` before proceeding; the decision is otherwise terminal.
    pub async fn clear_tool(
        &self,
        actor_id: &str,
        actor_tier: Tier,
        tool_name: &str,
        ctx: &AuthContext,
    ) -> AuthorizationDecision {
        let decision = self.authorizer.authorize(actor_id, actor_tier, tool_name, ctx);
        self.emit(&decision.audit_event).await;
        decision
    }

    /// Record a collaborator failure (model call, tool execution) on the
    /// audit trail without affecting any decision.
    pub async fn record_failure(&self, actor: &str, action: &str, error: &str, task_id: &str) {
        let event = self.events.build(
            FAILURE_EVENT_PREFIX,
            actor,
            action,
            Outcome::Failure,
            serde_json::json!({ "error": error }),
            task_id,
        );
        self.emit(&event).await;
    }

    /// One best-effort delivery attempt; failures are warnings, never errors.
    async fn emit(&self, event: &AuditEvent) {
        if let Err(error) = self.sink.deliver(event).await {
            warn!(event_id = %event.event_id, %error, "audit sink unreachable");
        }
    }
}
