//! Tool authorization: the capability check every tool call must pass.
//!
//! Checks run in a fixed short-circuit order (registration, tier,
//! allow-list, vote, approval) and the first failing check wins. A deny
//! is a normal, expected outcome, not an error; every branch produces an
//! audit event.

use std::sync::Arc;

use tracing::{info, warn};

use crate::audit::{AuditEvent, AuditEventBuilder};
use crate::types::{Outcome, Tier};

use super::registry::{AllowList, ToolRegistry};

/// Event id prefix for authorization events.
const TOOL_EVENT_PREFIX: &str = "TOOL";

/// Escalation references and correlation for an authorization request.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    /// Reference to a recorded council vote, if one exists.
    pub vote_ref: Option<String>,
    /// Reference to a recorded architect approval, if one exists.
    pub approval_ref: Option<String>,
    /// Originating task id for audit trail linkage.
    pub task_id: Option<String>,
}

impl AuthContext {
    /// Context carrying only a task id.
    pub fn for_task(task_id: impl Into<String>) -> Self {
        Self {
            task_id: Some(task_id.into()),
            ..Self::default()
        }
    }

    /// Attach a council vote reference.
    pub fn with_vote(mut self, vote_ref: impl Into<String>) -> Self {
        self.vote_ref = Some(vote_ref.into());
        self
    }

    /// Attach an architect approval reference.
    pub fn with_approval(mut self, approval_ref: impl Into<String>) -> Self {
        self.approval_ref = Some(approval_ref.into());
        self
    }

    fn task_id(&self) -> &str {
        self.task_id.as_deref().unwrap_or("")
    }
}

/// The terminal result of one authorization request.
#[derive(Debug, Clone)]
pub struct AuthorizationDecision {
    /// Whether the tool call may proceed.
    pub allowed: bool,
    /// The requested tool.
    pub tool_name: String,
    /// The requesting actor.
    pub actor_id: String,
    /// Machine-readable reason, present iff not allowed.
    pub denial_reason: Option<String>,
    /// Whether a council vote applies to this tool (required or satisfied).
    pub requires_vote: bool,
    /// Whether architect approval applies to this tool (required or satisfied).
    pub requires_approval: bool,
    /// The audit event describing this decision.
    pub audit_event: AuditEvent,
}

/// Evaluates authorization requests against an immutable [`ToolRegistry`].
///
/// Stateless and safe to share across tasks; the registry is read-only.
#[derive(Debug, Clone)]
pub struct ToolAuthorizer {
    registry: Arc<ToolRegistry>,
    events: AuditEventBuilder,
}

impl ToolAuthorizer {
    /// Create an authorizer over the given registry.
    pub fn new(registry: Arc<ToolRegistry>, events: AuditEventBuilder) -> Self {
        Self { registry, events }
    }

    /// Decide whether `actor_id` at `actor_tier` may invoke `tool_name`.
    ///
    /// Short-circuits on the first failing check: unregistered tool, tier,
    /// allow-list, vote requirement, approval requirement.
    pub fn authorize(
        &self,
        actor_id: &str,
        actor_tier: Tier,
        tool_name: &str,
        ctx: &AuthContext,
    ) -> AuthorizationDecision {
        let Some(spec) = self.registry.get(tool_name) else {
            return self.deny(
                actor_id,
                actor_tier,
                tool_name,
                format!("Tool '{tool_name}' is not registered in the Hegemon tool registry."),
                ctx,
            );
        };

        if !actor_tier.satisfies(spec.min_tier) {
            return self.deny(
                actor_id,
                actor_tier,
                tool_name,
                format!(
                    "Actor tier '{actor_tier}' does not meet minimum requirement \
                     '{min}' for tool '{tool_name}'.",
                    min = spec.min_tier
                ),
                ctx,
            );
        }

        if !spec.allowed_actors.permits(actor_id) {
            let authorized = match &spec.allowed_actors {
                AllowList::Only(actors) => actors.join(", "),
                AllowList::All(_) => "all".to_owned(),
            };
            return self.deny(
                actor_id,
                actor_tier,
                tool_name,
                format!(
                    "Actor '{actor_id}' is not in the authorized actor list for tool \
                     '{tool_name}'. Authorized actors: [{authorized}]"
                ),
                ctx,
            );
        }

        if spec.requires_vote && ctx.vote_ref.is_none() {
            let reason = format!(
                "Tool '{tool_name}' requires a council vote record. \
                 Provide 'vote_ref' in context."
            );
            warn!(actor = actor_id, tool = tool_name, reason = %reason, "tool denied");
            return AuthorizationDecision {
                allowed: false,
                tool_name: tool_name.to_owned(),
                actor_id: actor_id.to_owned(),
                denial_reason: Some(reason),
                requires_vote: true,
                requires_approval: spec.requires_approval,
                audit_event: self.event(
                    actor_id,
                    actor_tier,
                    tool_name,
                    Outcome::DeniedNeedsVote,
                    ctx,
                ),
            };
        }

        if spec.requires_approval && ctx.approval_ref.is_none() {
            let reason = format!(
                "Tool '{tool_name}' requires architect approval. \
                 Provide 'approval_ref' in context."
            );
            warn!(actor = actor_id, tool = tool_name, reason = %reason, "tool denied");
            return AuthorizationDecision {
                allowed: false,
                tool_name: tool_name.to_owned(),
                actor_id: actor_id.to_owned(),
                denial_reason: Some(reason),
                requires_vote: spec.requires_vote,
                requires_approval: true,
                audit_event: self.event(
                    actor_id,
                    actor_tier,
                    tool_name,
                    Outcome::DeniedNeedsArchitect,
                    ctx,
                ),
            };
        }

        info!(
            actor = actor_id,
            tool = tool_name,
            task_id = ctx.task_id(),
            "tool authorized"
        );
        AuthorizationDecision {
            allowed: true,
            tool_name: tool_name.to_owned(),
            actor_id: actor_id.to_owned(),
            denial_reason: None,
            requires_vote: spec.requires_vote,
            requires_approval: spec.requires_approval,
            audit_event: self.event(actor_id, actor_tier, tool_name, Outcome::Authorized, ctx),
        }
    }

    /// Every tool `actor_id` would pass the tier and allow-list checks for.
    ///
    /// Escalation requirements are ignored: this is an introspection query,
    /// not a gate. Results are sorted by tool name.
    pub fn list_authorized_tools(&self, actor_id: &str, actor_tier: Tier) -> Vec<String> {
        self.registry
            .iter()
            .filter(|spec| {
                actor_tier.satisfies(spec.min_tier) && spec.allowed_actors.permits(actor_id)
            })
            .map(|spec| spec.name.clone())
            .collect()
    }

    fn deny(
        &self,
        actor_id: &str,
        actor_tier: Tier,
        tool_name: &str,
        reason: String,
        ctx: &AuthContext,
    ) -> AuthorizationDecision {
        warn!(
            actor = actor_id,
            tool = tool_name,
            reason = %reason,
            task_id = ctx.task_id(),
            "tool denied"
        );
        AuthorizationDecision {
            allowed: false,
            tool_name: tool_name.to_owned(),
            actor_id: actor_id.to_owned(),
            denial_reason: Some(reason),
            requires_vote: false,
            requires_approval: false,
            audit_event: self.event(actor_id, actor_tier, tool_name, Outcome::Denied, ctx),
        }
    }

    fn event(
        &self,
        actor_id: &str,
        actor_tier: Tier,
        tool_name: &str,
        outcome: Outcome,
        ctx: &AuthContext,
    ) -> AuditEvent {
        let action = format!("TOOL_REQUEST_{}", tool_name.to_uppercase());
        let details = serde_json::json!({
            "tool_name": tool_name,
            "actor_tier": actor_tier,
            "vote_ref": ctx.vote_ref,
            "approval_ref": ctx.approval_ref,
        });
        self.events.build(
            TOOL_EVENT_PREFIX,
            actor_id,
            &action,
            outcome,
            details,
            ctx.task_id(),
        )
    }
}
