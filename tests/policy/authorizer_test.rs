//! Authorization decisions against the built-in capability matrix.

use std::sync::Arc;

use hegemon_gate::audit::AuditEventBuilder;
use hegemon_gate::policy::{AuthContext, ToolAuthorizer, ToolRegistry};
use hegemon_gate::types::{Outcome, Tier};

fn authorizer() -> ToolAuthorizer {
    ToolAuthorizer::new(
        Arc::new(ToolRegistry::builtin()),
        AuditEventBuilder::default(),
    )
}

// ---------- short-circuit order ----------

#[test]
fn unregistered_tool_denied_regardless_of_tier() {
    let auth = authorizer();
    for tier in [Tier::Worker, Tier::Subagent, Tier::Gov, Tier::Council] {
        let decision = auth.authorize("BRM-CTO", tier, "warp_drive", &AuthContext::default());
        assert!(!decision.allowed);
        assert!(decision
            .denial_reason
            .as_deref()
            .is_some_and(|r| r.contains("not registered")));
    }
}

#[test]
fn worker_denied_on_subagent_tool() {
    let auth = authorizer();
    let decision = auth.authorize(
        "WRK-001",
        Tier::Worker,
        "ledger_read",
        &AuthContext::default(),
    );
    assert!(!decision.allowed);
    assert_eq!(decision.audit_event.outcome, Outcome::Denied);
}

#[test]
fn worker_denied_on_corpus_write() {
    // Tier too low and actor unlisted; either reason is acceptable as
    // long as the decision is a deny.
    let auth = authorizer();
    let decision = auth.authorize(
        "WRK-099",
        Tier::Worker,
        "corpus_write",
        &AuthContext::default(),
    );
    assert!(!decision.allowed);
    assert!(decision.denial_reason.is_some());
    assert_eq!(decision.actor_id, "WRK-099");
    assert_eq!(decision.tool_name, "corpus_write");
}

#[test]
fn council_passes_tier_check_on_weaker_tools() {
    let auth = authorizer();
    // corpus_read is Worker-min with an open allow-list: Council sails through.
    let decision = auth.authorize(
        "RXY-CEO",
        Tier::Council,
        "corpus_read",
        &AuthContext::default(),
    );
    assert!(decision.allowed);
}

#[test]
fn allow_list_is_verbatim_even_for_council() {
    let auth = authorizer();
    let decision = auth.authorize(
        "RXY-CEO",
        Tier::Council,
        "web_scrape",
        &AuthContext::default(),
    );
    assert!(!decision.allowed);
    assert!(decision
        .denial_reason
        .as_deref()
        .is_some_and(|r| r.contains("WRK-001")));
}

// ---------- escalation ----------

#[test]
fn vote_gated_tool_round_trip() {
    // BRM-CTO on n8n_trigger, first without a vote ref, then with one.
    let auth = authorizer();
    let first = auth.authorize(
        "BRM-CTO",
        Tier::Council,
        "n8n_trigger",
        &AuthContext::default(),
    );
    assert!(!first.allowed);
    assert!(first.requires_vote);
    assert_eq!(first.audit_event.outcome, Outcome::DeniedNeedsVote);

    let ctx = AuthContext::default().with_vote("V-1");
    let second = auth.authorize("BRM-CTO", Tier::Council, "n8n_trigger", &ctx);
    assert!(second.allowed);
    assert_eq!(second.audit_event.outcome, Outcome::Authorized);
}

#[test]
fn vote_requirement_applies_to_every_eligible_actor() {
    // Escalation monotonicity: whoever passes tier+allow-list still needs
    // the vote reference.
    let auth = authorizer();
    let decision = auth.authorize(
        "BRM-WFB-01",
        Tier::Subagent,
        "n8n_create_workflow",
        &AuthContext::default(),
    );
    assert!(!decision.allowed);
    assert!(decision.requires_vote);
    assert_eq!(decision.audit_event.outcome, Outcome::DeniedNeedsVote);
}

#[test]
fn approval_gated_tool_round_trip() {
    let auth = authorizer();
    let first = auth.authorize(
        "VRA-CFO",
        Tier::Council,
        "budget_limit_write",
        &AuthContext::default(),
    );
    assert!(!first.allowed);
    assert!(first.requires_approval);
    assert_eq!(first.audit_event.outcome, Outcome::DeniedNeedsArchitect);

    let ctx = AuthContext::default().with_approval("APPR-2026-08");
    let second = auth.authorize("VRA-CFO", Tier::Council, "budget_limit_write", &ctx);
    assert!(second.allowed);
    assert!(second.requires_approval);
}

#[test]
fn double_gated_tool_needs_both_references() {
    let auth = authorizer();
    let ctx = AuthContext::default().with_vote("V-9").with_approval("A-4");
    let decision = auth.authorize("BRM-CTO", Tier::Council, "agent_retire", &ctx);
    assert!(decision.allowed);
    assert!(decision.requires_vote);
    assert!(decision.requires_approval);
}

// ---------- introspection ----------

#[test]
fn listing_matches_individual_decisions() {
    let auth = authorizer();
    let tools = auth.list_authorized_tools("VRA-CFO", Tier::Council);
    for tool in &tools {
        // Supply both references so escalation cannot interfere: listed
        // tools must all authorize.
        let ctx = AuthContext::default().with_vote("V-1").with_approval("A-1");
        let decision = auth.authorize("VRA-CFO", Tier::Council, tool, &ctx);
        assert!(decision.allowed, "listed tool {tool} must authorize");
    }
    assert!(tools.contains(&"economic_clearance_issue".to_owned()));
    assert!(!tools.contains(&"web_search".to_owned()));
}

#[test]
fn every_decision_carries_an_audit_event() {
    let auth = authorizer();
    let cases = [
        ("NOBODY", Tier::Worker, "warp_drive"),
        ("WRK-001", Tier::Worker, "ledger_read"),
        ("RXY-CEO", Tier::Council, "web_scrape"),
        ("BRM-CTO", Tier::Council, "n8n_trigger"),
        ("AST-GOV", Tier::Gov, "corpus_write"),
        ("WRK-001", Tier::Worker, "web_scrape"),
    ];
    for (actor, tier, tool) in cases {
        let decision = auth.authorize(actor, tier, tool, &AuthContext::default());
        assert!(!decision.audit_event.event_id.is_empty());
        assert_eq!(decision.audit_event.actor, actor);
        assert!(decision
            .audit_event
            .action
            .starts_with("TOOL_REQUEST_"));
    }
}
