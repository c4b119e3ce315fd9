//! Injection inspection: scan, decide, boundary-wrap, audit.
//!
//! Every external input must pass through [`InputInspector::inspect`]
//! before reaching a model call. The inspector is a stateless evaluator
//! over an immutable catalog; it is safe to call concurrently from any
//! number of tasks.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::audit::{AuditEvent, AuditEventBuilder};
use crate::types::{Outcome, Severity, TrustClass};

use super::catalog::{PatternCatalog, TrustPartition};

/// Action name recorded on inspection audit events.
const SCAN_ACTION: &str = "INJECTION_SCAN";

/// Event id prefix for inspection events.
const SCAN_EVENT_PREFIX: &str = "SEC";

/// A matched detection rule, reported once per rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleMatch {
    /// Tier of the matched rule.
    pub severity: Severity,
    /// Source text of the matched pattern.
    pub pattern: String,
}

/// The verdict produced for one piece of input.
///
/// If `blocked` is true, `output_text` must never be forwarded downstream;
/// only `block_message` may be surfaced. The pipeline's
/// [`ScreenedInput`](crate::pipeline::ScreenedInput) enforces this at the
/// type level.
#[derive(Debug, Clone)]
pub struct InspectionVerdict {
    /// Whether the input was blocked outright.
    pub blocked: bool,
    /// Governing severity: the highest tier with a match, or `Clean`.
    pub severity: Severity,
    /// Every rule that matched, in scan order.
    pub matched: Vec<RuleMatch>,
    /// The input exactly as received.
    pub original_text: String,
    /// The sanitized and/or boundary-wrapped text to forward when not blocked.
    pub output_text: String,
    /// Fixed, non-revealing message to surface instead of output when blocked.
    pub block_message: Option<String>,
    /// Warnings recorded for MEDIUM (lenient) and LOW matches.
    pub warnings: Vec<String>,
    /// The audit event describing this decision.
    pub audit_event: AuditEvent,
}

/// Scans input against a [`PatternCatalog`] and wraps untrusted content.
///
/// One inspector per agent; multiple inspectors over distinct catalogs can
/// coexist (per-tenant policies). The catalog and partition are shared
/// read-only state.
#[derive(Debug, Clone)]
pub struct InputInspector {
    agent_id: String,
    strict: bool,
    catalog: Arc<PatternCatalog>,
    partition: Arc<TrustPartition>,
    events: AuditEventBuilder,
}

impl InputInspector {
    /// Create an inspector for the given agent.
    ///
    /// `strict` controls the MEDIUM tier: strict blocks, lenient sanitizes.
    /// CRITICAL and HIGH always block regardless.
    pub fn new(
        agent_id: impl Into<String>,
        strict: bool,
        catalog: Arc<PatternCatalog>,
        partition: Arc<TrustPartition>,
        events: AuditEventBuilder,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            strict,
            catalog,
            partition,
            events,
        }
    }

    /// The agent this inspector guards.
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Inspect one piece of input from `origin`.
    ///
    /// Runs the full pipeline stage: pattern scan, severity decision,
    /// boundary wrapping for untrusted origins, audit event construction,
    /// and a local log signal. Never fails; block/deny are values.
    pub fn inspect(&self, text: &str, origin: &str, task_id: &str) -> InspectionVerdict {
        // Step 1: scan every rule across all tiers, recording each match.
        // Rules are stored CRITICAL→LOW, so the first match is governing.
        let matched: Vec<RuleMatch> = self
            .catalog
            .rules()
            .filter(|rule| rule.is_match(text))
            .map(|rule| RuleMatch {
                severity: rule.severity,
                pattern: rule.source.clone(),
            })
            .collect();
        let severity = matched
            .iter()
            .map(|m| m.severity)
            .max()
            .unwrap_or(Severity::Clean);

        // Step 2: decide by governing severity.
        let mut blocked = false;
        let mut block_message = None;
        let mut warnings = Vec::new();
        let mut output = text.to_owned();

        match severity {
            Severity::Critical => {
                blocked = true;
                block_message = Some(
                    "This request was blocked by the Hegemon security layer. \
                     The event has been logged and the Architect notified."
                        .to_owned(),
                );
            }
            Severity::High => {
                blocked = true;
                block_message = Some(
                    "This request was blocked. It contains patterns that attempt \
                     to modify agent instructions or probe system configuration. \
                     Event logged."
                        .to_owned(),
                );
            }
            Severity::Medium => {
                if self.strict {
                    blocked = true;
                    block_message = Some(
                        "This request was blocked. It contains structural patterns \
                         associated with indirect injection. Event logged."
                            .to_owned(),
                    );
                } else {
                    output = self.catalog.sanitize(&output);
                    warnings.push(
                        "MEDIUM pattern detected — input sanitized before processing".to_owned(),
                    );
                }
            }
            Severity::Low => {
                warnings.push("LOW anomaly pattern detected — logged, proceeding".to_owned());
            }
            Severity::Clean => {}
        }

        // Step 3: boundary-wrap untrusted origins even when no rule matched.
        // Second, independent defense layer: clean external content is still
        // data, never instructions.
        let trust = self.partition.classify(origin);
        if !blocked && trust == TrustClass::Untrusted {
            output = wrap_untrusted(&output, origin);
        }

        // Step 4: audit event. Matched severities only, to keep the ledger
        // payload small and avoid echoing rule text.
        let sanitized = !blocked && output != text;
        let outcome = if blocked {
            Outcome::Blocked
        } else if warnings.is_empty() {
            Outcome::Success
        } else {
            Outcome::Warning
        };
        let details = serde_json::json!({
            "severity": severity,
            "matched_patterns": matched.iter().map(|m| m.severity).collect::<Vec<_>>(),
            "input_source": origin,
            "input_length": text.chars().count(),
            "blocked": blocked,
            "sanitized": sanitized,
        });
        let audit_event = self.events.build(
            SCAN_EVENT_PREFIX,
            &self.agent_id,
            SCAN_ACTION,
            outcome,
            details,
            task_id,
        );

        // Step 5: local signal before returning.
        if blocked {
            warn!(
                agent = %self.agent_id,
                severity = %severity,
                source = origin,
                task_id,
                "injection blocked"
            );
        } else if !warnings.is_empty() {
            info!(
                agent = %self.agent_id,
                warnings = ?warnings,
                source = origin,
                task_id,
                "injection warning"
            );
        }

        InspectionVerdict {
            blocked,
            severity,
            matched,
            original_text: text.to_owned(),
            output_text: output,
            block_message,
            warnings,
            audit_event,
        }
    }
}

/// Enclose untrusted content in hard boundary delimiters naming the origin.
///
/// The downstream system prompt must carry the matching unwrap instruction;
/// see [`security_preamble`](super::security_preamble).
fn wrap_untrusted(text: &str, origin: &str) -> String {
    format!("[EXTERNAL_DATA source={origin}]\n{text}\n[/EXTERNAL_DATA]")
}
