//! Shared enums for the security pipeline: severity tiers, authorization
//! tiers, audit outcomes, and origin trust classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Detection severity, ordered by blocking priority.
///
/// `Ord` follows declaration order, so `max()` over a set of matches
/// yields the governing severity: `Critical > High > Medium > Low > Clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// No detection rule matched.
    Clean,
    /// Anomaly worth logging; input proceeds unmodified.
    Low,
    /// Suspicious structural pattern; sanitized or blocked by strictness.
    Medium,
    /// Role manipulation or system boundary probing; always blocked.
    High,
    /// Direct instruction override attempt; always blocked.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Clean => "CLEAN",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// An actor's rank in the capability hierarchy.
///
/// Council and Gov are peers at the top: each satisfies a minimum tier
/// of the other. Wire names match the ledger's tier vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// Worker agents, the weakest tier.
    #[serde(rename = "TIER_3_WORKER")]
    Worker,
    /// Sub-agents acting on behalf of a council member.
    #[serde(rename = "TIER_2_SUBAGENT")]
    Subagent,
    /// Governance observer.
    #[serde(rename = "TIER_1_GOV")]
    Gov,
    /// Council members.
    #[serde(rename = "TIER_1_COUNCIL")]
    Council,
}

impl Tier {
    /// Numeric rank; smaller is stronger. Gov and Council share rank 1.
    fn rank(self) -> u8 {
        match self {
            Self::Worker => 3,
            Self::Subagent => 2,
            Self::Gov | Self::Council => 1,
        }
    }

    /// Whether this tier is at least as strong as `min`.
    pub fn satisfies(self, min: Tier) -> bool {
        self.rank() <= min.rank()
    }

    /// The ledger's wire name for this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Worker => "TIER_3_WORKER",
            Self::Subagent => "TIER_2_SUBAGENT",
            Self::Gov => "TIER_1_GOV",
            Self::Council => "TIER_1_COUNCIL",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a security decision, recorded on every audit event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    /// Tool call permitted.
    Authorized,
    /// Tool call denied outright (unregistered, tier, or allow-list).
    Denied,
    /// Denied pending a recorded council vote reference.
    DeniedNeedsVote,
    /// Denied pending a recorded architect approval reference.
    DeniedNeedsArchitect,
    /// Input blocked by the injection guard.
    Blocked,
    /// Input passed with a recorded warning.
    Warning,
    /// Input passed clean.
    Success,
    /// A collaborator failed (model call, sink); decision path unaffected.
    Failure,
}

impl Outcome {
    /// The ledger's wire name for this outcome.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Authorized => "AUTHORIZED",
            Self::Denied => "DENIED",
            Self::DeniedNeedsVote => "DENIED_NEEDS_VOTE",
            Self::DeniedNeedsArchitect => "DENIED_NEEDS_ARCHITECT",
            Self::Blocked => "BLOCKED",
            Self::Warning => "WARNING",
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trust classification of an input origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustClass {
    /// Internal agent-to-agent traffic; passes through unwrapped.
    Trusted,
    /// External or unrecognized origins; always boundary-wrapped.
    Untrusted,
}
