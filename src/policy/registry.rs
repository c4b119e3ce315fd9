//! Tool registry: the capability matrix every authorization request is
//! checked against.
//!
//! The registry is immutable after construction: loaded once at process
//! start, never reloaded at runtime. Each entry names the minimum tier,
//! an explicit actor allow-list (or "all"), and escalation flags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::types::Tier;

/// Actors permitted to invoke a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowList {
    /// The `"all"` sentinel: any actor that passes the tier check.
    All(AllSentinel),
    /// Explicit actor identities, matched verbatim.
    Only(Vec<String>),
}

/// Serde helper so `"all"` round-trips as a literal string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllSentinel {
    /// The sentinel value.
    #[serde(rename = "all")]
    All,
}

impl AllowList {
    /// The open allow-list.
    pub fn all() -> Self {
        Self::All(AllSentinel::All)
    }

    /// An allow-list of explicit actors.
    pub fn only<I, S>(actors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(actors.into_iter().map(Into::into).collect())
    }

    /// Whether `actor_id` is permitted by this list.
    pub fn permits(&self, actor_id: &str) -> bool {
        match self {
            Self::All(_) => true,
            Self::Only(actors) => actors.iter().any(|a| a == actor_id),
        }
    }
}

/// Registry entry for one tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool name.
    pub name: String,
    /// Minimum authorization tier.
    pub min_tier: Tier,
    /// Actors permitted to invoke the tool.
    #[serde(default = "default_allow_all")]
    pub allowed_actors: AllowList,
    /// Whether a recorded council vote reference is required.
    #[serde(default)]
    pub requires_vote: bool,
    /// Whether a recorded architect approval reference is required.
    #[serde(default)]
    pub requires_approval: bool,
    /// Human-readable description for introspection.
    #[serde(default)]
    pub description: String,
}

fn default_allow_all() -> AllowList {
    AllowList::all()
}

impl ToolSpec {
    fn new(name: &str, min_tier: Tier, allowed_actors: AllowList, description: &str) -> Self {
        Self {
            name: name.to_owned(),
            min_tier,
            allowed_actors,
            requires_vote: false,
            requires_approval: false,
            description: description.to_owned(),
        }
    }

    fn with_vote(mut self) -> Self {
        self.requires_vote = true;
        self
    }

    fn with_approval(mut self) -> Self {
        self.requires_approval = true;
        self
    }
}

/// Immutable table mapping tool names to their specs.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    // BTreeMap keeps iteration (and list_authorized_tools) name-ordered.
    tools: BTreeMap<String, ToolSpec>,
}

impl ToolRegistry {
    /// Build a registry from explicit specs, rejecting duplicate names.
    pub fn from_specs<I>(specs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = ToolSpec>,
    {
        let mut tools = BTreeMap::new();
        for spec in specs {
            if tools.contains_key(&spec.name) {
                return Err(ConfigError::DuplicateTool(spec.name));
            }
            tools.insert(spec.name.clone(), spec);
        }
        Ok(Self { tools })
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// Iterate all specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// The built-in Hegemon tool table.
    pub fn builtin() -> Self {
        let specs = vec![
            // Read-only corpus / knowledge tools.
            ToolSpec::new(
                "corpus_read",
                Tier::Worker,
                AllowList::all(),
                "Read any corpus or Ground Truth document",
            ),
            ToolSpec::new(
                "ledger_read",
                Tier::Subagent,
                AllowList::all(),
                "Read audit_events or decision_trails (read-only)",
            ),
            // External data tools.
            ToolSpec::new(
                "web_search",
                Tier::Subagent,
                AllowList::only(["SRN-MRS-01"]),
                "Search the web for external data",
            ),
            ToolSpec::new(
                "web_scrape",
                Tier::Worker,
                AllowList::only(["WRK-001"]),
                "Fetch raw content from a URL",
            ),
            // Communication tools.
            ToolSpec::new(
                "telegram_send",
                Tier::Worker,
                AllowList::only(["WRK-009", "RXY-COM-01", "RXY-CEO"]),
                "Send a Telegram message",
            ),
            ToolSpec::new(
                "email_send",
                Tier::Subagent,
                AllowList::only(["RXY-COM-01", "RXY-CEO", "BRM-CTO"]),
                "Send email via Resend",
            ),
            ToolSpec::new(
                "discord_send",
                Tier::Subagent,
                AllowList::only(["RXY-COM-01", "RXY-CEO"]),
                "Send a Discord message",
            ),
            // CRM / external platform tools.
            ToolSpec::new(
                "hubspot_read",
                Tier::Subagent,
                AllowList::only(["BRM-INT-01", "SRN-MRS-01", "BRM-CTO"]),
                "Read HubSpot CRM records",
            ),
            ToolSpec::new(
                "hubspot_write",
                Tier::Subagent,
                AllowList::only(["BRM-INT-01", "WRK-005", "WRK-012", "BRM-CTO"]),
                "Write/update HubSpot CRM records",
            ),
            // Ledger write tools.
            ToolSpec::new(
                "ledger_write",
                Tier::Subagent,
                AllowList::only([
                    "BRM-CTO", "RXY-CEO", "SRN-CIO", "VRA-CFO", "AST-GOV", "WRK-006", "VRA-TKL-01",
                ]),
                "Write an audit event to the ledger",
            ),
            ToolSpec::new(
                "token_ledger_write",
                Tier::Subagent,
                AllowList::only(["VRA-CFO", "VRA-TKL-01"]),
                "Write to token_ledger table",
            ),
            // n8n workflow tools.
            ToolSpec::new(
                "n8n_trigger",
                Tier::Council,
                AllowList::only(["BRM-CTO"]),
                "Trigger an n8n workflow",
            )
            .with_vote(),
            ToolSpec::new(
                "n8n_create_workflow",
                Tier::Subagent,
                AllowList::only(["BRM-WFB-01"]),
                "Create a new n8n workflow (requires Council vote)",
            )
            .with_vote(),
            // Infrastructure tools.
            ToolSpec::new(
                "docker_manage",
                Tier::Subagent,
                AllowList::only(["BRM-INF-01"]),
                "Start/stop/restart Docker containers",
            )
            .with_vote(),
            ToolSpec::new(
                "env_write",
                Tier::Subagent,
                AllowList::only(["BRM-INF-01"]),
                "Write environment variables to .env files",
            )
            .with_vote(),
            // Corpus write tools (architect-gated).
            ToolSpec::new(
                "corpus_write",
                Tier::Gov,
                AllowList::only(["AST-GOV"]),
                "Write or modify corpus/doctrine files — Architect approval required",
            )
            .with_approval(),
            // Economic tools.
            ToolSpec::new(
                "economic_clearance_issue",
                Tier::Council,
                AllowList::only(["VRA-CFO"]),
                "Issue economic clearance for a task",
            ),
            ToolSpec::new(
                "budget_limit_write",
                Tier::Council,
                AllowList::only(["VRA-CFO"]),
                "Modify agent daily budget limits — Architect approval required",
            )
            .with_approval(),
            // Agent management tools (highest privilege).
            ToolSpec::new(
                "agent_create",
                Tier::Council,
                AllowList::only(["BRM-CTO"]),
                "Create or register a new agent — Council vote + Architect required",
            )
            .with_vote()
            .with_approval(),
            ToolSpec::new(
                "agent_retire",
                Tier::Council,
                AllowList::only(["BRM-CTO"]),
                "Retire an existing agent — Council vote + Architect required",
            )
            .with_vote()
            .with_approval(),
        ];
        Self::from_specs(specs).expect("built-in registry has unique tool names")
    }
}
