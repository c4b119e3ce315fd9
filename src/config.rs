//! Policy configuration loading and validation.
//!
//! The severity-tiered pattern list and the tool registry are configuration
//! data: loaded once at process start, validated eagerly, and never reloaded
//! at runtime. A malformed entry fails the load; the pipeline never falls
//! back to permissive behavior.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::guard::PatternCatalog;
use crate::policy::{ToolRegistry, ToolSpec};
use crate::types::Severity;

/// Configuration and registry construction errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Config file is not valid TOML for the expected schema.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A detection pattern did not compile.
    #[error("invalid detection pattern '{pattern}': {error}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// The compile error.
        error: regex::Error,
    },

    /// Two registry entries share a tool name.
    #[error("duplicate tool name in registry: '{0}'")]
    DuplicateTool(String),
}

/// Top-level gate configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GateConfig {
    /// Injection guard settings.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Audit sink settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Optional detection pattern overrides; built-in catalog when absent.
    #[serde(default)]
    pub patterns: Option<Vec<PatternEntry>>,

    /// Optional tool registry overrides; built-in table when absent.
    #[serde(default)]
    pub tools: Option<Vec<ToolSpec>>,
}

/// Injection guard settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    /// Strict mode: MEDIUM patterns block. Lenient: MEDIUM sanitizes.
    /// CRITICAL and HIGH always block regardless.
    #[serde(default = "default_strict")]
    pub strict_injection_mode: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            strict_injection_mode: default_strict(),
        }
    }
}

fn default_strict() -> bool {
    true
}

/// Audit sink settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditConfig {
    /// Ledger webhook URL; events are discarded when unset.
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Per-request delivery timeout in seconds.
    #[serde(default = "default_sink_timeout")]
    pub timeout_secs: u64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            timeout_secs: default_sink_timeout(),
        }
    }
}

fn default_sink_timeout() -> u64 {
    5
}

/// One configured detection rule.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternEntry {
    /// Severity tier for the rule.
    pub severity: Severity,
    /// Regular expression source.
    pub pattern: String,
}

impl GateConfig {
    /// Load and parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&raw)
    }

    /// Parse config from a TOML string.
    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Build the pattern catalog: configured rules, or the built-in set.
    pub fn pattern_catalog(&self) -> Result<PatternCatalog, ConfigError> {
        let catalog = match &self.patterns {
            Some(entries) => PatternCatalog::from_rules(
                entries.iter().map(|e| (e.severity, e.pattern.clone())),
            )?,
            None => PatternCatalog::builtin(),
        };
        debug!(rules = catalog.len(), "detection catalog loaded");
        Ok(catalog)
    }

    /// Build the tool registry: configured specs, or the built-in table.
    pub fn tool_registry(&self) -> Result<ToolRegistry, ConfigError> {
        let registry = match &self.tools {
            Some(specs) => ToolRegistry::from_specs(specs.iter().cloned())?,
            None => ToolRegistry::builtin(),
        };
        debug!(tools = registry.len(), "tool registry loaded");
        Ok(registry)
    }
}
