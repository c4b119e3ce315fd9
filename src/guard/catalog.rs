//! Detection rule catalog and origin trust partition.
//!
//! The catalog is immutable, process-wide, read-only state: rules are
//! compiled once at startup and shared by reference with every inspector.
//! Rules match case-insensitively with `.` crossing newlines, so signatures
//! split over multiple lines are still caught.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};

use crate::config::ConfigError;
use crate::types::{Severity, TrustClass};

/// Replacement marker inserted by the sanitation transform.
pub const SANITIZE_MARKER: &str = "[REMOVED]";

/// Direct instruction override attempts.
const CRITICAL_PATTERNS: &[&str] = &[
    r"ignore\s+(all\s+)?(previous|prior|above|preceding)\s+(instructions?|prompts?|context|rules?)",
    r"disregard\s+(all\s+)?(previous|prior|above|your)\s+(instructions?|prompts?|rules?|constraints?)",
    r"forget\s+(everything|all|your\s+instructions?|what\s+you\s+(were|are)\s+told)",
    r"you\s+are\s+now\s+(a|an|acting\s+as)",
    r"new\s+(system\s+)?prompt\s*:",
    r"override\s+(system|safety|governance|council|architect)\s*(prompt|rules?|instructions?)?",
    r"jailbreak",
    r"do\s+anything\s+now",
    r"dan\s+mode",
    r"developer\s+mode\s+(enabled|on|activated)",
];

/// Role manipulation and system boundary probing.
const HIGH_PATTERNS: &[&str] = &[
    r"\[system\]",
    r"\[inst\]",
    r"<\s*system\s*>",
    r"<\s*instructions?\s*>",
    r"<\s*prompt\s*>",
    r"###\s*system",
    r"###\s*instruction",
    r"act\s+as\s+(if\s+you\s+(are|were)|a\s+different|an?\s+unrestricted|an?\s+unfiltered)",
    r"pretend\s+(you\s+(are|have\s+no)|there\s+(are|is)\s+no)\s+(rules?|restrictions?|limits?|guidelines?|governance)",
    r"simulate\s+(being|a|an)\s+",
    r"your\s+(true|real|actual|hidden)\s+(purpose|goal|instructions?|self)",
    r"reveal\s+(your\s+)?(system\s+)?(prompt|instructions?|context|configuration)",
    r"print\s+(your\s+)?(system\s+)?(prompt|instructions?)",
    r"what\s+(are|were)\s+your\s+(original\s+)?instructions?",
    r"repeat\s+(everything|all|your\s+(system\s+)?prompt)",
    r"token\s+smuggling",
    r"prompt\s+leak",
];

/// Structural markers often used in indirect injection via scraped content.
const MEDIUM_PATTERNS: &[&str] = &[
    r"---+\s*(system|instruction|prompt|override)",
    r"={3,}\s*(system|instruction|prompt|override)",
    r"\[OVERRIDE\]",
    r"\[INJECT\]",
    r"\[ADMIN\]",
    r"<\s*/?context\s*>",
    r"<\s*/?user\s*>",
    r"<\s*/?assistant\s*>",
    // Encoded payload attempt.
    r"base64\s*:\s*[A-Za-z0-9+/]{20,}",
    // Unicode escape chains.
    r"\\u[0-9a-fA-F]{4}.*\\u[0-9a-fA-F]{4}.*\\u[0-9a-fA-F]{4}",
    // Multi-line variants of the override phrasing.
    r"(\n.*){0,3}ignore(\n.*){0,3}instructions",
];

/// Anomalies worth logging but not blocking.
const LOW_PATTERNS: &[&str] = &[
    r"(as|being|acting\s+as)\s+(a\s+)?different\s+(ai|model|assistant|agent)",
    r"without\s+(any\s+)?(restrictions?|limits?|rules?|guidelines?)",
    r"hypothetically\s+speaking.{0,50}(ignore|bypass|disable)",
    r"for\s+(educational|research|testing)\s+purposes?.{0,50}(ignore|bypass)",
];

/// Origins that are always treated as untrusted data, never instructions.
const UNTRUSTED_ORIGINS: &[&str] = &[
    "telegram",
    "discord",
    "webhook",
    "web_scrape",
    "hubspot",
    "external_api",
    // Corpus files are boundary-wrapped too when passed as user content.
    "github_file",
    "email",
    "unknown",
];

/// Origins trusted as internal agent-to-agent traffic.
const TRUSTED_ORIGINS: &[&str] = &[
    "council_internal",
    "roxy_dispatch",
    "sorin_proposal",
    "brom_execution",
    "vera_clearance",
    "astra_validation",
];

/// A single compiled detection rule.
#[derive(Debug, Clone)]
pub struct DetectionRule {
    /// Severity tier this rule belongs to.
    pub severity: Severity,
    /// Source text of the pattern, kept for diagnostics.
    pub source: String,
    pattern: Regex,
}

impl DetectionRule {
    /// Compile a rule: case-insensitive, `.` matches newlines.
    pub fn compile(severity: Severity, source: &str) -> Result<Self, ConfigError> {
        let pattern = RegexBuilder::new(source)
            .case_insensitive(true)
            .dot_matches_new_line(true)
            .build()
            .map_err(|error| ConfigError::InvalidPattern {
                pattern: source.to_owned(),
                error,
            })?;
        Ok(Self {
            severity,
            source: source.to_owned(),
            pattern,
        })
    }

    /// Whether this rule matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Immutable, ordered set of detection rules grouped by severity tier.
///
/// Iteration visits CRITICAL, then HIGH, MEDIUM, LOW, in each tier's
/// insertion order.
#[derive(Debug, Clone)]
pub struct PatternCatalog {
    rules: Vec<DetectionRule>,
    sanitizers: Vec<(Regex, &'static str)>,
}

impl PatternCatalog {
    /// The built-in catalog: the full four-tier signature set.
    pub fn builtin() -> Self {
        let tiers = [
            (Severity::Critical, CRITICAL_PATTERNS),
            (Severity::High, HIGH_PATTERNS),
            (Severity::Medium, MEDIUM_PATTERNS),
            (Severity::Low, LOW_PATTERNS),
        ];
        let mut rules = Vec::new();
        for (severity, patterns) in tiers {
            for source in patterns {
                let rule = DetectionRule::compile(severity, source)
                    .expect("built-in detection pattern compiles");
                rules.push(rule);
            }
        }
        Self {
            rules,
            sanitizers: sanitizer_patterns(),
        }
    }

    /// Build a catalog from caller-supplied rules, highest severity first.
    ///
    /// Fails fast on the first malformed pattern; a catalog is never
    /// constructed with a partial rule set.
    pub fn from_rules<I>(entries: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (Severity, String)>,
    {
        let mut rules: Vec<DetectionRule> = entries
            .into_iter()
            .map(|(severity, source)| DetectionRule::compile(severity, &source))
            .collect::<Result<_, _>>()?;
        // Keep the CRITICAL→LOW scan order regardless of input order.
        rules.sort_by(|a, b| b.severity.cmp(&a.severity));
        Ok(Self {
            rules,
            sanitizers: sanitizer_patterns(),
        })
    }

    /// Iterate rules in scan order.
    pub fn rules(&self) -> impl Iterator<Item = &DetectionRule> {
        self.rules.iter()
    }

    /// Number of rules in the catalog.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the catalog holds no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Neutralize known structural markers in `text`.
    ///
    /// Used on the MEDIUM lenient path: role/delimiter tags and override
    /// markers become [`SANITIZE_MARKER`], dashed headers collapse to `---`.
    pub fn sanitize(&self, text: &str) -> String {
        let mut sanitized = text.to_owned();
        for (pattern, replacement) in &self.sanitizers {
            sanitized = pattern.replace_all(&sanitized, *replacement).to_string();
        }
        sanitized.trim().to_owned()
    }
}

/// Precompiled sanitation transforms for the MEDIUM lenient path.
fn sanitizer_patterns() -> Vec<(Regex, &'static str)> {
    let entries: &[(&str, &str)] = &[
        (
            r"<\s*/?(system|instructions?|prompt|context|user|assistant)\s*>",
            SANITIZE_MARKER,
        ),
        (r"\[OVERRIDE\]|\[INJECT\]|\[ADMIN\]", SANITIZE_MARKER),
        (r"---+\s*(system|instruction|prompt|override)", "---"),
    ];
    entries
        .iter()
        .map(|(source, replacement)| {
            let pattern = RegexBuilder::new(source)
                .case_insensitive(true)
                .build()
                .expect("sanitizer pattern compiles");
            (pattern, *replacement)
        })
        .collect()
}

/// Static partition of origin labels into trusted and untrusted.
///
/// Membership is fixed at load time; unrecognized labels classify as
/// untrusted.
#[derive(Debug, Clone)]
pub struct TrustPartition {
    trusted: HashSet<String>,
    untrusted: HashSet<String>,
}

impl TrustPartition {
    /// The built-in partition covering every known channel.
    pub fn builtin() -> Self {
        Self {
            trusted: TRUSTED_ORIGINS.iter().map(|s| (*s).to_owned()).collect(),
            untrusted: UNTRUSTED_ORIGINS.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    /// Build a partition from explicit origin sets.
    pub fn new<T, U>(trusted: T, untrusted: U) -> Self
    where
        T: IntoIterator<Item = String>,
        U: IntoIterator<Item = String>,
    {
        Self {
            trusted: trusted.into_iter().collect(),
            untrusted: untrusted.into_iter().collect(),
        }
    }

    /// Classify an origin label. Unknown labels default to untrusted.
    pub fn classify(&self, origin: &str) -> TrustClass {
        if self.trusted.contains(origin) {
            TrustClass::Trusted
        } else {
            TrustClass::Untrusted
        }
    }

    /// Whether the label is a known untrusted origin (as opposed to an
    /// unrecognized one).
    pub fn is_known(&self, origin: &str) -> bool {
        self.trusted.contains(origin) || self.untrusted.contains(origin)
    }
}
