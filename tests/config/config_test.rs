//! Coverage for config file loading and policy construction.

use std::io::Write;

use hegemon_gate::config::{ConfigError, GateConfig};
use hegemon_gate::types::Severity;

#[test]
fn load_reads_a_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "[security]\nstrict_injection_mode = false\n\n[audit]\ntimeout_secs = 3"
    )
    .expect("write config");

    let config = GateConfig::load(file.path()).expect("config loads");
    assert!(!config.security.strict_injection_mode);
    assert_eq!(config.audit.timeout_secs, 3);
}

#[test]
fn load_missing_file_is_a_read_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = GateConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(ConfigError::Read(_))));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let result = GateConfig::from_toml("security = strict");
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn configured_patterns_replace_builtin_catalog() {
    let raw = r#"
        [[patterns]]
        severity = "MEDIUM"
        pattern = "tenant\\s+specific"
    "#;
    let config = GateConfig::from_toml(raw).expect("parses");
    let catalog = config.pattern_catalog().expect("catalog");
    assert_eq!(catalog.len(), 1);
    let rule = catalog.rules().next().expect("one rule");
    assert_eq!(rule.severity, Severity::Medium);
    assert!(rule.is_match("TENANT specific payload"));
}

#[test]
fn configured_tools_replace_builtin_registry() {
    let raw = r#"
        [[tools]]
        name = "tenant_tool"
        min_tier = "TIER_2_SUBAGENT"
        allowed_actors = "all"
    "#;
    let config = GateConfig::from_toml(raw).expect("parses");
    let registry = config.tool_registry().expect("registry");
    assert_eq!(registry.len(), 1);
    assert!(registry.get("tenant_tool").is_some());
    assert!(registry.get("corpus_read").is_none());
}
