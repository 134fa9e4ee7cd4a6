// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Switchyard configuration system.

use std::io::Write;

use switchyard_config::diagnostic::ConfigError;
use switchyard_config::{
    RuleKind, load_and_validate_path, load_and_validate_str, load_config_from_str,
};

/// A full configuration with every section deserializes.
#[test]
fn full_toml_deserializes() {
    let toml = r#"
debug = true
default_model_passthrough = false
hooks = ["classify", "route"]

[logging]
level = "debug"

[[rules]]
name = "think"
rule = "thinking"

[[rules]]
name = "background"
rule = "match_model"
model_name = "claude-3-5-haiku"

[[rules]]
name = "token_count"
rule = "token_count"
threshold = 60000

[forwarding]
provider = "anthropic"
hostnames = ["api.anthropic.com"]
model_family_prefix = "claude"
user_agent_signature = "claude-cli"

[[backends]]
label = "default"
model = "claude-sonnet-4-20250514"
api_base = "https://api.anthropic.com"

[[backends]]
label = "background"
model = "claude-3-5-haiku-20241022"
custom_provider = "vertex"
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert!(config.debug);
    assert!(!config.default_model_passthrough);
    assert_eq!(config.hooks, ["classify", "route"]);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.rules.len(), 3);
    assert_eq!(config.rules[1].rule, RuleKind::MatchModel);
    assert_eq!(config.forwarding.hostnames, ["api.anthropic.com"]);
    assert_eq!(config.backends.len(), 2);
    assert_eq!(config.backends[1].custom_provider.as_deref(), Some("vertex"));
}

/// An empty file yields the compiled defaults.
#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty config");
    assert!(config.default_model_passthrough);
    assert_eq!(config.hooks.len(), 3);
}

/// A misspelled key inside a rule produces an UnknownKey diagnostic with a suggestion.
#[test]
fn typo_in_rule_suggests_fix() {
    let toml = r#"
[[rules]]
name = "big"
rule = "token_count"
treshold = 100
"#;

    let errors = load_and_validate_str(toml).expect_err("typo should be rejected");
    assert!(
        errors.iter().any(|e| matches!(
            e,
            ConfigError::UnknownKey { key, suggestion: Some(s), .. }
                if key == "treshold" && s == "threshold"
        )),
        "expected a threshold suggestion, got: {errors:?}"
    );
}

/// An unsupported rule kind is reported, not silently ignored.
#[test]
fn unknown_rule_kind_is_reported() {
    let toml = r#"
[[rules]]
name = "x"
rule = "match_modle"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad kind should be rejected");
    assert!(!errors.is_empty());
    let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
    assert!(
        rendered.iter().any(|m| m.contains("match_modle")),
        "error should mention the bad value, got: {rendered:?}"
    );
}

/// Wrong value type for a top-level key.
#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("debug = \"yes\"").expect_err("string is not a bool");
    assert!(!errors.is_empty());
}

/// Semantic validation errors are all collected.
#[test]
fn validation_errors_are_collected() {
    let toml = r#"
hooks = ["route", "route"]

[[rules]]
name = "catch"
rule = "default"

[[rules]]
name = "bg"
rule = "match_model"
"#;

    let errors = load_and_validate_str(toml).expect_err("invalid config");
    assert!(errors.len() >= 3, "expected every problem, got: {errors:?}");
}

/// Loading from an explicit path works and reports errors for that file.
#[test]
fn load_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        r#"
default_model_passthrough = false

[[rules]]
name = "web"
rule = "match_tool"
tool_name = "web_search"
"#
    )
    .expect("write config");

    let config = load_and_validate_path(file.path()).expect("config from path");
    assert!(!config.default_model_passthrough);
    assert_eq!(config.rules[0].tool_name.as_deref(), Some("web_search"));
}

/// A missing file falls back to defaults (Figment treats absent files as empty).
#[test]
fn missing_path_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = load_and_validate_path(&dir.path().join("absent.toml")).expect("defaults");
    assert!(config.rules.is_empty());
}
