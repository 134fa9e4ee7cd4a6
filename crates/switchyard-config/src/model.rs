// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Switchyard.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Top-level Switchyard configuration.
///
/// Loaded once per process. Only the router's backend cache is reloaded at
/// runtime; rules, hooks and forwarding policy stay fixed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SwitchyardConfig {
    /// Verbose routing diagnostics.
    #[serde(default)]
    pub debug: bool,

    /// Keep the caller's model when a request classifies as `default`.
    #[serde(default = "default_model_passthrough")]
    pub default_model_passthrough: bool,

    /// Hook names, run in order for every request.
    #[serde(default = "default_hooks")]
    pub hooks: Vec<String>,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Classification rules, evaluated top to bottom.
    #[serde(default)]
    pub rules: Vec<RuleConfig>,

    /// Credential forwarding policy.
    #[serde(default)]
    pub forwarding: ForwardingConfig,

    /// Statically configured backends, used when no external registry is wired in.
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
}

impl Default for SwitchyardConfig {
    fn default() -> Self {
        Self {
            debug: false,
            default_model_passthrough: default_model_passthrough(),
            hooks: default_hooks(),
            logging: LoggingConfig::default(),
            rules: Vec::new(),
            forwarding: ForwardingConfig::default(),
            backends: Vec::new(),
        }
    }
}

fn default_model_passthrough() -> bool {
    true
}

fn default_hooks() -> Vec<String> {
    vec![
        "classify".to_string(),
        "route".to_string(),
        "forward_credential".to_string(),
    ]
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Kind of classification rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuleKind {
    /// Matches requests carrying a top-level `thinking` field.
    Thinking,
    /// Matches when the model name contains `model_name`.
    MatchModel,
    /// Matches when the estimated prompt size exceeds `threshold` tokens.
    TokenCount,
    /// Matches when a declared tool name contains `tool_name`.
    MatchTool,
    /// Catch-all. Only valid as the last rule.
    Default,
}

/// One labelled classification rule.
///
/// Parameters are flat so rules read naturally in TOML:
///
/// ```toml
/// [[rules]]
/// name = "background"
/// rule = "match_model"
/// model_name = "claude-3-5-haiku"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Label produced when this rule matches.
    pub name: String,

    /// Rule kind.
    pub rule: RuleKind,

    /// Substring for `match_model`.
    #[serde(default)]
    pub model_name: Option<String>,

    /// Substring for `match_tool`.
    #[serde(default)]
    pub tool_name: Option<String>,

    /// Token threshold for `token_count`.
    #[serde(default)]
    pub threshold: Option<u64>,
}

impl RuleConfig {
    /// Create a rule config with no parameters.
    pub fn new(name: impl Into<String>, rule: RuleKind) -> Self {
        Self {
            name: name.into(),
            rule,
            model_name: None,
            tool_name: None,
            threshold: None,
        }
    }

    pub fn match_model(name: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            model_name: Some(model_name.into()),
            ..Self::new(name, RuleKind::MatchModel)
        }
    }

    pub fn match_tool(name: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            ..Self::new(name, RuleKind::MatchTool)
        }
    }

    pub fn token_count(name: impl Into<String>, threshold: u64) -> Self {
        Self {
            threshold: Some(threshold),
            ..Self::new(name, RuleKind::TokenCount)
        }
    }
}

/// Which provider a caller credential may be forwarded to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ForwardingConfig {
    /// Canonical provider identifier, compared against `custom_provider`
    /// and used as the `"<provider>/"` model namespace.
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Hostnames of the provider's direct API.
    #[serde(default = "default_hostnames")]
    pub hostnames: Vec<String>,

    /// Model family prefix that implies the provider (e.g. `claude`).
    #[serde(default = "default_model_family_prefix")]
    pub model_family_prefix: String,

    /// Substring identifying the provider's own CLI in `user-agent`.
    #[serde(default = "default_user_agent_signature")]
    pub user_agent_signature: String,
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            hostnames: default_hostnames(),
            model_family_prefix: default_model_family_prefix(),
            user_agent_signature: default_user_agent_signature(),
        }
    }
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_hostnames() -> Vec<String> {
    vec!["api.anthropic.com".to_string(), "anthropic.com".to_string()]
}

fn default_model_family_prefix() -> String {
    "claude".to_string()
}

fn default_user_agent_signature() -> String {
    "claude-cli".to_string()
}

/// A statically configured backend model.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Routing label this backend serves.
    pub label: String,

    /// Model identifier sent to the backend.
    #[serde(default)]
    pub model: Option<String>,

    /// Explicit API base URL.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Provider identifier (e.g. `vertex`, `bedrock`).
    #[serde(default)]
    pub custom_provider: Option<String>,

    /// Free-form metadata attached to the backend.
    #[serde(default)]
    pub model_info: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_pipeline() {
        let config = SwitchyardConfig::default();
        assert!(!config.debug);
        assert!(config.default_model_passthrough);
        assert_eq!(config.hooks, ["classify", "route", "forward_credential"]);
        assert_eq!(config.forwarding.provider, "anthropic");
        assert_eq!(config.forwarding.user_agent_signature, "claude-cli");
        assert!(config.rules.is_empty());
    }

    #[test]
    fn rule_kind_display_is_snake_case() {
        assert_eq!(RuleKind::MatchModel.to_string(), "match_model");
        assert_eq!(RuleKind::TokenCount.to_string(), "token_count");
        assert_eq!(RuleKind::Default.to_string(), "default");
    }

    #[test]
    fn rules_deserialize_in_order() {
        let toml_str = r#"
[[rules]]
name = "think"
rule = "thinking"

[[rules]]
name = "token_count"
rule = "token_count"
threshold = 60000

[[rules]]
name = "web_search"
rule = "match_tool"
tool_name = "web_search"
"#;
        let config: SwitchyardConfig = toml::from_str(toml_str).unwrap();
        let names: Vec<_> = config.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["think", "token_count", "web_search"]);
        assert_eq!(config.rules[1].threshold, Some(60000));
        assert_eq!(config.rules[2].tool_name.as_deref(), Some("web_search"));
    }

    #[test]
    fn rules_deny_unknown_fields() {
        let toml_str = r#"
[[rules]]
name = "think"
rule = "thinking"
treshold = 5
"#;
        assert!(toml::from_str::<SwitchyardConfig>(toml_str).is_err());
    }

    #[test]
    fn unknown_rule_kind_is_rejected() {
        let toml_str = r#"
[[rules]]
name = "x"
rule = "regex"
"#;
        assert!(toml::from_str::<SwitchyardConfig>(toml_str).is_err());
    }

    #[test]
    fn backends_carry_model_info() {
        let toml_str = r#"
[[backends]]
label = "background"
model = "claude-3-5-haiku-20241022"
api_base = "https://api.anthropic.com"

[backends.model_info]
priority = "low"
"#;
        let config: SwitchyardConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backends.len(), 1);
        assert_eq!(config.backends[0].model_info["priority"], "low");
    }
}
