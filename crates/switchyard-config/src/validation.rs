// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Catches semantic problems serde cannot express: missing rule parameters,
//! a catch-all rule that is not last, duplicate backend labels and hook names.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::{RuleKind, SwitchyardConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or every collected error.
pub fn validate_config(config: &SwitchyardConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    validate_rules(config, &mut errors);
    validate_hooks(config, &mut errors);
    validate_forwarding(config, &mut errors);
    validate_backends(config, &mut errors);

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "logging.level `{}` is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_rules(config: &SwitchyardConfig, errors: &mut Vec<ConfigError>) {
    let last = config.rules.len().saturating_sub(1);

    for (i, rule) in config.rules.iter().enumerate() {
        if rule.name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("rules[{i}].name must not be empty"),
            });
        }

        let missing = match rule.rule {
            RuleKind::MatchModel if blank(rule.model_name.as_deref()) => Some("model_name"),
            RuleKind::MatchTool if blank(rule.tool_name.as_deref()) => Some("tool_name"),
            RuleKind::TokenCount if rule.threshold.is_none() => Some("threshold"),
            _ => None,
        };
        if let Some(param) = missing {
            errors.push(ConfigError::Validation {
                message: format!(
                    "rules[{i}] (`{}`) of kind `{}` requires `{param}`",
                    rule.name, rule.rule
                ),
            });
        }

        if rule.rule == RuleKind::Default && i != last {
            errors.push(ConfigError::Validation {
                message: format!(
                    "rules[{i}] (`{}`) is a catch-all and must be the last rule",
                    rule.name
                ),
            });
        }
    }
}

fn validate_hooks(config: &SwitchyardConfig, errors: &mut Vec<ConfigError>) {
    let mut seen = HashSet::new();
    for (i, hook) in config.hooks.iter().enumerate() {
        if hook.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("hooks[{i}] must not be empty"),
            });
        } else if !seen.insert(hook.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!("hook `{hook}` is listed more than once"),
            });
        }
    }
}

fn validate_forwarding(config: &SwitchyardConfig, errors: &mut Vec<ConfigError>) {
    let forwarding = &config.forwarding;
    if forwarding.provider.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "forwarding.provider must not be empty".to_string(),
        });
    }
    if forwarding.user_agent_signature.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "forwarding.user_agent_signature must not be empty".to_string(),
        });
    }
    if let Some(host) = forwarding.hostnames.iter().find(|h| h.trim().is_empty()) {
        errors.push(ConfigError::Validation {
            message: format!("forwarding.hostnames contains an empty entry `{host}`"),
        });
    }
}

fn validate_backends(config: &SwitchyardConfig, errors: &mut Vec<ConfigError>) {
    let mut seen = HashSet::new();
    for (i, backend) in config.backends.iter().enumerate() {
        if backend.label.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("backends[{i}].label must not be empty"),
            });
        } else if !seen.insert(backend.label.as_str()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "duplicate backend label `{}` in [[backends]] array",
                    backend.label
                ),
            });
        }
    }
}

fn blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
