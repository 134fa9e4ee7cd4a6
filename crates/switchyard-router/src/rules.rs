// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification rules.
//!
//! Each rule is a pure predicate over a [`RequestContext`]. Rules never fail:
//! malformed request shapes simply do not match.

use serde_json::Value;
use switchyard_config::{RuleConfig, RuleKind};
use switchyard_core::{RequestContext, SwitchyardError};

use crate::tokens::{TokenCounter, declared_count, message_text};

/// A single classification predicate.
#[derive(Debug)]
pub enum Rule {
    /// Matches when the request carries a top-level `thinking` field.
    Thinking,
    /// Matches when the model name contains the substring (case-sensitive).
    MatchModel(String),
    /// Matches when the estimated input token count exceeds the threshold.
    TokenCount {
        threshold: u64,
        counter: TokenCounter,
    },
    /// Matches when any declared tool name contains the substring (case-insensitive).
    MatchTool(String),
    /// Always matches. Only valid as the last rule of a table.
    Default,
}

impl Rule {
    pub fn match_model(substring: impl Into<String>) -> Self {
        Rule::MatchModel(substring.into())
    }

    pub fn token_count(threshold: u64) -> Self {
        Rule::TokenCount {
            threshold,
            counter: TokenCounter::new(),
        }
    }

    /// The tool name is stored lowercased.
    pub fn match_tool(name: impl Into<String>) -> Self {
        Rule::MatchTool(name.into().to_lowercase())
    }

    /// Build a rule from its configuration entry.
    pub fn from_config(config: &RuleConfig) -> Result<Self, SwitchyardError> {
        let missing = |param: &str| {
            SwitchyardError::Config(format!(
                "rule `{}` of kind `{}` requires `{param}`",
                config.name, config.rule
            ))
        };

        match config.rule {
            RuleKind::Thinking => Ok(Rule::Thinking),
            RuleKind::MatchModel => config
                .model_name
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(Rule::match_model)
                .ok_or_else(|| missing("model_name")),
            RuleKind::TokenCount => config
                .threshold
                .map(Rule::token_count)
                .ok_or_else(|| missing("threshold")),
            RuleKind::MatchTool => config
                .tool_name
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(Rule::match_tool)
                .ok_or_else(|| missing("tool_name")),
            RuleKind::Default => Ok(Rule::Default),
        }
    }

    /// Whether this rule always matches.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Rule::Default)
    }

    /// Short kind name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Rule::Thinking => "thinking",
            Rule::MatchModel(_) => "match_model",
            Rule::TokenCount { .. } => "token_count",
            Rule::MatchTool(_) => "match_tool",
            Rule::Default => "default",
        }
    }

    pub fn evaluate(&self, ctx: &RequestContext) -> bool {
        match self {
            Rule::Thinking => ctx.has_field("thinking"),
            Rule::MatchModel(substring) => ctx
                .model
                .as_deref()
                .is_some_and(|model| model.contains(substring.as_str())),
            Rule::TokenCount { threshold, counter } => {
                let text = message_text(&ctx.messages);
                let counted = counter.count(&text, ctx.model.as_deref());
                let declared = declared_count(&ctx.extra).unwrap_or(0);
                counted.max(declared) > *threshold
            }
            Rule::MatchTool(name) => ctx
                .tools
                .as_deref()
                .unwrap_or_default()
                .iter()
                .any(|tool| tool_matches(tool, name)),
            Rule::Default => true,
        }
    }
}

fn tool_matches(tool: &Value, needle: &str) -> bool {
    let contains = |v: Option<&Value>| {
        v.and_then(Value::as_str)
            .is_some_and(|name| name.to_lowercase().contains(needle))
    };

    match tool {
        Value::Object(map) => {
            contains(map.get("name"))
                || contains(map.get("function").and_then(|f| f.get("name")))
        }
        Value::String(_) => contains(Some(tool)),
        _ => false,
    }
}
