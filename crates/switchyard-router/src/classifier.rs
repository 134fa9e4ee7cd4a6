// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered, first-match request classification.
//!
//! A [`ClassificationTable`] always ends with exactly one catch-all rule, so
//! [`Classifier::classify`] is total: every request receives a label.

use switchyard_config::RuleConfig;
use switchyard_core::{DEFAULT_LABEL, RequestContext, SwitchyardError};
use tracing::debug;

use crate::rules::Rule;

/// Ordered `(label, rule)` pairs terminated by a catch-all.
#[derive(Debug)]
pub struct ClassificationTable {
    entries: Vec<(String, Rule)>,
}

impl ClassificationTable {
    /// Build a table from `(label, rule)` pairs.
    ///
    /// If no catch-all is present one is appended under the `default` label.
    /// A catch-all anywhere but last is rejected, since every rule after it
    /// would be unreachable.
    pub fn new(entries: Vec<(String, Rule)>) -> Result<Self, SwitchyardError> {
        let mut entries = entries;
        let last = entries.len().saturating_sub(1);

        match entries.iter().position(|(_, rule)| rule.is_catch_all()) {
            Some(pos) if pos != last => {
                return Err(SwitchyardError::Config(format!(
                    "catch-all rule `{}` must be the last rule, found at position {pos} of {}",
                    entries[pos].0,
                    entries.len()
                )));
            }
            Some(_) => {}
            None => entries.push((DEFAULT_LABEL.to_string(), Rule::Default)),
        }

        Ok(Self { entries })
    }

    /// Build a table from configured rules, in declaration order.
    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, SwitchyardError> {
        let entries = rules
            .iter()
            .map(|config| Ok((config.name.clone(), Rule::from_config(config)?)))
            .collect::<Result<Vec<_>, SwitchyardError>>()?;
        Self::new(entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a table holds at least its catch-all.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in evaluation order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    fn catch_all_label(&self) -> &str {
        self.entries
            .last()
            .map_or(DEFAULT_LABEL, |(label, _)| label.as_str())
    }
}

/// Maps a request to the label of the first matching rule.
#[derive(Debug)]
pub struct Classifier {
    table: ClassificationTable,
}

impl Classifier {
    pub fn new(table: ClassificationTable) -> Self {
        Self { table }
    }

    pub fn from_config(rules: &[RuleConfig]) -> Result<Self, SwitchyardError> {
        ClassificationTable::from_config(rules).map(Self::new)
    }

    pub fn table(&self) -> &ClassificationTable {
        &self.table
    }

    /// Classify `ctx`. Pure: reads the context, never mutates it.
    pub fn classify(&self, ctx: &RequestContext) -> String {
        let label = self
            .table
            .entries
            .iter()
            .find(|(_, rule)| rule.evaluate(ctx))
            .map_or_else(|| self.table.catch_all_label(), |(label, _)| label.as_str());

        debug!(label = label, model = ?ctx.model, "request classified");
        label.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use switchyard_config::RuleKind;

    fn table(entries: Vec<(&str, Rule)>) -> ClassificationTable {
        ClassificationTable::new(
            entries
                .into_iter()
                .map(|(label, rule)| (label.to_string(), rule))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn appends_catch_all_when_missing() {
        let table = table(vec![("think", Rule::Thinking)]);
        assert_eq!(table.labels().collect::<Vec<_>>(), ["think", "default"]);
    }

    #[test]
    fn keeps_explicit_catch_all_label() {
        let table = table(vec![("think", Rule::Thinking), ("fallback", Rule::Default)]);
        assert_eq!(table.len(), 2);

        let classifier = Classifier::new(table);
        assert_eq!(classifier.classify(&RequestContext::new("m")), "fallback");
    }

    #[test]
    fn rejects_catch_all_before_other_rules() {
        let err = ClassificationTable::new(vec![
            ("default".to_string(), Rule::Default),
            ("think".to_string(), Rule::Thinking),
        ])
        .unwrap_err();
        assert!(matches!(err, SwitchyardError::Config(_)));
        assert!(err.to_string().contains("must be the last rule"));
    }

    #[test]
    fn earlier_rule_wins_when_both_match() {
        let classifier = Classifier::new(table(vec![
            ("think", Rule::Thinking),
            ("background", Rule::match_model("haiku")),
        ]));
        let ctx = RequestContext::from_body(json!({
            "model": "claude-3-5-haiku",
            "thinking": {"type": "enabled"}
        }))
        .unwrap();
        assert_eq!(classifier.classify(&ctx), "think");
    }

    #[test]
    fn from_config_preserves_order() {
        let classifier = Classifier::from_config(&[
            RuleConfig::new("think", RuleKind::Thinking),
            RuleConfig::match_model("background", "haiku"),
            RuleConfig::match_tool("web", "web_search"),
        ])
        .unwrap();
        assert_eq!(
            classifier.table().labels().collect::<Vec<_>>(),
            ["think", "background", "web", "default"]
        );

        let ctx = RequestContext::from_body(json!({
            "model": "claude-3-5-haiku",
            "tools": [{"name": "web_search"}]
        }))
        .unwrap();
        assert_eq!(classifier.classify(&ctx), "background");
    }

    #[test]
    fn from_config_surfaces_rule_errors() {
        let err = Classifier::from_config(&[RuleConfig::new("bg", RuleKind::MatchModel)])
            .unwrap_err();
        assert!(matches!(err, SwitchyardError::Config(_)));
    }

    #[test]
    fn several_rules_can_share_a_label() {
        let classifier = Classifier::from_config(&[
            RuleConfig::match_model("background", "haiku"),
            RuleConfig::match_tool("background", "todo"),
        ])
        .unwrap();

        let by_model = RequestContext::new("claude-3-5-haiku");
        assert_eq!(classifier.classify(&by_model), "background");

        let by_tool = RequestContext::from_body(json!({
            "model": "claude-sonnet-4",
            "tools": [{"name": "TodoWrite"}]
        }))
        .unwrap();
        assert_eq!(classifier.classify(&by_tool), "background");

        let neither = RequestContext::new("claude-sonnet-4");
        assert_eq!(classifier.classify(&neither), "default");
    }

    fn arb_body() -> impl Strategy<Value = serde_json::Value> {
        (
            proptest::option::of("[a-z0-9-]{0,16}"),
            any::<bool>(),
            proptest::collection::vec("[a-z_]{1,10}", 0..3),
            proptest::collection::vec("[ a-z]{0,40}", 0..4),
        )
            .prop_map(|(model, thinking, tools, messages)| {
                let mut body = serde_json::Map::new();
                if let Some(model) = model {
                    body.insert("model".into(), json!(model));
                }
                if thinking {
                    body.insert("thinking".into(), json!({"type": "enabled"}));
                }
                let tools: Vec<_> = tools.into_iter().map(|n| json!({"name": n})).collect();
                body.insert("tools".into(), json!(tools));
                let messages: Vec<_> = messages
                    .into_iter()
                    .map(|c| json!({"role": "user", "content": c}))
                    .collect();
                body.insert("messages".into(), json!(messages));
                serde_json::Value::Object(body)
            })
    }

    proptest! {
        #[test]
        fn classify_is_total(body in arb_body()) {
            let classifier = Classifier::new(table(vec![
                ("think", Rule::Thinking),
                ("background", Rule::match_model("haiku")),
                ("web", Rule::match_tool("search")),
            ]));
            let ctx = RequestContext::from_body(body).unwrap();
            let label = classifier.classify(&ctx);
            prop_assert!(["think", "background", "web", "default"].contains(&label.as_str()));

            let any_specific = Rule::Thinking.evaluate(&ctx)
                || Rule::match_model("haiku").evaluate(&ctx)
                || Rule::match_tool("search").evaluate(&ctx);
            if !any_specific {
                prop_assert_eq!(label, "default");
            }
        }

        #[test]
        fn first_declared_match_wins(model in "[a-z]{0,6}haiku[a-z]{0,6}") {
            let ctx = RequestContext::new(model);
            let forward = Classifier::new(table(vec![
                ("a", Rule::match_model("haiku")),
                ("b", Rule::match_model("ku")),
            ]));
            let reversed = Classifier::new(table(vec![
                ("b", Rule::match_model("ku")),
                ("a", Rule::match_model("haiku")),
            ]));
            prop_assert_eq!(forward.classify(&ctx), "a");
            prop_assert_eq!(reversed.classify(&ctx), "b");
        }
    }
}
