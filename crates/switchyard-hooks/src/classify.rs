// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use switchyard_core::RequestContext;
use tracing::warn;

use crate::hook::{Hook, HookContext, HookError};

/// Records the caller's model and the classification label in the routing metadata.
#[derive(Debug, Default)]
pub struct ClassifyHook;

impl Hook for ClassifyHook {
    fn name(&self) -> &str {
        "classify"
    }

    fn run(&self, ctx: &mut RequestContext, hooks: &HookContext) -> Result<(), HookError> {
        let Some(classifier) = hooks.classifier.as_deref() else {
            warn!(hook = self.name(), "no classifier wired in, skipping classification");
            return Ok(());
        };

        ctx.metadata.alias_model = ctx.model.clone();
        ctx.metadata.resolved_label = Some(classifier.classify(ctx));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use switchyard_config::SwitchyardConfig;
    use switchyard_router::{ClassificationTable, Classifier, Rule};
    use tracing_test::traced_test;

    fn hooks_with_classifier() -> HookContext {
        let table =
            ClassificationTable::new(vec![("think".to_string(), Rule::Thinking)]).unwrap();
        HookContext::new(Arc::new(SwitchyardConfig::default()))
            .with_classifier(Arc::new(Classifier::new(table)))
    }

    #[test]
    fn records_alias_and_label() {
        let mut ctx = RequestContext::from_body(json!({
            "model": "claude-sonnet-4",
            "thinking": {"type": "enabled"}
        }))
        .unwrap();
        ClassifyHook.run(&mut ctx, &hooks_with_classifier()).unwrap();

        assert_eq!(ctx.metadata.alias_model.as_deref(), Some("claude-sonnet-4"));
        assert_eq!(ctx.metadata.resolved_label.as_deref(), Some("think"));
        assert_eq!(ctx.model.as_deref(), Some("claude-sonnet-4"));
    }

    #[test]
    fn missing_model_records_no_alias() {
        let mut ctx = RequestContext::default();
        ClassifyHook.run(&mut ctx, &hooks_with_classifier()).unwrap();
        assert!(ctx.metadata.alias_model.is_none());
        assert_eq!(ctx.metadata.resolved_label.as_deref(), Some("default"));
    }

    #[traced_test]
    #[test]
    fn without_classifier_is_a_noop() {
        let hooks = HookContext::new(Arc::new(SwitchyardConfig::default()));
        let mut ctx = RequestContext::new("claude-sonnet-4");
        ClassifyHook.run(&mut ctx, &hooks).unwrap();
        assert!(ctx.metadata.resolved_label.is_none());
        assert!(ctx.metadata.alias_model.is_none());
        assert!(logs_contain("no classifier wired in"));
    }
}
