// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Host-facing entry point.
//!
//! A [`Switchyard`] is built once per process from configuration and a
//! registry source. The host calls [`Switchyard::pre_call`] for every
//! inbound request and one of the `on_*` methods when the completion call
//! finishes.

use std::sync::Arc;

use switchyard_config::SwitchyardConfig;
use switchyard_core::{RegistrySource, RequestContext, SwitchyardError};
use switchyard_hooks::{HookContext, HookRegistry, Pipeline};
use switchyard_router::{Classifier, ModelRouter, StaticRegistry};
use switchyard_security::redact;
use tracing::{debug, error, info};

use crate::decision::RoutingDecision;
use crate::outcome::{MAX_ERROR_MESSAGE_CHARS, OutcomeEvent, truncate_chars};

/// Routes requests and reports their outcomes.
#[derive(Debug)]
pub struct Switchyard {
    hooks: HookContext,
    pipeline: Pipeline,
}

impl Switchyard {
    /// Build with the built-in hooks over `registry`.
    pub fn new(
        config: SwitchyardConfig,
        registry: Arc<dyn RegistrySource>,
    ) -> Result<Self, SwitchyardError> {
        Self::with_hooks(config, registry, &HookRegistry::with_builtins())
    }

    /// Build with the backends listed in the configuration.
    pub fn from_config(config: SwitchyardConfig) -> Result<Self, SwitchyardError> {
        let registry = Arc::new(StaticRegistry::from_config(&config.backends));
        Self::new(config, registry)
    }

    /// Build resolving hook names against a caller-supplied registry.
    ///
    /// Fails if a rule is misconfigured or a configured hook name is not
    /// registered.
    pub fn with_hooks(
        config: SwitchyardConfig,
        registry: Arc<dyn RegistrySource>,
        hook_registry: &HookRegistry,
    ) -> Result<Self, SwitchyardError> {
        let classifier = Classifier::from_config(&config.rules)?;
        let pipeline = Pipeline::from_names(hook_registry, &config.hooks)?;

        debug!(
            hooks = ?pipeline.names().collect::<Vec<_>>(),
            labels = ?classifier.table().labels().collect::<Vec<_>>(),
            "switchyard initialized"
        );

        let hooks = HookContext::new(Arc::new(config))
            .with_classifier(Arc::new(classifier))
            .with_router(Arc::new(ModelRouter::new(registry)));

        Ok(Self { hooks, pipeline })
    }

    pub fn config(&self) -> &SwitchyardConfig {
        &self.hooks.config
    }

    pub fn router(&self) -> Option<&ModelRouter> {
        self.hooks.router.as_deref()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run the pipeline over one request and log the routing decision.
    ///
    /// Only an unroutable request is an error; every other stage failure is
    /// logged and the request proceeds with whatever the stages managed.
    pub fn pre_call(&self, ctx: &mut RequestContext) -> Result<RoutingDecision, SwitchyardError> {
        if let Some(thinking) = ctx.extra.get("thinking") {
            debug!(thinking = %thinking, "request carries thinking parameters");
        }

        self.pipeline.execute(ctx, &self.hooks)?;

        let decision = RoutingDecision::from_metadata(&ctx.metadata);
        decision.log();
        Ok(decision)
    }

    pub fn on_success(&self, event: &OutcomeEvent) {
        let usage = event.usage.unwrap_or_default();
        info!(
            event = "request_completed",
            label = event.label.as_deref().unwrap_or("unknown"),
            model = event.model.as_deref().unwrap_or("unknown"),
            duration_ms = event.duration_ms(),
            has_usage = event.usage.is_some(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            total_tokens = usage.total_tokens,
            "request completed"
        );
    }

    pub fn on_failure(&self, event: &OutcomeEvent) {
        let message = event.error.as_deref().map(|e| {
            let redacted = redact(e);
            truncate_chars(&redacted, MAX_ERROR_MESSAGE_CHARS).to_string()
        });
        error!(
            event = "request_failed",
            label = event.label.as_deref().unwrap_or("unknown"),
            model = event.model.as_deref().unwrap_or("unknown"),
            duration_ms = event.duration_ms(),
            error_type = event.error_type.as_deref().unwrap_or("unknown"),
            error_message = message.as_deref(),
            "request failed"
        );
    }

    pub fn on_stream_complete(&self, event: &OutcomeEvent) {
        info!(
            event = "stream_completed",
            label = event.label.as_deref().unwrap_or("unknown"),
            model = event.model.as_deref().unwrap_or("unknown"),
            duration_ms = event.duration_ms(),
            streaming = true,
            "streaming request completed"
        );
    }
}
