// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model resolution: turns the classification label into an outbound model.

use std::sync::Arc;

use switchyard_core::{BackendEntry, DEFAULT_LABEL, RequestContext, SwitchyardError};
use switchyard_router::ModelRouter;
use tracing::{debug, info, warn};

use crate::hook::{Hook, HookContext, HookError};

/// Rewrites the outbound model from the label chosen by the classifier.
///
/// For the `default` label with passthrough enabled, the caller's model is
/// kept and the router is never consulted. Otherwise the router resolves the
/// label (with its own `default` fallback); if nothing resolves, the router
/// is reloaded once and the lookup retried before the request is failed.
#[derive(Debug, Default)]
pub struct RouteHook;

impl Hook for RouteHook {
    fn name(&self) -> &str {
        "route"
    }

    fn run(&self, ctx: &mut RequestContext, hooks: &HookContext) -> Result<(), HookError> {
        let Some(router) = hooks.router.as_deref() else {
            warn!(hook = self.name(), "no router wired in, skipping model resolution");
            return Ok(());
        };

        let label = match ctx.metadata.resolved_label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => {
                warn!("no classification label on request, using default");
                DEFAULT_LABEL.to_string()
            }
        };

        if label == DEFAULT_LABEL && hooks.config.default_model_passthrough {
            match ctx.metadata.alias_model.clone().filter(|m| !m.is_empty()) {
                Some(alias) => {
                    debug!(model = %alias, "passthrough: keeping caller model");
                    ctx.metadata.resolved_model = Some(alias);
                    ctx.metadata.resolved_backend = None;
                    ctx.metadata.is_passthrough = true;
                    return Ok(());
                }
                None => warn!("no caller model recorded for passthrough, routing instead"),
            }
        }

        if let Some(entry) = router.get_for_label(&label) {
            apply_backend(ctx, &label, entry);
            return Ok(());
        }

        warn!(
            label = %label,
            "no backend for label and no default fallback, reloading router"
        );
        resolve_after_reload(ctx, router, &label)
    }
}

fn resolve_after_reload(
    ctx: &mut RequestContext,
    router: &ModelRouter,
    label: &str,
) -> Result<(), HookError> {
    router.reload();
    match router.get_for_label(label) {
        Some(entry) => {
            apply_backend(ctx, label, entry);
            info!(
                label = label,
                model = ?ctx.metadata.resolved_model,
                "routed after router reload"
            );
            Ok(())
        }
        None => Err(HookError::Fatal(SwitchyardError::NoRoute {
            label: label.to_string(),
        })),
    }
}

fn apply_backend(ctx: &mut RequestContext, label: &str, entry: Arc<BackendEntry>) {
    match entry.underlying_model_id.as_deref() {
        Some(model) => ctx.model = Some(model.to_string()),
        // The outbound model is left as the caller sent it.
        None => warn!(
            label = label,
            backend = %entry.label,
            "backend has no model id, outbound model unchanged"
        ),
    }
    ctx.metadata.resolved_model = entry.underlying_model_id.clone();
    ctx.metadata.resolved_backend = Some(entry);
    ctx.metadata.is_passthrough = false;
}
