// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered execution of hooks over one request.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use switchyard_core::{RequestContext, SwitchyardError};
use tracing::{error, trace};

use crate::hook::{Hook, HookContext, HookError};
use crate::registry::HookRegistry;

/// An ordered list of resolved hooks.
#[derive(Clone)]
pub struct Pipeline {
    hooks: Vec<Arc<dyn Hook>>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("hooks", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl Pipeline {
    pub fn new(hooks: Vec<Arc<dyn Hook>>) -> Self {
        Self { hooks }
    }

    /// Build a pipeline from configured hook names.
    pub fn from_names<S: AsRef<str>>(
        registry: &HookRegistry,
        names: &[S],
    ) -> Result<Self, SwitchyardError> {
        registry.resolve(names).map(Self::new)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.iter().map(|h| h.name())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Run every hook in order against `ctx`.
    ///
    /// A recoverable hook failure is logged and the next hook runs against
    /// whatever state the failed hook left. A panicking hook is treated the
    /// same way. A fatal failure stops the pipeline and is returned.
    pub fn execute(
        &self,
        ctx: &mut RequestContext,
        hooks: &HookContext,
    ) -> Result<(), SwitchyardError> {
        for hook in &self.hooks {
            trace!(hook = hook.name(), "running hook");
            match run_isolated(hook.as_ref(), ctx, hooks) {
                Ok(()) => {}
                Err(HookError::Recoverable(e)) => {
                    error!(
                        hook = hook.name(),
                        error_kind = e.kind(),
                        error = %e,
                        "hook failed, continuing pipeline"
                    );
                }
                Err(HookError::Fatal(e)) => {
                    error!(
                        hook = hook.name(),
                        error_kind = e.kind(),
                        error = %e,
                        "hook failed fatally, aborting request"
                    );
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

/// Run one hook, turning a panic into a recoverable error.
fn run_isolated(
    hook: &dyn Hook,
    ctx: &mut RequestContext,
    hooks: &HookContext,
) -> Result<(), HookError> {
    panic::catch_unwind(AssertUnwindSafe(|| hook.run(ctx, hooks))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "hook panicked".to_string());
        Err(HookError::Recoverable(SwitchyardError::Hook {
            hook: hook.name().to_string(),
            message: format!("panicked: {message}"),
        }))
    })
}
