// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hook registry for resolving configured hook names.
//!
//! The `HookRegistry` maps names to hook instances. Built-in hooks are
//! registered by [`HookRegistry::with_builtins`]; embedders add their own
//! with [`HookRegistry::register`]. Names are resolved once, when the
//! pipeline is built, so a typo fails at startup rather than per request.

use std::collections::HashMap;
use std::sync::Arc;

use switchyard_core::SwitchyardError;

use crate::classify::ClassifyHook;
use crate::forward::ForwardCredentialHook;
use crate::hook::Hook;
use crate::route::RouteHook;

/// Registry of named hooks.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<String, Arc<dyn Hook>>,
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.names())
            .finish()
    }
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `classify`, `route` and `forward_credential`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ClassifyHook));
        registry.register(Arc::new(RouteHook));
        registry.register(Arc::new(ForwardCredentialHook));
        registry
    }

    /// Register a hook under its own name, replacing any previous holder of that name.
    pub fn register(&mut self, hook: Arc<dyn Hook>) {
        self.hooks.insert(hook.name().to_string(), hook);
    }

    /// Get a hook by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Hook>> {
        self.hooks.get(name).cloned()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Resolve `names` in order. Any unknown name is a configuration error.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Arc<dyn Hook>>, SwitchyardError> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.get(name).ok_or_else(|| {
                    SwitchyardError::Config(format!(
                        "unknown hook `{name}`, registered hooks: {}",
                        self.names().join(", ")
                    ))
                })
            })
            .collect()
    }
}
