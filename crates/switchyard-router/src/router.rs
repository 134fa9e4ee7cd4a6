// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Label-to-backend routing over a registry snapshot.
//!
//! The cache is built lazily on first use and swapped in whole on reload.
//! Readers load the current snapshot without locking; loads are serialized
//! by a mutex and guarded by a double-checked `loaded` flag, so concurrent
//! first callers trigger exactly one registry snapshot.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use arc_swap::ArcSwap;
use switchyard_core::{BackendEntry, DEFAULT_LABEL, RegistrySource};
use tracing::{debug, error, info, warn};

/// Immutable lookup structures built from one registry snapshot.
#[derive(Debug, Default)]
pub struct RouterCache {
    by_label: HashMap<String, Arc<BackendEntry>>,
    group_alias: HashMap<String, Vec<String>>,
    entries: Vec<Arc<BackendEntry>>,
}

impl RouterCache {
    /// Build a cache from snapshot entries. Entries with an empty label are skipped.
    pub fn build(snapshot: Vec<BackendEntry>) -> Self {
        let mut cache = Self::default();

        for entry in snapshot {
            if entry.label.is_empty() {
                warn!(
                    model = ?entry.underlying_model_id,
                    "skipping registry entry with empty label"
                );
                continue;
            }

            let entry = Arc::new(entry);
            if let Some(model) = entry.underlying_model_id.as_deref() {
                cache
                    .group_alias
                    .entry(model.to_string())
                    .or_default()
                    .push(entry.label.clone());
            }
            if cache
                .by_label
                .insert(entry.label.clone(), Arc::clone(&entry))
                .is_some()
            {
                debug!(label = %entry.label, "duplicate label in snapshot, later entry wins");
            }
            cache.entries.push(entry);
        }

        cache
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    fn sorted_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.by_label.keys().cloned().collect();
        labels.sort_unstable();
        labels
    }
}

/// Resolves classification labels to backend entries.
pub struct ModelRouter {
    source: Arc<dyn RegistrySource>,
    cache: ArcSwap<RouterCache>,
    loaded: AtomicBool,
    load_lock: Mutex<()>,
}

impl std::fmt::Debug for ModelRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRouter")
            .field("loaded", &self.is_loaded())
            .field("labels", &self.cache.load().sorted_labels())
            .finish()
    }
}

impl ModelRouter {
    /// Create a router over `source`. Nothing is loaded until first use.
    pub fn new(source: Arc<dyn RegistrySource>) -> Self {
        Self {
            source,
            cache: ArcSwap::from_pointee(RouterCache::default()),
            loaded: AtomicBool::new(false),
            load_lock: Mutex::new(()),
        }
    }

    /// Backend for `label`, falling back to the `default` entry.
    ///
    /// Returns `None` only when neither the label nor `default` is present.
    pub fn get_for_label(&self, label: &str) -> Option<Arc<BackendEntry>> {
        let cache = self.snapshot();
        cache
            .by_label
            .get(label)
            .or_else(|| cache.by_label.get(DEFAULT_LABEL))
            .cloned()
    }

    /// All entries in snapshot order.
    pub fn list(&self) -> Vec<Arc<BackendEntry>> {
        self.snapshot().entries.clone()
    }

    /// Sorted labels present in the cache.
    pub fn available_labels(&self) -> Vec<String> {
        self.snapshot().sorted_labels()
    }

    /// Exact label membership, no fallback.
    pub fn is_available(&self, label: &str) -> bool {
        self.snapshot().by_label.contains_key(label)
    }

    /// Underlying model id mapped to the labels that serve it, in snapshot order.
    pub fn group_alias(&self) -> HashMap<String, Vec<String>> {
        self.snapshot().group_alias.clone()
    }

    /// Whether a load has completed (successfully or not).
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Discard the cache and load a fresh snapshot.
    pub fn reload(&self) {
        let _guard = self.lock();
        self.load_locked();
    }

    fn snapshot(&self) -> Arc<RouterCache> {
        self.ensure_loaded();
        self.cache.load_full()
    }

    fn ensure_loaded(&self) {
        if self.loaded.load(Ordering::Acquire) {
            return;
        }
        let _guard = self.lock();
        if self.loaded.load(Ordering::Acquire) {
            return;
        }
        self.load_locked();
    }

    /// Caller must hold `load_lock`.
    fn load_locked(&self) {
        let cache = match self.source.snapshot() {
            Ok(snapshot) => {
                debug!(entries = snapshot.len(), "registry snapshot received");
                RouterCache::build(snapshot)
            }
            Err(e) => {
                error!(error = %e, "registry snapshot failed, router left empty");
                RouterCache::default()
            }
        };

        if cache.is_empty() {
            error!("no backends loaded from registry, check configuration");
        } else {
            info!(
                count = cache.by_label.len(),
                labels = ?cache.sorted_labels(),
                "loaded backends"
            );
        }

        self.cache.store(Arc::new(cache));
        self.loaded.store(true, Ordering::Release);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // The guarded state is the ArcSwap, which a panicking loader cannot corrupt.
        self.load_lock
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use switchyard_core::SwitchyardError;
    use switchyard_test_utils::MockRegistry;
    use tracing_test::traced_test;

    fn router(entries: Vec<BackendEntry>) -> (Arc<MockRegistry>, ModelRouter) {
        let registry = Arc::new(MockRegistry::new(entries));
        let router = ModelRouter::new(registry.clone());
        (registry, router)
    }

    #[test]
    fn falls_back_to_default_entry() {
        let (_, router) = router(vec![BackendEntry::new("default", "model-a")]);
        let entry = router.get_for_label("anything").unwrap();
        assert_eq!(entry.underlying_model_id.as_deref(), Some("model-a"));
    }

    #[test]
    fn no_fallback_without_default() {
        let (_, router) = router(vec![BackendEntry::new("x", "model-b")]);
        assert!(router.get_for_label("anything").is_none());
        assert!(router.get_for_label("x").is_some());
    }

    #[test]
    fn is_available_is_exact() {
        let (_, router) = router(vec![BackendEntry::new("default", "model-a")]);
        assert!(router.is_available("default"));
        assert!(!router.is_available("think"));
    }

    #[test]
    fn loads_lazily_once() {
        let (registry, router) = router(vec![BackendEntry::new("default", "m")]);
        assert!(!router.is_loaded());
        assert_eq!(registry.snapshot_count(), 0);

        router.available_labels();
        router.list();
        router.get_for_label("x");
        assert!(router.is_loaded());
        assert_eq!(registry.snapshot_count(), 1);
    }

    #[test]
    fn reload_is_idempotent_for_unchanged_snapshot() {
        let (registry, router) = router(vec![
            BackendEntry::new("think", "opus"),
            BackendEntry::new("default", "sonnet"),
            BackendEntry::new("background", "haiku"),
        ]);
        router.reload();
        let first = router.available_labels();
        router.reload();
        let second = router.available_labels();

        assert_eq!(first, second);
        assert_eq!(first, ["background", "default", "think"]);
        assert_eq!(registry.snapshot_count(), 2);
    }

    #[test]
    fn reload_picks_up_new_entries() {
        let (registry, router) = router(Vec::new());
        assert!(router.get_for_label("default").is_none());

        registry.set_entries(vec![BackendEntry::new("default", "sonnet")]);
        assert!(router.get_for_label("default").is_none(), "no automatic retry");
        router.reload();
        assert!(router.get_for_label("default").is_some());
    }

    #[test]
    fn list_preserves_snapshot_order() {
        let (_, router) = router(vec![
            BackendEntry::new("think", "opus"),
            BackendEntry::new("default", "sonnet"),
        ]);
        let labels: Vec<_> = router.list().iter().map(|e| e.label.clone()).collect();
        assert_eq!(labels, ["think", "default"]);
    }

    #[test]
    fn group_alias_maps_model_to_labels() {
        let (_, router) = router(vec![
            BackendEntry::new("default", "claude-sonnet-4"),
            BackendEntry::new("think", "claude-sonnet-4"),
            BackendEntry::new("background", "claude-3-5-haiku"),
            BackendEntry::without_model("orphan"),
        ]);
        let aliases = router.group_alias();
        assert_eq!(aliases["claude-sonnet-4"], ["default", "think"]);
        assert_eq!(aliases["claude-3-5-haiku"], ["background"]);
        assert_eq!(aliases.len(), 2);
        assert!(router.is_available("orphan"));
    }

    #[traced_test]
    #[test]
    fn empty_labels_are_skipped() {
        let (_, router) = router(vec![
            BackendEntry::new("", "ghost"),
            BackendEntry::new("default", "sonnet"),
        ]);
        assert_eq!(router.available_labels(), ["default"]);
        assert_eq!(router.list().len(), 1);
        assert!(logs_contain("skipping registry entry with empty label"));
    }

    #[traced_test]
    #[test]
    fn registry_fault_leaves_router_loaded_but_empty() {
        let registry = Arc::new(MockRegistry::failing());
        let router = ModelRouter::new(registry.clone());

        assert!(router.get_for_label("default").is_none());
        assert!(router.is_loaded());
        assert!(router.available_labels().is_empty());
        assert_eq!(registry.snapshot_count(), 1);
        assert!(logs_contain("registry snapshot failed"));
    }

    #[test]
    fn concurrent_first_callers_load_once() {
        let (registry, router) = router(vec![BackendEntry::new("default", "sonnet")]);
        let router = Arc::new(router);

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let router = Arc::clone(&router);
                thread::spawn(move || router.get_for_label("think").is_some())
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert_eq!(registry.snapshot_count(), 1);
    }

    #[test]
    fn router_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ModelRouter>();
        assert_send_sync::<RouterCache>();
    }

    struct BrokenSource;

    impl RegistrySource for BrokenSource {
        fn snapshot(&self) -> Result<Vec<BackendEntry>, SwitchyardError> {
            Err(SwitchyardError::Registry {
                message: "unreachable".into(),
                source: None,
            })
        }
    }

    #[test]
    fn accepts_any_registry_source() {
        let router = ModelRouter::new(Arc::new(BrokenSource));
        assert!(router.list().is_empty());
    }
}
