// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock registry source for deterministic router tests.
//!
//! `MockRegistry` implements `RegistrySource` over an in-memory entry list
//! that tests can replace at any time, and counts every snapshot taken so
//! tests can assert how often the router hit the registry.

use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use switchyard_core::{BackendEntry, RegistrySource, SwitchyardError};

/// An in-memory registry with snapshot counting and failure injection.
#[derive(Debug, Default)]
pub struct MockRegistry {
    entries: Mutex<Vec<BackendEntry>>,
    snapshots: AtomicUsize,
    fail: AtomicBool,
}

impl MockRegistry {
    /// Create a registry serving `entries`.
    pub fn new(entries: Vec<BackendEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    /// Create a registry with no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry whose snapshots fail until [`MockRegistry::set_failing`] clears it.
    pub fn failing() -> Self {
        let registry = Self::default();
        registry.set_failing(true);
        registry
    }

    /// Replace the entries served by later snapshots.
    pub fn set_entries(&self, entries: Vec<BackendEntry>) {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = entries;
    }

    /// Toggle failure injection.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of snapshots taken so far, including failed ones.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.load(Ordering::SeqCst)
    }
}

impl RegistrySource for MockRegistry {
    fn snapshot(&self) -> Result<Vec<BackendEntry>, SwitchyardError> {
        self.snapshots.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(SwitchyardError::Registry {
                message: "mock registry failure".to_string(),
                source: None,
            });
        }
        Ok(self.entries.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }
}
