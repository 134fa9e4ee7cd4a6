// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Backend registry snapshot trait.

use crate::error::SwitchyardError;
use crate::types::BackendEntry;

/// Provider of backend registry snapshots.
///
/// Implementations may block (for example while the host gateway finishes
/// starting up); the router calls [`RegistrySource::snapshot`] while holding
/// its load lock.
pub trait RegistrySource: Send + Sync {
    /// Returns the current ordered list of backend entries.
    ///
    /// An upstream that is not ready yet returns `Ok(vec![])`. `Err` is
    /// reserved for genuine faults.
    fn snapshot(&self) -> Result<Vec<BackendEntry>, SwitchyardError>;
}
