// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Switchyard.
//!
//! This crate provides the error type, the per-request context threaded
//! through the hook pipeline, backend entry types, and the collaborator
//! traits the router reads from.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::SwitchyardError;
pub use traits::RegistrySource;
pub use types::{
    BackendEntry, DEFAULT_LABEL, ProviderHeaders, RequestContext, RoutingMetadata, SecretFields,
};
