// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Switchyard.

use thiserror::Error;

/// The primary error type shared by the router, hooks, and handler crates.
#[derive(Debug, Error)]
pub enum SwitchyardError {
    /// Configuration errors (bad rule parameters, unknown hook names, misplaced catch-all).
    #[error("configuration error: {0}")]
    Config(String),

    /// The inbound request could not be turned into a request context.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The backend registry failed to produce a snapshot.
    #[error("registry error: {message}")]
    Registry {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No backend could be resolved for a label, even after a forced reload.
    #[error(
        "no model configured for label `{label}` and no `default` model available as fallback"
    )]
    NoRoute { label: String },

    /// A pipeline hook failed.
    #[error("hook `{hook}` failed: {message}")]
    Hook { hook: String, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SwitchyardError {
    /// Short, stable name of the variant for structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            SwitchyardError::Config(_) => "config",
            SwitchyardError::InvalidRequest(_) => "invalid_request",
            SwitchyardError::Registry { .. } => "registry",
            SwitchyardError::NoRoute { .. } => "no_route",
            SwitchyardError::Hook { .. } => "hook",
            SwitchyardError::Internal(_) => "internal",
        }
    }
}
