// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The routing decision summary logged once per request.

use serde_json::{Map, Value};
use strum::Display;
use switchyard_core::RoutingMetadata;
use tracing::info;

/// How the outbound model relates to the one the caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    /// The caller's model was kept without consulting the router.
    Passthrough,
    /// A backend was chosen but serves the model the caller asked for.
    NoChange,
    /// The request was sent to a different model.
    Routed,
}

/// Facts about one routing decision, safe to log.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub label: Option<String>,
    pub original_model: Option<String>,
    pub resolved_model: Option<String>,
    pub backend: Option<String>,
    pub is_passthrough: bool,
    /// Backend metadata with credential-bearing keys removed.
    pub backend_info: Map<String, Value>,
}

impl RoutingDecision {
    pub fn from_metadata(metadata: &RoutingMetadata) -> Self {
        let backend = metadata.resolved_backend.as_deref();
        Self {
            label: metadata.resolved_label.clone(),
            original_model: metadata.alias_model.clone(),
            resolved_model: metadata.resolved_model.clone(),
            backend: backend.map(|b| b.label.clone()),
            is_passthrough: metadata.is_passthrough,
            backend_info: backend.map(|b| b.safe_extra_info()).unwrap_or_default(),
        }
    }

    pub fn kind(&self) -> DecisionKind {
        if self.is_passthrough {
            DecisionKind::Passthrough
        } else if self.original_model == self.resolved_model {
            DecisionKind::NoChange
        } else {
            DecisionKind::Routed
        }
    }

    /// Emit the decision as a structured `info` event.
    pub fn log(&self) {
        let backend_info = (!self.backend_info.is_empty())
            .then(|| Value::Object(self.backend_info.clone()).to_string());
        info!(
            event = "routing_decision",
            kind = %self.kind(),
            label = self.label.as_deref().unwrap_or_default(),
            original_model = self.original_model.as_deref().unwrap_or_default(),
            routed_model = self.resolved_model.as_deref().unwrap_or_default(),
            backend = self.backend.as_deref(),
            is_passthrough = self.is_passthrough,
            backend_info = backend_info.as_deref(),
            "routing decision"
        );
    }
}
