// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Switchyard: per-request model routing for LLM gateways.
//!
//! Classifies each inbound request into a label, resolves the label to a
//! backend model, and forwards the caller's credential only when the final
//! destination is the primary provider's own API.
//!
//! # Usage
//!
//! ```no_run
//! use switchyard::{RequestContext, Switchyard};
//!
//! let config = switchyard_config::load_and_validate().expect("config errors");
//! switchyard::telemetry::init_tracing(&config).ok();
//! let switchyard = Switchyard::from_config(config).expect("invalid pipeline");
//!
//! let body = serde_json::json!({"model": "claude-sonnet-4", "messages": []});
//! let mut ctx = RequestContext::from_body(body).expect("object body");
//! let decision = switchyard.pre_call(&mut ctx).expect("routable request");
//! println!("{}: {:?}", decision.kind(), ctx.model);
//! ```

pub mod decision;
pub mod handler;
pub mod outcome;
pub mod telemetry;

pub use decision::{DecisionKind, RoutingDecision};
pub use handler::Switchyard;
pub use outcome::{OutcomeEvent, Timestamp, TokenUsage, duration_ms};
pub use switchyard_core::{BackendEntry, RegistrySource, RequestContext, SwitchyardError};
