// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request pipeline for Switchyard.
//!
//! Every inbound request runs through an ordered list of [`Hook`]s sharing a
//! process-wide [`HookContext`]. The standard pipeline is:
//!
//! 1. `classify` - label the request ([`ClassifyHook`])
//! 2. `route` - resolve the label to an outbound model ([`RouteHook`])
//! 3. `forward_credential` - forward the caller credential when the
//!    destination is the primary provider ([`ForwardCredentialHook`])

pub mod classify;
pub mod forward;
pub mod hook;
pub mod pipeline;
pub mod registry;
pub mod route;

pub use classify::ClassifyHook;
pub use forward::{ForwardCredentialHook, ForwardDecision, ForwardingPolicy, SkipReason};
pub use hook::{Hook, HookContext, HookError};
pub use pipeline::Pipeline;
pub use registry::HookRegistry;
pub use route::RouteHook;
