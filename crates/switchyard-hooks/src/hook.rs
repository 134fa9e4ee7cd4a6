// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The pipeline stage trait and the context shared by every stage.

use std::sync::Arc;

use switchyard_config::SwitchyardConfig;
use switchyard_core::{RequestContext, SwitchyardError};
use switchyard_router::{Classifier, ModelRouter};
use thiserror::Error;

use crate::forward::ForwardingPolicy;

/// How a stage failed.
#[derive(Debug, Error)]
pub enum HookError {
    /// The pipeline logs the error and moves on to the next stage.
    #[error(transparent)]
    Recoverable(SwitchyardError),

    /// The request cannot be served; the pipeline stops and propagates.
    #[error(transparent)]
    Fatal(SwitchyardError),
}

impl HookError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookError::Fatal(_))
    }

    pub fn into_inner(self) -> SwitchyardError {
        match self {
            HookError::Recoverable(e) | HookError::Fatal(e) => e,
        }
    }
}

impl From<SwitchyardError> for HookError {
    fn from(e: SwitchyardError) -> Self {
        HookError::Recoverable(e)
    }
}

/// A single stage of request processing.
///
/// Stages mutate the request context in place. A stage that returns
/// [`HookError::Recoverable`] may leave partial mutations behind; later
/// stages still run.
pub trait Hook: Send + Sync {
    /// Stable name used in configuration and diagnostics.
    fn name(&self) -> &str;

    /// Process one request.
    fn run(&self, ctx: &mut RequestContext, hooks: &HookContext) -> Result<(), HookError>;
}

/// Process-wide state available to every stage.
///
/// Built once at startup and shared across requests. The classifier and
/// router are optional so a pipeline can run with partial wiring; stages
/// that need a missing collaborator skip themselves.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub config: Arc<SwitchyardConfig>,
    pub classifier: Option<Arc<Classifier>>,
    pub router: Option<Arc<ModelRouter>>,
    pub forwarding: Arc<ForwardingPolicy>,
}

impl HookContext {
    /// Context with no classifier or router wired in.
    pub fn new(config: Arc<SwitchyardConfig>) -> Self {
        let forwarding = Arc::new(ForwardingPolicy::from_config(&config.forwarding));
        Self {
            config,
            classifier: None,
            router: None,
            forwarding,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<Classifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_router(mut self, router: Arc<ModelRouter>) -> Self {
        self.router = Some(router);
        self
    }
}
