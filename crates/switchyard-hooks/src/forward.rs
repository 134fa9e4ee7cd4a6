// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caller credential forwarding.
//!
//! A caller's own bearer credential is copied onto the outbound request only
//! when the caller is the provider's first-party CLI and the request's final
//! destination is that provider's direct API. Requests routed to a reseller
//! of the same models (Vertex, Bedrock, ...) never receive it.

use secrecy::{ExposeSecret, SecretString};
use switchyard_config::ForwardingConfig;
use switchyard_core::RequestContext;
use tracing::{debug, info};

use crate::hook::{Hook, HookContext, HookError};

/// Header carrying the caller credential, both inbound and outbound.
pub const AUTHORIZATION: &str = "authorization";

/// Why a credential was not forwarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The user agent is not the provider's CLI.
    UserAgent,
    /// The request is not headed to the provider's direct API.
    NotPrimaryProvider,
    /// No non-empty credential was supplied.
    NoCredential,
}

/// Outcome of the forwarding check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForwardDecision {
    Forward,
    Skip(SkipReason),
}

/// Which destinations count as the primary provider.
#[derive(Debug, Clone)]
pub struct ForwardingPolicy {
    provider: String,
    hostnames: Vec<String>,
    model_family_prefix: String,
    user_agent_signature: String,
}

impl Default for ForwardingPolicy {
    fn default() -> Self {
        Self::from_config(&ForwardingConfig::default())
    }
}

impl ForwardingPolicy {
    pub fn from_config(config: &ForwardingConfig) -> Self {
        Self {
            provider: config.provider.clone(),
            hostnames: config.hostnames.clone(),
            model_family_prefix: config.model_family_prefix.clone(),
            user_agent_signature: config.user_agent_signature.clone(),
        }
    }

    /// Whether a request with these routing facts lands on the primary provider.
    ///
    /// Checks short-circuit in order: an explicit `api_base` decides alone by
    /// hostname; otherwise a matching `custom_provider` decides; otherwise,
    /// with neither set, the model name's namespace or family prefix decides.
    pub fn targets_primary(
        &self,
        api_base: Option<&str>,
        custom_provider: Option<&str>,
        model: Option<&str>,
    ) -> bool {
        let api_base = api_base.filter(|s| !s.is_empty());
        let custom_provider = custom_provider.filter(|s| !s.is_empty());

        if let Some(api_base) = api_base {
            return match url::Url::parse(api_base) {
                Ok(url) => url
                    .host_str()
                    .is_some_and(|host| self.hostnames.iter().any(|h| h == host)),
                Err(e) => {
                    debug!(api_base = api_base, error = %e, "unparseable api_base, not forwarding");
                    false
                }
            };
        }

        if let Some(custom_provider) = custom_provider {
            return custom_provider == self.provider;
        }

        let namespace = format!("{}/", self.provider);
        model.is_some_and(|m| {
            m.starts_with(&namespace)
                || (!self.model_family_prefix.is_empty() && m.starts_with(&self.model_family_prefix))
        })
    }

    /// Whether `user_agent` identifies the provider's CLI.
    pub fn is_cli(&self, user_agent: Option<&str>) -> bool {
        user_agent.is_some_and(|ua| ua.contains(self.user_agent_signature.as_str()))
    }

    /// Decide whether `ctx`'s credential may be forwarded.
    pub fn decide(&self, ctx: &RequestContext) -> ForwardDecision {
        if !self.is_cli(ctx.header("user-agent")) {
            return ForwardDecision::Skip(SkipReason::UserAgent);
        }

        let backend = ctx.metadata.resolved_backend.as_deref();
        let primary = self.targets_primary(
            backend.and_then(|b| b.api_base.as_deref()),
            backend.and_then(|b| b.custom_provider.as_deref()),
            destination_model(ctx),
        );
        if !primary {
            return ForwardDecision::Skip(SkipReason::NotPrimaryProvider);
        }

        let has_credential = ctx
            .secret_fields
            .raw_header(AUTHORIZATION)
            .is_some_and(|v| !v.expose_secret().is_empty());
        if !has_credential {
            return ForwardDecision::Skip(SkipReason::NoCredential);
        }

        ForwardDecision::Forward
    }
}

/// The model the request is sent with.
///
/// Once a backend is resolved only its model counts; a backend without a
/// model id yields `None`. Without a backend (passthrough, or no routing
/// stage) the resolved model falls back to the outbound one.
fn destination_model(ctx: &RequestContext) -> Option<&str> {
    let resolved = ctx.metadata.resolved_model.as_deref();
    if ctx.metadata.resolved_backend.is_some() {
        resolved
    } else {
        resolved.or(ctx.model.as_deref())
    }
}

/// Copies the caller credential onto the outbound request when the policy allows.
#[derive(Debug, Default)]
pub struct ForwardCredentialHook;

impl Hook for ForwardCredentialHook {
    fn name(&self) -> &str {
        "forward_credential"
    }

    fn run(&self, ctx: &mut RequestContext, hooks: &HookContext) -> Result<(), HookError> {
        let decision = hooks.forwarding.decide(ctx);
        let ForwardDecision::Forward = decision else {
            debug!(decision = ?decision, "credential not forwarded");
            return Ok(());
        };

        let Some(credential) = ctx
            .secret_fields
            .raw_header(AUTHORIZATION)
            .map(|v| SecretString::from(v.expose_secret().to_string()))
        else {
            return Ok(());
        };
        ctx.provider_specific_headers
            .insert_extra(AUTHORIZATION, credential);

        info!(
            event = "credential_forwarding",
            user_agent = ctx.header("user-agent").unwrap_or_default(),
            model = destination_model(ctx).unwrap_or_default(),
            auth_present = true,
            "forwarding caller credential to primary provider"
        );
        Ok(())
    }
}
