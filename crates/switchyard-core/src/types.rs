// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request context and backend types shared across Switchyard crates.

use std::collections::BTreeMap;
use std::sync::Arc;

use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::error::SwitchyardError;

/// Label of the catch-all classification and the router's fallback entry.
pub const DEFAULT_LABEL: &str = "default";

/// Keys stripped from `extra_info` before it is logged.
const SENSITIVE_INFO_KEYS: &[&str] = &["api_key", "secret", "token", "password"];

/// A named backend model configuration resolvable from a classification label.
#[derive(Clone, PartialEq)]
pub struct BackendEntry {
    /// Routing label, unique within a registry snapshot.
    pub label: String,
    /// Model identifier sent to the backend. May be missing in malformed registries.
    pub underlying_model_id: Option<String>,
    /// Explicit API base URL for the backend.
    pub api_base: Option<String>,
    /// Provider identifier when the backend is not inferred from the model name.
    pub custom_provider: Option<String>,
    /// Opaque provider metadata. May contain secrets.
    pub extra_info: Map<String, Value>,
}

impl BackendEntry {
    /// Create an entry mapping `label` to `model`.
    pub fn new(label: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            underlying_model_id: Some(model.into()),
            api_base: None,
            custom_provider: None,
            extra_info: Map::new(),
        }
    }

    /// Create an entry with no underlying model id.
    pub fn without_model(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            underlying_model_id: None,
            api_base: None,
            custom_provider: None,
            extra_info: Map::new(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn with_custom_provider(mut self, provider: impl Into<String>) -> Self {
        self.custom_provider = Some(provider.into());
        self
    }

    pub fn with_extra_info(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_info.insert(key.into(), value);
        self
    }

    /// Copy of `extra_info` with credential-bearing keys removed.
    pub fn safe_extra_info(&self) -> Map<String, Value> {
        self.extra_info
            .iter()
            .filter(|(k, _)| !SENSITIVE_INFO_KEYS.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

impl std::fmt::Debug for BackendEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // extra_info values are never printed; only the key names.
        f.debug_struct("BackendEntry")
            .field("label", &self.label)
            .field("underlying_model_id", &self.underlying_model_id)
            .field("api_base", &self.api_base)
            .field("custom_provider", &self.custom_provider)
            .field("extra_info_keys", &self.extra_info.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Intermediate routing facts written by the pipeline hooks.
#[derive(Debug, Clone, Default)]
pub struct RoutingMetadata {
    /// The model the caller originally asked for.
    pub alias_model: Option<String>,
    /// Label produced by the classifier.
    pub resolved_label: Option<String>,
    /// Model the request is sent with after routing.
    pub resolved_model: Option<String>,
    /// Backend chosen by the router. `None` in passthrough mode.
    pub resolved_backend: Option<Arc<BackendEntry>>,
    /// Whether the caller's model was kept instead of routing.
    pub is_passthrough: bool,
    /// Caller-supplied metadata carried through untouched.
    pub extra: Map<String, Value>,
}

/// Secret side-channel holding raw transport values that must never be logged.
#[derive(Debug, Default)]
pub struct SecretFields {
    raw_headers: BTreeMap<String, SecretString>,
}

impl SecretFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw header value. Header names are case-insensitive.
    pub fn insert_raw_header(&mut self, name: &str, value: impl Into<String>) {
        self.raw_headers
            .insert(name.to_ascii_lowercase(), SecretString::from(value.into()));
    }

    pub fn raw_header(&self, name: &str) -> Option<&SecretString> {
        self.raw_headers.get(&name.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.raw_headers.is_empty()
    }
}

/// Headers attached to the outbound provider call, accumulated across hooks.
#[derive(Debug, Default)]
pub struct ProviderHeaders {
    extra_headers: BTreeMap<String, SecretString>,
}

impl ProviderHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an extra header, keeping every other entry intact.
    pub fn insert_extra(&mut self, name: &str, value: SecretString) -> Option<SecretString> {
        self.extra_headers.insert(name.to_ascii_lowercase(), value)
    }

    pub fn extra(&self, name: &str) -> Option<&SecretString> {
        self.extra_headers.get(&name.to_ascii_lowercase())
    }

    pub fn contains_extra(&self, name: &str) -> bool {
        self.extra_headers.contains_key(&name.to_ascii_lowercase())
    }

    /// Names of all extra headers, sorted.
    pub fn extra_names(&self) -> impl Iterator<Item = &str> {
        self.extra_headers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.extra_headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extra_headers.is_empty()
    }
}

/// Mutable per-request state threaded through the hook pipeline.
///
/// Each inbound request gets its own context; nothing in it is shared
/// across requests.
#[derive(Debug, Default)]
pub struct RequestContext {
    /// Outbound model. Rewritten by the route hook.
    pub model: Option<String>,
    /// Message records in request order. Shapes are not validated.
    pub messages: Vec<Value>,
    /// Tool declarations, if the request carried any.
    pub tools: Option<Vec<Value>>,
    /// All other top-level request fields (`thinking`, `token_count`, `stream`, ...).
    pub extra: Map<String, Value>,
    /// Routing facts written by the hooks.
    pub metadata: RoutingMetadata,
    /// Raw credential material. Never logged.
    pub secret_fields: SecretFields,
    /// Headers added for the outbound provider call.
    pub provider_specific_headers: ProviderHeaders,
    headers: BTreeMap<String, String>,
}

impl RequestContext {
    /// Create an empty context for `model`.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::default()
        }
    }

    /// Build a context from an inbound JSON body.
    ///
    /// `model`, `messages`, `tools` and `metadata` are lifted into typed
    /// fields when they have the expected shape; anything else stays in
    /// [`RequestContext::extra`] untouched.
    pub fn from_body(body: Value) -> Result<Self, SwitchyardError> {
        let Value::Object(mut map) = body else {
            return Err(SwitchyardError::InvalidRequest(
                "request body must be a JSON object".to_string(),
            ));
        };

        let model = match map.remove("model") {
            Some(Value::String(model)) => Some(model),
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::debug!(model = %other, "ignoring non-string model field");
                map.insert("model".to_string(), other);
                None
            }
        };

        let messages = match map.remove("messages") {
            Some(Value::Array(messages)) => messages,
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                map.insert("messages".to_string(), other);
                Vec::new()
            }
        };

        let tools = match map.remove("tools") {
            Some(Value::Array(tools)) => Some(tools),
            Some(Value::Null) | None => None,
            Some(other) => {
                map.insert("tools".to_string(), other);
                None
            }
        };

        let metadata_extra = match map.remove("metadata") {
            Some(Value::Object(metadata)) => metadata,
            Some(Value::Null) | None => Map::new(),
            Some(other) => {
                map.insert("metadata".to_string(), other);
                Map::new()
            }
        };

        Ok(Self {
            model,
            messages,
            tools,
            extra: map,
            metadata: RoutingMetadata {
                extra: metadata_extra,
                ..RoutingMetadata::default()
            },
            ..Self::default()
        })
    }

    /// Attach transport headers. Names are lowercased.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.headers
                .insert(name.as_ref().to_ascii_lowercase(), value.into());
        }
        self
    }

    /// Stash a raw header (typically `authorization`) in the secret side-channel.
    pub fn with_raw_secret_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.secret_fields.insert_raw_header(name, value);
        self
    }

    /// Case-insensitive transport header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Whether the request carries a top-level field named `name`.
    pub fn has_field(&self, name: &str) -> bool {
        match name {
            "model" => self.model.is_some() || self.extra.contains_key(name),
            "messages" => !self.messages.is_empty() || self.extra.contains_key(name),
            "tools" => self.tools.is_some() || self.extra.contains_key(name),
            _ => self.extra.contains_key(name),
        }
    }

    /// Reassemble the JSON body handed back to the host.
    ///
    /// Routing facts are published under `metadata` next to the caller's
    /// own metadata keys. Secret fields are never included.
    pub fn to_body(&self) -> Value {
        let mut body = self.extra.clone();
        if let Some(model) = &self.model {
            body.insert("model".to_string(), Value::String(model.clone()));
        }
        body.insert("messages".to_string(), Value::Array(self.messages.clone()));
        if let Some(tools) = &self.tools {
            body.insert("tools".to_string(), Value::Array(tools.clone()));
        }

        let mut metadata = self.metadata.extra.clone();
        let routing = &self.metadata;
        metadata.insert("alias_model".to_string(), opt_string(&routing.alias_model));
        metadata.insert(
            "resolved_label".to_string(),
            opt_string(&routing.resolved_label),
        );
        metadata.insert(
            "resolved_model".to_string(),
            opt_string(&routing.resolved_model),
        );
        metadata.insert(
            "resolved_backend".to_string(),
            routing
                .resolved_backend
                .as_ref()
                .map_or(Value::Null, |b| Value::String(b.label.clone())),
        );
        metadata.insert(
            "is_passthrough".to_string(),
            Value::Bool(routing.is_passthrough),
        );
        body.insert("metadata".to_string(), Value::Object(metadata));

        Value::Object(body)
    }
}

fn opt_string(value: &Option<String>) -> Value {
    value.clone().map_or(Value::Null, Value::String)
}
