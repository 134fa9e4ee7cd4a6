// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token estimation for the token-count rule.
//!
//! Message text is encoded with a tiktoken BPE chosen by model name. Loaded
//! encoders are cached per model; a model whose encoder cannot be loaded is
//! cached as `None` and estimated with a characters-per-token heuristic.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;
use tiktoken_rs::CoreBPE;
use tracing::{debug, warn};

/// Bytes per token assumed when no tokenizer is available.
const HEURISTIC_BYTES_PER_TOKEN: usize = 3;

/// Request fields that carry a caller-supplied token count.
pub const TOKEN_COUNT_FIELDS: &[&str] = &["token_count", "num_tokens", "input_tokens"];

/// Cached, model-aware token counter.
#[derive(Default)]
pub struct TokenCounter {
    encoders: DashMap<String, Option<Arc<CoreBPE>>>,
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("cached_models", &self.encoders.len())
            .finish()
    }
}

impl TokenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count tokens in `text` using the encoder for `model`.
    ///
    /// Never fails: if the encoder is unavailable the byte-length heuristic
    /// is used instead.
    pub fn count(&self, text: &str, model: Option<&str>) -> u64 {
        if text.is_empty() {
            return 0;
        }
        match self.encoder_for(model.unwrap_or_default()) {
            Some(bpe) => bpe.encode_with_special_tokens(text).len() as u64,
            None => heuristic_count(text),
        }
    }

    /// Number of models with a cached encoder decision.
    pub fn cached_models(&self) -> usize {
        self.encoders.len()
    }

    fn encoder_for(&self, model: &str) -> Option<Arc<CoreBPE>> {
        if let Some(cached) = self.encoders.get(model) {
            return cached.value().clone();
        }

        let loaded = match load_encoder(model) {
            Ok(bpe) => Some(Arc::new(bpe)),
            Err(e) => {
                warn!(
                    model = model,
                    error = %e,
                    "tokenizer unavailable, falling back to length heuristic"
                );
                None
            }
        };
        // A racing loader may have inserted first; keep whichever landed.
        self.encoders
            .entry(model.to_string())
            .or_insert(loaded)
            .value()
            .clone()
    }
}

/// Pick the encoding: OpenAI chat families by model lookup, `cl100k_base` otherwise.
fn load_encoder(model: &str) -> Result<CoreBPE, String> {
    let loaded = match model_lookup_name(model) {
        Some(name) => {
            debug!(model = model, lookup = name, "loading model-specific tokenizer");
            tiktoken_rs::get_bpe_from_model(name)
        }
        None => tiktoken_rs::cl100k_base(),
    };
    loaded.map_err(|e| e.to_string())
}

/// Name to look the encoder up by, for GPT-4 and GPT-3.5 family models.
///
/// Provider namespaces such as `openai/` or `azure/` are stripped.
fn model_lookup_name(model: &str) -> Option<&str> {
    if !(model.contains("gpt-4") || model.contains("gpt-3.5")) {
        return None;
    }
    model.rsplit('/').next()
}

/// `len(text) / 3` in bytes, rounded down.
pub fn heuristic_count(text: &str) -> u64 {
    (text.len() / HEURISTIC_BYTES_PER_TOKEN) as u64
}

/// Concatenate the text content of `messages`.
///
/// String `content` and the `text` of `{"type": "text"}` parts each
/// contribute their text followed by a space. Messages that are not objects
/// contribute their string form. The result is trimmed.
pub fn message_text(messages: &[Value]) -> String {
    let mut text = String::new();
    for message in messages {
        match message {
            Value::Object(map) => match map.get("content") {
                Some(Value::String(content)) => {
                    text.push_str(content);
                    text.push(' ');
                }
                Some(Value::Array(parts)) => {
                    for part in parts {
                        if part.get("type").and_then(Value::as_str) == Some("text")
                            && let Some(part_text) = part.get("text").and_then(Value::as_str)
                        {
                            text.push_str(part_text);
                            text.push(' ');
                        }
                    }
                }
                _ => {}
            },
            Value::String(s) => {
                text.push_str(s);
                text.push(' ');
            }
            Value::Null => {}
            other => {
                text.push_str(&other.to_string());
                text.push(' ');
            }
        }
    }
    text.trim().to_string()
}

/// Largest token count the caller supplied, if any.
///
/// Float counts are truncated and negative ones count as zero.
pub fn declared_count(fields: &serde_json::Map<String, Value>) -> Option<u64> {
    TOKEN_COUNT_FIELDS
        .iter()
        .filter_map(|name| fields.get(*name).and_then(as_count))
        .max()
}

fn as_count(value: &Value) -> Option<u64> {
    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.is_finite())
            .map(|f| f.max(0.0) as u64)
    })
}
