// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request fixtures.

use serde_json::{Value, json};
use switchyard_core::{BackendEntry, RequestContext};

/// User agent sent by the first-party CLI.
pub const CLI_USER_AGENT: &str = "claude-cli/1.0.83 (external, cli)";

/// A user agent that must never trigger credential forwarding.
pub const OTHER_USER_AGENT: &str = "python-httpx/0.27.0";

/// Bearer credential used in forwarding tests.
pub const TEST_BEARER: &str = "Bearer sk-ant-REDACTED";

/// Request body with a single user message.
pub fn chat_body(model: &str, content: &str) -> Value {
    json!({
        "model": model,
        "messages": [{"role": "user", "content": content}],
    })
}

/// Context for `model` carrying the CLI user agent and a bearer credential.
pub fn cli_request(model: &str) -> RequestContext {
    request_with_agent(model, CLI_USER_AGENT)
}

/// Context for `model` with the given user agent and a bearer credential.
pub fn request_with_agent(model: &str, user_agent: &str) -> RequestContext {
    RequestContext::from_body(chat_body(model, "hello"))
        .unwrap_or_default()
        .with_headers([("user-agent", user_agent)])
        .with_raw_secret_header("authorization", TEST_BEARER)
}

/// `sentence` repeated `times` times.
pub fn long_text(sentence: &str, times: usize) -> String {
    sentence.repeat(times)
}

/// A typical three-label backend set.
pub fn standard_backends() -> Vec<BackendEntry> {
    vec![
        BackendEntry::new("default", "claude-sonnet-4-20250514")
            .with_api_base("https://api.anthropic.com"),
        BackendEntry::new("background", "claude-3-5-haiku-20241022")
            .with_api_base("https://api.anthropic.com"),
        BackendEntry::new("think", "claude-opus-4-20250514").with_custom_provider("vertex"),
    ]
}
