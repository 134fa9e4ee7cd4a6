// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request outcome events reported by the host after the completion call.

use std::time::Duration;

use chrono::{DateTime, Utc};
use switchyard_core::RequestContext;

/// Maximum length, in characters, of an error message in a failure event.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 500;

/// A point in time as reported by the host.
///
/// Hosts report either wall-clock epoch seconds, offsets from some start
/// instant, or absolute UTC times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timestamp {
    Epoch(f64),
    Offset(Duration),
    At(DateTime<Utc>),
}

/// Milliseconds from `start` to `end`, rounded to two decimals.
///
/// Only timestamps of the same kind can be compared; a mixed pair yields
/// `0.0`. Negative durations are returned as-is.
pub fn duration_ms(start: Timestamp, end: Timestamp) -> f64 {
    let ms = match (start, end) {
        (Timestamp::Epoch(start), Timestamp::Epoch(end)) => (end - start) * 1000.0,
        (Timestamp::Offset(start), Timestamp::Offset(end)) => {
            (end.as_secs_f64() - start.as_secs_f64()) * 1000.0
        }
        (Timestamp::At(start), Timestamp::At(end)) => {
            let delta = end - start;
            match delta.num_microseconds() {
                Some(us) => us as f64 / 1000.0,
                None => delta.num_milliseconds() as f64,
            }
        }
        _ => 0.0,
    };
    if ms.is_finite() {
        (ms * 100.0).round() / 100.0
    } else {
        0.0
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_tokens: u64,
}

/// One finished (or failed) request.
#[derive(Debug, Clone, PartialEq)]
pub struct OutcomeEvent {
    pub model: Option<String>,
    pub label: Option<String>,
    pub start: Timestamp,
    pub end: Timestamp,
    pub usage: Option<TokenUsage>,
    pub error: Option<String>,
    pub error_type: Option<String>,
}

impl OutcomeEvent {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self {
            model: None,
            label: None,
            start,
            end,
            usage: None,
            error: None,
            error_type: None,
        }
    }

    /// Take model and label from a routed request.
    pub fn for_request(mut self, ctx: &RequestContext) -> Self {
        self.model = ctx.model.clone();
        self.label = ctx.metadata.resolved_label.clone();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    pub fn with_error(mut self, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self.error = Some(message.into());
        self
    }

    pub fn duration_ms(&self) -> f64 {
        duration_ms(self.start, self.end)
    }
}

/// Cut `message` to at most `max` characters.
pub fn truncate_chars(message: &str, max: usize) -> &str {
    match message.char_indices().nth(max) {
        Some((idx, _)) => &message[..idx],
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn epoch_seconds() {
        let d = duration_ms(Timestamp::Epoch(1000.0), Timestamp::Epoch(1001.23456));
        assert!((d - 1234.56).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn offsets() {
        let d = duration_ms(
            Timestamp::Offset(Duration::from_millis(250)),
            Timestamp::Offset(Duration::from_millis(1750)),
        );
        assert_eq!(d, 1500.0);
    }

    #[test]
    fn negative_offsets_are_kept() {
        let d = duration_ms(
            Timestamp::Offset(Duration::from_secs(2)),
            Timestamp::Offset(Duration::from_secs(1)),
        );
        assert_eq!(d, -1000.0);
    }

    #[test]
    fn absolute_times() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let end = start + chrono::Duration::milliseconds(42);
        assert_eq!(duration_ms(Timestamp::At(start), Timestamp::At(end)), 42.0);
    }

    #[test]
    fn mixed_kinds_are_zero() {
        let d = duration_ms(
            Timestamp::Epoch(1.0),
            Timestamp::Offset(Duration::from_secs(5)),
        );
        assert_eq!(d, 0.0);
    }

    #[test]
    fn non_finite_is_zero() {
        assert_eq!(duration_ms(Timestamp::Epoch(0.0), Timestamp::Epoch(f64::NAN)), 0.0);
    }

    #[test]
    fn truncates_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 500), "short");
        assert_eq!(truncate_chars(&"x".repeat(600), 500).len(), 500);
    }

    #[test]
    fn event_from_request() {
        let mut ctx = RequestContext::new("claude-3-5-haiku");
        ctx.metadata.resolved_label = Some("background".into());
        let event = OutcomeEvent::new(Timestamp::Epoch(0.0), Timestamp::Epoch(0.5)).for_request(&ctx);
        assert_eq!(event.model.as_deref(), Some("claude-3-5-haiku"));
        assert_eq!(event.label.as_deref(), Some("background"));
        assert_eq!(event.duration_ms(), 500.0);
    }
}
