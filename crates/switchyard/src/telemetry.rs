// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tracing subscriber setup.

use switchyard_config::SwitchyardConfig;
use switchyard_core::SwitchyardError;
use switchyard_security::RedactingWriter;
use tracing_subscriber::EnvFilter;

/// Default filter directive for `level`: Switchyard crates at `level`, everything else at `warn`.
pub fn default_directive(level: &str) -> String {
    format!("switchyard={level},warn")
}

/// Effective log level: `debug` forces debug output.
pub fn effective_level(config: &SwitchyardConfig) -> &str {
    if config.debug {
        "debug"
    } else {
        config.logging.level.as_str()
    }
}

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over the configured level. Output goes to stderr through
/// a redacting writer. Fails if a global subscriber is already installed.
pub fn init_tracing(config: &SwitchyardConfig) -> Result<(), SwitchyardError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(effective_level(config))));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(|| RedactingWriter::new(std::io::stderr()))
        .try_init()
        .map_err(|e| SwitchyardError::Internal(format!("tracing init failed: {e}")))
}
