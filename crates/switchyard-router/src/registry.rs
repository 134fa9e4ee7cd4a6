// SPDX-FileCopyrightText: 2026 Switchyard Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registry source backed by the `[[backends]]` configuration table.

use switchyard_config::BackendConfig;
use switchyard_core::{BackendEntry, RegistrySource, SwitchyardError};

/// A fixed set of backends read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    entries: Vec<BackendEntry>,
}

impl StaticRegistry {
    pub fn new(entries: Vec<BackendEntry>) -> Self {
        Self { entries }
    }

    pub fn from_config(backends: &[BackendConfig]) -> Self {
        Self::new(backends.iter().map(entry_from_config).collect())
    }
}

impl RegistrySource for StaticRegistry {
    fn snapshot(&self) -> Result<Vec<BackendEntry>, SwitchyardError> {
        Ok(self.entries.clone())
    }
}

fn entry_from_config(config: &BackendConfig) -> BackendEntry {
    BackendEntry {
        label: config.label.clone(),
        underlying_model_id: config.model.clone(),
        api_base: config.api_base.clone(),
        custom_provider: config.custom_provider.clone(),
        extra_info: config.model_info.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn converts_backend_config() {
        let mut model_info = serde_json::Map::new();
        model_info.insert("tier".into(), json!("fast"));
        let backends = [BackendConfig {
            label: "background".into(),
            model: Some("claude-3-5-haiku".into()),
            api_base: Some("https://api.anthropic.com".into()),
            custom_provider: None,
            model_info,
        }];

        let snapshot = StaticRegistry::from_config(&backends).snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        let entry = &snapshot[0];
        assert_eq!(entry.label, "background");
        assert_eq!(entry.underlying_model_id.as_deref(), Some("claude-3-5-haiku"));
        assert_eq!(entry.api_base.as_deref(), Some("https://api.anthropic.com"));
        assert_eq!(entry.extra_info["tier"], "fast");
    }

    #[test]
    fn empty_config_is_an_empty_snapshot() {
        assert!(StaticRegistry::default().snapshot().unwrap().is_empty());
    }
}
