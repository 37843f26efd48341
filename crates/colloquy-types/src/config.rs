//! Configuration types for the Colloquy orchestrator.
//!
//! Deserialized from `config.toml` in the data directory. Every
//! external call carries its own bounded timeout; there is no
//! cross-call cancellation propagation and no per-turn retry for
//! fail-soft stages.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::backend::DispatchConfig;

/// Per-stage timeouts and feature flags for one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Whether the prompt optimizer stage is invoked. When false the
    /// raw (or clarification-merged) message goes straight to dispatch.
    #[serde(default = "default_optimizer_enabled")]
    pub optimizer_enabled: bool,

    /// How many history entries to request per turn.
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,

    #[serde(default = "default_history_timeout_ms")]
    pub history_timeout_ms: u64,

    /// Optimizer calls may involve user-facing back-and-forth, so the
    /// bound is tens of seconds rather than single digits.
    #[serde(default = "default_optimizer_timeout_ms")]
    pub optimizer_timeout_ms: u64,

    #[serde(default = "default_personalization_timeout_ms")]
    pub personalization_timeout_ms: u64,

    /// Per-candidate bound; a full dispatch may take up to
    /// `candidates * backend_timeout_ms` in the worst case.
    #[serde(default = "default_backend_timeout_ms")]
    pub backend_timeout_ms: u64,
}

fn default_optimizer_enabled() -> bool {
    true
}

fn default_history_limit() -> u32 {
    50
}

fn default_history_timeout_ms() -> u64 {
    5_000
}

fn default_optimizer_timeout_ms() -> u64 {
    30_000
}

fn default_personalization_timeout_ms() -> u64 {
    5_000
}

fn default_backend_timeout_ms() -> u64 {
    60_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            optimizer_enabled: default_optimizer_enabled(),
            history_limit: default_history_limit(),
            history_timeout_ms: default_history_timeout_ms(),
            optimizer_timeout_ms: default_optimizer_timeout_ms(),
            personalization_timeout_ms: default_personalization_timeout_ms(),
            backend_timeout_ms: default_backend_timeout_ms(),
        }
    }
}

impl OrchestratorConfig {
    pub fn history_timeout(&self) -> Duration {
        Duration::from_millis(self.history_timeout_ms)
    }

    pub fn optimizer_timeout(&self) -> Duration {
        Duration::from_millis(self.optimizer_timeout_ms)
    }

    pub fn personalization_timeout(&self) -> Duration {
        Duration::from_millis(self.personalization_timeout_ms)
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend_timeout_ms)
    }
}

/// Base URL for one external collaborator service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub base_url: String,
}

impl EndpointConfig {
    fn local(port: u16) -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
        }
    }
}

/// Top-level configuration loaded from `{data_dir}/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColloquyConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    #[serde(default = "default_history_endpoint")]
    pub history: EndpointConfig,

    #[serde(default = "default_personalization_endpoint")]
    pub personalization: EndpointConfig,

    #[serde(default = "default_optimizer_endpoint")]
    pub optimizer: EndpointConfig,

    #[serde(default = "default_learning_endpoint")]
    pub learning: EndpointConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

fn default_history_endpoint() -> EndpointConfig {
    EndpointConfig::local(7101)
}

fn default_personalization_endpoint() -> EndpointConfig {
    EndpointConfig::local(7102)
}

fn default_optimizer_endpoint() -> EndpointConfig {
    EndpointConfig::local(7103)
}

fn default_learning_endpoint() -> EndpointConfig {
    EndpointConfig::local(7104)
}

impl Default for ColloquyConfig {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            history: default_history_endpoint(),
            personalization: default_personalization_endpoint(),
            optimizer: default_optimizer_endpoint(),
            learning: default_learning_endpoint(),
            dispatch: DispatchConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orchestrator_config_defaults() {
        let config: OrchestratorConfig = toml::from_str("").unwrap();
        assert!(config.optimizer_enabled);
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.optimizer_timeout_ms, 30_000);
        assert_eq!(config.backend_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_colloquy_config_partial_toml() {
        let toml = r#"
[orchestrator]
optimizer_enabled = false

[optimizer]
base_url = "http://optimizer.internal:8080"

[[dispatch.candidates]]
name = "direct"
kind = "direct"
base_url = "http://models.internal:9000"
priority = 0
"#;
        let config: ColloquyConfig = toml::from_str(toml).unwrap();
        assert!(!config.orchestrator.optimizer_enabled);
        assert_eq!(config.optimizer.base_url, "http://optimizer.internal:8080");
        assert_eq!(config.history.base_url, "http://127.0.0.1:7101");
        assert_eq!(config.dispatch.candidates.len(), 1);
        assert_eq!(config.dispatch.candidates[0].name, "direct");
    }

    #[test]
    fn test_colloquy_config_default_has_no_candidates() {
        let config = ColloquyConfig::default();
        assert!(config.dispatch.candidates.is_empty());
    }
}
