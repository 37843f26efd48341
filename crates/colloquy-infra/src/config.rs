//! Configuration loader for Colloquy.
//!
//! Reads `config.toml` from the data directory (`~/.colloquy/` in
//! production) and deserializes it into [`ColloquyConfig`]. Falls back
//! to defaults when the file is missing or malformed -- a broken config
//! file must never stop the service from coming up.

use std::path::{Path, PathBuf};

use colloquy_types::config::ColloquyConfig;

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `COLLOQUY_DATA_DIR` environment variable
/// 2. Platform home directory (`~/.colloquy`)
/// 3. Last resort: `.colloquy` relative to the working directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("COLLOQUY_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".colloquy");
    }

    PathBuf::from(".colloquy")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - Missing file: returns [`ColloquyConfig::default()`] quietly.
/// - Unreadable or unparseable file: logs a warning and returns the
///   default.
pub async fn load_config(data_dir: &Path) -> ColloquyConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ColloquyConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ColloquyConfig::default();
        }
    };

    match toml::from_str::<ColloquyConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ColloquyConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert!(config.orchestrator.optimizer_enabled);
        assert!(config.dispatch.candidates.is_empty());
        assert_eq!(config.history.base_url, "http://127.0.0.1:7101");
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
[orchestrator]
optimizer_enabled = false
history_limit = 10

[optimizer]
base_url = "http://optimizer.internal:8080"

[[dispatch.candidates]]
name = "direct"
kind = "direct"
base_url = "http://models.internal:9000"
priority = 0

[[dispatch.candidates]]
name = "routed"
kind = "routed"
base_url = "http://legacy.internal:9100"
priority = 1
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(!config.orchestrator.optimizer_enabled);
        assert_eq!(config.orchestrator.history_limit, 10);
        assert_eq!(config.optimizer.base_url, "http://optimizer.internal:8080");
        assert_eq!(config.dispatch.candidates.len(), 2);
        assert_eq!(config.dispatch.candidates[1].name, "routed");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(config.orchestrator.optimizer_enabled);
        assert!(config.dispatch.candidates.is_empty());
    }
}
