//! Application state wiring the orchestrator to its collaborators.
//!
//! The orchestrator is generic over the collaborator traits; AppState
//! pins it to the concrete HTTP implementations from colloquy-infra.

use std::path::PathBuf;
use std::sync::Arc;

use colloquy_core::orchestrator::Orchestrator;
use colloquy_infra::backend::build_dispatcher;
use colloquy_infra::config::{load_config, resolve_data_dir};
use colloquy_infra::history::HttpHistoryProvider;
use colloquy_infra::learning::HttpLearningSink;
use colloquy_infra::optimizer::HttpPromptOptimizer;
use colloquy_infra::personalization::HttpPersonalizationProvider;
use colloquy_types::config::ColloquyConfig;

/// Concrete orchestrator type pinned to the HTTP collaborator clients.
pub type ConcreteOrchestrator = Orchestrator<
    HttpHistoryProvider,
    HttpPersonalizationProvider,
    HttpPromptOptimizer,
    HttpLearningSink,
>;

/// Shared application state used by both CLI commands and REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ConcreteOrchestrator>,
    pub config: ColloquyConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration and wire the orchestrator.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        let dispatcher = build_dispatcher(
            &config.dispatch,
            config.orchestrator.backend_timeout(),
        );

        let orchestrator = Orchestrator::new(
            config.orchestrator.clone(),
            HttpHistoryProvider::new(config.history.base_url.clone()),
            HttpPersonalizationProvider::new(config.personalization.base_url.clone()),
            HttpPromptOptimizer::new(config.optimizer.base_url.clone()),
            dispatcher,
            HttpLearningSink::new(config.learning.base_url.clone()),
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            config,
            data_dir,
        })
    }
}
