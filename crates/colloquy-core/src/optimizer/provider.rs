//! PromptOptimizer trait definition.
//!
//! The optimizer improves a message before it reaches the model
//! backend, or pauses the turn with a clarifying question. Concrete
//! implementations live in colloquy-infra; the no-op implementation
//! here backs deployments without a rewrite service.

use colloquy_types::optimizer::{OptimizeOutcome, OptimizeRequest, OptimizerError};

/// Trait for prompt rewriting services.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations report failures honestly; the fail-soft policy
/// lives in [`super::OptimizerGateway`], not here.
pub trait PromptOptimizer: Send + Sync {
    /// Rewrite a prompt, or ask for clarification.
    fn rewrite(
        &self,
        request: &OptimizeRequest,
    ) -> impl std::future::Future<Output = Result<OptimizeOutcome, OptimizerError>> + Send;
}

/// Optimizer that returns the input unchanged.
///
/// Used in tests and when wiring an orchestrator without a rewrite
/// service. Note that going through the gateway with optimization
/// disabled is the normal way to switch the stage off; this type is
/// for satisfying the generic parameter.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopOptimizer;

impl PromptOptimizer for NoopOptimizer {
    async fn rewrite(&self, request: &OptimizeRequest) -> Result<OptimizeOutcome, OptimizerError> {
        Ok(OptimizeOutcome::Optimized {
            prompt: request.prompt.clone(),
        })
    }
}
