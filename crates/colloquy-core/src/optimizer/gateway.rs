//! Fail-soft gateway around the prompt optimizer.
//!
//! The optimizer stage is always invoked in the steady state but is an
//! enhancement, not a dependency: a timeout, transport error, or
//! malformed reply degrades to the unmodified input with
//! `was_optimized = false`. No retry within a turn. A clarifying
//! question is not an error -- it short-circuits the turn upstream.

use std::time::Duration;

use colloquy_types::optimizer::{OptimizeOutcome, OptimizeRequest, OptimizerError};

use super::provider::PromptOptimizer;

/// What the orchestrator should do after the optimization stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayOutcome {
    /// Continue to dispatch with this message.
    Proceed {
        message: String,
        was_optimized: bool,
    },
    /// Pause the turn; the question becomes the reply.
    AskUser { question: String },
}

/// Applies the enabled flag, timeout bound, and fail-soft policy to
/// any [`PromptOptimizer`].
///
/// One gateway serves both the optimizer-on and optimizer-off
/// configurations; there is deliberately no second orchestration path
/// for the disabled case.
pub struct OptimizerGateway<O> {
    optimizer: O,
    enabled: bool,
    timeout: Duration,
}

impl<O: PromptOptimizer> OptimizerGateway<O> {
    pub fn new(optimizer: O, enabled: bool, timeout: Duration) -> Self {
        Self {
            optimizer,
            enabled,
            timeout,
        }
    }

    /// Run the optimization stage for one turn.
    ///
    /// Never returns an error and never produces an empty message for
    /// a non-empty input.
    pub async fn optimize(&self, request: OptimizeRequest) -> GatewayOutcome {
        let input = request.prompt.clone();

        if !self.enabled {
            tracing::debug!("Optimizer disabled, passing message through");
            return GatewayOutcome::Proceed {
                message: input,
                was_optimized: false,
            };
        }

        let result = tokio::time::timeout(self.timeout, self.optimizer.rewrite(&request)).await;

        match result {
            Err(_) => {
                let err = OptimizerError::Timeout {
                    waited_ms: self.timeout.as_millis() as u64,
                };
                tracing::warn!(error = %err, "Optimizer timed out, proceeding unoptimized");
                GatewayOutcome::Proceed {
                    message: input,
                    was_optimized: false,
                }
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "Optimizer failed, proceeding unoptimized");
                GatewayOutcome::Proceed {
                    message: input,
                    was_optimized: false,
                }
            }
            Ok(Ok(OptimizeOutcome::Optimized { prompt })) => {
                if prompt.trim().is_empty() {
                    // An empty rewrite of a non-empty message is a
                    // service bug; keep the input.
                    tracing::warn!("Optimizer returned an empty prompt, proceeding unoptimized");
                    return GatewayOutcome::Proceed {
                        message: input,
                        was_optimized: false,
                    };
                }
                GatewayOutcome::Proceed {
                    message: prompt,
                    was_optimized: true,
                }
            }
            Ok(Ok(OptimizeOutcome::NeedsClarification { question })) => {
                if question.trim().is_empty() {
                    tracing::warn!(
                        "Optimizer asked an empty clarification question, proceeding unoptimized"
                    );
                    return GatewayOutcome::Proceed {
                        message: input,
                        was_optimized: false,
                    };
                }
                GatewayOutcome::AskUser { question }
            }
        }
    }
}
