//! Prompt optimization stage.
//!
//! - `PromptOptimizer`: RPITIT trait for concrete rewriter clients
//! - `NoopOptimizer`: pass-through implementation
//! - `OptimizerGateway`: timeout + fail-soft policy around any optimizer

pub mod gateway;
pub mod provider;

pub use gateway::{GatewayOutcome, OptimizerGateway};
pub use provider::{NoopOptimizer, PromptOptimizer};
