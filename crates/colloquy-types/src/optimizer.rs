//! Prompt optimizer request/outcome types.
//!
//! The optimizer service returns one of three shapes; the Rust side
//! models the two successful ones as a tagged enum and the third as an
//! [`OptimizerError`]. Callers match on the variant -- never on ad hoc
//! field presence.

use serde::{Deserialize, Serialize};

use crate::exchange::{ContextBag, ConversationEntry};

/// Input to a prompt rewrite: the (possibly clarification-merged)
/// message plus the context the rewriter may draw on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub prompt: String,
    #[serde(default, skip_serializing_if = "ContextBag::is_empty")]
    pub context: ContextBag,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ConversationEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Successful result of a prompt rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OptimizeOutcome {
    /// The rewriter produced a prompt to use downstream. It may equal
    /// the input text; that still counts as a successful optimization.
    Optimized { prompt: String },
    /// The rewriter needs the user to answer a question before the
    /// message can be dispatched. The question becomes the turn's
    /// reply; no backend call happens.
    NeedsClarification { question: String },
}

/// Errors from the prompt optimizer. All of these are fail-soft at the
/// orchestrator level: optimization is an enhancement, not a dependency.
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("optimizer timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("optimizer HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("optimizer transport error: {0}")]
    Transport(String),

    #[error("malformed optimizer response: {0}")]
    Malformed(String),
}
