//! Model backend request/response and dispatch types.
//!
//! A backend candidate is one of an ordered set of interchangeable
//! services capable of producing a model reply. Candidate order is
//! fixed by configuration, not latency heuristics, so dispatch
//! behavior stays predictable and testable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::exchange::ConversationEntry;

/// Request to a model backend for an assistant reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// The optimized (or raw, if optimization failed) user message.
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ConversationEntry>,
    /// Learned-preference text blob; absent when personalization was
    /// unavailable or empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personalization: Option<String>,
}

/// Reply from a model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub content: String,
    /// Model identifier reported by the backend, when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// Errors from a single backend candidate.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend timed out after {waited_ms}ms")]
    Timeout { waited_ms: u64 },

    #[error("backend HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("backend transport error: {0}")]
    Transport(String),

    #[error("malformed backend response: {0}")]
    Malformed(String),

    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors from the dispatcher as a whole. The one point in the
/// pipeline where failure is not swallowed: with every candidate
/// exhausted there is no sensible reply to return.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("all {attempts} backend candidate(s) failed; last error: {last_error}")]
    Exhausted {
        attempts: usize,
        #[source]
        last_error: BackendError,
    },

    #[error("no backend candidates configured")]
    NoCandidates,
}

/// Kind of model backend candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Unified direct model client.
    Direct,
    /// Legacy routed backend.
    Routed,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Direct => write!(f, "direct"),
            BackendKind::Routed => write!(f, "routed"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(BackendKind::Direct),
            "routed" => Ok(BackendKind::Routed),
            other => Err(format!("invalid backend kind: '{other}'")),
        }
    }
}

/// Configuration for one backend candidate in the dispatch order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    /// Human-readable name (e.g., "direct", "routed").
    pub name: String,
    pub kind: BackendKind,
    pub base_url: String,
    /// Model identifier forwarded to the backend, when it wants one.
    #[serde(default)]
    pub model: Option<String>,
    /// Priority for dispatch ordering; lower = tried first.
    pub priority: u32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Environment variable holding the candidate's API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
}

fn default_enabled() -> bool {
    true
}

/// Configuration for the ordered backend dispatch chain.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Candidate configurations; order of attempts follows `priority`.
    #[serde(default)]
    pub candidates: Vec<CandidateConfig>,
}
