//! Learning and personalization contract types.
//!
//! The orchestrator never creates insights itself -- it only submits
//! raw `(message, response)` pairs as [`LearningEvent`]s. Insights are
//! created and scored by the learning subsystem's downstream consumer;
//! the personalization adapter reads them back and keeps only the
//! confident ones.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::exchange::ContextBag;

/// Minimum confidence for an insight to be eligible for use in
/// personalization text.
pub const INSIGHT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// Category of a learned insight about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightCategory {
    Preference,
    Fact,
    Interest,
    Style,
    Context,
}

impl fmt::Display for InsightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsightCategory::Preference => write!(f, "preference"),
            InsightCategory::Fact => write!(f, "fact"),
            InsightCategory::Interest => write!(f, "interest"),
            InsightCategory::Style => write!(f, "style"),
            InsightCategory::Context => write!(f, "context"),
        }
    }
}

/// Category-tagged fact about a user with a confidence score in [0,1].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    pub category: InsightCategory,
    pub content: String,
    pub confidence: f64,
}

impl Insight {
    /// Whether this insight clears the confidence bar for inclusion in
    /// personalization text.
    pub fn is_actionable(&self) -> bool {
        self.confidence >= INSIGHT_CONFIDENCE_THRESHOLD
    }
}

/// One completed exchange submitted to the learning subsystem.
///
/// Fire-and-forget: emitted after the reply is ready, never awaited by
/// the response path, and any failure is invisible to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningEvent {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// The raw user message, pre-optimization.
    pub message: String,
    /// The assistant reply that was returned to the caller.
    pub response: String,
    #[serde(default, skip_serializing_if = "ContextBag::is_empty")]
    pub context: ContextBag,
    pub occurred_at: DateTime<Utc>,
}

/// Errors from the learning sink. Logged and discarded, never surfaced.
#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error("learning sink HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("learning sink transport error: {0}")]
    Transport(String),
}

/// Errors from the personalization provider. Always degraded to an
/// empty personalization blob by the orchestrator.
#[derive(Debug, thiserror::Error)]
pub enum PersonalizationError {
    #[error("personalization HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("personalization transport error: {0}")]
    Transport(String),

    #[error("malformed personalization response: {0}")]
    Malformed(String),
}
