//! Exchange and conversation types for Colloquy.
//!
//! These types model one turn of a conversation: the inbound request,
//! the replayed history, the clarification sub-state carried inside
//! entry context bags, and the reply returned to the caller.
//!
//! The orchestrator owns no durable state. Everything needed to resume
//! a paused (clarification) exchange travels in the conversation
//! history owned by the external history service, encoded via the
//! context-bag keys defined here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Open key/value bag attached to conversation entries and replies.
///
/// Carries out-of-band signaling between turns -- in particular the
/// clarification flags. Preserved as raw JSON so unknown keys from
/// other services pass through untouched.
pub type ContextBag = serde_json::Map<String, serde_json::Value>;

/// Context key: set on an assistant entry whose reply was a clarifying
/// question. Only assistant entries may carry this flag.
pub const WAITING_FOR_CLARIFICATION: &str = "waiting_for_clarification";

/// Context key: the pre-clarification user message that triggered the
/// question. Paired with [`WAITING_FOR_CLARIFICATION`].
pub const ORIGINAL_MESSAGE: &str = "original_message";

/// Context key: marks an exchange whose message was merged from a
/// pending clarification answer.
pub const CLARIFICATION_RESPONSE: &str = "clarification_response";

/// Context key on replies: name of the backend candidate that served
/// the turn.
pub const REPLY_BACKEND: &str = "backend";

/// Context key on replies: whether the optimizer rewrote the message.
pub const REPLY_OPTIMIZED: &str = "optimized";

/// Author of a historical conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryRole {
    User,
    Assistant,
}

impl fmt::Display for EntryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryRole::User => write!(f, "user"),
            EntryRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for EntryRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(EntryRole::User),
            "assistant" => Ok(EntryRole::Assistant),
            other => Err(format!("invalid entry role: '{other}'")),
        }
    }
}

/// One historical turn of a conversation, oldest-first in sequences.
///
/// The `context` bag on assistant entries carries out-of-band
/// signaling; user entries never carry the clarification flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub role: EntryRole,
    pub content: String,
    #[serde(default, skip_serializing_if = "ContextBag::is_empty")]
    pub context: ContextBag,
}

impl ConversationEntry {
    /// A user entry with an empty context bag.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: EntryRole::User,
            content: content.into(),
            context: ContextBag::new(),
        }
    }

    /// An assistant entry with an empty context bag.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: EntryRole::Assistant,
            content: content.into(),
            context: ContextBag::new(),
        }
    }
}

/// "Awaiting clarification" sub-state embedded in a context bag.
///
/// Not a separate store: the system is stateless between requests, so
/// this survives only by being written into history that gets replayed
/// on the next call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClarificationState {
    pub waiting_for_clarification: bool,
    pub original_message: String,
}

impl ClarificationState {
    /// Encode a pending clarification for `original_message`.
    pub fn pending(original_message: impl Into<String>) -> Self {
        Self {
            waiting_for_clarification: true,
            original_message: original_message.into(),
        }
    }

    /// Write this state into a context bag.
    pub fn apply(&self, context: &mut ContextBag) {
        context.insert(
            WAITING_FOR_CLARIFICATION.to_string(),
            serde_json::Value::Bool(self.waiting_for_clarification),
        );
        context.insert(
            ORIGINAL_MESSAGE.to_string(),
            serde_json::Value::String(self.original_message.clone()),
        );
    }

    /// Read a *pending* clarification state out of a context bag.
    ///
    /// Returns `None` unless `waiting_for_clarification` is literally
    /// `true` and an original message is present.
    pub fn from_context(context: &ContextBag) -> Option<Self> {
        let waiting = context
            .get(WAITING_FOR_CLARIFICATION)
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !waiting {
            return None;
        }
        let original_message = context
            .get(ORIGINAL_MESSAGE)
            .and_then(serde_json::Value::as_str)?
            .to_string();
        Some(Self {
            waiting_for_clarification: true,
            original_message,
        })
    }
}

/// One user turn and its resulting reply, in-flight only.
///
/// Built at the start of a turn and discarded at response time; never
/// persisted by the orchestrator itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange {
    /// Opaque user identifier, stable across the user's lifetime.
    pub user_id: String,
    /// Scoping key; a user may have independent threads per calling app.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
    /// The text the caller submitted, immutable once received.
    pub raw_message: String,
    /// Possibly-rewritten text actually sent to the model backend.
    /// Equals `raw_message` when optimization is skipped or fails.
    pub optimized_message: String,
    /// True only if optimization succeeded.
    pub was_optimized: bool,
    /// Out-of-band signaling accumulated during the turn.
    #[serde(default, skip_serializing_if = "ContextBag::is_empty")]
    pub context: ContextBag,
}

impl Exchange {
    /// Start a new exchange; `optimized_message` mirrors the raw text
    /// until the optimizer says otherwise.
    pub fn new(user_id: impl Into<String>, app_id: Option<String>, raw_message: impl Into<String>) -> Self {
        let raw_message = raw_message.into();
        Self {
            user_id: user_id.into(),
            app_id,
            optimized_message: raw_message.clone(),
            raw_message,
            was_optimized: false,
            context: ContextBag::new(),
        }
    }
}

/// Inbound request for one conversational turn.
#[derive(Debug, Clone, Deserialize)]
pub struct SendMessage {
    pub user_id: String,
    pub message: String,
    #[serde(default)]
    pub app_id: Option<String>,
    /// Context echoed back by the caller (e.g. after a clarification).
    #[serde(default)]
    pub context: Option<ContextBag>,
    /// Caller-supplied history; when present, the history provider is
    /// not consulted.
    #[serde(default)]
    pub conversation_history: Option<Vec<ConversationEntry>>,
    /// Free-text notes forwarded to the prompt optimizer.
    #[serde(default)]
    pub notes: Option<String>,
}

/// The assistant's reply (or clarifying question) for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnReply {
    /// Reply text. When `needs_clarification` is true this is a
    /// question, not a final answer.
    pub response: String,
    /// Context the caller must echo back on the next turn (or rely on
    /// server-side history).
    pub context: ContextBag,
    pub timestamp: DateTime<Utc>,
    /// Signals that `response` is a question pausing normal dispatch.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub needs_clarification: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_role_roundtrip() {
        for role in [EntryRole::User, EntryRole::Assistant] {
            let s = role.to_string();
            let parsed: EntryRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_entry_role_serde() {
        let json = serde_json::to_string(&EntryRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: EntryRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EntryRole::Assistant);
    }

    #[test]
    fn test_clarification_state_roundtrip_through_context() {
        let state = ClarificationState::pending("build me a thing");
        let mut bag = ContextBag::new();
        state.apply(&mut bag);

        let recovered = ClarificationState::from_context(&bag).unwrap();
        assert_eq!(recovered, state);
        assert_eq!(recovered.original_message, "build me a thing");
    }

    #[test]
    fn test_clarification_state_absent_when_flag_false() {
        let mut bag = ContextBag::new();
        bag.insert(
            WAITING_FOR_CLARIFICATION.to_string(),
            serde_json::Value::Bool(false),
        );
        bag.insert(
            ORIGINAL_MESSAGE.to_string(),
            serde_json::Value::String("ignored".to_string()),
        );
        assert!(ClarificationState::from_context(&bag).is_none());
    }

    #[test]
    fn test_clarification_state_requires_original_message() {
        let mut bag = ContextBag::new();
        bag.insert(
            WAITING_FOR_CLARIFICATION.to_string(),
            serde_json::Value::Bool(true),
        );
        assert!(ClarificationState::from_context(&bag).is_none());
    }

    #[test]
    fn test_exchange_starts_unoptimized() {
        let ex = Exchange::new("u-1", None, "hello");
        assert_eq!(ex.raw_message, "hello");
        assert_eq!(ex.optimized_message, "hello");
        assert!(!ex.was_optimized);
        assert!(ex.context.is_empty());
    }

    #[test]
    fn test_conversation_entry_unknown_context_keys_preserved() {
        let json = r#"{
            "role": "assistant",
            "content": "hi",
            "context": { "waiting_for_clarification": true, "trace_id": "abc" }
        }"#;
        let entry: ConversationEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.role, EntryRole::Assistant);
        assert!(entry.context.contains_key("trace_id"));

        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["context"]["trace_id"], "abc");
    }

    #[test]
    fn test_turn_reply_omits_false_clarification_flag() {
        let reply = TurnReply {
            response: "hello".to_string(),
            context: ContextBag::new(),
            timestamp: Utc::now(),
            needs_clarification: false,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(!json.contains("needs_clarification"));

        let reply = TurnReply {
            needs_clarification: true,
            ..reply
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains("\"needs_clarification\":true"));
    }

    #[test]
    fn test_send_message_minimal_body() {
        let json = r#"{"user_id": "u-1", "message": "hello"}"#;
        let req: SendMessage = serde_json::from_str(json).unwrap();
        assert_eq!(req.user_id, "u-1");
        assert!(req.app_id.is_none());
        assert!(req.conversation_history.is_none());
        assert!(req.notes.is_none());
    }
}
