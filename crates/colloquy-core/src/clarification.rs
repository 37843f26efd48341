//! Clarification state encoding and detection.
//!
//! When the optimizer pauses a turn with a question, the waiting state
//! is written into the assistant reply's context bag and replayed via
//! conversation history on the next request. This module detects that
//! state and reconstructs the original intent before re-optimizing.
//!
//! The scan runs backward from the most recent entry; the first
//! pending clarification found wins and older ones are implicitly
//! superseded. Interleaved conversations on one conversation id are a
//! documented limitation of this policy, not handled here.

use colloquy_types::exchange::{
    ClarificationState, ContextBag, ConversationEntry, EntryRole, CLARIFICATION_RESPONSE,
    ORIGINAL_MESSAGE,
};

/// A pending clarification recovered from history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingClarification {
    /// The pre-clarification user message that triggered the question.
    pub original_message: String,
}

/// Scan history from most recent to oldest for a pending clarification.
///
/// Only assistant entries are considered; user entries never carry the
/// waiting flag. Returns the most recent pending clarification, or
/// `None` for a normal turn.
pub fn find_pending(history: &[ConversationEntry]) -> Option<PendingClarification> {
    history.iter().rev().find_map(|entry| {
        if entry.role != EntryRole::Assistant {
            return None;
        }
        ClarificationState::from_context(&entry.context).map(|state| PendingClarification {
            original_message: state.original_message,
        })
    })
}

/// Merge a clarification answer back into the original message.
///
/// The merged form is what reaches the optimizer, so the rewriter sees
/// the full intent rather than a bare answer like "a todo app".
pub fn merge_clarification(original_message: &str, answer: &str) -> String {
    format!("{original_message}\n\nUser clarification: {answer}")
}

/// Mark an exchange context as a resolved clarification answer.
pub fn mark_resolved(context: &mut ContextBag, original_message: &str) {
    context.insert(
        CLARIFICATION_RESPONSE.to_string(),
        serde_json::Value::Bool(true),
    );
    context.insert(
        ORIGINAL_MESSAGE.to_string(),
        serde_json::Value::String(original_message.to_string()),
    );
}

/// Encode "awaiting clarification" into a reply context bag.
pub fn encode_waiting(context: &mut ContextBag, original_message: &str) {
    ClarificationState::pending(original_message).apply(context);
}
