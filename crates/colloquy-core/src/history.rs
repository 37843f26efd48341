//! HistoryProvider trait definition.
//!
//! Supplies prior turns of a conversation, oldest first. The provider
//! itself reports failures honestly; the orchestrator is the layer
//! that degrades them to an empty history.

use colloquy_types::error::HistoryError;
use colloquy_types::exchange::ConversationEntry;

/// Provider trait for conversation history retrieval.
///
/// Implementations live in colloquy-infra (e.g., `HttpHistoryProvider`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait HistoryProvider: Send + Sync {
    /// Fetch prior turns for `(user_id, app_id)`, oldest first.
    fn fetch(
        &self,
        user_id: &str,
        app_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> impl std::future::Future<Output = Result<Vec<ConversationEntry>, HistoryError>> + Send;
}
