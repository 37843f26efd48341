//! PersonalizationProvider trait definition.
//!
//! Supplies a short text blob describing learned user preferences.
//! Best-effort: the orchestrator degrades any failure to an empty
//! string and fetches it concurrently with history, since both depend
//! only on the user id.

use colloquy_types::learning::PersonalizationError;

/// Provider trait for learned-preference text.
///
/// Implementations live in colloquy-infra (e.g.,
/// `HttpPersonalizationProvider`). Uses native async fn in traits
/// (RPITIT, Rust 2024 edition).
pub trait PersonalizationProvider: Send + Sync {
    /// Fetch the personalization blob for a user. An empty string is a
    /// valid result meaning "nothing learned yet".
    fn fetch(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<String, PersonalizationError>> + Send;
}
