//! ModelBackend trait definition.
//!
//! This is the core abstraction for services that can produce an
//! assistant reply. Uses RPITIT; the `BoxModelBackend` wrapper makes
//! implementations object-safe for the dispatcher's candidate list.

use colloquy_types::backend::{BackendError, InferenceRequest, InferenceResponse};

/// Trait for model-serving backends (direct model client, legacy
/// routed backend, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in colloquy-infra.
pub trait ModelBackend: Send + Sync {
    /// Human-readable backend name (e.g., "direct", "routed").
    fn name(&self) -> &str;

    /// Produce an assistant reply for the given request.
    fn infer(
        &self,
        request: &InferenceRequest,
    ) -> impl std::future::Future<Output = Result<InferenceResponse, BackendError>> + Send;
}
