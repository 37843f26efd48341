//! BoxModelBackend -- object-safe dynamic dispatch wrapper for ModelBackend.
//!
//! Same blanket-impl pattern used across the codebase:
//! 1. Define an object-safe `ModelBackendDyn` trait with boxed futures
//! 2. Blanket-impl `ModelBackendDyn` for all `T: ModelBackend`
//! 3. `BoxModelBackend` wraps `Box<dyn ModelBackendDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use colloquy_types::backend::{BackendError, InferenceRequest, InferenceResponse};

use super::provider::ModelBackend;

/// Object-safe version of [`ModelBackend`] with boxed futures.
///
/// Exists solely to enable dynamic dispatch; a blanket implementation
/// covers every `ModelBackend`.
pub trait ModelBackendDyn: Send + Sync {
    fn name(&self) -> &str;

    fn infer_boxed<'a>(
        &'a self,
        request: &'a InferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InferenceResponse, BackendError>> + Send + 'a>>;
}

impl<T: ModelBackend> ModelBackendDyn for T {
    fn name(&self) -> &str {
        ModelBackend::name(self)
    }

    fn infer_boxed<'a>(
        &'a self,
        request: &'a InferenceRequest,
    ) -> Pin<Box<dyn Future<Output = Result<InferenceResponse, BackendError>> + Send + 'a>> {
        Box::pin(self.infer(request))
    }
}

/// Type-erased model backend for runtime candidate selection.
///
/// Since `ModelBackend` uses RPITIT it cannot be a trait object
/// directly; this wrapper delegates to the inner `ModelBackendDyn`.
pub struct BoxModelBackend {
    inner: Box<dyn ModelBackendDyn + Send + Sync>,
}

impl BoxModelBackend {
    /// Wrap a concrete `ModelBackend` in a type-erased box.
    pub fn new<T: ModelBackend + 'static>(backend: T) -> Self {
        Self {
            inner: Box::new(backend),
        }
    }

    /// Human-readable backend name.
    pub fn name(&self) -> &str {
        self.inner.name()
    }

    /// Produce an assistant reply for the given request.
    pub async fn infer(
        &self,
        request: &InferenceRequest,
    ) -> Result<InferenceResponse, BackendError> {
        self.inner.infer_boxed(request).await
    }
}
