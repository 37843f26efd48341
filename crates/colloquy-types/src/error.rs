use thiserror::Error;

use crate::backend::DispatchError;

/// Errors from the history provider. Degraded to an empty history by
/// the orchestrator -- conversational continuity is a quality-of-service
/// feature, not a correctness requirement.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("history transport error: {0}")]
    Transport(String),

    #[error("malformed history payload: {0}")]
    Malformed(String),
}

/// Top-level orchestration errors. Only client errors and
/// total-dispatch failure are user-visible; every fail-soft stage
/// degrades internally instead of producing one of these.
#[derive(Debug, Error)]
pub enum OrchestrateError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, DispatchError};

    #[test]
    fn test_invalid_request_display() {
        let err = OrchestrateError::InvalidRequest("user_id is required".to_string());
        assert_eq!(err.to_string(), "invalid request: user_id is required");
    }

    #[test]
    fn test_dispatch_error_is_transparent() {
        let err: OrchestrateError = DispatchError::Exhausted {
            attempts: 2,
            last_error: BackendError::Unavailable("connection refused".to_string()),
        }
        .into();
        assert!(err.to_string().contains("connection refused"));
    }
}
