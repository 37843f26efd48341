//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use colloquy_types::error::OrchestrateError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Client sent an invalid request.
    Validation(String),
    /// Every backend candidate failed (or none are configured).
    BackendsUnavailable(String),
}

impl From<OrchestrateError> for AppError {
    fn from(e: OrchestrateError) -> Self {
        match e {
            OrchestrateError::InvalidRequest(msg) => AppError::Validation(msg),
            OrchestrateError::Dispatch(err) => AppError::BackendsUnavailable(err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::BackendsUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, "BACKENDS_UNAVAILABLE", msg.clone())
            }
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use colloquy_types::backend::{BackendError, DispatchError};

    #[test]
    fn test_invalid_request_maps_to_validation() {
        let err: AppError = OrchestrateError::InvalidRequest("user_id is required".to_string()).into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_dispatch_failure_maps_to_backends_unavailable() {
        let err: AppError = OrchestrateError::Dispatch(DispatchError::Exhausted {
            attempts: 2,
            last_error: BackendError::Unavailable("down".to_string()),
        })
        .into();
        match err {
            AppError::BackendsUnavailable(msg) => assert!(msg.contains("2 backend candidate(s)")),
            other => panic!("expected BackendsUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn test_no_candidates_maps_to_backends_unavailable() {
        let err: AppError = OrchestrateError::Dispatch(DispatchError::NoCandidates).into();
        assert!(matches!(err, AppError::BackendsUnavailable(_)));
    }
}
