//! Conversational turn endpoint.
//!
//! POST /api/v1/messages - Run one user message through the full
//! orchestration pipeline and return the reply (or clarifying
//! question) in the response envelope.

use std::time::Instant;

use axum::extract::State;
use axum::Json;

use colloquy_types::exchange::{SendMessage, TurnReply};

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/messages - One conversational turn.
///
/// Returns 200 with the reply envelope on success (including
/// clarification turns, which are a normal reply with
/// `needs_clarification: true`), 400 on client errors, and 502 when
/// every backend candidate failed.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessage>,
) -> Result<ApiResponse<TurnReply>, AppError> {
    let start = Instant::now();
    let request_id = uuid::Uuid::now_v7().to_string();

    let reply = state.orchestrator.send_message(request).await?;

    let elapsed = start.elapsed().as_millis() as u64;
    Ok(ApiResponse::success(reply, request_id, elapsed).with_link("self", "/api/v1/messages"))
}
