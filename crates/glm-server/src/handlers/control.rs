//! Interrupt and status handlers.

use axum::{extract::State, Json};

use crate::models::{CheckResponse, StatusResponse};
use crate::state::AppState;

/// Clear the process-wide flag. Every running session stops at its next
/// checkpoint; later sessions stay stopped unless the flag is re-armed.
pub async fn handle_interrupt(State(state): State<AppState>) -> Json<StatusResponse> {
    state.cancel.interrupt();
    tracing::warn!(
        active_sessions = state.sessions.active_count(),
        "Interrupted."
    );
    Json(StatusResponse::ok("OK"))
}

/// Report whether generation is currently allowed, with session counters.
pub async fn handle_check(State(state): State<AppState>) -> Json<CheckResponse> {
    let generating = state.cancel.is_allowed();
    Json(CheckResponse {
        message: if generating { "generating" } else { "idle" }.to_string(),
        generating,
        success: true,
        model: state.engine.model_name().to_string(),
        active_sessions: state.sessions.active_count(),
        sessions_issued: state.sessions.issued(),
    })
}
