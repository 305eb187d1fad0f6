//! Liveness handler.

use axum::Json;

use crate::models::StatusResponse;

pub async fn handle_index() -> Json<StatusResponse> {
    Json(StatusResponse::ok("Server started"))
}
