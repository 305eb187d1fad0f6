//! HTTP error handling and response mapping.
//!
//! Only errors raised before the first SSE frame come through here. Once a
//! stream has started, failures travel as [`crate::SessionEvent::Error`].

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use glm_engine::EngineError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            ServerError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            ServerError::Engine(EngineError::InvalidParams(msg)) => {
                (StatusCode::BAD_REQUEST, "invalid_request_error", msg)
            }
            ServerError::Engine(EngineError::ModelLoad(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg)
            }
            ServerError::Engine(EngineError::Inference(msg)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "server_error", msg)
            }
        };

        let body = Json(json!({
            "message": message,
            "success": false,
            "error": error_type,
        }));

        (status, body).into_response()
    }
}
