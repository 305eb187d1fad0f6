//! Liveness and control responses.

use serde::{Deserialize, Serialize};

/// `{"message": ..., "success": ...}` acknowledgement.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub success: bool,
}

impl StatusResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: true,
        }
    }
}

/// Body of `POST /check`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResponse {
    /// `"generating"` while the cancellation flag allows generation, else `"idle"`.
    pub message: String,
    pub generating: bool,
    pub success: bool,
    /// Backend serving the sessions.
    pub model: String,
    pub active_sessions: usize,
    /// Session ids handed out since startup.
    pub sessions_issued: u64,
}
