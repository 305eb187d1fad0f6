//! `/stream` request body and Server-Sent Events payloads.

use serde::{Deserialize, Serialize};

/// Body of a `POST /stream` request. Every field is optional at the JSON
/// level so that a missing `query` becomes a validation error with a clear
/// message instead of a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct StreamRequest {
    pub query: Option<String>,
    pub answer_prefix: Option<String>,
    pub max_length: Option<usize>,
    pub top_p: Option<f32>,
    pub temperature: Option<f32>,
    /// `[[user, model], ...]`, oldest first.
    pub history: Option<Vec<Vec<String>>>,
}

/// Payload of one `data:` frame.
///
/// Progress frames carry `text`, the cumulative answer so far. The terminal
/// frame of a failed session carries `error` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub session_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StreamFrame {
    pub fn text(session_id: u64, text: impl Into<String>) -> Self {
        Self {
            session_id,
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn error(session_id: u64, message: impl Into<String>) -> Self {
        Self {
            session_id,
            text: None,
            error: Some(message.into()),
        }
    }
}
