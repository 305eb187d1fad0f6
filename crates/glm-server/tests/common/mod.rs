//! Shared stubs and helpers for the HTTP tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use glm_engine::{
    CancellationFlag, EngineError, GenerationEngine, GenerationRequest, PartialStream, Result,
};
use glm_server::{AppState, ServerConfig};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Replays a script of cumulative texts, optionally failing partway.
pub struct ScriptedEngine {
    script: Vec<String>,
    fail_after: Option<usize>,
    refuse: Option<EngineError>,
    calls: AtomicUsize,
    last_request: Mutex<Option<GenerationRequest>>,
}

impl ScriptedEngine {
    pub fn new(script: &[&str]) -> Self {
        Self {
            script: script.iter().map(|s| s.to_string()).collect(),
            fail_after: None,
            refuse: None,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Fail with an inference error after `n` events.
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Reject every call before streaming.
    pub fn refusing(mut self, err: EngineError) -> Self {
        self.refuse = Some(err);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GenerationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

impl GenerationEngine for ScriptedEngine {
    fn model_name(&self) -> &str {
        "scripted"
    }

    fn generate(
        &self,
        request: GenerationRequest,
        flag: CancellationFlag,
    ) -> Result<PartialStream> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request);
        if let Some(err) = &self.refuse {
            return Err(err.clone());
        }

        let script = self.script.clone();
        let fail_after = self.fail_after;
        Ok(Box::pin(async_stream::stream! {
            for (i, text) in script.into_iter().enumerate() {
                if fail_after == Some(i) {
                    yield Err(EngineError::Inference("simulated failure".to_string()));
                    return;
                }
                if !flag.is_allowed() {
                    return;
                }
                yield Ok(text);
            }
        }))
    }
}

pub fn test_state(engine: Arc<dyn GenerationEngine>) -> AppState {
    test_state_with(engine, ServerConfig::default())
}

pub fn test_state_with(engine: Arc<dyn GenerationEngine>, config: ServerConfig) -> AppState {
    AppState::new(engine, config)
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Parse every `data:` payload of an SSE body, in order.
pub fn data_frames(body: &str) -> Vec<Value> {
    body.split("\n\n")
        .filter_map(|frame| frame.strip_prefix("data: "))
        .map(|payload| serde_json::from_str(payload).unwrap())
        .collect()
}
