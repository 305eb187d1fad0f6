//! Deterministic demo backend.
//!
//! `EchoEngine` answers every query by replaying `answer_prefix + query` one
//! character per step. It behaves like a real backend where it matters to the
//! server: cumulative events, a length budget, flag polling before every step
//! and one generation at a time.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::{
    CancellationFlag, EngineError, GenerationEngine, GenerationRequest, PartialStream, Result,
};

/// Demo backend standing in for a loaded model.
#[derive(Debug, Clone)]
pub struct EchoEngine {
    name: String,
    step_delay: Duration,
    /// Held for the whole generation: a single model instance.
    model: Arc<Mutex<()>>,
}

impl Default for EchoEngine {
    fn default() -> Self {
        Self::new("echo")
    }
}

impl EchoEngine {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            step_delay: Duration::ZERO,
            model: Arc::new(Mutex::new(())),
        }
    }

    /// Pause between produced events, to make streaming observable.
    pub fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }
}

impl GenerationEngine for EchoEngine {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn generate(
        &self,
        request: GenerationRequest,
        flag: CancellationFlag,
    ) -> Result<PartialStream> {
        request.params.validate()?;

        let answer: Vec<char> = request
            .answer_prefix
            .chars()
            .chain(request.query.chars())
            .take(request.params.max_length)
            .collect();
        let delay = self.step_delay;
        let model = Arc::clone(&self.model);

        tracing::debug!(
            history_turns = request.history.len(),
            budget = answer.len(),
            "echo generation queued"
        );

        let stream = async_stream::stream! {
            let _model = model.lock_owned().await;
            let mut text = String::with_capacity(answer.len());

            for ch in answer {
                if !flag.is_allowed() {
                    tracing::debug!(produced = text.chars().count(), "echo generation interrupted");
                    return;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                text.push(ch);
                yield Ok::<_, EngineError>(text.clone());
            }
        };

        Ok(Box::pin(stream))
    }
}
