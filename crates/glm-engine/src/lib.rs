//! # glm-engine
//!
//! The "narrow waist" of the glm-stream stack. Defines the [`GenerationEngine`]
//! trait that the HTTP layer drives, plus the request types and the shared
//! [`CancellationFlag`]. Backends (a real model runtime, the [`EchoEngine`]
//! demo, test stubs) plug in behind the trait without touching server code.
//!
//! ## Design Notes
//!
//! ### Cumulative events
//! A generation is a lazy stream of `Result<String>` items. Every `Ok` item
//! carries the *full* text generated so far, not a delta, so a consumer that
//! drops out halfway still holds a usable answer.
//!
//! ### Failure is an item
//! A backend that fails mid-generation yields exactly one `Err` item and then
//! ends. Stopping silently is reserved for the length budget, end-of-output
//! and cancellation.
//!
//! ### Interior Mutability
//! `GenerationEngine` methods take `&self` so one engine can be shared across
//! every session. Backends that own a single model instance serialize access
//! internally (see [`EchoEngine`]).

use std::pin::Pin;

use futures::Stream;

pub mod cancel;
pub mod echo;

pub use cancel::CancellationFlag;
pub use echo::EchoEngine;

pub type Result<T> = std::result::Result<T, EngineError>;

/// One conversation turn: (user text, model text).
pub type Turn = (String, String);

/// Lazy sequence of cumulative-text events produced by one generation.
pub type PartialStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Top-level error type for all engine operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),
    #[error("Invalid generation parameters: {0}")]
    InvalidParams(String),
    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Sampling and budget parameters for a single generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    /// Upper bound on generated length (tokens for real backends, characters
    /// for the echo backend).
    pub max_length: usize,
    /// Nucleus sampling mass, in (0, 1].
    pub top_p: f32,
    /// Sampling temperature, > 0.
    pub temperature: f32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_length: 256,
            top_p: 0.7,
            temperature: 1.0,
        }
    }
}

impl GenerationParams {
    /// Check the ranges every backend relies on.
    pub fn validate(&self) -> Result<()> {
        if self.max_length == 0 {
            return Err(EngineError::InvalidParams(
                "max_length must be positive".to_string(),
            ));
        }
        if !(self.top_p > 0.0 && self.top_p <= 1.0) {
            return Err(EngineError::InvalidParams(format!(
                "top_p must be in (0, 1], got {}",
                self.top_p
            )));
        }
        if !(self.temperature > 0.0) || !self.temperature.is_finite() {
            return Err(EngineError::InvalidParams(format!(
                "temperature must be positive, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Everything a backend needs to start one generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub query: String,
    /// Text the answer is forced to start with. Empty means none.
    pub answer_prefix: String,
    /// Prior turns, most-recent-last. Already truncated by the caller.
    pub history: Vec<Turn>,
    pub params: GenerationParams,
}

impl GenerationRequest {
    /// A request with no prefix, no history and default parameters.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            answer_prefix: String::new(),
            history: Vec::new(),
            params: GenerationParams::default(),
        }
    }
}

/// The core capability trait: turn a prompt into a lazy event stream.
///
/// Implementations must poll [`CancellationFlag::is_allowed`] before producing
/// each event and end the stream once it reads `false`.
pub trait GenerationEngine: Send + Sync {
    /// Name reported in logs and diagnostics.
    fn model_name(&self) -> &str;

    /// Start a generation.
    ///
    /// Errors returned here happen before any event exists (bad parameters,
    /// model unavailable). Errors during generation arrive as an `Err` item
    /// on the returned stream.
    fn generate(
        &self,
        request: GenerationRequest,
        flag: CancellationFlag,
    ) -> Result<PartialStream>;
}
