//! Application state shared across handlers.

use std::sync::Arc;

use glm_engine::{CancellationFlag, GenerationEngine};

use crate::config::ServerConfig;
use crate::history::HistoryNormalizer;
use crate::registry::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    /// Shared engine for generation.
    pub engine: Arc<dyn GenerationEngine>,
    pub config: Arc<ServerConfig>,
    /// Session ids and open-session tracking.
    pub sessions: Arc<SessionRegistry>,
    /// The one process-wide interrupt switch.
    pub cancel: CancellationFlag,
    pub history: HistoryNormalizer,
}

impl AppState {
    pub fn new(engine: Arc<dyn GenerationEngine>, config: ServerConfig) -> Self {
        Self {
            engine,
            history: HistoryNormalizer::new(config.max_history),
            config: Arc::new(config),
            sessions: SessionRegistry::new(),
            cancel: CancellationFlag::new(),
        }
    }
}
