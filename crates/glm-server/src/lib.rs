//! # glm-server
//!
//! Streaming HTTP front end for a single long-running language model.
//!
//! Drives any [`glm_engine::GenerationEngine`] through three routes:
//! `POST /stream` turns a request into Server-Sent Events carrying the
//! cumulative answer, `POST /interrupt` stops every running generation, and
//! `POST /check` reports whether generation is currently allowed.

pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod models;
pub mod pipeline;
pub mod registry;
pub mod server;
pub mod state;

pub use config::{Cli, ServerConfig};
pub use error::ServerError;
pub use history::HistoryNormalizer;
pub use pipeline::SessionEvent;
pub use registry::{Session, SessionGuard, SessionRegistry};
pub use server::{create_router, run_server};
pub use state::AppState;
