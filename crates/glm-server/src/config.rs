//! Command-line and environment configuration.
//!
//! [`Cli`] is what clap parses; [`ServerConfig`] is the validated form the
//! rest of the server reads. Nothing here changes after startup.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use clap::Parser;
use glm_engine::GenerationParams;

/// Default listen port of the streaming service.
pub const DEFAULT_PORT: u16 = 5178;

/// Default number of history turns kept per request.
pub const DEFAULT_MAX_HISTORY: usize = 32;

/// Stream API service for a single chat model.
#[derive(Debug, Parser)]
#[command(name = "glm-server", version)]
pub struct Cli {
    /// Address to listen on.
    #[arg(short = 'H', long, env = "GLM_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port of this service.
    #[arg(short = 'P', long, env = "GLM_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Quantization level of the model weights: 4, 8 or 16.
    #[arg(
        short,
        long,
        env = "GLM_QUANTIZE",
        default_value_t = 4,
        value_parser = parse_quantize
    )]
    pub quantize: u8,

    /// Maximum number of history turns kept per request (oldest dropped first).
    #[arg(
        long,
        env = "GLM_MAX_HISTORY",
        default_value_t = DEFAULT_MAX_HISTORY,
        value_parser = parse_positive
    )]
    pub max_history: usize,

    /// Default generation budget when a request omits `max_length`.
    #[arg(
        long,
        env = "GLM_MAX_LENGTH",
        default_value_t = 256,
        value_parser = parse_positive
    )]
    pub max_length: usize,

    /// Default nucleus sampling mass.
    #[arg(long, env = "GLM_TOP_P", default_value_t = 0.7)]
    pub top_p: f32,

    /// Default sampling temperature.
    #[arg(long, env = "GLM_TEMPERATURE", default_value_t = 1.0)]
    pub temperature: f32,

    /// Re-allow generation whenever a new stream is accepted, instead of
    /// keeping the interrupt latched.
    #[arg(long, env = "GLM_REARM_ON_STREAM")]
    pub rearm_on_stream: bool,

    /// Pause between events of the demo backend, in milliseconds.
    #[arg(long, env = "GLM_STEP_DELAY_MS", default_value_t = 20)]
    pub step_delay_ms: u64,
}

impl Cli {
    /// Validate the parsed flags into a [`ServerConfig`].
    pub fn into_config(self) -> Result<ServerConfig, String> {
        let defaults = GenerationParams {
            max_length: self.max_length,
            top_p: self.top_p,
            temperature: self.temperature,
        };
        defaults.validate().map_err(|e| e.to_string())?;

        Ok(ServerConfig {
            host: self.host,
            port: self.port,
            quantize: self.quantize,
            max_history: self.max_history,
            defaults,
            rearm_on_stream: self.rearm_on_stream,
            step_delay: Duration::from_millis(self.step_delay_ms),
        })
    }
}

fn parse_quantize(raw: &str) -> Result<u8, String> {
    match raw.parse::<u8>() {
        Ok(bits @ (4 | 8 | 16)) => Ok(bits),
        _ => Err(format!("expected 4, 8 or 16, got {raw}")),
    }
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Quantization level reported to the backend.
    pub quantize: u8,
    /// History cap applied to every request.
    pub max_history: usize,
    /// Generation parameters used when a request omits them.
    pub defaults: GenerationParams,
    /// Whether an accepted stream resets the cancellation flag.
    pub rearm_on_stream: bool,
    /// Pacing of the demo backend.
    pub step_delay: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            quantize: 4,
            max_history: DEFAULT_MAX_HISTORY,
            defaults: GenerationParams::default(),
            rearm_on_stream: false,
            step_delay: Duration::ZERO,
        }
    }
}

impl ServerConfig {
    /// Resolve `host:port` to the first matching socket address.
    pub fn socket_addr(&self) -> io::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::AddrNotAvailable,
                    format!("no address for {}", self.host),
                )
            })
    }
}
