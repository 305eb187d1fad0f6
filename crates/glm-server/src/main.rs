use clap::Parser;
use glm_engine::{EchoEngine, GenerationEngine};
use glm_server::{run_server, AppState, Cli};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Cli::parse().into_config()?;
    let addr = config.socket_addr()?;

    // Demo backend; a real model runtime plugs in behind the same trait.
    let engine = EchoEngine::new(format!("echo-int{}", config.quantize))
        .with_step_delay(config.step_delay);
    tracing::info!(model = %engine.model_name(), bits = config.quantize, "using model");
    let engine = Arc::new(engine);

    let state = AppState::new(engine, config);

    tracing::info!("Starting server on {}", addr);
    run_server(state, addr).await?;
    Ok(())
}
