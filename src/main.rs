//! SOC Gate API - Main Entry Point

use soc_gate::{build_router, ApiState, GateConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("SOC Gate API v{}", env!("CARGO_PKG_VERSION"));

    let config = GateConfig::from_env()?;
    let addr = config.listen_addr.clone();
    let app = build_router(ApiState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("SOC Gate API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
