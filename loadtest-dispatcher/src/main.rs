//! Ammo recording proxy
//!
//! Sits between a client and the system under test, forwards every request
//! and records the ones worth replaying as load generator ammo.

mod config;
mod payload;
mod proxy;
mod request;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Args, DispatcherConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loadtest_dispatcher=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let addr = format!("0.0.0.0:{}", args.port);
    let config = DispatcherConfig::from(args);

    let state = proxy::AppState::new(config).context("Failed to build the upstream client")?;
    let app = proxy::create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Dispatcher listens to your requests on {}", addr);

    axum::serve(listener, app).await.context("Dispatcher stopped")?;
    Ok(())
}
