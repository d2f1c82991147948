use std::net::SocketAddr;
use std::sync::Arc;
use anyhow::Context;
use skybook_api::{app, AppState};
use skybook_store::{BackendClient, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skybook_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Skybook API on port {}", config.server.port);

    let backend = BackendClient::new(&config.backend).context("Failed to build backend client")?;
    tracing::info!("Using booking backend at {}", config.backend.base_url);

    let app_state = AppState::new(Arc::new(backend), config.seating.clone());
    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
