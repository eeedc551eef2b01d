//! Binary entry point: wires Postgres repositories into the router.

use anyhow::Context as _;
use station_postgres::{
    PgCatalogRepository, PgJourneyRepository, PgOrderRepository, PgSessionRepository,
    PgTicketRepository, PgUserRepository,
};
use station_web::{AppState, Config, build_router};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .with(fmt::layer())
        .init();

    let pool = station_postgres::connect(
        &config.postgres.url,
        config.postgres.max_connections,
        Duration::from_secs(config.postgres.connect_timeout),
    )
    .await
    .context("failed to connect to the database")?;
    tracing::info!("database connected and migrated");

    let state = AppState::new(
        Arc::new(PgCatalogRepository::new(pool.clone())),
        Arc::new(PgJourneyRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgSessionRepository::new(pool.clone())),
        Arc::new(PgOrderRepository::new(pool.clone())),
        Arc::new(PgTicketRepository::new(pool)),
        config.clone(),
    );

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
