use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod config;
mod error;
mod handlers;
mod models;
mod shortcode;
mod store;

use store::LinkStore;

// ── Shared application state ───────────────────────────────────────────────

pub struct AppState {
    pub config: config::AppConfig,
    /// The link file. Handlers reload it on every request instead of keeping
    /// a copy in memory.
    pub store: LinkStore,
}

impl AppState {
    pub fn new(config: config::AppConfig) -> Self {
        let store = LinkStore::new(config.data_file.clone());
        Self { config, store }
    }
}

// ── Entry point ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent — env vars may already be set)
    dotenvy::dotenv().ok();

    // Initialise structured logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hexlink=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = config::AppConfig::from_env()?;
    tracing::info!("Starting Hexlink on {}:{}", config.host, config.port);
    tracing::info!("Base URL: {}", config.base_url);

    let state = Arc::new(AppState::new(config));

    // Create the link file if needed and refuse to start on a corrupt one.
    let links = state.store.load().await?;
    tracing::info!(
        "Link file {} holds {} link(s)",
        state.store.path().display(),
        links.len()
    );

    let bind_addr = state.config.bind_addr();
    let app = app::router(state);

    // ── Serve ──────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
