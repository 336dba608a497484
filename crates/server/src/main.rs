use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use audioshelf_core::{
    load_config, validate_config, AudiobookSource, FileAudiobookSource, MemoryViewStateStore,
    SqliteViewStateStore, ViewStateStore,
};
use audioshelf_server::{
    api::create_router,
    state::{spawn_idle_sweeper, AppState},
};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("AUDIOSHELF_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Catalog file: {:?}", config.catalog.path);
    info!(
        "Market {}, page size {}, default sort {}",
        config.catalog.market, config.catalog.page_size, config.view.default_sort
    );

    // Create audiobook source
    let source: Arc<dyn AudiobookSource> = Arc::new(FileAudiobookSource::new(&config.catalog.path));
    if !config.catalog.path.exists() {
        error!(
            "Catalog file {:?} does not exist; fetches will fail until it is created",
            config.catalog.path
        );
    }

    // Durable view state only when something is kept across reloads
    let policy = config.view.persistence_policy();
    let view_store: Arc<dyn ViewStateStore> = if policy.persists_anything() {
        info!(
            "Persisting view state to {:?} (hide set: {}, multi-cast toggle: {})",
            config.database.path, policy.persist_hide_set, policy.persist_multi_cast_toggle
        );
        Arc::new(
            SqliteViewStateStore::new(&config.database.path)
                .context("Failed to create view state store")?,
        )
    } else {
        info!("View state is session-only");
        Arc::new(MemoryViewStateStore::new())
    };

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), source, view_store));

    // Drop abandoned sessions in the background
    let sweeper = spawn_idle_sweeper(Arc::clone(&state));
    info!(
        "Idle sessions are dropped after {:?}",
        config.server.session_idle_timeout()
    );

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
