//! Interval Timer - work/rest interval sequencing service
//!
//! This is the main entry point for the interval-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use interval_timer::{
    api::create_router,
    config::Config,
    services::IntervalStore,
    state::AppState,
    tasks::{event_log_task, ticker_task},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("interval_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting interval-timer server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, tick={}ms, store={}",
          config.host, config.port, config.tick_ms, config.store.display());

    let store = IntervalStore::open(&config.store)?;

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.tick_interval(),
        store,
    ));

    // Load the most recent configuration; the sequencer stays idle if it is unusable
    if let Err(e) = state.reconfigure() {
        warn!("Saved interval configuration not loaded: {}", e);
    }

    // Start the background tasks
    let log_state = Arc::clone(&state);
    tokio::spawn(async move {
        event_log_task(log_state).await;
    });

    let ticker_state = Arc::clone(&state);
    tokio::spawn(async move {
        ticker_task(ticker_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /intervals        - Save a configuration and load it");
    info!("  GET  /intervals/latest - Most recent saved configuration");
    info!("  POST /configure        - Restart from the latest configuration");
    info!("  POST /start            - Start or resume the current phase");
    info!("  POST /pause            - Pause the current phase");
    info!("  POST /reset            - Clear the current sequence");
    info!("  GET  /status           - Progress and phase history");
    info!("  GET  /health           - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
