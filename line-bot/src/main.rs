//! LINE webhook relay server.
//!
//! This binary wires the pieces together:
//! - Loads configuration from the environment
//! - Optionally starts an ngrok tunnel and logs the webhook URL
//! - Serves `POST /callback` and `GET /health` until SIGINT/SIGTERM

use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linebot::tunnel::start_tunnel;
use linebot::web::{callback, health};
use linebot::{AppState, Config, LineClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize structured JSON logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();

    info!("server_starting");

    // Load configuration
    let config = Config::from_env();

    if !config.has_credentials() {
        warn!(
            access_token_configured = config.channel_access_token.is_some(),
            channel_secret_configured = config.channel_secret.is_some(),
            hint = "set LINE_ACCESS_TOKEN and LINE_CHANNEL_SECRET",
            "line_credentials_missing"
        );
    }

    info!(
        port = config.port,
        line_api_base = %config.line_api_base,
        ngrok_enabled = config.ngrok_enabled,
        "config_loaded"
    );

    // Optionally expose the local port through ngrok
    let mut tunnel = if config.ngrok_enabled {
        start_tunnel(config.port, &config.ngrok_api_url).await
    } else {
        None
    };

    // Create application state
    let line = LineClient::from_config(&config);
    let state = AppState::new(config.clone(), line);

    // Build the router
    let app = Router::new()
        .route("/health", get(health))
        .route("/callback", post(callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Bind to address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!(address = %addr, "server_listening");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop the tunnel agent if one is running
    if let Some(tunnel) = tunnel.as_mut() {
        tunnel.shutdown().await;
    }

    info!("server_shutdown_complete");

    Ok(())
}

/// Create a future that completes when a shutdown signal is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT"),
        _ = terminate => info!("Received SIGTERM"),
    }

    info!("server_shutting_down");
}
