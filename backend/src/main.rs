//! NutriPlan Backend
//!
//! Stateless HTTP service that turns patient anthropometrics into
//! energy and macronutrient targets.
//!
//! ## Architecture
//!
//! - Routes: HTTP request handling and routing
//! - Services: request mapping, metrics and logging around the engine
//! - Shared crate: the pure calculation engine

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use nutriplan_backend::{config, routes, state::AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing();

    // Load configuration
    let config = config::AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if config::AppConfig::is_production() { "production" } else { "development" },
        "Starting NutriPlan Backend"
    );

    // A bad policy would fail every request, so refuse to start
    config
        .calculator
        .validate()
        .context("Invalid calculator policy")?;

    if config::AppConfig::is_production() {
        validate_production_config(&config);
    }

    // Create application state
    let mut state = AppState::new(config.clone());
    if config.metrics.enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics enabled at /metrics");
        state = state.with_metrics(handle);
    }

    // Build application
    let app = routes::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(address = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // Serve with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config::AppConfig::is_production() {
            "nutriplan_backend=info,nutriplan_shared=info,tower_http=info".into()
        } else {
            "nutriplan_backend=debug,nutriplan_shared=debug,tower_http=debug".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config::AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

/// Warn about settings that are unusual for a production deployment
fn validate_production_config(config: &config::AppConfig) {
    if !config.metrics.enabled {
        warn!("Metrics are disabled in production; /metrics will answer 404");
    }

    if config.server.host == "127.0.0.1" || config.server.host == "localhost" {
        warn!(host = %config.server.host, "Server bound to loopback - ensure this is intentional for production");
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
