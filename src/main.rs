//! FraudNet Service - Main Entry Point
//!
//! Loads the phishing and credit card fraud models at startup and serves
//! the prediction endpoints over HTTP.

use anyhow::Result;
use fraudnet::{
    config::AppConfig,
    metrics::{MetricsReporter, ServiceMetrics},
    models::inference::InferenceEngine,
    server::{self, AppState},
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration (missing file falls back to defaults)
    let config = AppConfig::load()?;

    init_logging(&config);

    info!("Starting FraudNet service");
    info!(
        phishing_model = %config.models.phishing_path,
        cc_fraud_model = %config.models.cc_fraud_path,
        "Configuration loaded"
    );

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());

    // Load both model slots; absence of either is tolerated
    let engine = Arc::new(InferenceEngine::new(&config)?);

    // Start metrics reporter (logs a summary every 60 seconds)
    let metrics_clone = metrics.clone();
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, 60);
        reporter.start().await;
    });

    let state = Arc::new(AppState {
        engine,
        metrics,
        frontend_path: PathBuf::from(&config.server.frontend_path),
    });
    let app = server::router(state);

    let addr = config.bind_addr();
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("fraudnet={}", config.logging.level)));

    if config.logging.format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
