//! HTTP service frontier
//!
//! Maps inbound requests onto the prediction gateways and translates the
//! error taxonomy into status codes at this boundary only. CORS is wide
//! open; the service is meant to sit behind its own frontend page.

use crate::error::ServiceError;
use crate::metrics::ServiceMetrics;
use crate::models::inference::InferenceEngine;
use crate::types::prediction::{FraudPrediction, HealthStatus, PhishingPrediction};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::CorsLayer;
use tracing::debug;

/// Shared application state, constructed once at startup.
pub struct AppState {
    pub engine: Arc<InferenceEngine>,
    pub metrics: Arc<ServiceMetrics>,
    pub frontend_path: PathBuf,
}

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict-phishing", post(predict_phishing))
        .route("/predict-fraud", post(predict_fraud))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the static frontend page.
async fn index(State(state): State<Arc<AppState>>) -> Response {
    match tokio::fs::read_to_string(&state.frontend_path).await {
        Ok(page) => Html(page).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Frontend file not found" })),
        )
            .into_response(),
    }
}

async fn predict_phishing(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PhishingPrediction>, ServiceError> {
    let started = Instant::now();

    let result = parse_body(payload).and_then(|body| {
        let url = body.get("url").and_then(Value::as_str).unwrap_or_default();
        state.engine.predict_phishing(url)
    });

    state.metrics.record_request(started.elapsed());
    match &result {
        Ok(prediction) => state.metrics.record_prediction(prediction.prediction.as_str()),
        Err(err) => state.metrics.record_error(err.kind()),
    }

    result.map(Json)
}

async fn predict_fraud(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<FraudPrediction>, ServiceError> {
    let started = Instant::now();

    let result = parse_body(payload).and_then(|body| {
        let record = body
            .as_object()
            .ok_or_else(|| ServiceError::invalid_input("Request body must be a JSON object"))?;
        state.engine.predict_fraud(record)
    });

    state.metrics.record_request(started.elapsed());
    match &result {
        Ok(prediction) => state.metrics.record_prediction(prediction.prediction.as_str()),
        Err(err) => state.metrics.record_error(err.kind()),
    }

    result.map(Json)
}

/// Report in-process model load state. Never fails and never re-attempts
/// loading.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    debug!("Health check");
    Json(HealthStatus::new(
        state.engine.phishing_loaded(),
        state.engine.cc_fraud_loaded(),
    ))
}

fn parse_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ServiceError> {
    payload
        .map(|Json(value)| value)
        .map_err(|_| ServiceError::invalid_input("Request body must be valid JSON"))
}
