// Library exports for the AuthenticEye scan core
// This file exposes modules and functions for library consumers

pub mod app;
pub mod app_config;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::trace::TraceLayer;

// Re-export commonly used types
pub use app::{AppState, ScanComponents};
pub use app_config::{AppConfig, CONFIG};
pub use config::RiskLexicon;
pub use services::{CaptureOrchestrator, ScanDispatcher, ScanMetrics, ScanOutcome, UrlRiskEngine};
pub use utils::scan_errors::{ScanError, ScanResult};

// Re-export handler route builders
pub use handlers::{legacy_scan_routes, scan_routes};

// Library initialization function for external consumers
pub async fn initialize_app_state() -> Result<AppState, Box<dyn std::error::Error>> {
    use tracing::info;

    // Load environment
    dotenv::dotenv().ok();

    let config = app_config::config().clone();

    info!(
        "Initializing scan services ({} capture slots, live capture {})",
        config.capture.max_concurrent,
        if config.features.enable_live_capture { "on" } else { "off" }
    );
    let components = ScanComponents::from_config(&config)?;

    Ok(AppState::new(config, components)?)
}

/// Full HTTP surface: versioned routes, legacy routes, health, metrics and docs
pub fn build_router(state: AppState) -> Router {
    let features = state.config.features.clone();

    let mut v1 = Router::new()
        .nest("/scan", handlers::scan_routes())
        .route("/health", get(health_check));
    if features.enable_openapi {
        v1 = v1.route("/docs/openapi.json", get(handlers::docs::serve_openapi_spec));
    }

    let mut app = Router::new()
        .nest("/v1", v1)
        .nest("/api", handlers::legacy_scan_routes());
    if features.enable_metrics {
        app = app.route("/metrics", get(metrics_handler));
    }

    app.layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::dynamic_cors_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// Health check handler
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "Health",
    operation_id = "healthCheck",
    responses(
        (status = 200, description = "Service is up; capture pool availability included")
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let timestamp = chrono::Utc::now().to_rfc3339();

    let available = state.capture.available_slots();
    let max_concurrent = state.capture.max_concurrent();
    let pool_status = if available > 0 { "healthy" } else { "saturated" };

    // A saturated pool still serves scans (with placeholders), so it only degrades
    let response = serde_json::json!({
        "status": if available > 0 { "healthy" } else { "degraded" },
        "service": "authentic-eye-core",
        "timestamp": timestamp,
        "components": {
            "capture_pool": {
                "status": pool_status,
                "available_slots": available,
                "max_concurrent": max_concurrent,
                "live_capture": state.config.features.enable_live_capture
            }
        }
    });

    (StatusCode::OK, Json(response))
}

// Prometheus exposition
pub async fn metrics_handler(State(state): State<AppState>) -> ScanResult<impl IntoResponse> {
    let body = state
        .metrics
        .render()
        .map_err(|e| ScanError::Internal(e.to_string()))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    ))
}
