// Scan API handlers

pub mod docs;
pub mod scan;

use crate::app::AppState;
use axum::{routing::post, Router};

// Versioned scan routes, nested under /v1/scan
pub fn scan_routes() -> Router<AppState> {
    Router::new()
        .route("/url", post(scan::scan_url))
        .route("/audio", post(scan::scan_audio))
        .route("/image", post(scan::scan_image))
}

// Routes kept for existing web clients, nested under /api
pub fn legacy_scan_routes() -> Router<AppState> {
    Router::new()
        .route("/scrape", post(scan::scan_url))
        .route("/analyze-audio", post(scan::scan_audio))
        .route("/analyze-image", post(scan::scan_image))
}
