// API documentation handlers
pub mod schemas;

use axum::{http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

pub use schemas::ScanApiDoc;

/// Serve OpenAPI JSON specification at /v1/docs/openapi.json
pub async fn serve_openapi_spec() -> impl IntoResponse {
    (StatusCode::OK, Json(ScanApiDoc::openapi()))
}
