// Scan endpoints
// Validate payload presence, then hand off to the dispatcher. Scan faults never surface as HTTP errors.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use validator::Validate;

use crate::{
    app::AppState,
    middleware::ScanIdentity,
    models::scan::{AssetScanRequest, MediaScanResponse, UrlScanRequest, UrlScanResponse},
    services::dispatcher::ScanOutcome,
    utils::scan_errors::ScanResult,
};

#[utoipa::path(
    post,
    path = "/v1/scan/url",
    tag = "Scan",
    operation_id = "scanUrl",
    request_body = UrlScanRequest,
    params(
        ("x-user-id" = Option<String>, Header, description = "Opaque caller handle; scans are only recorded when present")
    ),
    responses(
        (status = 200, description = "Risk verdict with visual capture (status ERROR when degraded)", body = UrlScanResponse),
        (status = 400, description = "URL missing from the request", body = ScanErrorResponse)
    )
)]
pub async fn scan_url(
    State(state): State<AppState>,
    identity: ScanIdentity,
    payload: Result<Json<UrlScanRequest>, JsonRejection>,
) -> ScanResult<ScanOutcome<UrlScanResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let url = request.url.unwrap_or_default();
    Ok(state.dispatcher.scan_url(&url, identity.user_id()).await)
}

#[utoipa::path(
    post,
    path = "/v1/scan/audio",
    tag = "Scan",
    operation_id = "scanAudio",
    request_body = AssetScanRequest,
    params(
        ("x-user-id" = Option<String>, Header, description = "Opaque caller handle; scans are only recorded when present")
    ),
    responses(
        (status = 200, description = "Voice authenticity verdict with a 50-sample waveform", body = MediaScanResponse),
        (status = 400, description = "Filename missing from the request", body = ScanErrorResponse)
    )
)]
pub async fn scan_audio(
    State(state): State<AppState>,
    identity: ScanIdentity,
    payload: Result<Json<AssetScanRequest>, JsonRejection>,
) -> ScanResult<ScanOutcome<MediaScanResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let filename = request.filename.unwrap_or_default();
    Ok(state.dispatcher.scan_audio(&filename, identity.user_id()).await)
}

#[utoipa::path(
    post,
    path = "/v1/scan/image",
    tag = "Scan",
    operation_id = "scanImage",
    request_body = AssetScanRequest,
    params(
        ("x-user-id" = Option<String>, Header, description = "Opaque caller handle; scans are only recorded when present")
    ),
    responses(
        (status = 200, description = "Image authenticity verdict", body = MediaScanResponse),
        (status = 400, description = "Filename missing from the request", body = ScanErrorResponse)
    )
)]
pub async fn scan_image(
    State(state): State<AppState>,
    identity: ScanIdentity,
    payload: Result<Json<AssetScanRequest>, JsonRejection>,
) -> ScanResult<ScanOutcome<MediaScanResponse>> {
    let Json(request) = payload?;
    request.validate()?;

    let filename = request.filename.unwrap_or_default();
    Ok(state.dispatcher.scan_image(&filename, identity.user_id()).await)
}
