// OpenAPI document for the scan API

use utoipa::OpenApi;

use crate::{
    models::scan::{
        AssetScanRequest, MediaScanResponse, RiskStatus, ScanMode, ScanRecord, UrlScanRequest,
        UrlScanResponse,
    },
    utils::scan_errors::ScanErrorResponse,
};

/// utoipa-generated document covering every scan endpoint
#[derive(OpenApi)]
#[openapi(
    info(
        title = "AuthenticEye Scan API",
        description = "Heuristic URL risk scoring with visual capture, plus simulated audio and image forensics",
        version = "1.0.0"
    ),
    paths(
        crate::handlers::scan::scan_url,
        crate::handlers::scan::scan_audio,
        crate::handlers::scan::scan_image,
        crate::health_check,
    ),
    components(
        schemas(
            UrlScanRequest,
            AssetScanRequest,
            UrlScanResponse,
            MediaScanResponse,
            RiskStatus,
            ScanMode,
            ScanRecord,
            ScanErrorResponse,
        )
    ),
    tags(
        (name = "Scan", description = "Forensic scan endpoints"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ScanApiDoc;
