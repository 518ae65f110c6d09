pub mod scan;

// Re-export common types
pub use scan::{
    AssetScanRequest, CaptureResult, MediaScanResponse, MediaVerdict, RecordableScan,
    RiskStatus, RiskVerdict, ScanMode, ScanRecord, ScanRequest, UrlScanRequest,
    UrlScanResponse,
};
