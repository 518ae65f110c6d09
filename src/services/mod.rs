// Services module for the AuthenticEye scan core
// Scoring, capture, analysis and record emission

pub mod analyzers;
pub mod capture;
pub mod dispatcher;
pub mod metrics;
pub mod risk_engine;
pub mod scan_records;

// Re-export commonly used services
pub use analyzers::{AnalyzerProfile, MediaAnalyzer, MockAnalyzer};
pub use capture::{
    BrowserDriver, CaptureError, CaptureOrchestrator, HeadlessChromeDriver, PageSnapshot,
    Viewport,
};
pub use dispatcher::{ScanDispatcher, ScanOutcome};
pub use metrics::ScanMetrics;
pub use risk_engine::UrlRiskEngine;
pub use scan_records::{
    record_sink_from_config, DocumentStoreWriter, LoggingRecordSink, RecordSinkError,
    ScanRecordSink,
};
