// Scan dispatcher
// Routes each scan mode to its pipeline behind a failure boundary that always yields a verdict

use axum::{http::StatusCode, response::IntoResponse, Json};
use futures_util::FutureExt;
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

use crate::{
    models::scan::{MediaScanResponse, RecordableScan, ScanRequest, UrlScanResponse},
    services::{
        analyzers::MediaAnalyzer, capture::CaptureOrchestrator, metrics::ScanMetrics,
        risk_engine::UrlRiskEngine, scan_records::ScanRecordSink,
    },
};

// =============================================================================
// SCAN OUTCOME
// =============================================================================

/// Result of one dispatch. Both variants carry a complete response.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome<T> {
    Completed(T),
    Degraded { response: T, reason: String },
}

impl<T> ScanOutcome<T> {
    pub fn response(&self) -> &T {
        match self {
            ScanOutcome::Completed(response) => response,
            ScanOutcome::Degraded { response, .. } => response,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            ScanOutcome::Completed(response) => response,
            ScanOutcome::Degraded { response, .. } => response,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ScanOutcome::Degraded { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScanOutcome::Completed(_) => "completed",
            ScanOutcome::Degraded { .. } => "degraded",
        }
    }
}

// Degraded scans are still a 200: callers only see the ERROR status
impl<T: Serialize> IntoResponse for ScanOutcome<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::OK, Json(self.into_inner())).into_response()
    }
}

// =============================================================================
// DISPATCHER
// =============================================================================

pub struct ScanDispatcher {
    engine: UrlRiskEngine,
    capture: Arc<CaptureOrchestrator>,
    audio: Arc<dyn MediaAnalyzer>,
    image: Arc<dyn MediaAnalyzer>,
    records: Arc<dyn ScanRecordSink>,
    metrics: ScanMetrics,
}

impl ScanDispatcher {
    pub fn new(
        engine: UrlRiskEngine,
        capture: Arc<CaptureOrchestrator>,
        audio: Arc<dyn MediaAnalyzer>,
        image: Arc<dyn MediaAnalyzer>,
        records: Arc<dyn ScanRecordSink>,
        metrics: ScanMetrics,
    ) -> Self {
        Self {
            engine,
            capture,
            audio,
            image,
            records,
            metrics,
        }
    }

    /// Score a URL and attach a visual capture
    pub async fn scan_url(&self, url: &str, identity: Option<&str>) -> ScanOutcome<UrlScanResponse> {
        let request = ScanRequest::Url(url.to_string());

        let outcome = match AssertUnwindSafe(self.run_url_scan(url)).catch_unwind().await {
            Ok(response) => ScanOutcome::Completed(response),
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!("URL scan of {} failed, serving fallback: {}", url, reason);
                ScanOutcome::Degraded {
                    response: UrlScanResponse::fallback(url),
                    reason,
                }
            },
        };

        self.finish(&request, identity, outcome)
    }

    pub async fn scan_audio(
        &self,
        filename: &str,
        identity: Option<&str>,
    ) -> ScanOutcome<MediaScanResponse> {
        self.scan_media(ScanRequest::Audio(filename.to_string()), self.audio.as_ref(), identity)
            .await
    }

    pub async fn scan_image(
        &self,
        filename: &str,
        identity: Option<&str>,
    ) -> ScanOutcome<MediaScanResponse> {
        self.scan_media(ScanRequest::Image(filename.to_string()), self.image.as_ref(), identity)
            .await
    }

    async fn run_url_scan(&self, url: &str) -> UrlScanResponse {
        let verdict = self.engine.analyze(url);

        let started = Instant::now();
        let capture = self.capture.capture(url, verdict.status).await;
        self.metrics.record_capture(&capture, started.elapsed());

        info!(
            score = verdict.score,
            status = %verdict.status,
            captured = capture.captured,
            "URL scan complete: {}",
            url
        );

        UrlScanResponse::from_parts(url, verdict, capture)
    }

    async fn scan_media(
        &self,
        request: ScanRequest,
        analyzer: &dyn MediaAnalyzer,
        identity: Option<&str>,
    ) -> ScanOutcome<MediaScanResponse> {
        let mode = request.mode();

        let outcome = match AssertUnwindSafe(analyzer.analyze(request.target()))
            .catch_unwind()
            .await
        {
            Ok(verdict) => {
                info!(
                    score = verdict.score,
                    synthetic = verdict.is_synthetic,
                    "{} scan complete: {}",
                    mode,
                    request.target()
                );
                ScanOutcome::Completed(MediaScanResponse::from(verdict))
            },
            Err(panic) => {
                let reason = panic_message(panic.as_ref());
                error!(
                    "{} scan of {} failed, serving fallback: {}",
                    mode,
                    request.target(),
                    reason
                );
                ScanOutcome::Degraded {
                    response: MediaScanResponse::fallback(mode),
                    reason,
                }
            },
        };

        self.finish(&request, identity, outcome)
    }

    /// Metrics plus record hand-off. Only completed scans with a caller identity are recorded.
    fn finish<T: RecordableScan>(
        &self,
        request: &ScanRequest,
        identity: Option<&str>,
        outcome: ScanOutcome<T>,
    ) -> ScanOutcome<T> {
        self.metrics.record_scan(request.mode(), outcome.label());

        if let (ScanOutcome::Completed(response), Some(user_id)) = (&outcome, identity) {
            if let Err(e) = self.records.submit(response.to_record(user_id, request)) {
                warn!("Scan record for {} dropped: {}", request.target(), e);
            }
        }

        outcome
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
