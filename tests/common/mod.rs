// Common test utilities and helper structs
// Shared across all test files to avoid duplication
#![allow(dead_code)]

use async_trait::async_trait;
use authentic_eye_core::{
    app_config::{AnalyzerConfig, AppConfig},
    build_router,
    config::RiskLexicon,
    models::scan::{MediaVerdict, ScanMode, ScanRecord},
    services::{
        BrowserDriver, CaptureError, MediaAnalyzer, MockAnalyzer, PageSnapshot, RecordSinkError,
        ScanRecordSink, Viewport,
    },
    AppState, ScanComponents,
};
use axum::{
    body::Body,
    http::{HeaderMap, Request, Response, StatusCode},
    Router,
};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

/// 1x1 transparent PNG
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

// =============================================================================
// FAKE COLLABORATORS
// =============================================================================

#[derive(Debug, Clone)]
pub enum DriverBehavior {
    Succeed { title: String },
    Hang,
    Fail,
    Panic,
}

/// Browser driver with scripted behavior that counts its launches
pub struct FakeDriver {
    behavior: DriverBehavior,
    calls: AtomicUsize,
}

impl FakeDriver {
    pub fn new(behavior: DriverBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn succeeding(title: &str) -> Arc<Self> {
        Self::new(DriverBehavior::Succeed {
            title: title.to_string(),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowserDriver for FakeDriver {
    async fn snapshot(&self, _url: &str, _viewport: Viewport) -> Result<PageSnapshot, CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            DriverBehavior::Succeed { title } => Ok(PageSnapshot {
                title: title.clone(),
                png: TINY_PNG.to_vec(),
            }),
            DriverBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(CaptureError::Timeout(Duration::from_secs(3600)))
            },
            DriverBehavior::Fail => Err(CaptureError::Screenshot(
                "net::ERR_CONNECTION_REFUSED".to_string(),
            )),
            DriverBehavior::Panic => panic!("browser process crashed"),
        }
    }
}

/// Analyzer that always faults
pub struct CrashingAnalyzer(pub ScanMode);

#[async_trait]
impl MediaAnalyzer for CrashingAnalyzer {
    fn mode(&self) -> ScanMode {
        self.0
    }

    async fn analyze(&self, _asset_id: &str) -> MediaVerdict {
        panic!("detector unavailable")
    }
}

/// Keeps every submitted record in memory
#[derive(Default)]
pub struct MemoryRecordSink {
    records: Mutex<Vec<ScanRecord>>,
}

impl MemoryRecordSink {
    pub fn records(&self) -> Vec<ScanRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl ScanRecordSink for MemoryRecordSink {
    fn submit(&self, record: ScanRecord) -> Result<(), RecordSinkError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

// =============================================================================
// TEST APP
// =============================================================================

/// Configuration used by integration tests: no analyzer delay, short capture timeouts
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.analyzers = AnalyzerConfig {
        audio_delay_ms: 0,
        image_delay_ms: 0,
        ..AnalyzerConfig::default()
    };
    config.capture.navigation_timeout_ms = 200;
    config.capture.queue_timeout_ms = 100;
    config
}

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub driver: Arc<FakeDriver>,
    pub records: Arc<MemoryRecordSink>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_driver(FakeDriver::succeeding("Example Domain"))
    }

    pub fn with_driver(driver: Arc<FakeDriver>) -> Self {
        Self::build(test_config(), driver, None)
    }

    /// Build with an explicit config, driver, and optional audio analyzer override
    pub fn build(
        config: AppConfig,
        driver: Arc<FakeDriver>,
        audio: Option<Arc<dyn MediaAnalyzer>>,
    ) -> Self {
        let records = Arc::new(MemoryRecordSink::default());
        let components = ScanComponents {
            lexicon: Arc::new(RiskLexicon::builtin()),
            driver: driver.clone(),
            audio: audio.unwrap_or_else(|| Arc::new(MockAnalyzer::audio(&config.analyzers))),
            image: Arc::new(MockAnalyzer::image(&config.analyzers)),
            records: records.clone(),
        };

        let state = AppState::new(config, components).unwrap();
        let app = build_router(state.clone());

        Self {
            app,
            state,
            driver,
            records,
        }
    }

    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "GET", uri)
    }

    /// Send an OPTIONS request
    pub fn options(&self, uri: &str) -> TestRequest {
        TestRequest::new(self, "OPTIONS", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    method: &'static str,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &'static str, uri: &str) -> Self {
        Self {
            app,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self.header("content-type", "application/json")
    }

    /// Raw body with an explicit content type
    pub fn raw(mut self, content_type: &str, body: &str) -> Self {
        self.body = Some(body.as_bytes().to_vec());
        self.header("content-type", content_type)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Attach the caller identity handle
    pub fn as_user(self, user_id: &str) -> Self {
        self.header("x-user-id", user_id)
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(&self.uri);
        for (name, value) in &self.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let request = builder
            .body(self.body.map(Body::from).unwrap_or_else(Body::empty))
            .unwrap();

        let response = self.app.app.clone().oneshot(request).await.unwrap();

        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.response.headers()
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Get response body as text
    pub async fn text(self) -> String {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(body.to_vec()).unwrap()
    }
}
