// Application state and service wiring
use std::sync::Arc;

use crate::{
    app_config::AppConfig,
    config::RiskLexicon,
    services::{
        analyzers::{MediaAnalyzer, MockAnalyzer},
        capture::{BrowserDriver, CaptureOrchestrator, HeadlessChromeDriver},
        dispatcher::ScanDispatcher,
        metrics::ScanMetrics,
        risk_engine::UrlRiskEngine,
        scan_records::{record_sink_from_config, RecordSinkError, ScanRecordSink},
    },
};

// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub dispatcher: Arc<ScanDispatcher>,
    pub capture: Arc<CaptureOrchestrator>,
    pub metrics: ScanMetrics,
}

/// Pluggable collaborators of the scan pipeline
pub struct ScanComponents {
    pub lexicon: Arc<RiskLexicon>,
    pub driver: Arc<dyn BrowserDriver>,
    pub audio: Arc<dyn MediaAnalyzer>,
    pub image: Arc<dyn MediaAnalyzer>,
    pub records: Arc<dyn ScanRecordSink>,
}

impl ScanComponents {
    /// Production components. Spawns the record writer, so call inside a tokio runtime.
    pub fn from_config(config: &AppConfig) -> Result<Self, RecordSinkError> {
        Ok(Self {
            lexicon: Arc::new(RiskLexicon::load(&config.lexicon)),
            driver: Arc::new(HeadlessChromeDriver::new(&config.capture)),
            audio: Arc::new(MockAnalyzer::audio(&config.analyzers)),
            image: Arc::new(MockAnalyzer::image(&config.analyzers)),
            records: record_sink_from_config(&config.persistence)?,
        })
    }
}

impl AppState {
    pub fn new(config: AppConfig, components: ScanComponents) -> Result<Self, prometheus::Error> {
        let metrics = ScanMetrics::new()?;

        let capture = Arc::new(
            CaptureOrchestrator::new(components.driver, &config.capture)
                .with_live_capture(config.features.enable_live_capture),
        );

        let dispatcher = Arc::new(ScanDispatcher::new(
            UrlRiskEngine::new(components.lexicon),
            Arc::clone(&capture),
            components.audio,
            components.image,
            components.records,
            metrics.clone(),
        ));

        Ok(Self {
            config: Arc::new(config),
            dispatcher,
            capture,
            metrics,
        })
    }
}
