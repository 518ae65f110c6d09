// Prometheus metrics for scans and captures

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::time::Duration;

use crate::models::scan::{CaptureResult, ScanMode, DEMO_SCREENSHOT};

const CAPTURE_BUCKETS: &[f64] = &[0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 10.0];

/// Scan service metrics backed by a private registry
#[derive(Clone)]
pub struct ScanMetrics {
    registry: Registry,
    scans_total: IntCounterVec,
    capture_attempts_total: IntCounterVec,
    capture_duration_seconds: Histogram,
}

impl ScanMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("authentic_eye".to_string()), None)?;

        let scans_total = IntCounterVec::new(
            Opts::new("scans_total", "Scans served, by mode and outcome"),
            &["mode", "outcome"],
        )?;
        let capture_attempts_total = IntCounterVec::new(
            Opts::new("capture_attempts_total", "Visual capture attempts, by result"),
            &["result"],
        )?;
        let capture_duration_seconds = Histogram::with_opts(
            HistogramOpts::new("capture_duration_seconds", "Time spent producing a capture")
                .buckets(CAPTURE_BUCKETS.to_vec()),
        )?;

        registry.register(Box::new(scans_total.clone()))?;
        registry.register(Box::new(capture_attempts_total.clone()))?;
        registry.register(Box::new(capture_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            scans_total,
            capture_attempts_total,
            capture_duration_seconds,
        })
    }

    pub fn record_scan(&self, mode: ScanMode, outcome: &str) {
        self.scans_total
            .with_label_values(&[mode.as_str(), outcome])
            .inc();
    }

    pub fn record_capture(&self, capture: &CaptureResult, elapsed: Duration) {
        let result = if capture.captured {
            "captured"
        } else if capture.screenshot == DEMO_SCREENSHOT {
            "demo"
        } else {
            "placeholder"
        };

        self.capture_attempts_total
            .with_label_values(&[result])
            .inc();
        self.capture_duration_seconds
            .observe(elapsed.as_secs_f64());
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
