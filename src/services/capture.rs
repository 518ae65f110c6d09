// Visual capture orchestration
// Best-effort screenshot + title of a live page; every failure degrades to a placeholder

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use scraper::{Html, Selector};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::{
    app_config::CaptureConfig,
    models::scan::{CaptureResult, RiskStatus},
};

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("URL failed structural validation")]
    InvalidTarget,

    #[error("Live capture is disabled")]
    Disabled,

    #[error("All {0} capture slots are busy")]
    PoolSaturated(usize),

    #[error("Capture pool is closed")]
    PoolClosed,

    #[error("Navigation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Failed to launch browser: {0}")]
    Launch(#[source] std::io::Error),

    #[error("Browser exited with {0}")]
    BrowserExit(ExitStatus),

    #[error("Screenshot unavailable: {0}")]
    Screenshot(String),
}

// =============================================================================
// BROWSER DRIVER
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Raw result of one page visit
#[derive(Debug, Clone)]
pub struct PageSnapshot {
    pub title: String,
    pub png: Vec<u8>,
}

impl PageSnapshot {
    /// Screenshot encoded for inline embedding
    pub fn data_uri(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Something that can visit a page and photograph it.
///
/// Implementations must release every resource they create when the returned
/// future is dropped, since the orchestrator cancels it on timeout.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn snapshot(&self, url: &str, viewport: Viewport) -> Result<PageSnapshot, CaptureError>;
}

/// Time kept back from the navigation timeout for rendering and writing the screenshot
const SCREENSHOT_MARGIN: Duration = Duration::from_millis(1500);

/// Drives a headless Chromium binary, one isolated process per capture.
///
/// Title and screenshot come from the same browser session. Chromium is told to
/// stop loading after `load_budget`, so slow subresources never hold the
/// screenshot past the navigation timeout.
pub struct HeadlessChromeDriver {
    binary: PathBuf,
    user_agent: String,
    load_budget: Duration,
}

impl HeadlessChromeDriver {
    pub fn new(config: &CaptureConfig) -> Self {
        let navigation_timeout = Duration::from_millis(config.navigation_timeout_ms);

        Self {
            binary: PathBuf::from(&config.browser_path),
            user_agent: config.user_agent.clone(),
            load_budget: navigation_timeout
                .saturating_sub(SCREENSHOT_MARGIN)
                .max(navigation_timeout / 2),
        }
    }

    pub fn load_budget(&self) -> Duration {
        self.load_budget
    }
}

#[async_trait]
impl BrowserDriver for HeadlessChromeDriver {
    async fn snapshot(&self, url: &str, viewport: Viewport) -> Result<PageSnapshot, CaptureError> {
        // Fresh profile per launch, deleted when `profile` drops
        let profile = tempfile::tempdir().map_err(CaptureError::Launch)?;
        let screenshot_path = profile.path().join("capture.png");

        let child = Command::new(&self.binary)
            .arg("--headless=new")
            .args([
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-gpu",
                "--disable-extensions",
                "--hide-scrollbars",
                "--mute-audio",
                "--no-first-run",
                "--no-default-browser-check",
            ])
            .arg(format!("--user-agent={}", self.user_agent))
            .arg(format!("--user-data-dir={}", profile.path().display()))
            .arg(format!("--window-size={},{}", viewport.width, viewport.height))
            .arg(format!("--timeout={}", self.load_budget.as_millis()))
            .arg("--dump-dom")
            .arg(format!("--screenshot={}", screenshot_path.display()))
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(CaptureError::Launch)?;

        debug!("Browser launched for {} (pid {:?})", url, child.id());

        let output = child.wait_with_output().await.map_err(CaptureError::Launch)?;
        if !output.status.success() {
            return Err(CaptureError::BrowserExit(output.status));
        }

        let png = tokio::fs::read(&screenshot_path)
            .await
            .map_err(|e| CaptureError::Screenshot(e.to_string()))?;

        // Rendered DOM, so script-set titles are included
        let dom = String::from_utf8_lossy(&output.stdout);
        let title = extract_title(&dom).unwrap_or_default();

        Ok(PageSnapshot { title, png })
    }
}

/// Text of the first `<title>` element
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;
    let title = document
        .select(&title_selector)
        .next()?
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    (!title.is_empty()).then_some(title)
}

// =============================================================================
// CAPTURE ORCHESTRATOR
// =============================================================================

/// Bounded, timeout-guarded front door to the browser driver
pub struct CaptureOrchestrator {
    driver: Arc<dyn BrowserDriver>,
    slots: Arc<Semaphore>,
    max_concurrent: usize,
    navigation_timeout: Duration,
    queue_timeout: Duration,
    viewport: Viewport,
    demo_marker: String,
    live_capture: bool,
}

impl CaptureOrchestrator {
    pub fn new(driver: Arc<dyn BrowserDriver>, config: &CaptureConfig) -> Self {
        let max_concurrent = config.max_concurrent.max(1);

        Self {
            driver,
            slots: Arc::new(Semaphore::new(max_concurrent)),
            max_concurrent,
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            queue_timeout: Duration::from_millis(config.queue_timeout_ms),
            viewport: Viewport {
                width: config.viewport_width,
                height: config.viewport_height,
            },
            demo_marker: config.demo_marker.clone(),
            live_capture: true,
        }
    }

    /// Turn live browser capture on or off; off means every capture is a placeholder
    pub fn with_live_capture(mut self, enabled: bool) -> Self {
        self.live_capture = enabled;
        self
    }

    pub fn is_demo_target(&self, url: &str) -> bool {
        !self.demo_marker.is_empty() && url.contains(&self.demo_marker)
    }

    /// Capture a URL. Always returns some image reference.
    pub async fn capture(&self, url: &str, status: RiskStatus) -> CaptureResult {
        if self.is_demo_target(url) {
            info!("Demo target detected, skipping live capture: {}", url);
            return CaptureResult::demo();
        }

        match self.capture_live(url, status).await {
            Ok(snapshot) => CaptureResult {
                screenshot: snapshot.data_uri(),
                title: snapshot.title,
                captured: true,
            },
            Err(e) => {
                warn!("Capture skipped for {}: {}", url, e);
                CaptureResult::unavailable(url)
            },
        }
    }

    async fn capture_live(&self, url: &str, status: RiskStatus) -> Result<PageSnapshot, CaptureError> {
        if status == RiskStatus::Invalid {
            return Err(CaptureError::InvalidTarget);
        }
        if !self.live_capture {
            return Err(CaptureError::Disabled);
        }

        let _permit = match tokio::time::timeout(self.queue_timeout, self.slots.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(CaptureError::PoolClosed),
            Err(_) => return Err(CaptureError::PoolSaturated(self.max_concurrent)),
        };

        // Dropping the driver future on timeout tears the browser down
        tokio::time::timeout(self.navigation_timeout, self.driver.snapshot(url, self.viewport))
            .await
            .map_err(|_| CaptureError::Timeout(self.navigation_timeout))?
        // Permit is released when _permit goes out of scope
    }

    /// Capture slots currently free
    pub fn available_slots(&self) -> usize {
        self.slots.available_permits()
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}
