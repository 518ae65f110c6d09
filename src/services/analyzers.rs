// Simulated media forensics
// Stand-ins for real audio/image detectors: fixed delay, then a randomly sampled verdict

use async_trait::async_trait;
use rand::Rng;
use std::ops::RangeInclusive;
use std::time::Duration;
use tracing::debug;

use crate::{
    app_config::AnalyzerConfig,
    models::scan::{MediaVerdict, ScanMode, WAVEFORM_SAMPLES},
};

/// A detector for one media mode
#[async_trait]
pub trait MediaAnalyzer: Send + Sync {
    fn mode(&self) -> ScanMode;

    async fn analyze(&self, asset_id: &str) -> MediaVerdict;
}

// =============================================================================
// PROFILES
// =============================================================================

/// Everything that distinguishes one simulated detector from another
#[derive(Debug, Clone)]
pub struct AnalyzerProfile {
    pub mode: ScanMode,
    pub delay: Duration,
    pub synthetic_probability: f64,
    pub synthetic_scores: RangeInclusive<u8>,
    pub authentic_scores: RangeInclusive<u8>,
    pub synthetic_status: &'static str,
    pub authentic_status: &'static str,
    pub synthetic_flags: &'static [&'static str],
    pub authentic_flags: &'static [&'static str],
    pub title: &'static str,
    pub screenshot: &'static str,
}

impl AnalyzerProfile {
    pub fn audio(config: &AnalyzerConfig) -> Self {
        Self {
            mode: ScanMode::Audio,
            delay: Duration::from_millis(config.audio_delay_ms),
            synthetic_probability: config.audio_synthetic_probability.clamp(0.0, 1.0),
            synthetic_scores: 10..=49,
            authentic_scores: 80..=99,
            synthetic_status: "Deepfake Voice Detected",
            authentic_status: "Authentic Human Voice",
            synthetic_flags: &["Synthetic Breath Patterns", "Robotic Artifacts", "Pitch Flattening"],
            authentic_flags: &["Organic Tremor Verified", "Natural Pausing"],
            title: "Audio Forensics",
            screenshot: "https://placehold.co/800x600/1a1a1a/white?text=Audio+Spectrum+Analysis",
        }
    }

    pub fn image(config: &AnalyzerConfig) -> Self {
        Self {
            mode: ScanMode::Image,
            delay: Duration::from_millis(config.image_delay_ms),
            synthetic_probability: config.image_synthetic_probability.clamp(0.0, 1.0),
            synthetic_scores: 5..=34,
            authentic_scores: 85..=99,
            synthetic_status: "Synthetic Image Detected",
            authentic_status: "Organic Photography",
            synthetic_flags: &["Inconsistent Lighting", "Warped Geometry", "Pixel Error Level High"],
            authentic_flags: &["Natural Noise Profile", "Consistent Metadata"],
            title: "Image Forensics",
            screenshot: "https://placehold.co/800x600/1a1a1a/white?text=ELA+Heatmap+Generated",
        }
    }

    fn has_waveform(&self) -> bool {
        self.mode == ScanMode::Audio
    }
}

// =============================================================================
// MOCK ANALYZER
// =============================================================================

/// Profile-driven simulated detector. The asset content is never inspected.
#[derive(Debug, Clone)]
pub struct MockAnalyzer {
    profile: AnalyzerProfile,
}

impl MockAnalyzer {
    pub fn new(profile: AnalyzerProfile) -> Self {
        Self { profile }
    }

    pub fn audio(config: &AnalyzerConfig) -> Self {
        Self::new(AnalyzerProfile::audio(config))
    }

    pub fn image(config: &AnalyzerConfig) -> Self {
        Self::new(AnalyzerProfile::image(config))
    }

    fn sample(&self) -> MediaVerdict {
        let profile = &self.profile;
        let mut rng = rand::thread_rng();

        let is_synthetic = rng.gen_bool(profile.synthetic_probability);
        let (scores, status, flags) = if is_synthetic {
            (
                profile.synthetic_scores.clone(),
                profile.synthetic_status,
                profile.synthetic_flags,
            )
        } else {
            (
                profile.authentic_scores.clone(),
                profile.authentic_status,
                profile.authentic_flags,
            )
        };

        let waveform = profile
            .has_waveform()
            .then(|| (0..WAVEFORM_SAMPLES).map(|_| rng.gen::<f64>()).collect());

        MediaVerdict {
            title: profile.title.to_string(),
            score: rng.gen_range(scores),
            status: status.to_string(),
            flags: flags.iter().map(|f| f.to_string()).collect(),
            is_synthetic,
            waveform,
            screenshot: profile.screenshot.to_string(),
        }
    }
}

#[async_trait]
impl MediaAnalyzer for MockAnalyzer {
    fn mode(&self) -> ScanMode {
        self.profile.mode
    }

    async fn analyze(&self, asset_id: &str) -> MediaVerdict {
        debug!("Simulating {} analysis of {}", self.profile.mode, asset_id);

        tokio::time::sleep(self.profile.delay).await;

        // Sample after the sleep; the rng handle is not Send
        self.sample()
    }
}
