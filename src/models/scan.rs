// Scan request/response DTOs and verdict types
// One stable result shape per scan mode, whatever happened internally

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// =============================================================================
// PLACEHOLDER IMAGES
// =============================================================================

pub const DEMO_SCREENSHOT: &str =
    "https://placehold.co/800x600/333333/white?text=Insecure+Site+Preview";
pub const DEMO_TITLE: &str = "Insecure Site (Demo)";
pub const PREVIEW_UNAVAILABLE_SCREENSHOT: &str =
    "https://placehold.co/800x600/1a1a1a/white?text=Preview+Unavailable";
pub const ERROR_SCREENSHOT: &str = "https://placehold.co/800x600/red/white?text=Error";
pub const ERROR_TITLE: &str = "Scan Error (Fallback)";
pub const UNKNOWN_TITLE: &str = "Unknown Site";
pub const SYSTEM_ERROR_FLAG: &str = "System Error";

/// Number of amplitude samples in an audio waveform
pub const WAVEFORM_SAMPLES: usize = 50;

/// URL verdicts below this score are treated as synthetic/high risk and get a heatmap
pub const URL_HIGH_RISK_THRESHOLD: u8 = 60;

// =============================================================================
// SCAN MODE & STATUS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    Url,
    Audio,
    Image,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::Url => "url",
            ScanMode::Audio => "audio",
            ScanMode::Image => "image",
        }
    }
}

impl std::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status label of a URL verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RiskStatus {
    #[serde(rename = "VERIFIED")]
    Verified,
    #[serde(rename = "DANGEROUS")]
    Dangerous,
    #[serde(rename = "HIGH RISK")]
    HighRisk,
    #[serde(rename = "SUSPICIOUS")]
    Suspicious,
    #[serde(rename = "LIKELY SAFE")]
    LikelySafe,
    #[serde(rename = "INVALID")]
    Invalid,
    #[serde(rename = "ERROR")]
    Error,
}

impl RiskStatus {
    /// Status band for a clamped additive score
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=49 => RiskStatus::HighRisk,
            50..=74 => RiskStatus::Suspicious,
            _ => RiskStatus::LikelySafe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskStatus::Verified => "VERIFIED",
            RiskStatus::Dangerous => "DANGEROUS",
            RiskStatus::HighRisk => "HIGH RISK",
            RiskStatus::Suspicious => "SUSPICIOUS",
            RiskStatus::LikelySafe => "LIKELY SAFE",
            RiskStatus::Invalid => "INVALID",
            RiskStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for RiskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// VERDICTS
// =============================================================================

/// Output of the URL risk engine for one input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskVerdict {
    pub score: u8,
    pub status: RiskStatus,
    pub flags: Vec<String>, // detection order
    pub is_synthetic_or_high_risk: bool,
}

impl RiskVerdict {
    pub fn invalid() -> Self {
        Self {
            score: 0,
            status: RiskStatus::Invalid,
            flags: vec!["Invalid URL Format".to_string()],
            is_synthetic_or_high_risk: true,
        }
    }

    pub fn trusted() -> Self {
        Self {
            score: 95,
            status: RiskStatus::Verified,
            flags: vec!["Trusted Domain".to_string()],
            is_synthetic_or_high_risk: false,
        }
    }

    pub fn blacklisted() -> Self {
        Self {
            score: 10,
            status: RiskStatus::Dangerous,
            flags: vec![
                "Suspicious Keywords".to_string(),
                "High Risk Content".to_string(),
            ],
            is_synthetic_or_high_risk: true,
        }
    }

    pub fn system_error() -> Self {
        Self {
            score: 0,
            status: RiskStatus::Error,
            flags: vec![SYSTEM_ERROR_FLAG.to_string()],
            is_synthetic_or_high_risk: true,
        }
    }
}

/// Visual snapshot of a URL, or the placeholder standing in for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub title: String,
    pub screenshot: String, // data URI or placeholder image URL
    pub captured: bool,
}

impl CaptureResult {
    pub fn demo() -> Self {
        Self {
            title: DEMO_TITLE.to_string(),
            screenshot: DEMO_SCREENSHOT.to_string(),
            captured: false,
        }
    }

    pub fn unavailable(url: &str) -> Self {
        Self {
            title: format!("Analyzed: {}", url),
            screenshot: PREVIEW_UNAVAILABLE_SCREENSHOT.to_string(),
            captured: false,
        }
    }
}

/// Output of a media analyzer for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaVerdict {
    pub title: String,
    pub score: u8,
    pub status: String,
    pub flags: Vec<String>,
    pub is_synthetic: bool,
    pub waveform: Option<Vec<f64>>,
    pub screenshot: String,
}

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request to scan a URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "url": "https://example.com/article" }))]
pub struct UrlScanRequest {
    #[validate(required(message = "URL is required"))]
    #[validate(length(min = 1, message = "URL is required"))]
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub url: Option<String>,
}

/// Request to scan an uploaded asset, identified by its file name
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "filename": "voice-note.mp3" }))]
pub struct AssetScanRequest {
    #[validate(required(message = "Filename is required"))]
    #[validate(length(min = 1, message = "Filename is required"))]
    #[serde(default, deserialize_with = "deserialize_payload")]
    pub filename: Option<String>,
}

/// Accepts any JSON value as a scan payload.
///
/// Falsy values (`null`, `false`, `0`) count as absent. Other non-string values
/// are kept in their JSON text form and left for the scanner to judge.
fn deserialize_payload<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(payload_text))
}

fn payload_text(value: Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// A validated scan request; exactly one payload per mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRequest {
    Url(String),
    Audio(String),
    Image(String),
}

impl ScanRequest {
    pub fn mode(&self) -> ScanMode {
        match self {
            ScanRequest::Url(_) => ScanMode::Url,
            ScanRequest::Audio(_) => ScanMode::Audio,
            ScanRequest::Image(_) => ScanMode::Image,
        }
    }

    /// The URL or asset identifier being scanned
    pub fn target(&self) -> &str {
        match self {
            ScanRequest::Url(t) | ScanRequest::Audio(t) | ScanRequest::Image(t) => t,
        }
    }
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

/// URL scan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "url": "http://free-casino-bonus.xyz",
    "title": "Analyzed: http://free-casino-bonus.xyz",
    "screenshot": "https://placehold.co/800x600/1a1a1a/white?text=Preview+Unavailable",
    "score": 10,
    "status": "HIGH RISK",
    "flags": ["Insecure Protocol (HTTP)", "High-Risk TLD Detected"],
    "heatmap": true,
    "is_ai": true
}))]
pub struct UrlScanResponse {
    pub url: String,
    pub title: String,
    pub screenshot: String,
    pub score: u8,
    pub status: RiskStatus,
    pub flags: Vec<String>,
    pub heatmap: bool,
    #[serde(rename = "is_ai")]
    pub is_synthetic_or_high_risk: bool,
}

impl UrlScanResponse {
    /// Merge the engine verdict with the capture result
    pub fn from_parts(url: &str, verdict: RiskVerdict, capture: CaptureResult) -> Self {
        let title = if capture.title.trim().is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            capture.title
        };

        Self {
            url: url.to_string(),
            title,
            screenshot: capture.screenshot,
            score: verdict.score,
            status: verdict.status,
            heatmap: verdict.score < URL_HIGH_RISK_THRESHOLD,
            flags: verdict.flags,
            is_synthetic_or_high_risk: verdict.is_synthetic_or_high_risk,
        }
    }

    /// Degraded response used when the scan itself faulted
    pub fn fallback(url: &str) -> Self {
        let verdict = RiskVerdict::system_error();
        Self {
            url: if url.is_empty() { "unknown".to_string() } else { url.to_string() },
            title: ERROR_TITLE.to_string(),
            screenshot: ERROR_SCREENSHOT.to_string(),
            score: verdict.score,
            status: verdict.status,
            flags: verdict.flags,
            heatmap: true,
            is_synthetic_or_high_risk: verdict.is_synthetic_or_high_risk,
        }
    }
}

/// Audio or image scan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "title": "Audio Forensics",
    "score": 91,
    "status": "Authentic Human Voice",
    "flags": ["Organic Tremor Verified", "Natural Pausing"],
    "is_ai": false,
    "waveform": [0.12, 0.87, 0.45],
    "screenshot": "https://placehold.co/800x600/1a1a1a/white?text=Audio+Spectrum+Analysis"
}))]
pub struct MediaScanResponse {
    pub title: String,
    pub score: u8,
    pub status: String,
    pub flags: Vec<String>,
    #[serde(rename = "is_ai")]
    pub is_synthetic_or_high_risk: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<Vec<f64>>,
    pub screenshot: String,
}

impl From<MediaVerdict> for MediaScanResponse {
    fn from(verdict: MediaVerdict) -> Self {
        Self {
            title: verdict.title,
            score: verdict.score,
            status: verdict.status,
            flags: verdict.flags,
            is_synthetic_or_high_risk: verdict.is_synthetic,
            waveform: verdict.waveform,
            screenshot: verdict.screenshot,
        }
    }
}

impl MediaScanResponse {
    /// Degraded response used when an analyzer faulted. Audio keeps its
    /// fixed-length (flat) waveform so the result shape does not change.
    pub fn fallback(mode: ScanMode) -> Self {
        let verdict = RiskVerdict::system_error();
        Self {
            title: ERROR_TITLE.to_string(),
            score: verdict.score,
            status: verdict.status.to_string(),
            flags: verdict.flags,
            is_synthetic_or_high_risk: verdict.is_synthetic_or_high_risk,
            waveform: (mode == ScanMode::Audio).then(|| vec![0.0; WAVEFORM_SAMPLES]),
            screenshot: ERROR_SCREENSHOT.to_string(),
        }
    }
}

// =============================================================================
// SCAN RECORD
// =============================================================================

/// Completed scan as handed to the document store, keyed by the caller's identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: Uuid,
    pub user_id: String,
    pub mode: ScanMode,
    pub target: String, // URL or asset identifier
    pub score: u8,
    pub status: String,
    pub flags: Vec<String>,
    pub screenshot: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

/// Anything that can be turned into a scan record once it completes
pub trait RecordableScan {
    fn to_record(&self, user_id: &str, request: &ScanRequest) -> ScanRecord;
}

impl RecordableScan for UrlScanResponse {
    fn to_record(&self, user_id: &str, request: &ScanRequest) -> ScanRecord {
        ScanRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            mode: request.mode(),
            target: request.target().to_string(),
            score: self.score,
            status: self.status.to_string(),
            flags: self.flags.clone(),
            screenshot: self.screenshot.clone(),
            title: self.title.clone(),
            created_at: Utc::now(),
        }
    }
}

impl RecordableScan for MediaScanResponse {
    fn to_record(&self, user_id: &str, request: &ScanRequest) -> ScanRecord {
        ScanRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            mode: request.mode(),
            target: request.target().to_string(),
            score: self.score,
            status: self.status.clone(),
            flags: self.flags.clone(),
            screenshot: self.screenshot.clone(),
            title: self.title.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_accepts_any_json_value() {
        let parse = |body: &str| serde_json::from_str::<UrlScanRequest>(body).unwrap().url;

        assert_eq!(parse(r#"{"url":"https://example.com"}"#).as_deref(), Some("https://example.com"));
        assert_eq!(parse(r#"{"url":123}"#).as_deref(), Some("123"));
        assert_eq!(parse(r#"{"url":true}"#).as_deref(), Some("true"));
        assert_eq!(parse(r#"{"url":{"href":"x"}}"#).as_deref(), Some(r#"{"href":"x"}"#));

        // Falsy values are treated as a missing payload
        assert_eq!(parse(r#"{}"#), None);
        assert_eq!(parse(r#"{"url":null}"#), None);
        assert_eq!(parse(r#"{"url":false}"#), None);
        assert_eq!(parse(r#"{"url":0}"#), None);
        assert!(UrlScanRequest { url: parse(r#"{"url":false}"#) }.validate().is_err());

        let asset: AssetScanRequest = serde_json::from_str(r#"{"filename":42}"#).unwrap();
        assert_eq!(asset.filename.as_deref(), Some("42"));
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(RiskStatus::from_score(10), RiskStatus::HighRisk);
        assert_eq!(RiskStatus::from_score(49), RiskStatus::HighRisk);
        assert_eq!(RiskStatus::from_score(50), RiskStatus::Suspicious);
        assert_eq!(RiskStatus::from_score(74), RiskStatus::Suspicious);
        assert_eq!(RiskStatus::from_score(75), RiskStatus::LikelySafe);
        assert_eq!(RiskStatus::from_score(99), RiskStatus::LikelySafe);
    }

    #[test]
    fn test_status_labels_serialize() {
        assert_eq!(
            serde_json::to_value(RiskStatus::HighRisk).unwrap(),
            serde_json::json!("HIGH RISK")
        );
        assert_eq!(
            serde_json::to_value(RiskStatus::LikelySafe).unwrap(),
            serde_json::json!("LIKELY SAFE")
        );
        assert_eq!(RiskStatus::Verified.to_string(), "VERIFIED");
    }

    #[test]
    fn test_url_response_merges_capture() {
        let verdict = RiskVerdict {
            score: 55,
            status: RiskStatus::Suspicious,
            flags: vec!["High-Risk TLD Detected".to_string()],
            is_synthetic_or_high_risk: true,
        };
        let capture = CaptureResult {
            title: "   ".to_string(),
            screenshot: "data:image/png;base64,AAAA".to_string(),
            captured: true,
        };

        let response = UrlScanResponse::from_parts("https://news-site.info", verdict, capture);
        assert_eq!(response.title, UNKNOWN_TITLE);
        assert!(response.heatmap);
        assert_eq!(response.screenshot, "data:image/png;base64,AAAA");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["is_ai"], true);
        assert_eq!(json["status"], "SUSPICIOUS");
    }

    #[test]
    fn test_fallback_responses() {
        let url = UrlScanResponse::fallback("");
        assert_eq!(url.url, "unknown");
        assert_eq!(url.score, 0);
        assert_eq!(url.status, RiskStatus::Error);
        assert_eq!(url.flags, vec![SYSTEM_ERROR_FLAG.to_string()]);
        assert!(url.is_synthetic_or_high_risk);

        let audio = MediaScanResponse::fallback(ScanMode::Audio);
        assert_eq!(audio.status, "ERROR");
        assert_eq!(audio.waveform.as_ref().map(Vec::len), Some(WAVEFORM_SAMPLES));

        let image = MediaScanResponse::fallback(ScanMode::Image);
        assert!(image.waveform.is_none());
    }

    #[test]
    fn test_request_validation() {
        assert!(UrlScanRequest { url: None }.validate().is_err());
        assert!(UrlScanRequest {
            url: Some(String::new())
        }
        .validate()
        .is_err());
        // Malformed but present is not a validation failure
        assert!(UrlScanRequest {
            url: Some("not a url".to_string())
        }
        .validate()
        .is_ok());
        assert!(AssetScanRequest { filename: None }.validate().is_err());
    }

    #[test]
    fn test_scan_record_uses_camel_case() {
        let request = ScanRequest::Url("https://example.com".to_string());
        let response = UrlScanResponse::fallback("https://example.com");
        let record = response.to_record("user-1", &request);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["userId"], "user-1");
        assert_eq!(json["mode"], "url");
        assert!(json.get("createdAt").is_some());
    }
}
