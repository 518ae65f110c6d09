// Centralized configuration management for the forensic scan service
// Load ALL env vars ONCE at startup

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Global application configuration loaded once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // For tests, load .env file first
    #[cfg(test)]
    dotenv::dotenv().ok();

    AppConfig::from_env().expect("Failed to load configuration")
});

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub cors_allowed_origins: Vec<String>,

    pub server: ServerConfig,
    pub capture: CaptureConfig,
    pub analyzers: AnalyzerConfig,
    pub lexicon: LexiconConfig,
    pub persistence: PersistenceConfig,
    pub features: FeatureConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Visual capture (headless browser) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    pub browser_path: String,
    pub navigation_timeout_ms: u64,
    pub max_concurrent: usize,
    pub queue_timeout_ms: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub demo_marker: String, // URLs containing this never touch the network
    pub user_agent: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            browser_path: "chromium".to_string(),
            navigation_timeout_ms: 6000,
            max_concurrent: 4,
            queue_timeout_ms: 2000,
            viewport_width: 800,
            viewport_height: 600,
            demo_marker: "insecure-site".to_string(),
            user_agent: "AuthenticEye-Capture/1.0".to_string(),
        }
    }
}

/// Mock media analyzer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    pub audio_delay_ms: u64,
    pub image_delay_ms: u64,
    pub audio_synthetic_probability: f64,
    pub image_synthetic_probability: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            audio_delay_ms: 2000,
            image_delay_ms: 2500,
            audio_synthetic_probability: 0.4,
            image_synthetic_probability: 0.5,
        }
    }
}

/// Risk lexicon source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    pub path: Option<String>, // None = builtin lists
}

/// Scan record emission toward the document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    pub document_store_url: Option<String>, // None = log records only
    pub identity_header: String,
    pub batch_size: usize,
    pub flush_interval_ms: u64,
    pub queue_capacity: usize, // records waiting behind an in-flight write
    pub request_timeout_ms: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            document_store_url: None,
            identity_header: "x-user-id".to_string(),
            batch_size: 50,
            flush_interval_ms: 2000,
            queue_capacity: 1000,
            request_timeout_ms: 5000,
        }
    }
}

/// Feature flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    pub enable_metrics: bool,
    pub enable_live_capture: bool,
    pub enable_openapi: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            enable_live_capture: true,
            enable_openapi: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            cors_allowed_origins: vec!["*".to_string()],
            server: ServerConfig {
                bind_address: "0.0.0.0:3000".to_string(),
                port: 3000,
            },
            capture: CaptureConfig::default(),
            analyzers: AnalyzerConfig::default(),
            lexicon: LexiconConfig::default(),
            persistence: PersistenceConfig::default(),
            features: FeatureConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        // Helper function to get optional env var, treating empty as unset
        let get_optional = |key: &str| -> Option<String> {
            env::var(key).ok().filter(|v| !v.trim().is_empty())
        };

        let parse_u64_or_default = |key: &str, default: u64| -> Result<u64, ConfigError> {
            match env::var(key) {
                Ok(v) => v.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_usize_or_default = |key: &str, default: usize| -> Result<usize, ConfigError> {
            match env::var(key) {
                Ok(v) => v.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), "not a valid usize".to_string())
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_u32_or_default = |key: &str, default: u32| -> Result<u32, ConfigError> {
            match env::var(key) {
                Ok(v) => v.parse().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
                }),
                Err(_) => Ok(default),
            }
        };

        let parse_probability_or_default = |key: &str, default: f64| -> Result<f64, ConfigError> {
            let value = match env::var(key) {
                Ok(v) => v.parse::<f64>().map_err(|_| {
                    ConfigError::InvalidValue(key.to_string(), "not a valid number".to_string())
                })?,
                Err(_) => default,
            };
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue(
                    key.to_string(),
                    format!("probability must be within [0, 1] (got {})", value),
                ));
            }
            Ok(value)
        };

        let parse_bool_or_default = |key: &str, default: bool| -> bool {
            env::var(key)
                .map(|v| v.to_lowercase() == "true")
                .unwrap_or(default)
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", &defaults.server.bind_address);
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.server.port);

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));

        let cors_allowed_origins: Vec<String> = get_or_default("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Capture
        let capture_defaults = defaults.capture;
        let max_concurrent =
            parse_usize_or_default("CAPTURE_MAX_CONCURRENT", capture_defaults.max_concurrent)?;
        if max_concurrent == 0 {
            return Err(ConfigError::InvalidValue(
                "CAPTURE_MAX_CONCURRENT".to_string(),
                "at least one capture slot is required".to_string(),
            ));
        }

        let capture = CaptureConfig {
            browser_path: get_or_default("CAPTURE_BROWSER_PATH", &capture_defaults.browser_path),
            navigation_timeout_ms: parse_u64_or_default(
                "CAPTURE_TIMEOUT_MS",
                capture_defaults.navigation_timeout_ms,
            )?,
            max_concurrent,
            queue_timeout_ms: parse_u64_or_default(
                "CAPTURE_QUEUE_TIMEOUT_MS",
                capture_defaults.queue_timeout_ms,
            )?,
            viewport_width: parse_u32_or_default(
                "CAPTURE_VIEWPORT_WIDTH",
                capture_defaults.viewport_width,
            )?,
            viewport_height: parse_u32_or_default(
                "CAPTURE_VIEWPORT_HEIGHT",
                capture_defaults.viewport_height,
            )?,
            demo_marker: get_or_default("CAPTURE_DEMO_MARKER", &capture_defaults.demo_marker),
            user_agent: get_or_default("CAPTURE_USER_AGENT", &capture_defaults.user_agent),
        };

        // Mock analyzers
        let analyzer_defaults = defaults.analyzers;
        let analyzers = AnalyzerConfig {
            audio_delay_ms: parse_u64_or_default(
                "AUDIO_ANALYSIS_DELAY_MS",
                analyzer_defaults.audio_delay_ms,
            )?,
            image_delay_ms: parse_u64_or_default(
                "IMAGE_ANALYSIS_DELAY_MS",
                analyzer_defaults.image_delay_ms,
            )?,
            audio_synthetic_probability: parse_probability_or_default(
                "AUDIO_SYNTHETIC_PROBABILITY",
                analyzer_defaults.audio_synthetic_probability,
            )?,
            image_synthetic_probability: parse_probability_or_default(
                "IMAGE_SYNTHETIC_PROBABILITY",
                analyzer_defaults.image_synthetic_probability,
            )?,
        };

        let lexicon = LexiconConfig {
            path: get_optional("RISK_LEXICON_PATH"),
        };

        // Scan records
        let persistence_defaults = defaults.persistence;
        let persistence = PersistenceConfig {
            document_store_url: get_optional("DOCUMENT_STORE_URL"),
            identity_header: get_or_default(
                "IDENTITY_HEADER",
                &persistence_defaults.identity_header,
            )
            .to_lowercase(),
            batch_size: parse_usize_or_default(
                "SCAN_RECORD_BATCH_SIZE",
                persistence_defaults.batch_size,
            )?
            .max(1),
            flush_interval_ms: parse_u64_or_default(
                "SCAN_RECORD_FLUSH_INTERVAL_MS",
                persistence_defaults.flush_interval_ms,
            )?,
            queue_capacity: parse_usize_or_default(
                "SCAN_RECORD_QUEUE_CAPACITY",
                persistence_defaults.queue_capacity,
            )?
            .max(1),
            request_timeout_ms: parse_u64_or_default(
                "SCAN_RECORD_REQUEST_TIMEOUT_MS",
                persistence_defaults.request_timeout_ms,
            )?,
        };

        let features = FeatureConfig {
            enable_metrics: parse_bool_or_default("ENABLE_METRICS", true),
            enable_live_capture: parse_bool_or_default("ENABLE_LIVE_CAPTURE", true),
            enable_openapi: parse_bool_or_default("ENABLE_OPENAPI", true),
        };

        Ok(Self {
            environment,
            cors_allowed_origins,
            server: ServerConfig {
                bind_address,
                port,
            },
            capture,
            analyzers,
            lexicon,
            persistence,
            features,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Check if running in development
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Get the global configuration instance
pub fn config() -> &'static AppConfig {
    &CONFIG
}
