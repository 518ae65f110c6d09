// Risk lexicon: safelist, blacklist keywords and risky TLDs
// Built once at startup and shared read-only with the scoring engine

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::app_config::LexiconConfig;

const DEFAULT_SAFELIST: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "linkedin.com",
    "tradingview.com",
    "wikipedia.org",
    "bbc.com",
    "cnn.com",
    "nytimes.com",
    "amazon.com",
    "apple.com",
    "microsoft.com",
    "github.com",
    "stackoverflow.com",
];

const DEFAULT_BLACKLIST: &[&str] = &[
    "leak",
    "viral",
    "mms",
    "desi",
    "hidden",
    "private",
    "hub",
    "secret",
    "nsfw",
    "uncensored",
    "adult",
    "xxx",
    "sex",
    "nude",
    "cam",
    "spy",
    "exposed",
    "deepfake",
    "onlyfans",
    "scandal",
    "archive",
    "hack",
    "free-money",
];

const DEFAULT_RISKY_TLDS: &[&str] = &[
    ".xyz", ".top", ".gq", ".tk", ".ml", ".cf", ".cn", ".ru", ".info", ".biz",
];

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Error, Debug)]
pub enum LexiconError {
    #[error("Failed to read lexicon file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid lexicon JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Lexicon list '{0}' is empty")]
    EmptyList(&'static str),
}

// =============================================================================
// JSON CONFIGURATION STRUCTURES
// =============================================================================

#[derive(Debug, Deserialize)]
struct LexiconFile {
    safelist: DomainList,
    blacklist: KeywordList,
    risky_tlds: TldList,
}

#[derive(Debug, Deserialize)]
struct DomainList {
    #[allow(dead_code)]
    description: Option<String>,
    domains: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordList {
    #[allow(dead_code)]
    description: Option<String>,
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TldList {
    #[allow(dead_code)]
    description: Option<String>,
    tlds: Vec<String>,
}

// =============================================================================
// RISK LEXICON
// =============================================================================

/// Immutable allow/deny lists consulted by the URL risk engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskLexicon {
    safelist: Vec<String>,
    blacklist: Vec<String>,
    risky_tlds: Vec<String>,
}

impl RiskLexicon {
    /// Build a lexicon from explicit lists. Entries are trimmed and lowercased.
    pub fn new<S, B, T>(safelist: S, blacklist: B, risky_tlds: T) -> Self
    where
        S: IntoIterator,
        S::Item: AsRef<str>,
        B: IntoIterator,
        B::Item: AsRef<str>,
        T: IntoIterator,
        T::Item: AsRef<str>,
    {
        Self {
            safelist: normalize(safelist),
            blacklist: normalize(blacklist),
            risky_tlds: normalize(risky_tlds),
        }
    }

    /// The lexicon compiled into the binary
    pub fn builtin() -> Self {
        Self::new(DEFAULT_SAFELIST, DEFAULT_BLACKLIST, DEFAULT_RISKY_TLDS)
    }

    /// Parse a lexicon from its JSON representation
    pub fn from_json(content: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = serde_json::from_str(content)?;

        if file.safelist.domains.is_empty() {
            return Err(LexiconError::EmptyList("safelist"));
        }
        if file.blacklist.keywords.is_empty() {
            return Err(LexiconError::EmptyList("blacklist"));
        }
        if file.risky_tlds.tlds.is_empty() {
            return Err(LexiconError::EmptyList("risky_tlds"));
        }

        Ok(Self::new(
            file.safelist.domains,
            file.blacklist.keywords,
            file.risky_tlds.tlds,
        ))
    }

    /// Read and parse a lexicon file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Load the configured lexicon, falling back to the builtin lists when the
    /// file is missing or invalid
    pub fn load(config: &LexiconConfig) -> Self {
        let Some(path) = config.path.as_deref() else {
            info!("No lexicon file configured, using builtin risk lexicon");
            return Self::builtin();
        };

        match Self::from_json_file(path) {
            Ok(lexicon) => {
                info!(
                    "Loaded risk lexicon from {}: {} trusted domains, {} keywords, {} TLDs",
                    path,
                    lexicon.safelist.len(),
                    lexicon.blacklist.len(),
                    lexicon.risky_tlds.len()
                );
                lexicon
            },
            Err(e) => {
                warn!("{}, using builtin risk lexicon", e);
                Self::builtin()
            },
        }
    }

    /// Hostname ends with a trusted domain suffix
    pub fn is_trusted_host(&self, hostname: &str) -> bool {
        self.safelist.iter().any(|d| hostname.ends_with(d.as_str()))
    }

    /// First blacklisted keyword contained in an already-lowercased URL
    pub fn find_blacklisted_keyword(&self, lowercase_url: &str) -> Option<&str> {
        self.blacklist
            .iter()
            .find(|k| lowercase_url.contains(k.as_str()))
            .map(String::as_str)
    }

    /// Hostname ends with a risky TLD suffix
    pub fn has_risky_tld(&self, hostname: &str) -> bool {
        self.risky_tlds.iter().any(|t| hostname.ends_with(t.as_str()))
    }

    pub fn safelist(&self) -> &[String] {
        &self.safelist
    }

    pub fn blacklist(&self) -> &[String] {
        &self.blacklist
    }

    pub fn risky_tlds(&self) -> &[String] {
        &self.risky_tlds
    }
}

impl Default for RiskLexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    entries
        .into_iter()
        .map(|e| e.as_ref().trim().to_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}
