// URL risk scoring engine
// Deterministic heuristics: absolute overrides first, then independent additive penalties

use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::{
    config::RiskLexicon,
    models::scan::{RiskStatus, RiskVerdict, URL_HIGH_RISK_THRESHOLD},
    utils::domain_age,
};

const BASE_SCORE: i32 = 100;
const MIN_SCORE: i32 = 10;
const MAX_SCORE: i32 = 99;

const INSECURE_PROTOCOL_PENALTY: i32 = 40;
const RISKY_TLD_PENALTY: i32 = 50;
const COMPLEX_STRUCTURE_PENALTY: i32 = 30;
const NEW_DOMAIN_PENALTY: i32 = 20;

/// Hostnames with more hyphens than this are considered structurally complex
const MAX_HOSTNAME_HYPHENS: usize = 3;

pub const FLAG_INSECURE_PROTOCOL: &str = "Insecure Protocol (HTTP)";
pub const FLAG_RISKY_TLD: &str = "High-Risk TLD Detected";
pub const FLAG_COMPLEX_STRUCTURE: &str = "Complex Domain Structure";
pub const FLAG_NEW_DOMAIN: &str = "Newly Registered Domain (<30 Days)";

/// Pure URL scorer over an injected lexicon
#[derive(Debug, Clone)]
pub struct UrlRiskEngine {
    lexicon: Arc<RiskLexicon>,
}

impl UrlRiskEngine {
    pub fn new(lexicon: Arc<RiskLexicon>) -> Self {
        Self { lexicon }
    }

    /// Score a URL. Never fails: unparsable input yields the INVALID verdict.
    pub fn analyze(&self, input: &str) -> RiskVerdict {
        let parsed = match Url::parse(input) {
            Ok(url) => url,
            Err(e) => {
                debug!("URL parse failed for {:?}: {}", input, e);
                return RiskVerdict::invalid();
            },
        };
        let hostname = parsed.host_str().unwrap_or("");

        let mut score = BASE_SCORE;
        let mut flags = Vec::new();

        // 1. Protocol
        if parsed.scheme() != "https" {
            score -= INSECURE_PROTOCOL_PENALTY;
            flags.push(FLAG_INSECURE_PROTOCOL.to_string());
        }

        // 2. Safelist wins over everything, including the protocol penalty
        if self.lexicon.is_trusted_host(hostname) {
            return RiskVerdict::trusted();
        }

        // 3. Blacklisted keyword anywhere in the URL
        if let Some(keyword) = self
            .lexicon
            .find_blacklisted_keyword(&input.to_lowercase())
        {
            debug!("Blacklisted keyword '{}' in {}", keyword, input);
            return RiskVerdict::blacklisted();
        }

        // 4. Structure
        if self.lexicon.has_risky_tld(hostname) {
            score -= RISKY_TLD_PENALTY;
            flags.push(FLAG_RISKY_TLD.to_string());
        }

        if hostname.matches('-').count() > MAX_HOSTNAME_HYPHENS {
            score -= COMPLEX_STRUCTURE_PENALTY;
            flags.push(FLAG_COMPLEX_STRUCTURE.to_string());
        }

        // 5. Simulated registration age
        if domain_age::is_newly_registered(hostname) {
            score -= NEW_DOMAIN_PENALTY;
            flags.push(FLAG_NEW_DOMAIN.to_string());
        }

        let score = score.clamp(MIN_SCORE, MAX_SCORE) as u8;

        RiskVerdict {
            score,
            status: RiskStatus::from_score(score),
            flags,
            is_synthetic_or_high_risk: score < URL_HIGH_RISK_THRESHOLD,
        }
    }
}
