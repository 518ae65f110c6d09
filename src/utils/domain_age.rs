// Simulated domain registration age
// Stands in for a WHOIS lookup so identical hostnames always get identical penalties

/// Number of distinct simulated ages; ages fall in `0..AGE_WINDOW_DAYS`
pub const AGE_WINDOW_DAYS: u32 = 2000;

/// Domains younger than this many days are flagged as newly registered
pub const NEW_DOMAIN_THRESHOLD_DAYS: u32 = 30;

/// Rolling 31x string hash over UTF-16 code units in wrapping 32-bit signed
/// arithmetic, returned as its absolute value.
///
/// Pure function of the input text: stable across calls and across processes.
pub fn domain_hash(text: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in text.encode_utf16() {
        hash = hash
            .wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// Simulated registration age of a hostname, in days
pub fn simulated_age_days(hostname: &str) -> u32 {
    domain_hash(hostname) % AGE_WINDOW_DAYS
}

/// Whether the simulated age puts the hostname under the new-domain threshold
pub fn is_newly_registered(hostname: &str) -> bool {
    simulated_age_days(hostname) < NEW_DOMAIN_THRESHOLD_DAYS
}
