// Utility modules for the scan core

pub mod domain_age;
pub mod scan_errors;

pub use domain_age::{is_newly_registered, simulated_age_days};
pub use scan_errors::{ScanError, ScanErrorResponse, ScanResult};
