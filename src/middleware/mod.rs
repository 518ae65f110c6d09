// Middleware and request extractors

pub mod cors;
pub mod identity;

pub use cors::dynamic_cors_middleware;
pub use identity::ScanIdentity;
