//! Minimal JSON REST helper for service-to-service calls.

pub mod client;
pub mod options;

pub use client::{build_url, RestClient, RestResponse};
pub use options::RequestOptions;
