//! # Token Cache Client
//!
//! Acquires app and user tokens from a remote token issuer and keeps them in
//! an optional cache, so repeated calls do not re-authenticate every time.
//!
//! Modules:
//! - `acquisition` — cache-aside acquisition (`TokenAcquirer`)
//! - `cache` — cache key derivation, cache gateway, memory and Redis stores
//! - `parser` — cache ttl extraction from issuer responses
//! - `sources` — token requests and the issuer client
//! - `restclient` — JSON REST helper the issuer client is built on
//! - `config` — YAML / environment configuration

pub mod acquisition;
pub mod cache;
pub mod config;
pub mod observability;
pub mod parser;
pub mod restclient;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::acquisition::{CacheBypass, TokenAcquirer};
pub use crate::cache::key::derive_key;
pub use crate::parser::ttl::extract_ttl;
pub use crate::sources::{IssuerRejection, TokenRequest};
