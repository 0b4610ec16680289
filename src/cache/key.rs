use sha2::{Digest, Sha256};

use crate::sources::request::TokenKind;

/// Number of hex characters of the digest kept in a cache key (28 bits).
pub const KEY_DIGEST_LEN: usize = 7;

/// Derive the cache key for a piece of identity material.
///
/// `<NAMESPACE>_TOKEN_<first 7 hex chars of sha256(material)>`, uppercased.
/// The same input always yields the same key, across calls and restarts.
pub fn derive_key(namespace: &str, material: &str) -> String {
    let digest = hex::encode(Sha256::digest(material.as_bytes()));
    format!("{}_TOKEN_{}", namespace, &digest[..KEY_DIGEST_LEN]).to_uppercase()
}

pub fn app_key(service_secret: &str) -> String {
    derive_key(TokenKind::App.namespace(), service_secret)
}

pub fn user_key(user_id: &str) -> String {
    derive_key(TokenKind::User.namespace(), user_id)
}
