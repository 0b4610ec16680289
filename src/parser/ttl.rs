use std::time::Duration;

use serde_json::Value;
use tracing::debug;

pub const EXPIRES_IN_FIELD: &str = "expires_in";
pub const DEFAULT_TTL_SECONDS: u64 = 7200;

/// Determine how long an issuer response may be cached.
///
/// Reads a top-level integer `expires_in` from a JSON object body. Anything
/// else (not JSON, not an object, missing field, string, float, negative
/// number) falls back to [`DEFAULT_TTL_SECONDS`]. Never fails.
pub fn extract_ttl(body: &[u8]) -> Duration {
    Duration::from_secs(extract_ttl_seconds(body))
}

fn extract_ttl_seconds(body: &[u8]) -> u64 {
    let json: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(e) => {
            debug!("token body is not valid JSON, using default ttl: {}", e);
            return DEFAULT_TTL_SECONDS;
        }
    };

    let Some(fields) = json.as_object() else {
        debug!("token body is not a JSON object, using default ttl");
        return DEFAULT_TTL_SECONDS;
    };

    match fields.get(EXPIRES_IN_FIELD) {
        // only an integer representation counts, 3600.0 is treated as absent
        Some(value) => value.as_u64().unwrap_or_else(|| {
            debug!(value = %value, "'{}' is not a non-negative integer, using default ttl", EXPIRES_IN_FIELD);
            DEFAULT_TTL_SECONDS
        }),
        None => {
            debug!("'{}' is absent, using default ttl", EXPIRES_IN_FIELD);
            DEFAULT_TTL_SECONDS
        }
    }
}
