use serde::Deserialize;

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_PROTOCOL: &str = "http";
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_ACCEPT: &str = "application/json";

/// ================================
/// Per-request options of the REST helper
/// ================================
///
/// Applied in this order when a request is built:
/// 1. `protocol` -> scheme of the destination url
/// 2. `timeout_seconds` -> whole-request timeout (connect included)
/// 3. `token` -> `Authorization: token <token>`
/// 4. `content_type` -> `Content-Type`
/// 5. `accept` -> `Accept`
/// 6. `operation_name` -> name of the client span, defaults to the url
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    pub timeout_seconds: u64,
    pub protocol: String,
    pub content_type: String,
    pub accept: String,
    pub token: Option<String>,
    pub operation_name: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            protocol: DEFAULT_PROTOCOL.to_owned(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            accept: DEFAULT_ACCEPT.to_owned(),
            token: None,
            operation_name: None,
        }
    }
}

impl RequestOptions {
    pub fn with_timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = protocol.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = Some(operation_name.into());
        self
    }
}
