use anyhow::{anyhow, Result};
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::restclient::{RequestOptions, RestClient, RestResponse};
use crate::sources::request::TokenRequest;

/// Status code the issuer answers with when a token was granted.
pub const ISSUER_SUCCESS_CODE: u16 = 200;

/// The issuer answered, but not with a token. The display text is the raw
/// response body, passed through unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{body}")]
pub struct IssuerRejection {
    pub status: u16,
    pub body: String,
}

/// Remote service that hands out tokens.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Transport failures are errors; every answer, whatever its status, is
    /// returned as a response.
    async fn issue(&self, request: &TokenRequest) -> Result<RestResponse>;
}

/// Issuer reached over HTTP: POST of the request body as JSON to
/// `service_addr` + `api_path`.
#[derive(Debug, Clone)]
pub struct HttpIssuer {
    pub service_addr: String,
    pub api_path: String,
    pub options: RequestOptions,
    client: RestClient,
}

impl HttpIssuer {
    pub fn new(service_addr: impl Into<String>, api_path: impl Into<String>, options: RequestOptions) -> Result<Self> {
        let service_addr = service_addr.into();
        if service_addr.trim().is_empty() {
            return Err(anyhow!("token issuer service address is empty"));
        }
        Ok(Self {
            service_addr,
            api_path: api_path.into(),
            options,
            client: RestClient::new()?,
        })
    }

    pub fn with_client(mut self, client: RestClient) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl TokenIssuer for HttpIssuer {
    async fn issue(&self, request: &TokenRequest) -> Result<RestResponse> {
        debug!(service = %request.service_name(), kind = request.kind().as_str(), "requesting token from issuer");
        self.client
            .post(&self.service_addr, &self.api_path, &request.body(), &self.options)
            .await
    }
}
