use std::time::Duration;

use anyhow::Result;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::Method;
use reqwest::{Client, NoProxy, Proxy};
use serde::Serialize;
use tracing::{debug, info_span, warn, Instrument};

use crate::restclient::options::RequestOptions;

/// Status code and raw text body of a response. Non-2xx codes are not errors
/// at this level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub code: u16,
    pub body: String,
}

impl RestResponse {
    pub fn new(code: u16, body: impl Into<String>) -> Self {
        Self { code, body: body.into() }
    }
}

/// JSON-over-HTTP helper used to talk to internal services.
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
}

impl RestClient {
    /// Client using the proxy from `http_proxy` / `HTTP_PROXY`, if any.
    pub fn new() -> Result<Self> {
        Self::with_proxy(env_proxy().as_deref())
    }

    pub fn with_proxy(proxy_url: Option<&str>) -> Result<Self> {
        let mut builder = Client::builder().no_proxy();
        if let Some(url) = proxy_url {
            match Proxy::all(url) {
                Ok(proxy) => builder = builder.proxy(proxy.no_proxy(NoProxy::from_env())),
                Err(e) => warn!("parse http proxy: {} occur error: {}", url, e),
            }
        }
        Ok(Self { client: builder.build()? })
    }

    pub async fn request<P: Serialize + ?Sized>(
        &self,
        method: Method,
        service_addr: &str,
        api_path: &str,
        payload: &P,
        options: &RequestOptions,
    ) -> Result<RestResponse> {
        let url = build_url(&options.protocol, service_addr, api_path);
        let body = serde_json::to_vec(payload)?;

        let mut request = self
            .client
            .request(method.clone(), &url)
            .timeout(Duration::from_secs(options.timeout_seconds));
        if let Some(token) = &options.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }
        request = request
            .header(CONTENT_TYPE, options.content_type.as_str())
            .header(ACCEPT, options.accept.as_str())
            .body(body);

        let operation_name = options.operation_name.as_deref().unwrap_or(url.as_str());
        let span = info_span!(
            "rest_request",
            otel.name = %operation_name,
            span.kind = "client",
            http.method = %method,
            http.url = %url,
        );

        async move {
            let response = request.send().await?;
            let code = response.status().as_u16();
            // no lossy decoding: the body is passed on byte for byte or not at all
            let body = String::from_utf8(response.bytes().await?.to_vec())?;
            debug!(code, "response received");
            Ok::<_, anyhow::Error>(RestResponse { code, body })
        }
        .instrument(span)
        .await
    }

    pub async fn get<P: Serialize + ?Sized>(&self, service_addr: &str, api_path: &str, payload: &P, options: &RequestOptions) -> Result<RestResponse> {
        self.request(Method::GET, service_addr, api_path, payload, options).await
    }

    pub async fn post<P: Serialize + ?Sized>(&self, service_addr: &str, api_path: &str, payload: &P, options: &RequestOptions) -> Result<RestResponse> {
        self.request(Method::POST, service_addr, api_path, payload, options).await
    }

    pub async fn put<P: Serialize + ?Sized>(&self, service_addr: &str, api_path: &str, payload: &P, options: &RequestOptions) -> Result<RestResponse> {
        self.request(Method::PUT, service_addr, api_path, payload, options).await
    }

    pub async fn patch<P: Serialize + ?Sized>(&self, service_addr: &str, api_path: &str, payload: &P, options: &RequestOptions) -> Result<RestResponse> {
        self.request(Method::PATCH, service_addr, api_path, payload, options).await
    }

    pub async fn delete<P: Serialize + ?Sized>(&self, service_addr: &str, api_path: &str, payload: &P, options: &RequestOptions) -> Result<RestResponse> {
        self.request(Method::DELETE, service_addr, api_path, payload, options).await
    }
}

/// `{protocol}://{service_addr}{api_path}`, adding the leading `/` if missing
pub fn build_url(protocol: &str, service_addr: &str, api_path: &str) -> String {
    let service_addr = service_addr.trim_end_matches('/');
    if api_path.is_empty() || api_path.starts_with('/') {
        format!("{}://{}{}", protocol, service_addr, api_path)
    } else {
        format!("{}://{}/{}", protocol, service_addr, api_path)
    }
}

fn env_proxy() -> Option<String> {
    ["http_proxy", "HTTP_PROXY"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
}
