// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::cache::gateway::TokenStore;
use crate::cache::memory::MemoryStore;
use crate::restclient::RestResponse;
use crate::sources::{TokenIssuer, TokenRequest};

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

/// Issuer double: answers every request with the same response (or a
/// transport error) and remembers what it was asked.
#[derive(Clone)]
pub struct FakeIssuer {
    response: Option<RestResponse>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<TokenRequest>>>,
}

impl FakeIssuer {
    pub fn answering(code: u16, body: &str) -> Self {
        Self {
            response: Some(RestResponse::new(code, body)),
            delay: Duration::ZERO,
            calls: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unreachable() -> Self {
        Self { response: None, ..Self::answering(0, "") }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<TokenRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenIssuer for FakeIssuer {
    async fn issue(&self, request: &TokenRequest) -> Result<RestResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.response.clone().ok_or_else(|| anyhow!("connection refused"))
    }
}

/// Memory store that counts traffic and remembers the ttl of every write.
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    gets: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<(String, String, Duration)>>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    /// (key, value, ttl) of every attempted write
    pub fn writes(&self) -> Vec<(String, String, Duration)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenStore for RecordingStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads {
            return Err(anyhow!("cache backend down"));
        }
        self.inner.get(key).await
    }

    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        self.writes.lock().unwrap().push((key.to_owned(), value.to_owned(), ttl));
        if self.fail_writes {
            return Err(anyhow!("cache backend down"));
        }
        self.inner.set_with_expiry(key, value, ttl).await
    }
}
