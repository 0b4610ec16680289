use anyhow::Result;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

pub const HIT: &str = "hit";
pub const MISS: &str = "miss";
pub const BYPASS: &str = "bypass";
pub const DISABLED: &str = "disabled";
pub const OK: &str = "ok";
pub const ERROR: &str = "error";
pub const TRANSPORT: &str = "transport";
pub const REJECTED: &str = "rejected";

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Cache metrics
    pub cache_lookups: IntCounterVec,
    pub cache_writes: IntCounterVec,

    // Issuer metrics
    pub issuer_requests: IntCounterVec,
    pub issuer_failures: IntCounterVec,
    pub issuer_duration: HistogramVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("tokencache".into()), None).unwrap();

        let metrics = Arc::new(Self {
            // Cache
            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Token cache lookups by kind and result"), &["kind", "result"]).unwrap(),
            cache_writes: IntCounterVec::new(Opts::new("cache_writes_total", "Token cache writes by kind and result"), &["kind", "result"]).unwrap(),

            // Issuer
            issuer_requests: IntCounterVec::new(Opts::new("issuer_requests_total", "Token issuer requests by kind"), &["kind"]).unwrap(),
            issuer_failures: IntCounterVec::new(Opts::new("issuer_failures_total", "Token issuer failures by kind and reason"), &["kind", "reason"]).unwrap(),
            issuer_duration: HistogramVec::new(HistogramOpts::new("issuer_duration_seconds", "Token issuer call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["kind"]).unwrap(),

            registry,
        });

        metrics.registry.register(Box::new(metrics.cache_lookups.clone())).unwrap();
        metrics.registry.register(Box::new(metrics.cache_writes.clone())).unwrap();
        metrics.registry.register(Box::new(metrics.issuer_requests.clone())).unwrap();
        metrics.registry.register(Box::new(metrics.issuer_failures.clone())).unwrap();
        metrics.registry.register(Box::new(metrics.issuer_duration.clone())).unwrap();

        metrics
    }

    /// Prometheus text exposition of every registered metric
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
