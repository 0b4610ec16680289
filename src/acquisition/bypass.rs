use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DEFAULT_SKIP_CACHE_ENV: &str = "SC_SKIP_TOKEN_CACHE";

/// Switch that makes acquisitions skip the cache read (writes still happen).
///
/// Evaluated on every acquisition, so flipping it takes effect on the next
/// call without rebuilding anything.
#[derive(Debug, Clone)]
pub enum CacheBypass {
    /// Enabled while the variable holds `true` (any case).
    Env(String),
    /// Enabled while the shared flag is set.
    Switch(Arc<AtomicBool>),
}

impl Default for CacheBypass {
    fn default() -> Self {
        CacheBypass::Env(DEFAULT_SKIP_CACHE_ENV.to_owned())
    }
}

impl CacheBypass {
    pub fn env(var: impl Into<String>) -> Self {
        CacheBypass::Env(var.into())
    }

    /// Returns the bypass together with the flag controlling it
    pub fn switch(enabled: bool) -> (Self, Arc<AtomicBool>) {
        let flag = Arc::new(AtomicBool::new(enabled));
        (CacheBypass::Switch(flag.clone()), flag)
    }

    pub fn is_enabled(&self) -> bool {
        match self {
            CacheBypass::Env(var) => std::env::var(var)
                .map(|value| value.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
            CacheBypass::Switch(flag) => flag.load(Ordering::Relaxed),
        }
    }
}
