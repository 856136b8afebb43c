//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::dispatch::CompletionBackend;
use crate::ratelimit::RateLimiter;

/// State shared across all HTTP handlers.
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Per-client sliding-window request counter.
    pub limiter: RateLimiter,
    /// Completion provider seam; swapped for a mock in tests.
    pub backend: Arc<dyn CompletionBackend>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}
