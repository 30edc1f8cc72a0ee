//! High-level client: `StockClient` with nested sub-client accessors.
//!
//! Each domain has its own sub-client in `domain/<name>/client.rs`.
//! This module keeps the builder, the shared freshness cache, and accessor methods.

use crate::domain::correlation::client::Correlations;
use crate::domain::correlation::FallbackPolicy;
use crate::domain::price_history::client::Prices;
use crate::domain::price_history::{Clock, FreshnessCache, PriceSource, SystemClock, DEFAULT_TTL};
use crate::error::Error;

use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "http")]
use crate::http::{EvaluationHttp, RetryPolicy};

// Re-export sub-client types for convenience.
pub use crate::domain::correlation::client::Correlations as CorrelationsClient;
pub use crate::domain::price_history::client::Prices as PricesClient;

/// The primary entry point: cached upstream histories plus statistics.
///
/// Cheap to clone; clones share one cache.
#[derive(Clone)]
pub struct StockClient {
    pub(crate) cache: Arc<FreshnessCache>,
    pub(crate) fallback_policy: FallbackPolicy,
}

impl StockClient {
    pub fn builder() -> StockClientBuilder {
        StockClientBuilder::default()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn prices(&self) -> Prices<'_> {
        Prices { client: self }
    }

    pub fn correlations(&self) -> Correlations<'_> {
        Correlations { client: self }
    }

    pub fn fallback_policy(&self) -> FallbackPolicy {
        self.fallback_policy
    }

    /// Number of `(ticker, minutes)` keys held by the cache.
    pub async fn cached_keys(&self) -> usize {
        self.cache.len().await
    }

    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct StockClientBuilder {
    source: Option<Arc<dyn PriceSource>>,
    clock: Arc<dyn Clock>,
    cache_ttl: Duration,
    fallback_policy: FallbackPolicy,
    #[cfg(feature = "http")]
    base_url: String,
    #[cfg(feature = "http")]
    access_token: Option<String>,
    #[cfg(feature = "http")]
    timeout: Duration,
    #[cfg(feature = "http")]
    retry: RetryPolicy,
}

impl Default for StockClientBuilder {
    fn default() -> Self {
        Self {
            source: None,
            clock: Arc::new(SystemClock),
            cache_ttl: DEFAULT_TTL,
            fallback_policy: FallbackPolicy::default(),
            #[cfg(feature = "http")]
            base_url: crate::network::DEFAULT_UPSTREAM_URL.to_string(),
            #[cfg(feature = "http")]
            access_token: None,
            #[cfg(feature = "http")]
            timeout: crate::http::client::DEFAULT_TIMEOUT,
            #[cfg(feature = "http")]
            retry: RetryPolicy::None,
        }
    }
}

impl StockClientBuilder {
    /// Use a custom price source instead of the HTTP client.
    pub fn source(mut self, source: Arc<dyn PriceSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn fallback_policy(mut self, policy: FallbackPolicy) -> Self {
        self.fallback_policy = policy;
        self
    }

    #[cfg(feature = "http")]
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    #[cfg(feature = "http")]
    pub fn access_token(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    #[cfg(feature = "http")]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[cfg(feature = "http")]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn build(self) -> Result<StockClient, Error> {
        let source = match self.source {
            Some(source) => source,
            None => self.default_source()?,
        };

        Ok(StockClient {
            cache: Arc::new(FreshnessCache::with_clock(source, self.clock, self.cache_ttl)),
            fallback_policy: self.fallback_policy,
        })
    }

    #[cfg(feature = "http")]
    fn default_source(&self) -> Result<Arc<dyn PriceSource>, Error> {
        let mut http = EvaluationHttp::new(&self.base_url, self.timeout)
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?
            .with_retry(self.retry.clone());
        if let Some(token) = &self.access_token {
            http = http.with_access_token(token.clone());
        }
        Ok(Arc::new(http))
    }

    #[cfg(not(feature = "http"))]
    fn default_source(&self) -> Result<Arc<dyn PriceSource>, Error> {
        Err(Error::Config(
            "no price source configured and the `http` feature is disabled".to_string(),
        ))
    }
}
