//! Freshness cache for upstream price histories.
//!
//! Entries are keyed by `(ticker, minutes)` and served while younger than the
//! TTL. A refresh swaps the whole entry; nothing is ever evicted, so the key
//! set grows with every distinct window requested.

use super::{PriceHistory, PriceSource};
use crate::error::UpstreamError;
use crate::shared::Ticker;

use async_lock::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// How long an upstream payload stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_millis(60_000);

/// Source of "now" for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

struct CacheEntry {
    payload: Arc<PriceHistory>,
    fetched_at: Instant,
}

/// Time-windowed cache in front of a [`PriceSource`].
///
/// No single-flight: concurrent misses on one key each call the source, and
/// the last successful write wins.
pub struct FreshnessCache {
    source: Arc<dyn PriceSource>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    entries: RwLock<HashMap<(Ticker, u32), CacheEntry>>,
}

impl FreshnessCache {
    pub fn new(source: Arc<dyn PriceSource>, ttl: Duration) -> Self {
        Self::with_clock(source, Arc::new(SystemClock), ttl)
    }

    pub fn with_clock(source: Arc<dyn PriceSource>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached history for `(ticker, minutes)` if fresh, else fetch and store it.
    ///
    /// A failed fetch leaves any stale entry in place.
    pub async fn get_or_fetch(
        &self,
        ticker: &Ticker,
        minutes: u32,
    ) -> Result<Arc<PriceHistory>, UpstreamError> {
        let key = (ticker.clone(), minutes);
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(&key) {
                if self.clock.now().saturating_duration_since(entry.fetched_at) < self.ttl {
                    tracing::debug!(ticker = %ticker, minutes, "cache hit");
                    return Ok(entry.payload.clone());
                }
            }
        }

        tracing::debug!(ticker = %ticker, minutes, "cache miss");
        let payload = Arc::new(self.source.fetch(ticker, minutes).await?);

        self.entries.write().await.insert(
            key,
            CacheEntry {
                payload: payload.clone(),
                fetched_at: self.clock.now(),
            },
        );
        Ok(payload)
    }

    /// Number of keys ever stored (entries are never evicted).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}
