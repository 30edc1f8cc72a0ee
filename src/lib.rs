//! # ticker-stats
//!
//! Backend for a small stock-analytics dashboard: fetches price histories from
//! an upstream evaluation service, caches them briefly, and computes average
//! price and pairwise Pearson correlation.
//!
//! ## Architecture
//!
//! The crate is organized in layers:
//!
//! 1. **Core**: Shared newtypes, statistics engine, domain models (always available)
//! 2. **HTTP API**: `EvaluationHttp`, the bearer-authenticated upstream client
//! 3. **High-Level Client**: `StockClient` with the freshness cache and nested sub-clients
//! 4. **Server**: axum routes for `/stocks` and `/stockcorrelation`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ticker_stats::prelude::*;
//!
//! let client = StockClient::builder()
//!     .base_url("http://20.244.56.144/evaluation-service")
//!     .access_token(Some(token))
//!     .build()?;
//!
//! let nvda = client.prices().average(&Ticker::from("NVDA"), 60).await?;
//! let pair = client
//!     .correlations()
//!     .pair(&Ticker::from("NVDA"), &Ticker::from("PYPL"), 60)
//!     .await?;
//! ```

// ── Layer 1: Core ────────────────────────────────────────────────────────────

/// Shared newtypes used across all domains.
pub mod shared;

/// Domain modules (vertical slices): types, wire types, conversions, sub-clients.
pub mod domain;

/// Mean, sample standard deviation, sample covariance.
pub mod stats;

/// Unified error types.
pub mod error;

/// Network defaults.
pub mod network;

// ── Layer 2: HTTP API ────────────────────────────────────────────────────────

/// Upstream HTTP client with an opt-in retry policy.
#[cfg(feature = "http")]
pub mod http;

// ── Layer 3: High-Level Client ───────────────────────────────────────────────

/// `StockClient`: the primary entry point.
pub mod client;

// ── Layer 4: Server ──────────────────────────────────────────────────────────

/// axum router, handlers and environment configuration.
#[cfg(feature = "server")]
pub mod server;

// ── Prelude ──────────────────────────────────────────────────────────────────

pub mod prelude {
    // Shared newtypes
    pub use crate::shared::{Ticker, TickerError};

    // Domain types: price history
    pub use crate::domain::price_history::{
        Clock, FreshnessCache, ManualClock, PriceHistory, PricePoint, PriceSource, StockAverage,
        SystemClock,
    };

    // Domain types: correlation
    pub use crate::domain::correlation::{
        Alignment, CorrelationMatrix, CorrelationResult, FallbackPolicy, TickerStats,
    };

    // Errors
    pub use crate::error::{Error, StatsError, UpstreamError};

    // Client + sub-clients
    pub use crate::client::{CorrelationsClient, PricesClient, StockClient, StockClientBuilder};

    // HTTP client
    #[cfg(feature = "http")]
    pub use crate::http::{EvaluationHttp, RetryConfig, RetryPolicy};
}
