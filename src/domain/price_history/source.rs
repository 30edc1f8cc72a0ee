//! The seam between the cache and whatever produces price histories.

use super::PriceHistory;
use crate::error::UpstreamError;
use crate::shared::Ticker;
use async_trait::async_trait;

/// Produces a ticker's price history over the last `minutes`.
///
/// Implemented by [`crate::http::EvaluationHttp`]; tests supply in-memory fakes.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, ticker: &Ticker, minutes: u32) -> Result<PriceHistory, UpstreamError>;
}
