//! Prices sub-client: cached histories and average price.

use super::{prices, PriceHistory, StockAverage};
use crate::client::StockClient;
use crate::error::Error;
use crate::shared::Ticker;
use crate::stats;
use std::sync::Arc;

/// Sub-client for single-ticker operations.
pub struct Prices<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Prices<'a> {
    /// Price history for `ticker` over the last `minutes`. Uses the freshness cache.
    pub async fn history(&self, ticker: &Ticker, minutes: u32) -> Result<Arc<PriceHistory>, Error> {
        Ok(self.client.cache.get_or_fetch(ticker, minutes).await?)
    }

    /// Average price over the window, alongside the history it was computed from.
    pub async fn average(&self, ticker: &Ticker, minutes: u32) -> Result<StockAverage, Error> {
        let history = self.history(ticker, minutes).await?;
        Ok(StockAverage {
            average_stock_price: stats::mean(&prices(&history)),
            price_history: history,
        })
    }
}
