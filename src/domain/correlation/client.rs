//! Correlations sub-client: concurrent fetches, pairwise and matrix correlation.

use super::{
    correlate, pearson, CorrelationMatrix, CorrelationResult, FallbackPolicy, MATRIX_MAX_TICKERS,
    MATRIX_MIN_TICKERS,
};
use crate::client::StockClient;
use crate::domain::price_history::PriceHistory;
use crate::error::{Error, StatsError};
use crate::shared::Ticker;

use futures_util::future::{try_join, try_join_all};
use std::sync::Arc;

/// Sub-client for multi-ticker operations.
pub struct Correlations<'a> {
    pub(crate) client: &'a StockClient,
}

impl<'a> Correlations<'a> {
    /// Correlate two tickers over the last `minutes`.
    ///
    /// Both histories are fetched concurrently through the cache; the first
    /// failure aborts the request.
    pub async fn pair(
        &self,
        ticker1: &Ticker,
        ticker2: &Ticker,
        minutes: u32,
    ) -> Result<CorrelationResult, Error> {
        let cache = &self.client.cache;
        let (history1, history2) = try_join(
            cache.get_or_fetch(ticker1, minutes),
            cache.get_or_fetch(ticker2, minutes),
        )
        .await?;

        Ok(correlate(
            ticker1.clone(),
            history1,
            ticker2.clone(),
            history2,
            self.client.fallback_policy,
        )?)
    }

    /// Correlation heatmap over `tickers`.
    ///
    /// Each distinct ticker is fetched once. Pairs are aligned strictly, so a
    /// pair without two shared timestamps is `None` rather than a
    /// self-correlation. Duplicate tickers are dropped, keeping first
    /// occurrence order.
    pub async fn matrix(&self, tickers: &[Ticker], minutes: u32) -> Result<CorrelationMatrix, Error> {
        let mut distinct: Vec<Ticker> = Vec::with_capacity(tickers.len());
        for ticker in tickers {
            if !distinct.contains(ticker) {
                distinct.push(ticker.clone());
            }
        }
        if !(MATRIX_MIN_TICKERS..=MATRIX_MAX_TICKERS).contains(&distinct.len()) {
            return Err(Error::Validation(format!(
                "correlation matrix needs {}..={} distinct tickers, got {}",
                MATRIX_MIN_TICKERS,
                MATRIX_MAX_TICKERS,
                distinct.len()
            )));
        }

        let cache = &self.client.cache;
        let histories: Vec<Arc<PriceHistory>> = try_join_all(
            distinct
                .iter()
                .map(|ticker| cache.get_or_fetch(ticker, minutes)),
        )
        .await?;

        let n = distinct.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            values[i][i] = Some(1.0);
            for j in (i + 1)..n {
                let cell = match pearson(&histories[i], &histories[j], FallbackPolicy::Strict) {
                    Ok(c) => Some(c.coefficient),
                    Err(StatsError::InsufficientData { .. }) => None,
                    Err(e) => return Err(e.into()),
                };
                values[i][j] = cell;
                values[j][i] = cell;
            }
        }

        Ok(CorrelationMatrix {
            minutes,
            tickers: distinct,
            values,
        })
    }
}
