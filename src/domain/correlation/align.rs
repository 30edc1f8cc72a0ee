//! Timestamp alignment and Pearson correlation of two price histories.

use super::{
    Alignment, Correlation, CorrelationResult, FallbackPolicy, TickerStats, CORRELATION_DECIMALS,
};
use crate::domain::price_history::{prices, PriceHistory, PricePoint};
use crate::error::StatsError;
use crate::shared::Ticker;
use crate::stats;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

/// Two equal-length price series paired by observation time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedSeries {
    pub first: Vec<f64>,
    pub second: Vec<f64>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Inner join on exact `last_updated_at` equality, in `history2` order.
///
/// Neither input needs to be sorted. If `history1` repeats a timestamp, its
/// last price for that timestamp wins.
pub fn align(history1: &[PricePoint], history2: &[PricePoint]) -> AlignedSeries {
    let by_time: HashMap<DateTime<Utc>, f64> = history1
        .iter()
        .map(|p| (p.last_updated_at, p.price))
        .collect();

    let mut aligned = AlignedSeries::default();
    for point in history2 {
        if let Some(&price) = by_time.get(&point.last_updated_at) {
            aligned.first.push(price);
            aligned.second.push(point.price);
        }
    }
    aligned
}

/// Pearson correlation of two histories after alignment.
///
/// Zero variance on either side yields `0.0`. The coefficient is clamped to
/// `[-1, 1]` and rounded to six decimals.
pub fn pearson(
    history1: &[PricePoint],
    history2: &[PricePoint],
    policy: FallbackPolicy,
) -> Result<Correlation, StatsError> {
    let mut aligned = align(history1, history2);
    let mut alignment = Alignment::Matched {
        points: aligned.len(),
    };

    if aligned.len() < 2 && policy == FallbackPolicy::DegradeToSelfCorrelation {
        let own = prices(history1);
        alignment = Alignment::SelfCorrelationFallback { points: own.len() };
        aligned = AlignedSeries {
            first: own.clone(),
            second: own,
        };
    }

    if aligned.len() < 2 {
        return Err(StatsError::InsufficientData {
            points: aligned.len(),
        });
    }

    // Pearson is scale-invariant; normalising keeps the squared sums finite.
    let first = scaled_by_max_abs(&aligned.first);
    let second = scaled_by_max_abs(&aligned.second);

    let sd1 = stats::stddev(&first);
    let sd2 = stats::stddev(&second);
    let raw = if sd1 > 0.0 && sd2 > 0.0 {
        stats::covariance(&first, &second)? / (sd1 * sd2)
    } else {
        0.0
    };
    let raw = if raw.is_finite() { raw } else { 0.0 };

    Ok(Correlation {
        coefficient: stats::round_to(raw.clamp(-1.0, 1.0), CORRELATION_DECIMALS),
        alignment,
    })
}

fn scaled_by_max_abs(xs: &[f64]) -> Vec<f64> {
    let max_abs = xs.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max_abs > 0.0 && max_abs.is_finite() {
        xs.iter().map(|x| x / max_abs).collect()
    } else {
        xs.to_vec()
    }
}

/// Correlate two tickers' histories and attach each side's display stats.
pub fn correlate(
    ticker1: Ticker,
    history1: Arc<PriceHistory>,
    ticker2: Ticker,
    history2: Arc<PriceHistory>,
    policy: FallbackPolicy,
) -> Result<CorrelationResult, StatsError> {
    let correlation = pearson(&history1, &history2, policy)?;

    if correlation.alignment.is_fallback() {
        tracing::warn!(
            ticker1 = %ticker1,
            ticker2 = %ticker2,
            points = correlation.alignment.points(),
            "fewer than 2 shared timestamps; reporting self-correlation of {}",
            ticker1
        );
    }

    Ok(CorrelationResult {
        correlation: correlation.coefficient,
        alignment: correlation.alignment,
        ticker1: ticker_stats(ticker1, history1),
        ticker2: ticker_stats(ticker2, history2),
    })
}

fn ticker_stats(ticker: Ticker, history: Arc<PriceHistory>) -> TickerStats {
    TickerStats {
        ticker,
        average_price: stats::mean(&prices(&history)),
        price_history: history,
    }
}
