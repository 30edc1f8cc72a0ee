//! Unified error types.

use crate::shared::{Ticker, TickerError};
use thiserror::Error;

/// Top-level crate error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("Invalid ticker: {0}")]
    Ticker(#[from] TickerError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures talking to the upstream evaluation service.
///
/// Every variant carries the ticker that was being fetched.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[cfg(feature = "http")]
    #[error("Request for {ticker} failed: {source}")]
    Transport {
        ticker: Ticker,
        #[source]
        source: reqwest::Error,
    },

    #[error("Upstream returned {status} for {ticker}: {body}")]
    Status {
        ticker: Ticker,
        status: u16,
        body: String,
    },

    #[error("Malformed upstream payload for {ticker}: {message}")]
    Decode { ticker: Ticker, message: String },

    #[error("Max retries exceeded for {ticker} after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded {
        ticker: Ticker,
        attempts: u32,
        last_error: String,
    },
}

impl UpstreamError {
    pub fn ticker(&self) -> &Ticker {
        match self {
            #[cfg(feature = "http")]
            UpstreamError::Transport { ticker, .. } => ticker,
            UpstreamError::Status { ticker, .. }
            | UpstreamError::Decode { ticker, .. }
            | UpstreamError::MaxRetriesExceeded { ticker, .. } => ticker,
        }
    }
}

/// Statistics engine and correlation failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    /// Paired inputs of different lengths. Programmer error.
    #[error("Dimension mismatch: {left} vs {right} samples")]
    DimensionMismatch { left: usize, right: usize },

    /// Fewer than two usable aligned points. Widening the window usually helps.
    #[error("Insufficient data points to perform a calculation ({points} usable)")]
    InsufficientData { points: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_names_ticker() {
        let err = UpstreamError::Status {
            ticker: Ticker::from("NVDA"),
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.ticker().as_str(), "NVDA");
        assert_eq!(err.to_string(), "Upstream returned 503 for NVDA: unavailable");
    }

    #[test]
    fn test_stats_error_converts_into_top_level() {
        let err: Error = StatsError::InsufficientData { points: 1 }.into();
        assert!(matches!(
            err,
            Error::Stats(StatsError::InsufficientData { points: 1 })
        ));
    }
}
