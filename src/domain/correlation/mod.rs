//! Correlation domain: timestamp alignment, Pearson correlation, heatmap matrix.

pub mod align;
pub mod client;

use crate::domain::price_history::PriceHistory;
use crate::shared::Ticker;
use serde::Serialize;
use std::sync::Arc;

pub use align::{align, correlate, pearson, AlignedSeries};

/// Decimal places correlation coefficients are rounded to.
pub const CORRELATION_DECIMALS: u32 = 6;

/// Bounds accepted by the correlation matrix.
pub const MATRIX_MIN_TICKERS: usize = 2;
pub const MATRIX_MAX_TICKERS: usize = 16;

/// What to do when two histories share fewer than two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Correlate the first ticker's prices against themselves.
    ///
    /// A data-quality workaround for upstream test data that rarely shares
    /// timestamps across tickers. The result is not a cross-ticker signal and
    /// is reported as [`Alignment::SelfCorrelationFallback`].
    #[default]
    DegradeToSelfCorrelation,
    /// Fail with `InsufficientData` instead.
    Strict,
}

impl FallbackPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackPolicy::DegradeToSelfCorrelation => "self",
            FallbackPolicy::Strict => "strict",
        }
    }
}

impl std::str::FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" | "degrade" => Ok(FallbackPolicy::DegradeToSelfCorrelation),
            "strict" => Ok(FallbackPolicy::Strict),
            other => Err(format!("unknown correlation fallback policy: {other}")),
        }
    }
}

/// How the series fed into the coefficient were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// Inner join on exact timestamps produced `points` pairs.
    Matched { points: usize },
    /// Too little overlap; the first ticker was correlated with itself.
    SelfCorrelationFallback { points: usize },
}

impl Alignment {
    pub fn points(&self) -> usize {
        match self {
            Alignment::Matched { points } | Alignment::SelfCorrelationFallback { points } => *points,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Alignment::SelfCorrelationFallback { .. })
    }
}

/// A rounded correlation coefficient and how it was derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Correlation {
    pub coefficient: f64,
    pub alignment: Alignment,
}

/// Display stats for one side of a correlation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerStats {
    #[serde(skip)]
    pub ticker: Ticker,
    pub average_price: f64,
    /// The full, unaligned history as upstream returned it.
    pub price_history: Arc<PriceHistory>,
}

#[derive(Debug, Clone)]
pub struct CorrelationResult {
    /// In `[-1, 1]`, rounded to [`CORRELATION_DECIMALS`] places.
    pub correlation: f64,
    pub alignment: Alignment,
    pub ticker1: TickerStats,
    pub ticker2: TickerStats,
}

/// Pairwise correlations over a set of tickers, row-major.
///
/// `values[i][j]` is `None` when the pair shares fewer than two timestamps.
/// The diagonal is always `Some(1.0)`.
#[derive(Debug, Clone, Serialize)]
pub struct CorrelationMatrix {
    pub minutes: u32,
    pub tickers: Vec<Ticker>,
    #[serde(rename = "matrix")]
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, a: &Ticker, b: &Ticker) -> Option<f64> {
        let i = self.tickers.iter().position(|t| t == a)?;
        let j = self.tickers.iter().position(|t| t == b)?;
        self.values[i][j]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_policy_parse() {
        assert_eq!(
            "self".parse::<FallbackPolicy>().unwrap(),
            FallbackPolicy::DegradeToSelfCorrelation
        );
        assert_eq!(" Strict ".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Strict);
        assert!("random".parse::<FallbackPolicy>().is_err());
        assert_eq!(FallbackPolicy::default().as_str(), "self");
    }

    #[test]
    fn test_matrix_lookup_and_json() {
        let matrix = CorrelationMatrix {
            minutes: 30,
            tickers: vec![Ticker::from("AMD"), Ticker::from("CSX")],
            values: vec![vec![Some(1.0), None], vec![None, Some(1.0)]],
        };
        assert_eq!(matrix.get(&Ticker::from("AMD"), &Ticker::from("AMD")), Some(1.0));
        assert_eq!(matrix.get(&Ticker::from("AMD"), &Ticker::from("CSX")), None);
        assert_eq!(matrix.get(&Ticker::from("AMD"), &Ticker::from("XYZ")), None);

        let json = serde_json::to_value(&matrix).unwrap();
        assert_eq!(json["tickers"][1], "CSX");
        assert!(json["matrix"][0][1].is_null());
        assert_eq!(json["minutes"], 30);
    }
}
