//! Price history domain: upstream price points, freshness cache, averages.

pub mod cache;
pub mod client;
mod convert;
pub mod source;
pub mod wire;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use cache::{Clock, FreshnessCache, ManualClock, SystemClock, DEFAULT_TTL};
pub use convert::into_history;
pub use source::PriceSource;

/// One observed price for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt")]
    pub last_updated_at: DateTime<Utc>,
}

/// Price points for one ticker over one requested window, in upstream order.
///
/// Upstream does not guarantee chronological order.
pub type PriceHistory = Vec<PricePoint>;

/// Project a history onto its prices, preserving order.
pub fn prices(history: &[PricePoint]) -> Vec<f64> {
    history.iter().map(|p| p.price).collect()
}

/// Average price of a ticker over a window, with the history it was computed from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAverage {
    pub average_stock_price: f64,
    pub price_history: Arc<PriceHistory>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_price_point_json_shape() {
        let point = PricePoint {
            price: 231.95,
            last_updated_at: Utc.with_ymd_and_hms(2025, 5, 8, 4, 11, 42).unwrap(),
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["price"], 231.95);
        assert_eq!(json["lastUpdatedAt"], "2025-05-08T04:11:42Z");
    }

    #[test]
    fn test_stock_average_json_shape() {
        let avg = StockAverage {
            average_stock_price: 12.5,
            price_history: Arc::new(Vec::new()),
        };
        let json = serde_json::to_value(&avg).unwrap();
        assert_eq!(json["averageStockPrice"], 12.5);
        assert!(json["priceHistory"].as_array().unwrap().is_empty());
    }
}
