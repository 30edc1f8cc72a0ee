//! Wire types for the upstream evaluation service.

use serde::{Deserialize, Serialize};

/// A single price point as the evaluation service sends it.
///
/// `GET /stocks/{ticker}?minutes={n}` responds with a JSON array of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePointResponse {
    pub price: f64,
    /// ISO 8601 timestamp, e.g. `"2025-05-08T04:26:27.4658491Z"`.
    pub last_updated_at: String,
}
