//! Conversions from wire types to domain types for price history.

use super::wire::PricePointResponse;
use super::{PriceHistory, PricePoint};
use crate::error::UpstreamError;
use crate::shared::Ticker;
use chrono::{DateTime, Utc};

impl TryFrom<PricePointResponse> for PricePoint {
    type Error = String;

    fn try_from(p: PricePointResponse) -> Result<Self, Self::Error> {
        if !p.price.is_finite() {
            return Err(format!("non-finite price {}", p.price));
        }
        let last_updated_at = DateTime::parse_from_rfc3339(&p.last_updated_at)
            .map_err(|e| format!("invalid lastUpdatedAt {:?}: {}", p.last_updated_at, e))?
            .with_timezone(&Utc);
        Ok(Self {
            price: p.price,
            last_updated_at,
        })
    }
}

/// Convert an upstream payload for `ticker`, failing on the first bad point.
pub fn into_history(
    ticker: &Ticker,
    points: Vec<PricePointResponse>,
) -> Result<PriceHistory, UpstreamError> {
    points
        .into_iter()
        .map(PricePoint::try_from)
        .collect::<Result<_, _>>()
        .map_err(|message| UpstreamError::Decode {
            ticker: ticker.clone(),
            message,
        })
}
