//! Shared newtypes used across all domain modules.
//!
//! These types are serialization-transparent: they serialize/deserialize identically
//! to the raw strings the upstream service and the dashboard exchange.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use thiserror::Error;

// ─── Ticker ──────────────────────────────────────────────────────────────────

/// Stock symbol identifying one equity instrument (e.g. `"NVDA"`, `"BRK.B"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticker(String);

/// Rejected ticker input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickerError {
    #[error("ticker is empty")]
    Empty,
    #[error("ticker {0:?} contains characters outside [A-Za-z0-9.-]")]
    InvalidCharacter(String),
}

impl Ticker {
    /// Wrap a symbol without validation. Use [`Ticker::parse`] for user input.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Validate user-supplied input: trimmed, non-empty, `[A-Za-z0-9.-]` only.
    pub fn parse(s: &str) -> Result<Self, TickerError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TickerError::Empty);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(TickerError::InvalidCharacter(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ticker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ticker::parse(s)
    }
}

impl Serialize for Ticker {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Ticker {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Ticker(s))
    }
}

// ─── Dashboard catalogue ─────────────────────────────────────────────────────

/// Company name → ticker for the instruments the dashboard tracks.
pub const DASHBOARD_STOCKS: [(&str, &str); 8] = [
    ("Nvidia Corporation", "NVDA"),
    ("PayPal Holdings, Inc.", "PYPL"),
    ("Microsoft Corporation", "MSFT"),
    ("Alphabet Inc. Class A", "GOOGL"),
    ("Broadcom Inc.", "AVGO"),
    ("Tesla, Inc.", "TSLA"),
    ("Advanced Micro Devices, Inc.", "AMD"),
    ("CSX Corporation", "CSX"),
];

/// Tickers shown on the correlation heatmap, in display order.
pub fn dashboard_tickers() -> Vec<Ticker> {
    DASHBOARD_STOCKS
        .iter()
        .map(|(_, symbol)| Ticker::from(*symbol))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_and_accepts_class_suffix() {
        assert_eq!(Ticker::parse("  BRK.B ").unwrap().as_str(), "BRK.B");
    }

    #[test]
    fn test_parse_rejects_empty_and_separators() {
        assert_eq!(Ticker::parse("   "), Err(TickerError::Empty));
        assert!(matches!(
            Ticker::parse("NVDA/60"),
            Err(TickerError::InvalidCharacter(_))
        ));
        assert!(Ticker::parse("NV DA").is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&Ticker::from("MSFT")).unwrap();
        assert_eq!(json, "\"MSFT\"");
        let back: Ticker = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Ticker::from("MSFT"));
    }

    #[test]
    fn test_dashboard_tickers_order() {
        let tickers = dashboard_tickers();
        assert_eq!(tickers.len(), 8);
        assert_eq!(tickers[0].as_str(), "NVDA");
        assert_eq!(tickers[7].as_str(), "CSX");
    }
}
