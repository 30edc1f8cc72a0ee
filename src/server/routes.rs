use axum::extract::rejection::PathRejection;
use axum::extract::{Path, RawQuery, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::ApiError;
use super::AppState;
use crate::domain::correlation::{CorrelationMatrix, TickerStats};
use crate::domain::price_history::StockAverage;
use crate::shared::{dashboard_tickers, Ticker, DASHBOARD_STOCKS};

const AVERAGE_USAGE: &str = r#"Requires "aggregation=average" and "minutes" params."#;
const CORRELATION_USAGE: &str = r#"Requires exactly two "ticker" params and one "minutes" param."#;

// ── Query params ─────────────────────────────────────────────────────────

/// `ticker` may repeat, so every endpoint reads the raw query string.
///
/// `minutes` and `aggregation` must appear at most once; a repeat reads as
/// absent and fails validation.
#[derive(Debug, Default)]
struct DashboardQuery {
    minutes: Option<String>,
    aggregation: Option<String>,
    tickers: Vec<String>,
    repeated_minutes: bool,
    repeated_aggregation: bool,
}

impl DashboardQuery {
    fn parse(raw: Option<&str>) -> Result<Self, ApiError> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw.unwrap_or(""))
            .map_err(|e| ApiError::BadRequest(format!("malformed query string: {e}")))?;

        let mut query = DashboardQuery::default();
        for (key, value) in pairs {
            match key.as_str() {
                "ticker" => query.tickers.push(value),
                "minutes" => {
                    query.repeated_minutes |= query.minutes.is_some();
                    query.minutes = Some(value);
                }
                "aggregation" => {
                    query.repeated_aggregation |= query.aggregation.is_some();
                    query.aggregation = Some(value);
                }
                _ => {}
            }
        }
        Ok(query)
    }

    /// Window length in whole minutes, at least one.
    fn minutes(&self) -> Option<u32> {
        if self.repeated_minutes {
            return None;
        }
        parse_minutes(self.minutes.as_deref())
    }

    fn aggregation(&self) -> Option<&str> {
        if self.repeated_aggregation {
            return None;
        }
        self.aggregation.as_deref()
    }
}

fn parse_minutes(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|m| m.trim().parse::<u32>().ok())
        .filter(|m| *m > 0)
}

fn parse_ticker(raw: &str) -> Result<Ticker, ApiError> {
    Ticker::parse(raw).map_err(|e| ApiError::BadRequest(format!("invalid ticker: {e}")))
}

// ── Responses ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CorrelationResponse {
    correlation: f64,
    stocks: BTreeMap<Ticker, TickerStats>,
    #[serde(
        rename = "selfCorrelationFallback",
        skip_serializing_if = "std::ops::Not::not"
    )]
    self_correlation_fallback: bool,
}

// ── Route definitions ────────────────────────────────────────────────────

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/stocks", get(list_stocks))
        .route("/stocks/{ticker}", get(stock_average))
        .route("/stockcorrelation", get(stock_correlation))
        .route("/stockcorrelation/matrix", get(correlation_matrix))
}

// ── Handlers ─────────────────────────────────────────────────────────────

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "cachedKeys": state.client.cached_keys().await,
    }))
}

/// GET /stocks: the tickers the dashboard tracks.
async fn list_stocks() -> Json<Value> {
    let stocks: BTreeMap<&str, &str> = DASHBOARD_STOCKS.iter().copied().collect();
    Json(json!({ "stocks": stocks }))
}

/// GET /stocks/{ticker}?minutes=n&aggregation=average
async fn stock_average(
    State(state): State<Arc<AppState>>,
    ticker: Result<Path<String>, PathRejection>,
    RawQuery(raw): RawQuery,
) -> Result<Json<StockAverage>, ApiError> {
    let Path(ticker) = ticker.map_err(|e| ApiError::BadRequest(format!("invalid ticker: {e}")))?;
    let query = DashboardQuery::parse(raw.as_deref())?;
    let (Some(minutes), Some("average")) = (query.minutes(), query.aggregation()) else {
        return Err(ApiError::BadRequest(AVERAGE_USAGE.to_string()));
    };
    let ticker = parse_ticker(&ticker)?;

    let average = state.client.prices().average(&ticker, minutes).await?;
    Ok(Json(average))
}

/// GET /stockcorrelation?minutes=n&ticker=A&ticker=B
async fn stock_correlation(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let query = DashboardQuery::parse(raw.as_deref())?;
    let (Some(minutes), [first, second]) = (query.minutes(), query.tickers.as_slice()) else {
        return Err(ApiError::BadRequest(CORRELATION_USAGE.to_string()));
    };
    let ticker1 = parse_ticker(first)?;
    let ticker2 = parse_ticker(second)?;

    let result = state
        .client
        .correlations()
        .pair(&ticker1, &ticker2, minutes)
        .await?;

    let mut stocks = BTreeMap::new();
    stocks.insert(ticker1, result.ticker1);
    stocks.insert(ticker2, result.ticker2);

    Ok(Json(CorrelationResponse {
        correlation: result.correlation,
        stocks,
        self_correlation_fallback: result.alignment.is_fallback(),
    }))
}

/// GET /stockcorrelation/matrix?minutes=n[&ticker=A&ticker=B...]
async fn correlation_matrix(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<CorrelationMatrix>, ApiError> {
    let query = DashboardQuery::parse(raw.as_deref())?;
    let Some(minutes) = query.minutes() else {
        return Err(ApiError::BadRequest(r#"Requires a "minutes" param."#.to_string()));
    };

    let tickers = if query.tickers.is_empty() {
        dashboard_tickers()
    } else {
        query
            .tickers
            .iter()
            .map(|t| parse_ticker(t))
            .collect::<Result<Vec<_>, _>>()?
    };

    let matrix = state.client.correlations().matrix(&tickers, minutes).await?;
    Ok(Json(matrix))
}
