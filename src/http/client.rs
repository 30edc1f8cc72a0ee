//! Low-level HTTP client for the upstream evaluation service: `EvaluationHttp`.
//!
//! Returns wire types from [`EvaluationHttp::get_stock_prices`]; the
//! [`PriceSource`] impl converts them to domain histories.

use crate::domain::price_history::wire::PricePointResponse;
use crate::domain::price_history::{into_history, PriceHistory, PriceSource};
use crate::error::UpstreamError;
use crate::http::retry::{RetryConfig, RetryPolicy};
use crate::shared::Ticker;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for `GET {base}/stocks/{ticker}?minutes={n}`.
#[derive(Clone)]
pub struct EvaluationHttp {
    base_url: String,
    client: Client,
    /// Bearer token. NEVER logged.
    access_token: Option<String>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for EvaluationHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvaluationHttp")
            .field("base_url", &self.base_url)
            .field("has_access_token", &self.access_token.is_some())
            .field("retry", &self.retry)
            .finish()
    }
}

impl EvaluationHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            access_token: None,
            retry: RetryPolicy::None,
        })
    }

    /// Send `Authorization: Bearer {token}` on every request.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Stocks ───────────────────────────────────────────────────────────

    pub async fn get_stock_prices(
        &self,
        ticker: &Ticker,
        minutes: u32,
    ) -> Result<Vec<PricePointResponse>, UpstreamError> {
        let url = format!(
            "{}/stocks/{}?minutes={}",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
            minutes
        );
        self.get(ticker, &url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, ticker: &Ticker, url: &str) -> Result<T, UpstreamError> {
        let config = match &self.retry {
            RetryPolicy::None => return self.do_get(ticker, url).await,
            RetryPolicy::Custom(c) => c,
        };
        self.get_with_retry(ticker, url, config).await
    }

    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        ticker: &Ticker,
        url: &str,
        config: &RetryConfig,
    ) -> Result<T, UpstreamError> {
        let mut attempt = 0;
        loop {
            match self.do_get::<T>(ticker, url).await {
                Ok(resp) => return Ok(resp),
                Err(e) if !is_retryable(&e, config) => return Err(e),
                Err(e) if attempt >= config.max_retries => {
                    return Err(UpstreamError::MaxRetriesExceeded {
                        ticker: ticker.clone(),
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                }
                Err(e) => {
                    let delay = config.delay_for_attempt(attempt);
                    tracing::debug!(
                        ticker = %ticker,
                        attempt = attempt + 1,
                        max = config.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "retrying upstream request"
                    );
                    futures_timer::Delay::new(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn do_get<T: DeserializeOwned>(&self, ticker: &Ticker, url: &str) -> Result<T, UpstreamError> {
        let transport = |source: reqwest::Error| UpstreamError::Transport {
            ticker: ticker.clone(),
            source,
        };

        let mut req = self.client.get(url);
        if let Some(token) = &self.access_token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await.map_err(transport)?;
        let status = resp.status();
        let body = resp.text().await.map_err(transport)?;

        if !status.is_success() {
            return Err(UpstreamError::Status {
                ticker: ticker.clone(),
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::Decode {
            ticker: ticker.clone(),
            message: e.to_string(),
        })
    }
}

fn is_retryable(e: &UpstreamError, config: &RetryConfig) -> bool {
    match e {
        UpstreamError::Status { status, .. } => config.retryable_statuses.contains(status),
        UpstreamError::Transport { source, .. } => {
            source.is_connect() || source.is_timeout() || source.is_request()
        }
        _ => false,
    }
}

#[async_trait]
impl PriceSource for EvaluationHttp {
    async fn fetch(&self, ticker: &Ticker, minutes: u32) -> Result<PriceHistory, UpstreamError> {
        let points = self.get_stock_prices(ticker, minutes).await?;
        into_history(ticker, points)
    }
}
