//! Integration tests for the upstream HTTP client.
//!
//! Each test binds an in-process axum app on `127.0.0.1:0` standing in for the
//! evaluation service.

#![cfg(feature = "http")]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;

use ticker_stats::domain::price_history::PriceSource;
use ticker_stats::error::UpstreamError;
use ticker_stats::http::{EvaluationHttp, RetryConfig, RetryPolicy};
use ticker_stats::shared::Ticker;

const TOKEN: &str = "test-token";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct Upstream {
    calls: AtomicUsize,
    /// Respond 503 to this many requests before succeeding.
    failures_before_success: usize,
}

#[derive(Deserialize)]
struct MinutesQuery {
    minutes: Option<u32>,
}

async fn stock_prices(
    State(upstream): State<Arc<Upstream>>,
    Path(ticker): Path<String>,
    Query(q): Query<MinutesQuery>,
    headers: HeaderMap,
) -> axum::response::Response {
    let call = upstream.calls.fetch_add(1, Ordering::SeqCst);

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {TOKEN}"))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "invalid authorization token").into_response();
    }
    if call < upstream.failures_before_success {
        return (StatusCode::SERVICE_UNAVAILABLE, "try later").into_response();
    }

    match (ticker.as_str(), q.minutes) {
        ("NVDA", Some(50)) => Json(json!([
            { "price": 231.95, "lastUpdatedAt": "2025-05-08T04:11:42.465706306Z" },
            { "price": 124.95, "lastUpdatedAt": "2025-05-08T04:14:39.465201105Z" },
        ]))
        .into_response(),
        ("BAD", _) => (StatusCode::OK, "{not json").into_response(),
        ("BADTIME", _) => Json(json!([{ "price": 1.0, "lastUpdatedAt": "noon" }])).into_response(),
        _ => (StatusCode::BAD_REQUEST, "unexpected request").into_response(),
    }
}

async fn spawn_upstream(upstream: Arc<Upstream>) -> String {
    let app = Router::new()
        .route("/evaluation-service/stocks/{ticker}", get(stock_prices))
        .with_state(upstream);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/evaluation-service")
}

fn fast_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy::Custom(RetryConfig {
        max_retries,
        initial_delay: Duration::from_millis(1),
        jitter: false,
        ..RetryConfig::default()
    })
}

#[tokio::test]
async fn fetch_sends_bearer_token_and_decodes_history() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let http = EvaluationHttp::new(&base, TIMEOUT).unwrap().with_access_token(TOKEN);

    let history = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].price, 231.95);
    assert_eq!(history[1].price, 124.95);
    assert!(history[0].last_updated_at < history[1].last_updated_at);
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_token_surfaces_status_and_body() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream).await;
    let http = EvaluationHttp::new(&base, TIMEOUT).unwrap();

    let err = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap_err();
    match err {
        UpstreamError::Status { ticker, status, body } => {
            assert_eq!(ticker.as_str(), "NVDA");
            assert_eq!(status, 401);
            assert!(body.contains("invalid authorization token"));
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn default_policy_is_single_attempt() {
    let upstream = Arc::new(Upstream {
        failures_before_success: 1,
        ..Default::default()
    });
    let base = spawn_upstream(upstream.clone()).await;
    let http = EvaluationHttp::new(&base, TIMEOUT).unwrap().with_access_token(TOKEN);

    let err = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 503, .. }));
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn retry_policy_recovers_from_transient_503() {
    let upstream = Arc::new(Upstream {
        failures_before_success: 2,
        ..Default::default()
    });
    let base = spawn_upstream(upstream.clone()).await;
    let http = EvaluationHttp::new(&base, TIMEOUT)
        .unwrap()
        .with_access_token(TOKEN)
        .with_retry(fast_retries(2));

    let history = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retries_exhausted_reports_attempts() {
    let upstream = Arc::new(Upstream {
        failures_before_success: 10,
        ..Default::default()
    });
    let base = spawn_upstream(upstream.clone()).await;
    let http = EvaluationHttp::new(&base, TIMEOUT)
        .unwrap()
        .with_access_token(TOKEN)
        .with_retry(fast_retries(1));

    let err = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap_err();
    match err {
        UpstreamError::MaxRetriesExceeded { attempts, last_error, .. } => {
            assert_eq!(attempts, 2);
            assert!(last_error.contains("503"));
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream.clone()).await;
    let http = EvaluationHttp::new(&base, TIMEOUT)
        .unwrap()
        .with_retry(fast_retries(3));

    let err = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Status { status: 401, .. }));
    assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_payloads_are_decode_errors() {
    let upstream = Arc::new(Upstream::default());
    let base = spawn_upstream(upstream).await;
    let http = EvaluationHttp::new(&base, TIMEOUT).unwrap().with_access_token(TOKEN);

    let err = http.fetch(&Ticker::from("BAD"), 5).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Decode { .. }));

    let err = http.fetch(&Ticker::from("BADTIME"), 5).await.unwrap_err();
    match err {
        UpstreamError::Decode { ticker, message } => {
            assert_eq!(ticker.as_str(), "BADTIME");
            assert!(message.contains("noon"));
        }
        other => panic!("expected Decode, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_upstream_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let http = EvaluationHttp::new(&format!("http://{addr}"), TIMEOUT).unwrap();
    let err = http.fetch(&Ticker::from("NVDA"), 50).await.unwrap_err();
    assert!(matches!(err, UpstreamError::Transport { .. }));
    assert_eq!(err.ticker().as_str(), "NVDA");
}
