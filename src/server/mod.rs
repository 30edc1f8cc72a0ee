//! axum server exposing the dashboard endpoints.
//!
//! Routing and validation only; all computation lives in [`StockClient`].

pub mod config;
pub mod error;
pub mod routes;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::client::StockClient;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared application state, passed to all route handlers via `axum::extract::State`.
pub struct AppState {
    pub client: StockClient,
}

impl AppState {
    pub fn new(client: StockClient) -> Arc<Self> {
        Arc::new(Self { client })
    }
}

/// Assemble the full router with CORS for the browser dashboard.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
