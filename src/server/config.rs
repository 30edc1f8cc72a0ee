use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::client::StockClient;
use crate::domain::correlation::FallbackPolicy;
use crate::domain::price_history::DEFAULT_TTL;
use crate::error::Error;
use crate::http::RetryPolicy;
use crate::network::{DEFAULT_BIND, DEFAULT_PORT, DEFAULT_UPSTREAM_URL};

/// Server configuration derived from environment variables.
///
/// `ACCESS_TOKEN` matches the variable the dashboard's `.env` files already use.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,

    // ── Upstream evaluation service ────────────────────────────────
    pub upstream_base_url: String,
    /// Bearer token for the upstream service. `None` ⇒ no auth header.
    pub access_token: Option<String>,
    pub upstream_timeout: Duration,
    /// `0` keeps the single-attempt behavior.
    pub upstream_max_retries: u32,

    // ── Statistics ─────────────────────────────────────────────────
    pub cache_ttl: Duration,
    pub fallback_policy: FallbackPolicy,
}

fn env_str(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_parse<T: std::str::FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match env_str(lookup, name) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("{name}={raw:?} is not valid, using default");
            default
        }),
        None => default,
    }
}

impl ServerConfig {
    /// Read the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, Error> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(Error::Config(format!("failed to load .env: {e}")));
            }
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;

        let fallback_policy = match env_str(lookup, "CORRELATION_FALLBACK") {
            Some(raw) => raw.parse().map_err(Error::Config)?,
            None => FallbackPolicy::default(),
        };

        Ok(Self {
            bind: env_str(lookup, "BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port: env_parse(lookup, "PORT", DEFAULT_PORT),
            upstream_base_url: env_str(lookup, "UPSTREAM_BASE_URL")
                .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string()),
            access_token: env_str(lookup, "ACCESS_TOKEN"),
            upstream_timeout: Duration::from_secs(env_parse(lookup, "UPSTREAM_TIMEOUT_SECS", 30)),
            upstream_max_retries: env_parse(lookup, "UPSTREAM_MAX_RETRIES", 0),
            cache_ttl: Duration::from_millis(env_parse(
                lookup,
                "CACHE_TTL_MS",
                DEFAULT_TTL.as_millis() as u64,
            )),
            fallback_policy,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid bind address {}:{}: {e}", self.bind, self.port)))
    }

    /// Build the shared client this configuration describes.
    pub fn build_client(&self) -> Result<StockClient, Error> {
        StockClient::builder()
            .base_url(&self.upstream_base_url)
            .access_token(self.access_token.clone())
            .timeout(self.upstream_timeout)
            .retry(RetryPolicy::with_max_retries(self.upstream_max_retries))
            .cache_ttl(self.cache_ttl)
            .fallback_policy(self.fallback_policy)
            .build()
    }
}
