//! Network defaults.

/// Default upstream evaluation service base URL.
pub const DEFAULT_UPSTREAM_URL: &str = "http://20.244.56.144/evaluation-service";

/// Default port the dashboard backend listens on.
pub const DEFAULT_PORT: u16 = 3001;

/// Default bind address.
pub const DEFAULT_BIND: &str = "0.0.0.0";
