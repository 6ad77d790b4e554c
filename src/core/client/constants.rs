//! Centralized constants for default endpoints, UA and auth fallbacks.

/// Identifies this client to the provider.
pub(crate) const USER_AGENT: &str = concat!("eodhd-rs/", env!("CARGO_PKG_VERSION"));

/// EODHD API base (endpoint paths are joined onto it).
pub(crate) const DEFAULT_BASE_URL: &str = "https://eodhd.com/api/";

/// Environment variable holding the process-default API token.
pub(crate) const API_KEY_ENV: &str = "EODHD_API_KEY";

/// Token used when nothing else is configured. Only works for a handful of demo tickers.
pub(crate) const DEMO_TOKEN: &str = "demo";

/// Default per-call timeout.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;
