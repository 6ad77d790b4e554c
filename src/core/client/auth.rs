//! API token resolution.
//!
//! Precedence, highest first: an explicit per-call token, the token bound to the
//! client for the current inbound request (the "context" token), and finally the
//! process default configured on the builder or read from `EODHD_API_KEY`.

use reqwest::header::{AUTHORIZATION, HeaderMap};
use url::Url;

use super::constants::{API_KEY_ENV, DEMO_TOKEN};

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|t| !t.is_empty()).map(str::to_string)
}

/// Picks the per-call override: `api_token` wins, `api_key` is accepted as an alias.
///
/// Blank values count as absent.
#[must_use]
pub fn token_override(api_token: Option<&str>, api_key: Option<&str>) -> Option<String> {
    non_empty(api_token).or_else(|| non_empty(api_key))
}

/// Extracts a token from inbound request headers.
///
/// Checks `Authorization: Bearer <token>` first, then `X-API-Key`.
#[must_use]
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| {
            let (scheme, rest) = auth.split_once(' ')?;
            scheme.eq_ignore_ascii_case("bearer").then_some(rest)
        });
    if let Some(token) = non_empty(bearer) {
        return Some(token);
    }
    non_empty(headers.get("x-api-key").and_then(|v| v.to_str().ok()))
}

/// Extracts a token from the legacy query parameters `apikey`, `api_key` or `token`.
#[must_use]
pub fn token_from_query(url: &Url) -> Option<String> {
    ["apikey", "api_key", "token"].iter().find_map(|name| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .and_then(|(_, v)| non_empty(Some(v.as_ref())))
    })
}

/// Resolves the process-default token: explicit builder value, then env (after loading `.env`).
pub(super) fn default_token(configured: Option<String>) -> String {
    if let Some(token) = non_empty(configured.as_deref()) {
        return token;
    }
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    non_empty(std::env::var(API_KEY_ENV).ok().as_deref()).unwrap_or_else(|| DEMO_TOKEN.to_string())
}

pub(crate) fn has_token(url: &Url) -> bool {
    url.query_pairs().any(|(k, _)| k == "api_token")
}

impl super::EodClient {
    /// Resolves the token for one call, honoring the documented precedence.
    pub(crate) fn resolve_token(&self, explicit: Option<&str>) -> String {
        non_empty(explicit)
            .or_else(|| self.context_token.clone())
            .unwrap_or_else(|| self.default_token.clone())
    }

    /// Appends `api_token` unless the URL already carries one.
    pub(crate) fn ensure_token(&self, url: &mut Url, explicit: Option<&str>) {
        if has_token(url) {
            return;
        }
        let token = self.resolve_token(explicit);
        url.query_pairs_mut().append_pair("api_token", &token);
    }
}
