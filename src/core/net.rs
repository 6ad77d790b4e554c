use reqwest::{Method, header::CONTENT_TYPE};
use url::Url;

use crate::core::{EodClient, EodError};

#[cfg(feature = "test-mode")]
use std::env;

/// Bodies quoted in errors are cut to this many characters.
const MAX_ERROR_BODY: usize = 2000;

fn truncate_body(text: &str) -> String {
    match text.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

/// Read the response body as text, turning a non-2xx status into [`EodError::Status`].
/// In `test-mode`, if `EODHD_RECORD=1`, the body is saved as a fixture via `core::fixtures`.
pub(crate) async fn get_text(
    resp: reqwest::Response,
    _endpoint: &str,
    _symbol: &str,
) -> Result<String, EodError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let text = resp.text().await?;

    if !status.is_success() {
        return Err(EodError::Status {
            status: status.as_u16(),
            url: redact_token(&url),
            body: truncate_body(&text),
        });
    }

    #[cfg(feature = "test-mode")]
    {
        if env::var("EODHD_RECORD").ok().as_deref() == Some("1")
            && let Err(e) = crate::core::fixtures::record_fixture(_endpoint, _symbol, &text)
        {
            eprintln!("EODHD_RECORD: failed to write fixture for {_symbol}: {e}");
        }
    }

    Ok(text)
}

/// Parses a response body, mapping the provider's `{"error": ...}` envelope to [`EodError::Api`].
pub(crate) fn parse_json(text: &str) -> Result<serde_json::Value, EodError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(|e| {
        EodError::Data(format!(
            "response is not valid JSON ({e}): {}",
            truncate_body(text)
        ))
    })?;

    if let Some(err) = value.as_object().and_then(|o| o.get("error")) {
        let msg = err
            .as_str()
            .map_or_else(|| err.to_string(), str::to_string);
        return Err(EodError::Api(msg));
    }

    Ok(value)
}

/// Strips the `api_token` value from a URL before it ends up in an error message.
pub(crate) fn redact_token(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "api_token" { "***".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    if pairs.is_empty() {
        return url.to_string();
    }
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

impl EodClient {
    /// Generic JSON request against any EODHD endpoint.
    ///
    /// Injects `api_token` when the URL lacks one, sends `body` as JSON when present
    /// and returns the parsed payload. Only GET, POST, PUT and DELETE are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported methods, transport failures, non-2xx statuses,
    /// non-JSON bodies and provider error envelopes.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, url, body), err, fields(path = %url.path())))]
    pub async fn request_json(
        &self,
        method: Method,
        mut url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, EodError> {
        if ![Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&method) {
            return Err(EodError::InvalidParams(format!(
                "Unsupported HTTP method: {method}"
            )));
        }

        self.ensure_token(&mut url, None);

        let mut req = self.http().request(method, url.clone());
        if let Some(b) = body {
            req = req.header(CONTENT_TYPE, "application/json").json(b);
        }

        let resp = req.send().await?;
        let endpoint = url.path().trim_matches('/').replace('/', "_");
        let text = get_text(resp, &endpoint, "request").await?;
        parse_json(&text)
    }
}
