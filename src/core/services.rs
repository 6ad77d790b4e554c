use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use url::Url;

use crate::core::{EodClient, EodError, net};

/// Auxiliary query parameters forwarded verbatim to the provider (e.g. `historical`, `from`, `to`).
pub type ExtraParams = BTreeMap<String, serde_json::Value>;

/// Boxed future returned by [`FundamentalsService`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<serde_json::Value, EodError>> + Send + 'a>>;

/// One filtered read of a security's fundamentals document.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsQuery {
    /// Ticker in `SYMBOL.EXCHANGE` form.
    pub ticker: String,
    /// Filter expression: comma-joined section names, or a `::` path into one section.
    pub filter: String,
    /// Explicit per-call token. When `None`, the service resolves its own.
    pub token: Option<String>,
    /// Extra query parameters.
    pub extra: ExtraParams,
}

impl FundamentalsQuery {
    /// Creates a query for `filter` with no token and no extra parameters.
    pub fn new(ticker: impl Into<String>, filter: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            filter: filter.into(),
            token: None,
            extra: ExtraParams::new(),
        }
    }

    /// Sets the explicit per-call token.
    #[must_use]
    pub fn token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Sets the extra parameters.
    #[must_use]
    pub fn extra(mut self, extra: ExtraParams) -> Self {
        self.extra = extra;
        self
    }
}

/// A trait for services that can fetch filtered fundamentals.
///
/// This is the only dependency of the assembly engine on the outside world. It is
/// implemented by [`EodClient`]; tests and alternate transports can provide their own.
pub trait FundamentalsService: Send + Sync {
    /// Fetches the part of the fundamentals document selected by `query.filter`.
    ///
    /// # Returns
    /// The parsed JSON value, or an error when the transport fails or the provider
    /// answers with an error envelope.
    fn fetch_fundamentals<'a>(&'a self, query: &'a FundamentalsQuery) -> FetchFuture<'a>;
}

impl<T: FundamentalsService + ?Sized> FundamentalsService for &T {
    fn fetch_fundamentals<'a>(&'a self, query: &'a FundamentalsQuery) -> FetchFuture<'a> {
        (**self).fetch_fundamentals(query)
    }
}

impl<T: FundamentalsService + ?Sized> FundamentalsService for Arc<T> {
    fn fetch_fundamentals<'a>(&'a self, query: &'a FundamentalsQuery) -> FetchFuture<'a> {
        (**self).fetch_fundamentals(query)
    }
}

/// Renders a parameter value the way the provider expects it. `null` means "omit".
pub(crate) fn render_param(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Bool(b) => Some(if *b { "1" } else { "0" }.to_string()),
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Name a recorded response is stored under. Comma-joined section lists share one name.
fn fixture_endpoint(filter: &str) -> String {
    if filter.contains(',') {
        "fundamentals_bulk".to_string()
    } else {
        format!("fundamentals_{filter}")
    }
}

impl EodClient {
    /// Builds `{base}/fundamentals/{ticker}?fmt=json&filter=...&<extra>&api_token=...`.
    pub(crate) fn fundamentals_url(&self, query: &FundamentalsQuery) -> Result<Url, EodError> {
        let mut url = self
            .base_url()
            .join(&format!("fundamentals/{}", query.ticker))?;
        {
            let mut qp = url.query_pairs_mut();
            qp.append_pair("fmt", "json");
            if !query.filter.is_empty() {
                qp.append_pair("filter", &query.filter);
            }
            for (k, v) in &query.extra {
                if let Some(rendered) = render_param(v) {
                    qp.append_pair(k, &rendered);
                }
            }
        }
        self.ensure_token(&mut url, query.token.as_deref());
        Ok(url)
    }

    async fn fetch_fundamentals_inner(
        &self,
        query: &FundamentalsQuery,
    ) -> Result<serde_json::Value, EodError> {
        let url = self.fundamentals_url(query)?;

        #[cfg(feature = "tracing")]
        tracing::trace!(ticker = %query.ticker, filter = %query.filter, "GET fundamentals");

        let resp = self.http().get(url).send().await?;
        let text = net::get_text(resp, &fixture_endpoint(&query.filter), &query.ticker).await?;
        net::parse_json(&text)
    }
}

impl FundamentalsService for EodClient {
    fn fetch_fundamentals<'a>(&'a self, query: &'a FundamentalsQuery) -> FetchFuture<'a> {
        Box::pin(self.fetch_fundamentals_inner(query))
    }
}
