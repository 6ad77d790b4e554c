//! Fundamentals assembly and date windowing.
//!
//! The provider exposes fundamentals as one large nested document. This module fetches
//! only what is needed: the `General` block for classification, the type-appropriate
//! sections in one combined call and, for common stock, the Financials statements.
//! With a date window those statements are fetched per discovered report date, and
//! every date-indexed block is pruned to the window afterwards.

mod api;
mod fetch;
mod model;
mod prune;
mod sections;
mod window;
mod wire;

pub use api::{DEFAULT_CONCURRENCY, FundamentalsRequest, assemble_fundamentals};
pub use model::{
    Frequency, FundamentalsDocument, ReportDates, Statement, filter_path, financials_filter,
};
pub use prune::{PruneStats, prune_to_window};
pub use sections::{
    AssetType, EARNINGS, FINANCIALS, GENERAL, OUTSTANDING_SHARES, bulk_sections, select_sections,
};
pub use window::DateWindow;
pub use wire::{ShareEntry, ShareEntryError, ordered_children, parse_share_entry, share_entries};

use chrono::NaiveDate;

use crate::core::{EodClient, EodError, FundamentalsService, client::auth::token_override};

/// A builder for assembling the fundamentals document of one security.
///
/// Generic over the fetch service so the same flow can run against [`EodClient`]
/// or any other [`FundamentalsService`].
///
/// # Example
///
/// ```no_run
/// # use eodhd_rs::{EodClient, FundamentalsBuilder};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = EodClient::default();
/// let doc = FundamentalsBuilder::new(&client, "AAPL.US")
///     .from_date_str("2023-01-01")
///     .to_date_str("2023-12-31")
///     .fetch()
///     .await?;
/// println!("{}", doc.to_json_pretty()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FundamentalsBuilder<S = EodClient> {
    service: S,
    request: FundamentalsRequest,
    api_key: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    raw_from: Option<String>,
    raw_to: Option<String>,
}

impl FundamentalsBuilder<EodClient> {
    /// Creates a new `FundamentalsBuilder` for a given ticker (e.g. `AAPL.US`).
    pub fn new(client: &EodClient, ticker: impl Into<String>) -> Self {
        Self::with_service(client.clone(), ticker)
    }
}

impl<S: FundamentalsService> FundamentalsBuilder<S> {
    /// Creates a builder on top of an arbitrary fetch service.
    pub fn with_service(service: S, ticker: impl Into<String>) -> Self {
        Self {
            service,
            request: FundamentalsRequest::new(ticker),
            api_key: None,
            from: None,
            to: None,
            raw_from: None,
            raw_to: None,
        }
    }

    /// Per-call API token. Takes precedence over the client's tokens.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.request.token = Some(token.into());
        self
    }

    /// Alias for [`Self::token`]; used only when no `token` is set.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Inclusive lower bound on report dates.
    #[must_use]
    pub const fn from(mut self, start: NaiveDate) -> Self {
        self.from = Some(start);
        self
    }

    /// Inclusive upper bound on report dates.
    #[must_use]
    pub const fn to(mut self, end: NaiveDate) -> Self {
        self.to = Some(end);
        self
    }

    /// Both bounds at once.
    #[must_use]
    pub const fn between(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.from(start).to(end)
    }

    /// Replaces both bounds with those of `window`.
    #[must_use]
    pub fn window(mut self, window: DateWindow) -> Self {
        self.from = window.start();
        self.to = window.end();
        self.raw_from = None;
        self.raw_to = None;
        self
    }

    /// Lower bound as a `YYYY-MM-DD` string; validated when the request runs.
    #[must_use]
    pub fn from_date_str(mut self, start: impl Into<String>) -> Self {
        self.raw_from = Some(start.into());
        self
    }

    /// Upper bound as a `YYYY-MM-DD` string; validated when the request runs.
    #[must_use]
    pub fn to_date_str(mut self, end: impl Into<String>) -> Self {
        self.raw_to = Some(end.into());
        self
    }

    /// Overrides the type-based default section list.
    #[must_use]
    pub fn sections<I, T>(mut self, sections: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.request.sections = Some(sections.into_iter().map(Into::into).collect());
        self
    }

    /// Adds one parameter forwarded to the bulk section fetch (e.g. `historical`).
    #[must_use]
    pub fn extra_param(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.request.extra_params.insert(key.into(), value.into());
        self
    }

    /// Adds several forwarded parameters.
    #[must_use]
    pub fn extra_params(mut self, params: crate::core::ExtraParams) -> Self {
        self.request.extra_params.extend(params);
        self
    }

    /// Whether common stock gets its `Financials` block. (Default: `true`)
    #[must_use]
    pub const fn include_financials(mut self, yes: bool) -> Self {
        self.request.include_financials = yes;
        self
    }

    /// Maximum number of concurrent Financials fetches. (Default: 4, minimum 1)
    #[must_use]
    pub fn concurrency(mut self, n: usize) -> Self {
        self.request.concurrency = n.max(1);
        self
    }

    /// Resolves the builder into a validated [`FundamentalsRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`EodError::InvalidParams`] for malformed dates, `from > to`, or a ticker
    /// without an exchange suffix.
    pub fn build_request(&self) -> Result<FundamentalsRequest, EodError> {
        let parsed = DateWindow::parse(self.raw_from.as_deref(), self.raw_to.as_deref())?;
        let window = DateWindow::new(
            parsed.start().or(self.from),
            parsed.end().or(self.to),
        )?;

        let mut request = self.request.clone();
        request.window = window;
        request.token = token_override(request.token.as_deref(), self.api_key.as_deref());
        request.validate()?;
        Ok(request)
    }

    /// Runs the assembly.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails or any fetch fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(ticker = %self.request.ticker)))]
    pub async fn fetch(self) -> Result<FundamentalsDocument, EodError> {
        let request = self.build_request()?;
        assemble_fundamentals(&self.service, &request).await
    }
}
