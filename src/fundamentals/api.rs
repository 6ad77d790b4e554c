use crate::core::{EodError, ExtraParams, FundamentalsService};

use super::fetch::{
    Target, fetch_financials_for_dates, fetch_financials_full, fetch_general, fetch_report_dates,
    fetch_sections_bulk,
};
use super::model::FundamentalsDocument;
use super::prune::prune_to_window;
use super::sections::{OUTSTANDING_SHARES, bulk_sections, select_sections};
use super::window::DateWindow;

/// Default number of Financials fetches kept in flight.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Everything one assembly needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalsRequest {
    /// Ticker in `SYMBOL.EXCHANGE` form (e.g. `AAPL.US`).
    pub ticker: String,
    /// Explicit per-call token.
    pub token: Option<String>,
    /// Report-date window; only applied to common stock.
    pub window: DateWindow,
    /// Section override. `None` (or an empty list) means the type-based default.
    pub sections: Option<Vec<String>>,
    /// Parameters forwarded verbatim to the bulk section fetch.
    pub extra_params: ExtraParams,
    /// Whether common stock gets its `Financials` block.
    pub include_financials: bool,
    /// Upper bound on concurrent Financials fetches.
    pub concurrency: usize,
}

impl FundamentalsRequest {
    /// A request with defaults: no window, type-based sections, Financials included.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            token: None,
            window: DateWindow::unbounded(),
            sections: None,
            extra_params: ExtraParams::new(),
            include_financials: true,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Checks the request without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`EodError::InvalidParams`] when the ticker lacks an exchange suffix.
    pub fn validate(&self) -> Result<(), EodError> {
        let ticker = self.ticker.trim();
        match ticker.rsplit_once('.') {
            Some((symbol, exchange)) if !symbol.is_empty() && !exchange.is_empty() => Ok(()),
            _ => Err(EodError::InvalidParams(format!(
                "ticker must be in 'SYMBOL.EXCHANGE' format (e.g., 'AAPL.US'), got '{ticker}'"
            ))),
        }
    }
}

/// Assembles the fundamentals document for one security.
///
/// Steps, in order:
/// 1. fetch `General` and classify the asset;
/// 2. choose sections and fetch all non-Financials ones in a single call;
/// 3. for common stock with Financials requested: when the window is bounded, discover
///    in-window report dates from `outstandingShares` and fetch one leaf per statement,
///    cadence and date; otherwise fetch the full statement maps;
/// 4. for common stock with a bounded window, prune every date-indexed block.
///
/// Any fetch failure aborts the whole assembly; no partial document is returned.
///
/// # Errors
///
/// See [`crate::ErrorKind`] for the failure categories.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(skip(service, request), err, fields(ticker = %request.ticker, window = %request.window))
)]
pub async fn assemble_fundamentals<S>(
    service: &S,
    request: &FundamentalsRequest,
) -> Result<FundamentalsDocument, EodError>
where
    S: FundamentalsService + ?Sized,
{
    request.validate()?;

    let target = Target {
        ticker: request.ticker.trim(),
        token: request.token.as_deref(),
    };
    let window = &request.window;

    let (general, asset_type) = fetch_general(service, target).await?;

    let selected = select_sections(&asset_type, request.sections.as_deref());
    let bulk = bulk_sections(&selected);

    #[cfg(feature = "tracing")]
    tracing::debug!(%asset_type, sections = ?bulk, "classified asset");

    let mut doc = FundamentalsDocument::seeded(general);
    doc.merge(fetch_sections_bulk(service, target, &bulk, &request.extra_params).await?);

    if asset_type.is_common_stock() && request.include_financials {
        let fragment = if window.is_bounded() {
            let discovery = fetch_report_dates(service, target, window).await?;
            if let Some(block) = discovery.outstanding_shares {
                // Pruning needs this block even when the bulk fetch skipped it.
                doc.insert(OUTSTANDING_SHARES, block);
            }
            fetch_financials_for_dates(service, target, &discovery.dates, request.concurrency)
                .await?
        } else {
            fetch_financials_full(service, target, request.concurrency).await?
        };
        doc.merge(fragment);
    }

    if asset_type.is_common_stock() && window.is_bounded() {
        let _stats = prune_to_window(&mut doc, window);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            outstanding_shares = _stats.outstanding_shares,
            earnings = _stats.earnings,
            financials = _stats.financials,
            "pruned to window"
        );
    }

    Ok(doc)
}
