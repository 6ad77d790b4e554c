#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{fs, path::Path};

use eodhd_rs::{EodClient, EodError, FetchFuture, FundamentalsQuery, FundamentalsService};
use httpmock::MockServer;
use serde_json::{Value, json};
use url::Url;

/// Bulk filter sent for common stock with the default section list.
pub const STOCK_BULK_FILTER: &str = "Highlights,Valuation,SharesStats,Technicals,SplitsDividends,AnalystRatings,Holders,InsiderTransactions,outstandingShares,Earnings";

pub fn fixture(endpoint: &str, symbol: &str) -> String {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let path = dir.join(format!("{endpoint}_{symbol}.json"));
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {}", path.display(), e))
}

pub fn fixture_json(endpoint: &str, symbol: &str) -> Value {
    serde_json::from_str(&fixture(endpoint, symbol)).unwrap()
}

pub fn is_recording() -> bool {
    std::env::var("EODHD_RECORD").ok().as_deref() == Some("1")
}

pub fn live_or_record_enabled() -> bool {
    is_recording() || std::env::var("EODHD_LIVE").ok().as_deref() == Some("1")
}

/// Client pointed at the mock server, with a fixed process-default token.
pub fn client_for(server: &MockServer) -> EodClient {
    EodClient::builder()
        .base_url(Url::parse(&format!("{}/api/", server.base_url())).unwrap())
        .api_token("process-token")
        .build()
        .unwrap()
}

type Fallback = Box<dyn Fn(&FundamentalsQuery) -> Option<Value> + Send + Sync>;

/// In-memory [`FundamentalsService`] answering by exact filter.
///
/// Records every query and tracks the peak number of fetches in flight.
#[derive(Default)]
pub struct StubService {
    responses: HashMap<String, Value>,
    failures: HashMap<String, String>,
    fallback: Option<Fallback>,
    calls: Mutex<Vec<FundamentalsQuery>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common-stock stub backed by the AAPL fixtures. Every Financials filter echoes itself.
    pub fn apple() -> Self {
        Self::new()
            .respond("General", fixture_json("fundamentals_General", "AAPL.US"))
            .respond(STOCK_BULK_FILTER, fixture_json("fundamentals_bulk", "AAPL.US"))
            .respond(
                "outstandingShares",
                fixture_json("fundamentals_outstandingShares", "AAPL.US"),
            )
            .echo_financials()
    }

    pub fn respond(mut self, filter: &str, value: Value) -> Self {
        self.responses.insert(filter.to_string(), value);
        self
    }

    pub fn fail(mut self, filter: &str, message: &str) -> Self {
        self.failures.insert(filter.to_string(), message.to_string());
        self
    }

    /// Answers `Financials::...` filters the stub has no explicit response for.
    ///
    /// Leaf filters (with a date) get `{"filter": ...}`; full statement filters get a
    /// two-date map spanning 2022 and 2023.
    pub fn echo_financials(mut self) -> Self {
        self.fallback = Some(Box::new(|q: &FundamentalsQuery| {
            let parts: Vec<&str> = q.filter.split("::").collect();
            match parts.as_slice() {
                ["Financials", _, _, _] => Some(json!({ "filter": q.filter })),
                ["Financials", _, _] => Some(json!({
                    "2022-12-31": { "filter": q.filter },
                    "2023-06-30": { "filter": q.filter },
                })),
                _ => None,
            }
        }));
        self
    }

    pub fn calls(&self) -> Vec<FundamentalsQuery> {
        self.calls.lock().unwrap().clone()
    }

    pub fn filters(&self) -> Vec<String> {
        self.calls().into_iter().map(|q| q.filter).collect()
    }

    pub fn leaf_filters(&self) -> Vec<String> {
        self.filters()
            .into_iter()
            .filter(|f| f.starts_with("Financials::"))
            .collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn answer(&self, query: &FundamentalsQuery) -> Result<Value, EodError> {
        if let Some(msg) = self.failures.get(&query.filter) {
            return Err(EodError::Api(msg.clone()));
        }
        if let Some(v) = self.responses.get(&query.filter) {
            return Ok(v.clone());
        }
        self.fallback
            .as_ref()
            .and_then(|f| f(query))
            .ok_or_else(|| EodError::Api(format!("no stub for filter '{}'", query.filter)))
    }
}

impl FundamentalsService for StubService {
    fn fetch_fundamentals<'a>(&'a self, query: &'a FundamentalsQuery) -> FetchFuture<'a> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(query.clone());

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            // Give sibling fetches a chance to start.
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            self.answer(query)
        })
    }
}
