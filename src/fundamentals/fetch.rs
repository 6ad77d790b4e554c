use std::collections::BTreeMap;

use futures::{StreamExt, TryStreamExt, stream};
use serde_json::{Map, Value};

use super::model::{Frequency, ReportDates, Statement, financials_filter};
use super::sections::{AssetType, FINANCIALS, GENERAL, OUTSTANDING_SHARES};
use super::window::DateWindow;
use super::wire::share_entries;
use crate::core::{EodError, ExtraParams, FundamentalsQuery, FundamentalsService};

/// Ticker and token shared by every fetch of one assembly.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Target<'a> {
    pub(crate) ticker: &'a str,
    pub(crate) token: Option<&'a str>,
}

impl Target<'_> {
    fn query(&self, filter: impl Into<String>) -> FundamentalsQuery {
        FundamentalsQuery::new(self.ticker, filter).token(self.token.map(str::to_string))
    }
}

/* ---------- Type detection ---------- */

/// Fetches `General` and reads its `Type`.
pub(crate) async fn fetch_general<S>(
    service: &S,
    target: Target<'_>,
) -> Result<(Value, AssetType), EodError>
where
    S: FundamentalsService + ?Sized,
{
    let general = service
        .fetch_fundamentals(&target.query(GENERAL))
        .await
        .map_err(|e| EodError::Classification(format!("failed to get General: {e}")))?;

    let raw_type = general
        .as_object()
        .ok_or_else(|| {
            EodError::Classification("unexpected 'General' response: not an object".into())
        })?
        .get("Type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            EodError::Classification("unable to determine asset Type from General section".into())
        })?;

    let asset_type = AssetType::from_type_str(raw_type);
    Ok((general, asset_type))
}

/* ---------- Bulk sections ---------- */

/// Fetches several top-level sections in one call with a comma-joined filter.
///
/// A non-object answer (the provider unwraps single-section requests) is wrapped
/// under the first requested name.
pub(crate) async fn fetch_sections_bulk<S>(
    service: &S,
    target: Target<'_>,
    sections: &[String],
    extra: &ExtraParams,
) -> Result<Map<String, Value>, EodError>
where
    S: FundamentalsService + ?Sized,
{
    let Some(first) = sections.first() else {
        return Ok(Map::new());
    };

    let query = target.query(sections.join(",")).extra(extra.clone());
    let data = service
        .fetch_fundamentals(&query)
        .await
        .map_err(|e| EodError::SectionFetch {
            sections: sections.to_vec(),
            source: Box::new(e),
        })?;

    Ok(match data {
        Value::Object(map) => map,
        other => {
            let mut wrapped = Map::new();
            wrapped.insert(first.clone(), other);
            wrapped
        }
    })
}

/* ---------- Report-date discovery ---------- */

/// Result of scanning `outstandingShares`.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Discovery {
    pub(crate) dates: ReportDates,
    /// The raw block, when the provider returned a non-empty object.
    pub(crate) outstanding_shares: Option<Value>,
}

/// Reads the in-window report dates from `outstandingShares`.
pub(crate) fn discover_dates(block: &Value, window: &DateWindow) -> ReportDates {
    let mut dates = ReportDates::default();
    let Some(obj) = block.as_object() else {
        return dates;
    };
    for freq in Frequency::ALL {
        let Some(sub) = obj.get(freq.shares_key()) else {
            continue;
        };
        // Malformed rows are skipped; a date repeated within one frequency is fetched once.
        for entry in share_entries(sub).into_iter().flatten() {
            if window.contains_date(entry.parsed)
                && !dates.for_frequency(freq).contains(&entry.date)
            {
                dates.push(freq, entry.date);
            }
        }
    }
    dates
}

/// Fetches `outstandingShares` alone and discovers the in-window report dates.
pub(crate) async fn fetch_report_dates<S>(
    service: &S,
    target: Target<'_>,
    window: &DateWindow,
) -> Result<Discovery, EodError>
where
    S: FundamentalsService + ?Sized,
{
    let block = service
        .fetch_fundamentals(&target.query(OUTSTANDING_SHARES))
        .await
        .map_err(|e| EodError::FinancialsFetch {
            filter: OUTSTANDING_SHARES.to_string(),
            source: Box::new(e),
        })?;

    let dates = discover_dates(&block, window);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        quarterly = dates.quarterly.len(),
        yearly = dates.yearly.len(),
        %window,
        "discovered report dates"
    );

    Ok(Discovery {
        dates,
        outstanding_shares: block
            .as_object()
            .is_some_and(|o| !o.is_empty())
            .then_some(block),
    })
}

/* ---------- Financials ---------- */

#[derive(Debug, Clone)]
struct LeafJob {
    statement: Statement,
    frequency: Frequency,
    date: Option<String>,
}

impl LeafJob {
    fn filter(&self) -> String {
        financials_filter(self.statement, self.frequency, self.date.as_deref())
    }
}

/// Runs the jobs with at most `concurrency` in flight. Results come back in job
/// order; the first failure aborts the rest.
async fn run_jobs<S>(
    service: &S,
    target: Target<'_>,
    jobs: Vec<LeafJob>,
    concurrency: usize,
) -> Result<Vec<(LeafJob, Value)>, EodError>
where
    S: FundamentalsService + ?Sized,
{
    stream::iter(jobs)
        .map(move |job| async move {
            let query = target.query(job.filter());
            let result = service.fetch_fundamentals(&query).await;
            match result {
                Ok(value) => Ok((job, value)),
                Err(e) => Err(EodError::FinancialsFetch {
                    filter: query.filter,
                    source: Box::new(e),
                }),
            }
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await
}

fn financials_fragment(tree: BTreeMap<Statement, Map<String, Value>>) -> Map<String, Value> {
    let financials: Map<String, Value> = tree
        .into_iter()
        .map(|(stmt, block)| (stmt.as_str().to_string(), Value::Object(block)))
        .collect();
    let mut fragment = Map::new();
    fragment.insert(FINANCIALS.to_string(), Value::Object(financials));
    fragment
}

/// Windowed mode: one fetch per statement, cadence and discovered date.
///
/// Every statement gets both cadence maps, empty when no date was discovered.
pub(crate) async fn fetch_financials_for_dates<S>(
    service: &S,
    target: Target<'_>,
    dates: &ReportDates,
    concurrency: usize,
) -> Result<Map<String, Value>, EodError>
where
    S: FundamentalsService + ?Sized,
{
    let mut tree: BTreeMap<Statement, Map<String, Value>> = Statement::ALL
        .into_iter()
        .map(|stmt| {
            let mut block = Map::new();
            for freq in Frequency::ALL {
                block.insert(freq.financials_key().to_string(), Value::Object(Map::new()));
            }
            (stmt, block)
        })
        .collect();

    let jobs: Vec<LeafJob> = Frequency::ALL
        .into_iter()
        .flat_map(move |frequency| {
            dates.for_frequency(frequency).iter().flat_map(move |date| {
                Statement::ALL.into_iter().map(move |statement| LeafJob {
                    statement,
                    frequency,
                    date: Some(date.clone()),
                })
            })
        })
        .collect();

    #[cfg(feature = "tracing")]
    tracing::debug!(leaves = jobs.len(), concurrency, "fetching Financials leaves");

    for (job, leaf) in run_jobs(service, target, jobs, concurrency).await? {
        let Some(date) = job.date else { continue };
        if let Some(Value::Object(by_date)) = tree
            .get_mut(&job.statement)
            .and_then(|block| block.get_mut(job.frequency.financials_key()))
        {
            by_date.insert(date, leaf);
        }
    }

    Ok(financials_fragment(tree))
}

/// Unbounded mode: one fetch per statement and cadence, each returning the full date map.
pub(crate) async fn fetch_financials_full<S>(
    service: &S,
    target: Target<'_>,
    concurrency: usize,
) -> Result<Map<String, Value>, EodError>
where
    S: FundamentalsService + ?Sized,
{
    let jobs: Vec<LeafJob> = Statement::ALL
        .into_iter()
        .flat_map(|statement| {
            Frequency::ALL.into_iter().map(move |frequency| LeafJob {
                statement,
                frequency,
                date: None,
            })
        })
        .collect();

    let mut tree: BTreeMap<Statement, Map<String, Value>> = BTreeMap::new();
    for (job, block) in run_jobs(service, target, jobs, concurrency).await? {
        tree.entry(job.statement)
            .or_default()
            .insert(job.frequency.financials_key().to_string(), block);
    }

    Ok(financials_fragment(tree))
}
