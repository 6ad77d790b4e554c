//! Post-merge pruning of date-indexed blocks to the requested window.

use serde_json::{Map, Value};

use super::model::{FundamentalsDocument, Frequency, Statement};
use super::sections::{EARNINGS, FINANCIALS, OUTSTANDING_SHARES};
use super::window::DateWindow;
use super::wire::parse_share_entry;

/// Earnings sub-maps keyed by report date.
const EARNINGS_MAPS: [&str; 3] = ["History", "Trend", "Annual"];

/// Number of entries removed by each rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    /// Rows dropped from `outstandingShares`.
    pub outstanding_shares: usize,
    /// Keys dropped from `Earnings` maps.
    pub earnings: usize,
    /// Report dates dropped from `Financials`.
    pub financials: usize,
}

impl PruneStats {
    /// Total removals.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.outstanding_shares + self.earnings + self.financials
    }
}

/// Removes every date-indexed entry outside `window`, in place.
///
/// An unbounded window leaves the document untouched. Sections that are absent
/// or not objects are skipped.
pub fn prune_to_window(doc: &mut FundamentalsDocument, window: &DateWindow) -> PruneStats {
    let mut stats = PruneStats::default();
    if !window.is_bounded() {
        return stats;
    }

    if let Some(Value::Object(shares)) = doc.get_mut(OUTSTANDING_SHARES) {
        for freq in Frequency::ALL {
            let in_window = |ordinal: &str, node: &Value| {
                parse_share_entry(ordinal, node).is_ok_and(|e| window.contains_date(e.parsed))
            };
            match shares.get_mut(freq.shares_key()) {
                Some(Value::Object(rows)) => {
                    stats.outstanding_shares += retain(rows, in_window);
                }
                Some(Value::Array(rows)) => {
                    let before = rows.len();
                    let mut index = 0usize;
                    rows.retain(|node| {
                        let keep = in_window(&index.to_string(), node);
                        index += 1;
                        keep
                    });
                    stats.outstanding_shares += before - rows.len();
                }
                _ => {}
            }
        }
    }

    if let Some(Value::Object(earnings)) = doc.get_mut(EARNINGS) {
        for key in EARNINGS_MAPS {
            if let Some(Value::Object(by_date)) = earnings.get_mut(key) {
                stats.earnings += retain(by_date, |date, _| window.contains(date));
            }
        }
    }

    if let Some(Value::Object(financials)) = doc.get_mut(FINANCIALS) {
        for statement in Statement::ALL {
            let Some(Value::Object(block)) = financials.get_mut(statement.as_str()) else {
                continue;
            };
            for freq in Frequency::ALL {
                if let Some(Value::Object(by_date)) = block.get_mut(freq.financials_key()) {
                    stats.financials += retain(by_date, |date, _| window.contains(date));
                }
            }
        }
    }

    stats
}

/// Keeps the entries for which `keep` holds; returns how many were removed.
fn retain(map: &mut Map<String, Value>, keep: impl Fn(&str, &Value) -> bool) -> usize {
    let doomed: Vec<String> = map
        .iter()
        .filter(|(k, v)| !keep(k, v))
        .map(|(k, _)| k.clone())
        .collect();
    for k in &doomed {
        map.remove(k);
    }
    doomed.len()
}
