//! Tolerant parsing of provider blocks.
//!
//! Nothing in here returns [`crate::EodError`]: a malformed node is reported as a
//! [`ShareEntryError`] and callers decide to skip it.

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;

use super::window::parse_report_date;

/* ---------------- Serde mapping (only what we need) ---------------- */

#[derive(Deserialize)]
struct ShareNode {
    #[serde(rename = "dateFormatted")]
    date_formatted: Option<String>,
}

/// One well-formed `outstandingShares` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareEntry {
    /// Provider ordinal (`"0"`, `"1"`, ...).
    pub ordinal: String,
    /// Period end as sent (`YYYY-MM-DD`, trimmed).
    pub date: String,
    /// `date`, parsed.
    pub parsed: NaiveDate,
}

/// Why an `outstandingShares` row was unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShareEntryError {
    /// The node is not an object, or `dateFormatted` is not a string.
    #[error("malformed node: {0}")]
    Malformed(String),
    /// `dateFormatted` is missing or blank.
    #[error("missing dateFormatted")]
    MissingDate,
    /// `dateFormatted` is not a `YYYY-MM-DD` date.
    #[error("unparsable dateFormatted '{0}'")]
    BadDate(String),
}

/// Parses one `outstandingShares` row.
///
/// # Errors
///
/// Returns a [`ShareEntryError`] when the node has no usable `dateFormatted`.
pub fn parse_share_entry(ordinal: &str, node: &Value) -> Result<ShareEntry, ShareEntryError> {
    let raw = ShareNode::deserialize(node)
        .map_err(|e| ShareEntryError::Malformed(e.to_string()))?
        .date_formatted
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or(ShareEntryError::MissingDate)?;

    let parsed = parse_report_date(&raw).ok_or_else(|| ShareEntryError::BadDate(raw.clone()))?;
    Ok(ShareEntry {
        ordinal: ordinal.to_string(),
        date: raw,
        parsed,
    })
}

/// Orders the children of a numeric-keyed block by the numeric value of their key.
///
/// The provider sends `{"0": {...}, "1": {...}, ...}` and does not guarantee key order.
/// Arrays are accepted too (index = ordinal). Non-numeric keys sort after numeric ones,
/// lexicographically. Anything that is neither an object nor an array yields nothing.
#[must_use]
pub fn ordered_children(block: &Value) -> Vec<(String, &Value)> {
    match block {
        Value::Object(map) => {
            let mut children: Vec<(String, &Value)> =
                map.iter().map(|(k, v)| (k.clone(), v)).collect();
            children.sort_by(|(a, _), (b, _)| {
                let na = a.trim().parse::<u64>().ok();
                let nb = b.trim().parse::<u64>().ok();
                match (na, nb) {
                    (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => a.cmp(b),
                }
            });
            children
        }
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        _ => Vec::new(),
    }
}

/// Parses every row of an `outstandingShares` sub-block in ordinal order,
/// keeping the per-row outcome.
#[must_use]
pub fn share_entries(block: &Value) -> Vec<Result<ShareEntry, ShareEntryError>> {
    ordered_children(block)
        .into_iter()
        .map(|(ordinal, node)| parse_share_entry(&ordinal, node))
        .collect()
}
