use std::fmt;

use chrono::NaiveDate;

use crate::core::EodError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a `YYYY-MM-DD` report date.
pub(crate) fn parse_report_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// An optional, inclusive `[start, end]` date bound.
///
/// Either side may be open. A window with neither bound is *unbounded* and
/// accepts every well-formed date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateWindow {
    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Creates a window, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`EodError::InvalidParams`] when both bounds are set and `start` is after `end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, EodError> {
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(EodError::InvalidParams(format!(
                "'to' ({e}) must be >= 'from' ({s})"
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses optional `YYYY-MM-DD` strings into a window. Blank strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`EodError::InvalidParams`] for malformed dates or `start > end`.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> Result<Self, EodError> {
        Self::new(parse_bound("from", from)?, parse_bound("to", to)?)
    }

    /// Lower bound, if any.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Upper bound, if any.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// `true` when at least one bound is set.
    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Inclusive containment check for a parsed date.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|s| date >= s) && self.end.is_none_or(|e| date <= e)
    }

    /// Inclusive containment check for a formatted `YYYY-MM-DD` string.
    ///
    /// Strings that do not parse as a date are never contained, even in an unbounded window.
    #[must_use]
    pub fn contains(&self, date: &str) -> bool {
        parse_report_date(date).is_some_and(|d| self.contains_date(d))
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, EodError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    parse_report_date(raw).map(Some).ok_or_else(|| {
        EodError::InvalidParams(format!("'{name}' must be a YYYY-MM-DD date, got '{raw}'"))
    })
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |d: Option<NaiveDate>| d.map_or_else(|| "..".to_string(), |d| d.to_string());
        write!(f, "[{}, {}]", side(self.start), side(self.end))
    }
}
