use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::sections::{AssetType, FINANCIALS, GENERAL};

/// One of the three financial statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Statement {
    /// `Balance_Sheet`.
    BalanceSheet,
    /// `Cash_Flow`.
    CashFlow,
    /// `Income_Statement`.
    IncomeStatement,
}

impl Statement {
    /// All statements, in provider order.
    pub const ALL: [Self; 3] = [Self::BalanceSheet, Self::CashFlow, Self::IncomeStatement];

    /// Key under `Financials`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BalanceSheet => "Balance_Sheet",
            Self::CashFlow => "Cash_Flow",
            Self::IncomeStatement => "Income_Statement",
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reporting cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Frequency {
    /// Quarterly reports.
    Quarterly,
    /// Annual reports.
    Yearly,
}

impl Frequency {
    /// Both cadences, quarterly first.
    pub const ALL: [Self; 2] = [Self::Quarterly, Self::Yearly];

    /// Key inside a `Financials::<statement>` block.
    #[must_use]
    pub const fn financials_key(self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Key inside the `outstandingShares` block, which says `annual` instead of `yearly`.
    #[must_use]
    pub const fn shares_key(self) -> &'static str {
        match self {
            Self::Quarterly => "quarterly",
            Self::Yearly => "annual",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.financials_key())
    }
}

/// Builds a `::`-separated filter path, e.g. `Financials::Balance_Sheet::quarterly::2023-06-30`.
#[must_use]
pub fn filter_path(parts: &[&str]) -> String {
    parts.join("::")
}

/// Filter path addressing a statement map, optionally narrowed to one report date.
#[must_use]
pub fn financials_filter(statement: Statement, frequency: Frequency, date: Option<&str>) -> String {
    let mut parts = vec![FINANCIALS, statement.as_str(), frequency.financials_key()];
    if let Some(d) = date {
        parts.push(d);
    }
    filter_path(&parts)
}

/// In-range report dates found by discovery, in provider ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportDates {
    /// Quarterly period-end dates.
    pub quarterly: Vec<String>,
    /// Annual period-end dates.
    pub yearly: Vec<String>,
}

impl ReportDates {
    /// Dates for one cadence.
    #[must_use]
    pub fn for_frequency(&self, frequency: Frequency) -> &[String] {
        match frequency {
            Frequency::Quarterly => &self.quarterly,
            Frequency::Yearly => &self.yearly,
        }
    }

    pub(crate) fn push(&mut self, frequency: Frequency, date: String) {
        match frequency {
            Frequency::Quarterly => self.quarterly.push(date),
            Frequency::Yearly => self.yearly.push(date),
        }
    }

    /// Total number of dates across both cadences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.quarterly.len() + self.yearly.len()
    }

    /// `true` when no date was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The assembled fundamentals document: section name → section value.
///
/// Merging is shallow. A section is replaced wholesale, never deep-merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FundamentalsDocument {
    sections: Map<String, Value>,
}

impl FundamentalsDocument {
    /// Starts a document seeded with the `General` block.
    pub(crate) fn seeded(general: Value) -> Self {
        let mut sections = Map::new();
        sections.insert(GENERAL.to_string(), general);
        Self { sections }
    }

    /// Writes every top-level key of `fragment` into the document. Later writes win.
    pub(crate) fn merge(&mut self, fragment: Map<String, Value>) {
        for (k, v) in fragment {
            self.sections.insert(k, v);
        }
    }

    /// Sets one section, replacing any previous value.
    pub(crate) fn insert(&mut self, section: impl Into<String>, value: Value) {
        self.sections.insert(section.into(), value);
    }

    pub(crate) fn get_mut(&mut self, section: &str) -> Option<&mut Value> {
        self.sections.get_mut(section)
    }

    /// Returns a section by name.
    #[must_use]
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.sections.get(section)
    }

    /// The `General` block.
    #[must_use]
    pub fn general(&self) -> Option<&Value> {
        self.get(GENERAL)
    }

    /// Asset type as read from `General.Type`.
    #[must_use]
    pub fn asset_type(&self) -> Option<AssetType> {
        self.general()
            .and_then(|g| g.get("Type"))
            .and_then(Value::as_str)
            .filter(|t| !t.trim().is_empty())
            .map(AssetType::from_type_str)
    }

    /// The `Financials` block, if assembled.
    #[must_use]
    pub fn financials(&self) -> Option<&Value> {
        self.get(FINANCIALS)
    }

    /// Names of the sections present.
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Number of sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// `true` when the document has no sections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Consumes the document, returning the raw map.
    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.sections
    }

    /// Pretty JSON rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.sections)
    }
}

impl From<FundamentalsDocument> for Value {
    fn from(doc: FundamentalsDocument) -> Self {
        Self::Object(doc.sections)
    }
}
