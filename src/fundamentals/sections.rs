//! Asset classification and section selection.

use std::fmt;

/// Top-level section that is always fetched first, on its own.
pub const GENERAL: &str = "General";
/// Top-level section that is assembled by the dedicated Financials path.
pub const FINANCIALS: &str = "Financials";
/// Top-level section used for report-date discovery.
pub const OUTSTANDING_SHARES: &str = "outstandingShares";
/// Top-level section holding earnings history, trend and annual maps.
pub const EARNINGS: &str = "Earnings";

/// Security classification as reported in `General.Type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AssetType {
    /// `Common Stock`.
    CommonStock,
    /// `ETF`.
    Etf,
    /// `FUND` (mutual funds).
    Fund,
    /// `INDEX`.
    Index,
    /// `Crypto`.
    Crypto,
    /// Anything else, kept verbatim (e.g. `Preferred Stock`, `Currency`).
    Other(String),
}

impl AssetType {
    /// Classifies a raw `General.Type` value. Matching is case-insensitive.
    #[must_use]
    pub fn from_type_str(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.to_ascii_lowercase().as_str() {
            "common stock" => Self::CommonStock,
            "etf" => Self::Etf,
            "fund" => Self::Fund,
            "index" => Self::Index,
            "crypto" => Self::Crypto,
            _ => Self::Other(raw.to_string()),
        }
    }

    /// Canonical display form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::CommonStock => "Common Stock",
            Self::Etf => "ETF",
            Self::Fund => "FUND",
            Self::Index => "INDEX",
            Self::Crypto => "Crypto",
            Self::Other(s) => s,
        }
    }

    /// Only common stock carries Financials and gets date-window pruning.
    #[must_use]
    pub const fn is_common_stock(&self) -> bool {
        matches!(self, Self::CommonStock)
    }

    /// The default section list for this asset type, `General` included.
    ///
    /// `Financials` is never part of a default; common stock gets it through the
    /// dedicated Financials path.
    #[must_use]
    pub fn default_sections(&self) -> &'static [&'static str] {
        match self {
            Self::CommonStock => &[
                GENERAL,
                "Highlights",
                "Valuation",
                "SharesStats",
                "Technicals",
                "SplitsDividends",
                "AnalystRatings",
                "Holders",
                "InsiderTransactions",
                OUTSTANDING_SHARES,
                EARNINGS,
            ],
            Self::Etf => &[GENERAL, "Technicals", "ETF_Data"],
            Self::Fund => &[GENERAL, "MutualFund_Data"],
            // Components/historical data are controlled through extra params.
            Self::Index => &[GENERAL],
            Self::Crypto => &[GENERAL, "Tech", "Resources", "Statistics"],
            Self::Other(_) => &[GENERAL],
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chooses the ordered section list for an asset.
///
/// A non-empty `explicit` list replaces the default entirely. Names are trimmed,
/// blanks and duplicates dropped (first occurrence kept) and `General` stripped,
/// since it is fetched separately.
#[must_use]
pub fn select_sections(asset_type: &AssetType, explicit: Option<&[String]>) -> Vec<String> {
    let chosen: Vec<&str> = match explicit {
        Some(list) if list.iter().any(|s| !s.trim().is_empty()) => {
            list.iter().map(|s| s.trim()).collect()
        }
        _ => asset_type.default_sections().to_vec(),
    };

    let mut out: Vec<String> = Vec::with_capacity(chosen.len());
    for name in chosen {
        if name.is_empty() || name == GENERAL || out.iter().any(|s| s == name) {
            continue;
        }
        out.push(name.to_string());
    }
    out
}

/// Sections that go into the combined bulk fetch: everything except `Financials`.
#[must_use]
pub fn bulk_sections(selected: &[String]) -> Vec<String> {
    selected
        .iter()
        .filter(|s| !s.eq_ignore_ascii_case(FINANCIALS))
        .cloned()
        .collect()
}
