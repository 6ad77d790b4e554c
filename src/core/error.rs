use std::fmt;

use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum EodError {
    /// An error occurred during an HTTP request.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
        /// The (possibly truncated) response body.
        body: String,
    },

    /// The data received from the API was in an unexpected format.
    #[error("Data format unexpected: {0}")]
    Data(String),

    /// The provider answered with an error envelope (`{"error": ...}`).
    #[error("EODHD API error: {0}")]
    Api(String),

    /// Caller-supplied parameters were rejected before any request was made.
    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    /// The `General` section could not be fetched or carried no usable `Type`.
    #[error("Failed to classify asset: {0}")]
    Classification(String),

    /// The combined fetch of non-Financials sections failed.
    #[error("Failed to fetch sections {sections:?}: {source}")]
    SectionFetch {
        /// The section list that was requested.
        sections: Vec<String>,
        /// The underlying failure.
        #[source]
        source: Box<EodError>,
    },

    /// A Financials statement fetch failed.
    #[error("Failed to fetch Financials ({filter}): {source}")]
    FinancialsFetch {
        /// The filter expression of the failed fetch.
        filter: String,
        /// The underlying failure.
        #[source]
        source: Box<EodError>,
    },
}

/// Coarse classification of an [`EodError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before any network call.
    Validation,
    /// Asset type detection failed.
    Classification,
    /// The bulk section fetch failed.
    SectionFetch,
    /// A Financials fetch failed.
    FinancialsFetch,
    /// A standalone transport or response failure.
    Transport,
}

impl ErrorKind {
    /// Stable string form, used in error envelopes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Classification => "classification",
            Self::SectionFetch => "section_fetch",
            Self::FinancialsFetch => "financials_fetch",
            Self::Transport => "transport",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EodError {
    /// Returns the failure category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParams(_) => ErrorKind::Validation,
            Self::Classification(_) => ErrorKind::Classification,
            Self::SectionFetch { .. } => ErrorKind::SectionFetch,
            Self::FinancialsFetch { .. } => ErrorKind::FinancialsFetch,
            Self::Http(_) | Self::Url(_) | Self::Status { .. } | Self::Data(_) | Self::Api(_) => {
                ErrorKind::Transport
            }
        }
    }

    /// Renders the error as a structured failure envelope.
    #[must_use]
    pub fn to_envelope(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "kind": self.kind().as_str(),
        })
    }
}
