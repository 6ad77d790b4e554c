//! eodhd-rs: windowed fundamentals assembly for the EODHD API.
//!
//! The provider serves fundamentals as one large nested document per security.
//! [`FundamentalsBuilder`] fetches the parts a caller needs, classifies the asset,
//! and for common stock restricts every date-indexed block to a report-date window.
//!
//! ```no_run
//! # use eodhd_rs::{EodClient, FundamentalsBuilder};
//! # #[tokio::main]
//! # async fn main() -> Result<(), eodhd_rs::EodError> {
//! let client = EodClient::builder().api_token("my-token").build()?;
//! let doc = FundamentalsBuilder::new(&client, "AAPL.US")
//!     .from_date_str("2023-01-01")
//!     .to_date_str("2023-12-31")
//!     .concurrency(8)
//!     .fetch()
//!     .await?;
//! assert!(doc.general().is_some());
//! # Ok(())
//! # }
//! ```

/// Client, errors and the fetch seam.
pub mod core;
/// Fundamentals assembly, section selection and window pruning.
pub mod fundamentals;

pub use crate::core::client::auth::{token_from_headers, token_from_query, token_override};
pub use crate::core::{
    EodClient, EodClientBuilder, EodError, ErrorKind, ExtraParams, FetchFuture, FundamentalsQuery,
    FundamentalsService,
};
pub use fundamentals::{
    AssetType, DEFAULT_CONCURRENCY, DateWindow, Frequency, FundamentalsBuilder,
    FundamentalsDocument, FundamentalsRequest, PruneStats, ReportDates, Statement,
    assemble_fundamentals,
};
