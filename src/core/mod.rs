//! Core components of the `eodhd-rs` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`EodClient`] and its builder.
//! - The primary [`EodError`] type.
//! - The [`FundamentalsService`] seam used by the assembly engine.
//! - Internal networking helpers.

/// The main client (`EodClient`), builder, and token resolution.
pub mod client;
/// The primary error type (`EodError`) for the crate.
pub mod error;
/// Service traits for abstracting the fundamentals transport.
pub mod services;

#[cfg(feature = "test-mode")]
pub(crate) mod fixtures;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::EodClient`
pub use client::{EodClient, EodClientBuilder};
pub use error::{EodError, ErrorKind};
pub use services::{ExtraParams, FetchFuture, FundamentalsQuery, FundamentalsService};
