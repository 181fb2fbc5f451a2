//! Provider abstraction for the two upstream datasets.
//!
//! [`CountryProvider`] yields raw country metadata and [`RateProvider`] yields
//! a currency -> USD rate table. Concrete REST clients live in
//! [`rest_countries`] and [`er_api`]; tests drive the refresh pipeline with
//! in-memory fakes instead.
//!
//! Each fetch is a single round-trip: no retry, no pagination, and no timeout
//! beyond the `reqwest` default. Any failure is reported as a
//! [`ProviderError`] and the caller decides what that means for the refresh.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use country_sources::models::RawCountry;
//! use country_sources::providers::{CountryProvider, ProviderError};
//!
//! struct Fixed(Vec<RawCountry>);
//!
//! #[async_trait]
//! impl CountryProvider for Fixed {
//!     async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ProviderError> {
//!         Ok(self.0.clone())
//!     }
//! }
//! ```

pub mod er_api;
pub mod rest_countries;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{RawCountry, RateTable};

/// Source of country metadata.
#[async_trait]
pub trait CountryProvider: Send + Sync {
    /// Fetches every country the source knows about.
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ProviderError>;
}

/// Source of exchange rates against USD.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the latest rate table keyed by currency code.
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError>;
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// failed to init reqwest client
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// Base URL override is not a valid absolute URL.
    #[snafu(display("Invalid base URL: {url}"))]
    InvalidBaseUrl { url: String, backtrace: Backtrace },
}

/// Errors that can occur within a provider implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// Transport failure, or a body that could not be decoded.
    #[snafu(display("Request to {url} failed: {source}"))]
    Request {
        url: String,
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The upstream answered, but with a non-success status or an error payload.
    #[snafu(display("API error from {url} (status {status}): {message}"))]
    Api {
        url: String,
        status: u16,
        message: String,
        backtrace: Backtrace,
    },
}

/// Joins a base URL (with or without trailing slash) and an API path.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<reqwest::Url, ProviderInitError> {
    use snafu::OptionExt;

    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    reqwest::Url::parse(&raw)
        .ok()
        .context(InvalidBaseUrlSnafu { url: base })
}
