//! open.er-api.com latest-rates client (USD base).

pub mod provider;

pub use provider::{BASE_URL_ENV, DEFAULT_BASE_URL, ExchangeRateProvider};
