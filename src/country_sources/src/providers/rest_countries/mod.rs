//! REST Countries (v2) metadata client.

pub mod provider;

pub use provider::{BASE_URL_ENV, DEFAULT_BASE_URL, RestCountriesProvider};
