//! Provider registry: maps configured base URLs to concrete source clients.
use std::sync::Arc;

use country_sources::providers::{
    CountryProvider, ProviderInitError, RateProvider, er_api::ExchangeRateProvider,
    rest_countries::RestCountriesProvider,
};

use crate::config::AppConfig;

/// Both upstream clients, ready to hand to the refresh pipeline.
pub struct Providers {
    pub countries: Arc<dyn CountryProvider>,
    pub rates: Arc<dyn RateProvider>,
}

/// Build the REST clients for the base URLs in `config`.
pub fn build_providers(config: &AppConfig) -> Result<Providers, ProviderInitError> {
    let countries = RestCountriesProvider::with_base_url(&config.countries_api_url)?;
    let rates = ExchangeRateProvider::with_base_url(&config.rates_api_url)?;
    Ok(Providers {
        countries: Arc::new(countries),
        rates: Arc::new(rates),
    })
}
