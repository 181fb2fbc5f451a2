//! Join validated records with the rate table.

use country_sources::models::RateTable;
use rand::Rng;

use crate::{estimator::estimate, models::NewCountry, refresh::validate::ValidCountry};

/// Build the storable record for one validated country.
pub fn build_record<R: Rng + ?Sized>(
    valid: &ValidCountry<'_>,
    rates: &RateTable,
    rng: &mut R,
) -> NewCountry {
    let currency_code = valid.raw.primary_currency_code();
    let gdp = estimate(valid.population, currency_code, rates, rng);

    NewCountry {
        name: valid.name.to_string(),
        capital: valid.raw.capital.clone(),
        region: valid.raw.region.clone(),
        population: valid.population,
        currency_code: currency_code.map(str::to_string),
        exchange_rate: gdp.exchange_rate,
        estimated_gdp: gdp.estimated_gdp,
        flag_url: valid.raw.flag.clone(),
    }
}

pub fn build_records<R: Rng + ?Sized>(
    valid: &[ValidCountry<'_>],
    rates: &RateTable,
    rng: &mut R,
) -> Vec<NewCountry> {
    valid.iter().map(|v| build_record(v, rates, rng)).collect()
}
