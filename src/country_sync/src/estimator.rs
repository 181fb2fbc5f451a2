//! Estimated GDP.
//!
//! `estimated_gdp = population * multiplier / rate`, where `multiplier` is drawn
//! uniformly from `1000..=2000` for every country on every refresh. The value is
//! a synthetic illustration and is **not** reproducible across refreshes, even
//! when the upstream data is unchanged. Tests that need exact numbers pass a
//! seeded RNG.

use std::ops::RangeInclusive;

use country_sources::models::RateTable;
use rand::Rng;

/// Inclusive bounds of the per-country multiplier.
pub const MULTIPLIER_RANGE: RangeInclusive<u32> = 1000..=2000;

/// Output of [`estimate`]: both fields are set, or neither is.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GdpEstimate {
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
}

/// Look up a usable rate for `currency_code`.
///
/// Rates that are zero, negative or not finite are treated like a missing code.
pub fn resolve_rate(currency_code: Option<&str>, rates: &RateTable) -> Option<f64> {
    let code = currency_code?.trim();
    if code.is_empty() {
        return None;
    }
    rates
        .get(code)
        .copied()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
}

/// Join one country against the rate table.
///
/// Draws from `rng` only when the rate resolves, so unresolved countries do not
/// shift the multiplier sequence of the ones that follow.
pub fn estimate<R: Rng + ?Sized>(
    population: i64,
    currency_code: Option<&str>,
    rates: &RateTable,
    rng: &mut R,
) -> GdpEstimate {
    let Some(rate) = resolve_rate(currency_code, rates) else {
        return GdpEstimate::default();
    };

    let multiplier = rng.random_range(MULTIPLIER_RANGE);
    GdpEstimate {
        exchange_rate: Some(rate),
        estimated_gdp: Some(population as f64 * f64::from(multiplier) / rate),
    }
}
