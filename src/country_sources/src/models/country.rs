use serde::{Deserialize, Deserializer, Serialize};

/// One currency entry as reported by the metadata source.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCurrency {
    /// ISO 4217 code (e.g., "NGN"). Some territories report entries without one.
    pub code: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

/// A country record exactly as the metadata source returned it.
///
/// Every field is optional at decode time; required-ness is checked by the
/// refresh pipeline so a single bad record can be reported by field name
/// instead of failing the whole payload decode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RawCountry {
    pub name: Option<String>,
    pub capital: Option<String>,
    pub region: Option<String>,
    /// Whole headcount. Fractional values are rounded at decode time; values
    /// outside `i64` decode as absent and are rejected by validation.
    #[serde(default, deserialize_with = "population")]
    pub population: Option<i64>,
    /// Flag image URL.
    pub flag: Option<String>,
    pub currencies: Option<Vec<RawCurrency>>,
}

fn population<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Int(i64),
        Float(f64),
    }

    Ok(match Option::<Number>::deserialize(deserializer)? {
        Some(Number::Int(n)) => Some(n),
        Some(Number::Float(f)) => {
            let f = f.round();
            (f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
        }
        None => None,
    })
}

impl RawCountry {
    /// Code of the first listed currency, if the country lists any.
    ///
    /// Blank codes count as absent.
    pub fn primary_currency_code(&self) -> Option<&str> {
        self.currencies
            .as_deref()?
            .first()?
            .code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}
