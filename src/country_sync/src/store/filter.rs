//! Filter and sort options for [`crate::store::CountryStore::query`].

/// Ordering by `estimated_gdp`. Rows without an estimate always sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GdpSort {
    Asc,
    Desc,
}

impl GdpSort {
    /// Parses `gdp_asc` / `gdp_desc` case-insensitively. Anything else is `None`
    /// (unrecognized sort keys are ignored, not rejected).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "gdp_asc" => Some(Self::Asc),
            "gdp_desc" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Conjunctive filters for listing countries.
///
/// `region` and `currency` are matched case-insensitively with SQL `LIKE`
/// semantics, so plain values match exactly and `%` / `_` act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<GdpSort>,
}

impl CountryFilter {
    /// Builds a filter from raw request parameters. Blank values count as absent.
    pub fn from_params(region: Option<&str>, currency: Option<&str>, sort: Option<&str>) -> Self {
        fn present(v: Option<&str>) -> Option<String> {
            v.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
        }

        Self {
            region: present(region),
            currency: present(currency),
            sort: sort.and_then(GdpSort::parse),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.currency.is_none() && self.sort.is_none()
    }
}
