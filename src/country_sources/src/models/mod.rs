//! Wire models decoded from the upstream APIs.

pub mod country;
pub mod rates;

pub use country::{RawCountry, RawCurrency};
pub use rates::RateTable;
