use indexmap::IndexMap;
use serde::Deserialize;

/// Currency code -> units of that currency per 1 USD.
pub type RateTable = IndexMap<String, f64>;

/// Payload of `GET /v6/latest/USD`.
///
/// On failure the API still answers 200 with `"result": "error"` and an
/// `error-type` string, so both shapes decode into this struct.
#[derive(Debug, Deserialize)]
pub struct LatestRatesResponse {
    pub result: Option<String>,
    pub base_code: Option<String>,
    #[serde(rename = "error-type")]
    pub error_type: Option<String>,
    pub rates: Option<RateTable>,
}

impl LatestRatesResponse {
    pub fn is_error(&self) -> bool {
        self.result.as_deref() == Some("error")
    }
}
