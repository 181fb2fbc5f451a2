use async_trait::async_trait;
use reqwest::{Client, Url};
use snafu::ResultExt;

use crate::{
    models::{RateTable, rates::LatestRatesResponse},
    providers::{
        ApiSnafu, ClientBuildSnafu, ProviderError, ProviderInitError, RateProvider, RequestSnafu,
        endpoint,
    },
};

/// Public open.er-api.com host.
pub const DEFAULT_BASE_URL: &str = "https://open.er-api.com";
/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "RATES_API_URL";

const LATEST_USD_PATH: &str = "v6/latest/USD";

pub struct ExchangeRateProvider {
    client: Client,
    endpoint: Url,
}

impl ExchangeRateProvider {
    pub fn with_base_url(base_url: &str) -> Result<Self, ProviderInitError> {
        let client = Client::builder().build().context(ClientBuildSnafu)?;
        Ok(Self {
            client,
            endpoint: endpoint(base_url, LATEST_USD_PATH)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl RateProvider for ExchangeRateProvider {
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError> {
        let url = self.endpoint.as_str();

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .context(RequestSnafu { url })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown API error".to_string());
            return ApiSnafu {
                url,
                status: status.as_u16(),
                message,
            }
            .fail();
        }

        let body = response
            .json::<LatestRatesResponse>()
            .await
            .context(RequestSnafu { url })?;

        if body.is_error() {
            return ApiSnafu {
                url,
                status: status.as_u16(),
                message: body
                    .error_type
                    .unwrap_or_else(|| "unspecified error".to_string()),
            }
            .fail();
        }

        let Some(rates) = body.rates else {
            return ApiSnafu {
                url,
                status: status.as_u16(),
                message: "response has no rates table",
            }
            .fail();
        };

        tracing::debug!(count = rates.len(), base = ?body.base_code, "fetched exchange rates");
        Ok(rates)
    }
}
