use async_trait::async_trait;
use reqwest::{Client, Url};
use snafu::ResultExt;

use crate::{
    models::RawCountry,
    providers::{
        ApiSnafu, ClientBuildSnafu, CountryProvider, ProviderError, ProviderInitError,
        RequestSnafu, endpoint,
    },
};

/// Public REST Countries host.
pub const DEFAULT_BASE_URL: &str = "https://restcountries.com";
/// Environment variable that overrides [`DEFAULT_BASE_URL`].
pub const BASE_URL_ENV: &str = "COUNTRIES_API_URL";

const ALL_PATH: &str = "v2/all";
const FIELDS: &str = "name,capital,region,population,flag,currencies";

pub struct RestCountriesProvider {
    client: Client,
    endpoint: Url,
}

impl RestCountriesProvider {
    /// Creates a provider against an explicit base URL (fixture servers, mirrors).
    pub fn with_base_url(base_url: &str) -> Result<Self, ProviderInitError> {
        let client = Client::builder().build().context(ClientBuildSnafu)?;
        Ok(Self {
            client,
            endpoint: endpoint(base_url, ALL_PATH)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl CountryProvider for RestCountriesProvider {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ProviderError> {
        let url = self.endpoint.as_str();

        let response = self
            .client
            .get(self.endpoint.clone())
            .query(&[("fields", FIELDS)])
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

        let countries = response
            .json::<Vec<RawCountry>>()
            .await
            .context(RequestSnafu { url })?;

        tracing::debug!(count = countries.len(), %url, "fetched country metadata");
        Ok(countries)
    }
}
