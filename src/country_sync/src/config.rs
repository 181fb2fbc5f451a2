//! Runtime configuration, read once at startup from the environment (and a
//! `.env` file when the binary loads one).

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use country_sources::providers::{er_api, rest_countries};
use shared_utils::{
    config::ConfigError,
    env::{get_env_var_or, parse_env_var_or},
};

use crate::db::connection::sqlite_path;

pub const DEFAULT_DATABASE_URL: &str = "countries.db";
pub const DEFAULT_CACHE_DIR: &str = "cache";
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// SQLite location (`sqlite://` prefix accepted).
    pub database_url: String,
    /// Directory holding `summary.png`.
    pub cache_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub countries_api_url: String,
    pub rates_api_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = get_env_var_or("DATABASE_URL", DEFAULT_DATABASE_URL);
        sqlite_path(&database_url).map_err(|e| ConfigError::Invalid {
            name: "DATABASE_URL".into(),
            value: database_url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            database_url,
            cache_dir: PathBuf::from(get_env_var_or("CACHE_DIR", DEFAULT_CACHE_DIR)),
            bind_addr: parse_env_var_or("BIND_ADDR", DEFAULT_BIND_ADDR)?,
            countries_api_url: get_env_var_or(
                rest_countries::BASE_URL_ENV,
                rest_countries::DEFAULT_BASE_URL,
            ),
            rates_api_url: get_env_var_or(er_api::BASE_URL_ENV, er_api::DEFAULT_BASE_URL),
        })
    }
}
