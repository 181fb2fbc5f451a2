//! Diesel models mapping to the `countries` table.
//!
//! [`Country`] is a stored row (what the query API returns); [`NewCountry`] is a
//! fetched-and-derived record produced by the refresh pipeline before it has an
//! `id` or a batch timestamp. The store stamps every record of one batch with
//! the same `last_refreshed_at` when it upserts them.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::countries;

/// A row in [`crate::schema::countries`].
#[derive(Debug, Clone, PartialEq, Queryable, Selectable, Serialize, Deserialize)]
#[diesel(table_name = countries, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Country {
    /// Surrogate key assigned on first insert; never changes on later upserts.
    pub id: i32,
    /// Natural key (unique, non-empty).
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    /// First currency the country reports, if any.
    pub currency_code: Option<String>,
    /// Units of `currency_code` per USD; NULL when the code is missing from the rate table.
    pub exchange_rate: Option<f64>,
    /// Synthetic GDP estimate; NULL unless both currency and rate resolved.
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
    /// RFC3339 UTC timestamp shared by every row of the batch that last wrote this row.
    pub last_refreshed_at: String,
}

/// A validated, enriched record ready to be upserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCountry {
    pub name: String,
    pub capital: Option<String>,
    pub region: Option<String>,
    pub population: i64,
    pub currency_code: Option<String>,
    pub exchange_rate: Option<f64>,
    pub estimated_gdp: Option<f64>,
    pub flag_url: Option<String>,
}

/// Answer of `GET /status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub total_countries: i64,
    /// Latest batch timestamp, or `None` when the table is empty.
    pub last_refreshed_at: Option<String>,
}
