//! Country statistics service: refreshes country metadata and exchange rates
//! into SQLite, derives an estimated GDP, renders a summary image and serves
//! the result over HTTP.

pub mod api;
pub mod config;
pub mod db;
pub mod estimator;
pub mod models;
pub mod providers;
pub mod refresh;
pub mod report;
pub mod schema;
pub mod store;
pub mod tz;
