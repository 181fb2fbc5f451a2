//! Country store: a handle over the SQLite `countries` table.
//!
//! [`CountryStore`] is built once at startup from the database URL and cloned
//! into whoever needs it. It holds no connection: every operation opens its
//! own (with the PRAGMAs from [`crate::db::connection`]) and drops it on return,
//! error paths included. Calls are blocking; async callers run them on the
//! blocking pool.
//!
//! The statements themselves live in [`repo`] and take a connection, which is
//! what the integration tests drive directly.

mod error;
pub mod filter;
pub mod repo;

use std::sync::Arc;

use diesel::SqliteConnection;

pub use error::{StoreError, StoreResult};
pub use filter::{CountryFilter, GdpSort};

use crate::{
    db::{connection::connect_sqlite, migrate},
    models::{Country, NewCountry, StoreStatus},
};

#[derive(Debug, Clone)]
pub struct CountryStore {
    database_url: Arc<str>,
}

impl CountryStore {
    /// Handle for an already-migrated database.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into().into(),
        }
    }

    /// Apply pending migrations, then return a handle.
    pub fn open(database_url: impl Into<String>) -> StoreResult<Self> {
        let store = Self::new(database_url);
        migrate::run_all(&store.database_url)?;
        Ok(store)
    }

    fn connect(&self) -> StoreResult<SqliteConnection> {
        connect_sqlite(&self.database_url)
    }

    /// Upsert the batch atomically; every row gets `last_refreshed_at`.
    pub fn upsert_all(&self, batch: &[NewCountry], last_refreshed_at: &str) -> StoreResult<usize> {
        let mut conn = self.connect()?;
        repo::upsert_all(&mut conn, batch, last_refreshed_at)
    }

    pub fn query(&self, filter: &CountryFilter) -> StoreResult<Vec<Country>> {
        let mut conn = self.connect()?;
        repo::query(&mut conn, filter)
    }

    pub fn get_by_name(&self, name: &str) -> StoreResult<Country> {
        let mut conn = self.connect()?;
        repo::get_by_name(&mut conn, name)
    }

    pub fn delete_by_name(&self, name: &str) -> StoreResult<()> {
        let mut conn = self.connect()?;
        repo::delete_by_name(&mut conn, name)?;
        tracing::info!(%name, "deleted country");
        Ok(())
    }

    pub fn count_and_last_refresh(&self) -> StoreResult<StoreStatus> {
        let mut conn = self.connect()?;
        repo::count_and_last_refresh(&mut conn)
    }

    /// Status and GDP ranking from a single connection and transaction.
    pub fn report_snapshot(&self, limit: i64) -> StoreResult<(StoreStatus, Vec<(String, f64)>)> {
        let mut conn = self.connect()?;
        repo::report_snapshot(&mut conn, limit)
    }
}
