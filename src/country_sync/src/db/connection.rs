//! SQLite connection helpers.
//!
//! Provides [`connect_sqlite`] that opens a connection and applies recommended PRAGMAs:
//! a 5000ms busy_timeout, WAL journaling, and foreign_keys=ON.

use diesel::{Connection, RunQueryDsl, SqliteConnection, sql_query};

use crate::store::StoreError;

/// Resolve a `DATABASE_URL` into the path SQLite expects.
///
/// Accepts `sqlite://path`, `sqlite:path` and bare paths (including `:memory:`).
pub fn sqlite_path(database_url: &str) -> Result<&str, StoreError> {
    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        return Err(StoreError::UnsupportedUrl(database_url.to_string()));
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    if path.is_empty() {
        return Err(StoreError::UnsupportedUrl(database_url.to_string()));
    }
    Ok(path)
}

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn = SqliteConnection::establish(sqlite_path(database_url)?)?;

    // busy_timeout first so switching to WAL waits on a concurrent writer instead of failing
    sql_query("PRAGMA busy_timeout=5000;").execute(&mut conn)?;
    sql_query("PRAGMA journal_mode=WAL;").execute(&mut conn)?;
    sql_query("PRAGMA foreign_keys=ON;").execute(&mut conn)?;
    Ok(conn)
}
