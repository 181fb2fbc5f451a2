//! Embedded migrations for the `countries` table.

use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::{db::connection::sqlite_path, store::StoreError};

/// Embedded Diesel migrations bundled with this crate.
///
/// These are applied by [`run_sqlite`] to bring the database schema up to date.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Runs pending Diesel migrations on a SQLite database at the given path.
///
/// This sets the SQLite journal mode to WAL and applies all embedded migrations.
/// Returns the number of migrations that were applied.
pub fn run_sqlite(path: &str) -> Result<usize, StoreError> {
    let mut conn = SqliteConnection::establish(path)?;
    conn.batch_execute("PRAGMA busy_timeout=5000; PRAGMA journal_mode=WAL;")?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| StoreError::Migration(e.to_string()))?;

    for version in &applied {
        tracing::info!(%version, "applied migration");
    }
    Ok(applied.len())
}

/// Runs pending migrations for the given database URL.
///
/// Accepts `sqlite://`, `sqlite:` or a bare path; Postgres URLs are rejected.
pub fn run_all(database_url: &str) -> Result<usize, StoreError> {
    run_sqlite(sqlite_path(database_url)?)
}
