use thiserror::Error;

/// Errors surfaced by [`crate::store::CountryStore`] and the database helpers.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Lookup, delete, or filtered query matched no rows.
    #[error("country not found")]
    NotFound,

    /// The configured `DATABASE_URL` is not a SQLite location.
    #[error("unsupported DATABASE_URL: {0}")]
    UnsupportedUrl(String),

    #[error("failed to open database: {0}")]
    Connection(#[from] diesel::ConnectionError),

    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("migration failed: {0}")]
    Migration(String),
}

/// Result type used throughout the store.
pub type StoreResult<T> = Result<T, StoreError>;
