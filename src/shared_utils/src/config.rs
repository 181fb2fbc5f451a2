use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// An environment variable is set but its value is unusable.
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        name: String,
        /// Raw value as read from the environment.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}
