use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{
    refresh::{RefreshError, Source},
    report::ReportError,
    store::StoreError,
};

/// Every failure a handler can answer with.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not fetch data from {}", .0.service_name())]
    SourceUnavailable(Source),

    #[error("{field} {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },

    #[error("country not found")]
    CountryNotFound,

    #[error("summary image not found")]
    ImageNotFound,

    /// Logged in full, answered with a generic body.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<RefreshError> for ApiError {
    fn from(err: RefreshError) -> Self {
        match err {
            RefreshError::SourceUnavailable { which, .. } => Self::SourceUnavailable(which),
            RefreshError::Validation(v) => Self::Validation {
                field: v.field,
                reason: v.reason,
            },
            RefreshError::Store(e) => e.into(),
            RefreshError::Task(e) => e.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::CountryNotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::SourceUnavailable(which) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({
                    "error": "External data source unavailable",
                    "details": format!("Could not fetch data from {}", which.service_name()),
                }),
            ),
            ApiError::Validation { field, reason } => {
                let mut details = serde_json::Map::new();
                details.insert((*field).to_string(), (*reason).into());
                (
                    StatusCode::BAD_REQUEST,
                    json!({ "error": "Validation failed", "details": details }),
                )
            }
            ApiError::CountryNotFound => {
                (StatusCode::NOT_FOUND, json!({ "error": "Country not found" }))
            }
            ApiError::ImageNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Summary image not found" }),
            ),
            ApiError::Internal(detail) => {
                error!(%detail, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
