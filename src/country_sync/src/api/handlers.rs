use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;

use super::{AppState, error::ApiError};
use crate::{
    models::{Country, StoreStatus},
    refresh::RefreshSummary,
    store::{CountryFilter, StoreError},
};

/// Raw `GET /countries` query string. Blank values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub region: Option<String>,
    pub currency: Option<String>,
    pub sort: Option<String>,
}

impl ListParams {
    pub fn to_filter(&self) -> CountryFilter {
        CountryFilter::from_params(
            self.region.as_deref(),
            self.currency.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// Run a store call on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
{
    Ok(tokio::task::spawn_blocking(f).await??)
}

pub async fn refresh(State(state): State<AppState>) -> Result<Json<RefreshSummary>, ApiError> {
    let summary = state.pipeline.refresh().await?;
    Ok(Json(summary))
}

pub async fn image(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let reports = state.reports.clone();
    let bytes = tokio::task::spawn_blocking(move || reports.read())
        .await??
        .ok_or(ApiError::ImageNotFound)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Country>>, ApiError> {
    let filter = params.to_filter();
    let store = state.store.clone();
    let rows = blocking(move || store.query(&filter)).await?;
    Ok(Json(rows))
}

pub async fn get_one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Country>, ApiError> {
    let store = state.store.clone();
    let country = blocking(move || store.get_by_name(&name)).await?;
    Ok(Json(country))
}

pub async fn delete_one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    blocking(move || store.delete_by_name(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn status(State(state): State<AppState>) -> Result<Json<StoreStatus>, ApiError> {
    let store = state.store.clone();
    let status = blocking(move || store.count_and_last_refresh()).await?;
    Ok(Json(status))
}
