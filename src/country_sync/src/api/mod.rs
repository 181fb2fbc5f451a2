//! HTTP surface over the refresh pipeline and the country store.
//!
//! | route                     | handler                    |
//! |---------------------------|----------------------------|
//! | `POST /countries/refresh` | [`handlers::refresh`]      |
//! | `GET /countries/image`    | [`handlers::image`]        |
//! | `GET /countries`          | [`handlers::list`]         |
//! | `GET /countries/:name`    | [`handlers::get_one`]      |
//! | `DELETE /countries/:name` | [`handlers::delete_one`]   |
//! | `GET /status`             | [`handlers::status`]       |
//!
//! Store calls run on the blocking pool; errors map to JSON bodies in
//! [`ApiError`].

mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

use crate::{refresh::RefreshPipeline, report::ReportCache, store::CountryStore};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<RefreshPipeline>,
    pub store: CountryStore,
    pub reports: ReportCache,
}

impl AppState {
    /// Share the pipeline's store and cache with the read handlers.
    pub fn new(pipeline: RefreshPipeline) -> Self {
        let store = pipeline.store().clone();
        let reports = pipeline.reports().clone();
        Self {
            pipeline: Arc::new(pipeline),
            store,
            reports,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/countries/refresh", post(handlers::refresh))
        .route("/countries/image", get(handlers::image))
        .route("/countries", get(handlers::list))
        .route(
            "/countries/:name",
            get(handlers::get_one).delete(handlers::delete_one),
        )
        .route("/status", get(handlers::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
