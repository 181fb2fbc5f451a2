//! Refresh pipeline: fetch both sources, validate, derive, upsert, report.
//!
//! ## Steps
//! 1. Fetch country metadata, then exchange rates. Either failure aborts with
//!    [`RefreshError::SourceUnavailable`] naming the source.
//! 2. Take one timestamp for the whole batch.
//! 3. Validate every record; the first bad one aborts with
//!    [`RefreshError::Validation`]. Nothing has been written at this point.
//! 4. Derive currency code, rate and estimated GDP for each record.
//! 5. Upsert the batch in a single `BEGIN IMMEDIATE` transaction.
//! 6. Render the summary image from the committed state. A failure here is
//!    reported in [`RefreshSummary::report`] and does not fail the refresh.
//!
//! ## Concurrency
//! One refresh runs at a time per pipeline (async mutex held for the whole
//! call). The immediate transaction also keeps any other writer out while the
//! batch is applied, so a batch is never interleaved with another.

pub mod derive;
pub mod validate;

use std::{
    fmt,
    path::PathBuf,
    sync::{Arc, Mutex, PoisonError},
};

use chrono::Utc;
use country_sources::providers::{CountryProvider, ProviderError, RateProvider};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub use validate::ValidationError;

use crate::{
    report::{ReportCache, SummaryReport},
    store::{CountryStore, StoreError},
    tz,
};

/// Which upstream failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Country metadata (REST Countries).
    Countries,
    /// Exchange rates (open.er-api.com).
    Rates,
}

impl Source {
    /// Human-facing name of the upstream service.
    pub fn service_name(self) -> &'static str {
        match self {
            Source::Countries => "Rest Countries",
            Source::Rates => "Exchange Rate API",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Source::Countries => "country metadata",
            Source::Rates => "exchange rate",
        })
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    /// An upstream fetch failed; nothing was written.
    #[error("{which} source unavailable: {error}")]
    SourceUnavailable {
        which: Source,
        #[source]
        error: ProviderError,
    },

    /// A source record was invalid; nothing was written.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The blocking store task panicked or was cancelled.
    #[error("refresh task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// What happened to the summary image after the data commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Written { path: PathBuf },
    Failed { reason: String },
}

/// Result of a successful refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    /// Rows in the store after the commit.
    pub total_countries: i64,
    /// Records written by this batch.
    pub upserted: usize,
    /// Timestamp stamped on every record of the batch.
    pub last_refreshed_at: String,
    pub report: ReportOutcome,
}

impl RefreshSummary {
    /// `true` when data committed but the summary image could not be written.
    pub fn is_degraded(&self) -> bool {
        matches!(self.report, ReportOutcome::Failed { .. })
    }
}

pub struct RefreshPipeline {
    countries: Arc<dyn CountryProvider>,
    rates: Arc<dyn RateProvider>,
    store: CountryStore,
    reports: ReportCache,
    rng: Mutex<StdRng>,
    running: tokio::sync::Mutex<()>,
}

impl RefreshPipeline {
    pub fn new(
        countries: Arc<dyn CountryProvider>,
        rates: Arc<dyn RateProvider>,
        store: CountryStore,
        reports: ReportCache,
    ) -> Self {
        Self {
            countries,
            rates,
            store,
            reports,
            rng: Mutex::new(StdRng::from_os_rng()),
            running: tokio::sync::Mutex::new(()),
        }
    }

    /// Replace the multiplier RNG (tests pin a seed to get exact GDP values).
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn store(&self) -> &CountryStore {
        &self.store
    }

    pub fn reports(&self) -> &ReportCache {
        &self.reports
    }

    /// Run one full refresh. See the module docs for the step order.
    pub async fn refresh(&self) -> Result<RefreshSummary, RefreshError> {
        let _running = self.running.lock().await;

        let raw = self.countries.fetch_countries().await.map_err(|error| {
            warn!(%error, "country metadata fetch failed");
            RefreshError::SourceUnavailable {
                which: Source::Countries,
                error,
            }
        })?;
        let rates = self.rates.fetch_rates().await.map_err(|error| {
            warn!(%error, "exchange rate fetch failed");
            RefreshError::SourceUnavailable {
                which: Source::Rates,
                error,
            }
        })?;
        info!(countries = raw.len(), rates = rates.len(), "fetched sources");

        let last_refreshed_at = tz::to_rfc3339_millis(Utc::now());

        let valid = validate::validate_all(&raw).inspect_err(|e| {
            warn!(index = e.index, field = e.field, "refresh aborted by invalid record");
        })?;
        let batch = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            derive::build_records(&valid, &rates, &mut *rng)
        };

        let store = self.store.clone();
        let stamp = last_refreshed_at.clone();
        let (upserted, status) = tokio::task::spawn_blocking(move || {
            let upserted = store.upsert_all(&batch, &stamp)?;
            let status = store.count_and_last_refresh()?;
            Ok::<_, StoreError>((upserted, status))
        })
        .await??;
        info!(upserted, total = status.total_countries, %last_refreshed_at, "refresh committed");

        let report = self.write_report(&last_refreshed_at).await;

        Ok(RefreshSummary {
            total_countries: status.total_countries,
            upserted,
            last_refreshed_at,
            report,
        })
    }

    async fn write_report(&self, last_refreshed_at: &str) -> ReportOutcome {
        let store = self.store.clone();
        let reports = self.reports.clone();
        let stamp = last_refreshed_at.to_string();

        let written = tokio::task::spawn_blocking(move || {
            let summary = SummaryReport::collect(&store, &stamp)?;
            reports.write(&summary)
        })
        .await;

        match written {
            Ok(Ok(path)) => ReportOutcome::Written { path },
            Ok(Err(e)) => {
                warn!(error = %e, "summary image not written");
                ReportOutcome::Failed {
                    reason: e.to_string(),
                }
            }
            Err(e) => {
                warn!(error = %e, "summary image task failed");
                ReportOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
