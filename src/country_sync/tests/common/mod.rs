#![allow(dead_code)]

use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use country_sources::{
    models::{RateTable, RawCountry, RawCurrency},
    providers::{ApiSnafu, CountryProvider, ProviderError, RateProvider},
};
use country_sync::{
    db::{connection, migrate},
    models::NewCountry,
    refresh::RefreshPipeline,
    report::ReportCache,
    store::CountryStore,
};
use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::{Integer, Text};
use rand::{SeedableRng, rngs::StdRng};
use tempfile::TempDir;

#[derive(QueryableByName)]
struct JournalMode {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}
#[derive(QueryableByName)]
struct ForeignKeys {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}
#[derive(QueryableByName)]
struct BusyTimeout {
    #[diesel(sql_type = Integer, column_name = "timeout")]
    busy_timeout: i32,
}

pub struct TestDb {
    dir: TempDir,     // keep alive for the life of the test
    pub path: String, // <tmpdir>/test.db
}

impl TestDb {
    pub fn store(&self) -> CountryStore {
        CountryStore::new(self.path.clone())
    }

    pub fn cache(&self) -> ReportCache {
        ReportCache::new(self.cache_dir())
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("test.db").to_string_lossy().to_string();

    migrate::run_all(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { dir, path }, conn)
}

pub fn assert_sqlite_pragmas(conn: &mut SqliteConnection) {
    use diesel::sql_query;

    let jm: JournalMode = sql_query("PRAGMA journal_mode;").get_result(conn).unwrap();
    assert_eq!(jm.journal_mode.to_lowercase(), "wal"); // WAL is persistent per DB file

    let fk: ForeignKeys = sql_query("PRAGMA foreign_keys;").get_result(conn).unwrap();
    assert_eq!(fk.foreign_keys, 1);

    let bt: BusyTimeout = sql_query("PRAGMA busy_timeout;").get_result(conn).unwrap();
    assert_eq!(bt.busy_timeout, 5000);
}

// ---------- fixtures ----------

pub fn raw(name: &str, region: &str, population: i64, currency: Option<&str>) -> RawCountry {
    RawCountry {
        name: Some(name.to_string()),
        capital: Some(format!("{name} City")),
        region: Some(region.to_string()),
        population: Some(population),
        flag: Some(format!("https://flags.example/{}.svg", name.to_lowercase())),
        currencies: currency.map(|code| {
            vec![RawCurrency {
                code: Some(code.to_string()),
                ..Default::default()
            }]
        }),
    }
}

pub fn new_country(
    name: &str,
    region: Option<&str>,
    currency: Option<&str>,
    gdp: Option<f64>,
) -> NewCountry {
    NewCountry {
        name: name.to_string(),
        capital: None,
        region: region.map(str::to_string),
        population: 1_000,
        currency_code: currency.map(str::to_string),
        exchange_rate: gdp.map(|_| 1.0),
        estimated_gdp: gdp,
        flag_url: None,
    }
}

pub fn rates(pairs: &[(&str, f64)]) -> RateTable {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

/// Seven countries, five of which have a resolvable currency.
pub fn seven_countries() -> Vec<RawCountry> {
    vec![
        raw("Nigeria", "Africa", 206_139_589, Some("NGN")),
        raw("Ghana", "Africa", 31_072_940, Some("GHS")),
        raw("Germany", "Europe", 83_240_525, Some("EUR")),
        raw("Japan", "Asia", 125_836_021, Some("JPY")),
        raw("Brazil", "Americas", 212_559_409, Some("BRL")),
        raw("Wakanda", "Africa", 6_000_000, Some("XYZ")),
        raw("Antarctica", "Polar", 1_000, None),
    ]
}

pub fn seven_rates() -> RateTable {
    rates(&[
        ("USD", 1.0),
        ("NGN", 1600.0),
        ("GHS", 15.3),
        ("EUR", 0.92),
        ("JPY", 150.0),
        ("BRL", 5.6),
    ])
}

// ---------- fake providers ----------

/// Serves a fixed payload (or a fixed failure) and counts calls.
pub struct FakeCountries {
    payload: Mutex<Result<Vec<RawCountry>, String>>,
    pub calls: AtomicUsize,
}

impl FakeCountries {
    pub fn ok(countries: Vec<RawCountry>) -> Arc<Self> {
        Arc::new(Self {
            payload: Mutex::new(Ok(countries)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            payload: Mutex::new(Err(message.to_string())),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, countries: Vec<RawCountry>) {
        *self.payload.lock().unwrap() = Ok(countries);
    }
}

#[async_trait]
impl CountryProvider for FakeCountries {
    async fn fetch_countries(&self) -> Result<Vec<RawCountry>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let payload = self.payload.lock().unwrap().clone();
        match payload {
            Ok(countries) => Ok(countries),
            Err(message) => ApiSnafu {
                url: "http://countries.test/v2/all",
                status: 503u16,
                message,
            }
            .fail(),
        }
    }
}

pub struct FakeRates {
    payload: Result<RateTable, String>,
    pub calls: AtomicUsize,
}

impl FakeRates {
    pub fn ok(rates: RateTable) -> Arc<Self> {
        Arc::new(Self {
            payload: Ok(rates),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self {
            payload: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl RateProvider for FakeRates {
    async fn fetch_rates(&self) -> Result<RateTable, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.payload {
            Ok(rates) => Ok(rates.clone()),
            Err(message) => ApiSnafu {
                url: "http://rates.test/v6/latest/USD",
                status: 503u16,
                message: message.clone(),
            }
            .fail(),
        }
    }
}

pub fn pipeline(
    db: &TestDb,
    countries: Arc<FakeCountries>,
    rates: Arc<FakeRates>,
) -> RefreshPipeline {
    RefreshPipeline::new(countries, rates, db.store(), db.cache())
        .with_rng(StdRng::seed_from_u64(42))
}
