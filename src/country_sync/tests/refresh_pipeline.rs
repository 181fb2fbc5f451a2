mod common;
use common::{
    FakeCountries, FakeRates, pipeline, raw, seven_countries, seven_rates, setup_db,
};

use std::sync::atomic::Ordering;

use country_sync::estimator::MULTIPLIER_RANGE;
use country_sync::refresh::{RefreshError, ReportOutcome, Source};
use country_sync::store::{CountryFilter, StoreError};
use country_sync::tz;
use rand::{Rng, SeedableRng, rngs::StdRng};

#[tokio::test]
async fn refresh_stamps_one_timestamp_on_every_row() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));

    let summary = p.refresh().await.expect("refresh");
    assert_eq!(summary.total_countries, 7);
    assert_eq!(summary.upserted, 7);
    assert!(summary.last_refreshed_at.ends_with('Z'));
    let stamped = tz::parse_ts_to_utc(&summary.last_refreshed_at).expect("RFC 3339 timestamp");
    assert!(stamped <= chrono::Utc::now());

    let rows = db.store().query(&CountryFilter::default()).unwrap();
    assert_eq!(rows.len(), 7);
    assert!(rows.iter().all(|c| c.last_refreshed_at == summary.last_refreshed_at));

    let status = db.store().count_and_last_refresh().unwrap();
    assert_eq!(status.last_refreshed_at.as_deref(), Some(summary.last_refreshed_at.as_str()));
}

#[tokio::test]
async fn gdp_follows_seeded_multipliers_in_payload_order() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));
    p.refresh().await.unwrap();

    // Same seed as the pipeline fixture; only resolvable rows draw.
    let mut probe = StdRng::seed_from_u64(42);
    let rates = seven_rates();
    for c in seven_countries() {
        let name = c.name.clone().unwrap();
        let row = db.store().get_by_name(&name).unwrap();
        match c.primary_currency_code().and_then(|code| rates.get(code)) {
            Some(rate) => {
                let m: u32 = probe.random_range(MULTIPLIER_RANGE);
                let expected = c.population.unwrap() as f64 * f64::from(m) / rate;
                assert_eq!(row.exchange_rate, Some(*rate), "{name}");
                assert_eq!(row.estimated_gdp, Some(expected), "{name}");
            }
            None => {
                assert_eq!(row.exchange_rate, None, "{name}");
                assert_eq!(row.estimated_gdp, None, "{name}");
            }
        }
    }
}

#[tokio::test]
async fn unknown_currency_is_kept_without_rate() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));
    p.refresh().await.unwrap();

    let wakanda = db.store().get_by_name("Wakanda").unwrap();
    assert_eq!(wakanda.currency_code.as_deref(), Some("XYZ"));
    assert_eq!(wakanda.exchange_rate, None);
    assert_eq!(wakanda.estimated_gdp, None);

    let antarctica = db.store().get_by_name("Antarctica").unwrap();
    assert_eq!(antarctica.currency_code, None);
    assert_eq!(antarctica.estimated_gdp, None);
}

#[tokio::test]
async fn rerun_keeps_ids_and_updates_timestamp() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));

    let first = p.refresh().await.unwrap();
    let before = db.store().query(&CountryFilter::default()).unwrap();
    let second = p.refresh().await.unwrap();
    let after = db.store().query(&CountryFilter::default()).unwrap();

    assert!(second.last_refreshed_at >= first.last_refreshed_at);
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(&after) {
        assert_eq!((b.id, &b.name), (a.id, &a.name));
        assert_eq!(a.last_refreshed_at, second.last_refreshed_at);
    }
}

#[tokio::test]
async fn negative_population_aborts_without_writing() {
    let (db, _conn) = setup_db();
    let countries = FakeCountries::ok(seven_countries());
    let p = pipeline(&db, countries.clone(), FakeRates::ok(seven_rates()));
    p.refresh().await.unwrap();

    let rows_before = db.store().query(&CountryFilter::default()).unwrap();
    let image_before = db.cache().read().unwrap().expect("image from first refresh");

    let mut bad = seven_countries();
    bad.push(raw("Nigeria", "Africa", 42, Some("NGN")));
    bad.push(raw("Atlantis", "Ocean", -5, Some("USD")));
    countries.set(bad);

    let err = p.refresh().await.unwrap_err();
    match err {
        RefreshError::Validation(v) => {
            assert_eq!(v.field, "population");
            assert_eq!(v.index, 8);
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    assert_eq!(db.store().query(&CountryFilter::default()).unwrap(), rows_before);
    assert_eq!(db.cache().read().unwrap().unwrap(), image_before);
}

#[tokio::test]
async fn missing_name_is_a_validation_error() {
    let (db, _conn) = setup_db();
    let mut nameless = raw("x", "Africa", 10, None);
    nameless.name = None;
    let p = pipeline(&db, FakeCountries::ok(vec![nameless]), FakeRates::ok(seven_rates()));

    let err = p.refresh().await.unwrap_err();
    assert!(matches!(err, RefreshError::Validation(ref v) if v.field == "name"));
    assert!(db.cache().read().unwrap().is_none());
}

#[tokio::test]
async fn countries_source_failure_stops_before_rates() {
    let (db, _conn) = setup_db();
    let rates = FakeRates::ok(seven_rates());
    let p = pipeline(&db, FakeCountries::failing("down"), rates.clone());

    let err = p.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        RefreshError::SourceUnavailable {
            which: Source::Countries,
            ..
        }
    ));
    assert_eq!(rates.calls.load(Ordering::SeqCst), 0);
    assert!(matches!(
        db.store().query(&CountryFilter::default()),
        Err(StoreError::NotFound)
    ));
}

#[tokio::test]
async fn rates_source_failure_writes_nothing() {
    let (db, _conn) = setup_db();
    let countries = FakeCountries::ok(seven_countries());
    let p = pipeline(&db, countries.clone(), FakeRates::failing("quota"));

    let err = p.refresh().await.unwrap_err();
    assert!(matches!(
        err,
        RefreshError::SourceUnavailable {
            which: Source::Rates,
            ..
        }
    ));
    assert!(err.to_string().contains("quota"));
    assert_eq!(countries.calls.load(Ordering::SeqCst), 1);
    assert_eq!(db.store().count_and_last_refresh().unwrap().total_countries, 0);
    assert!(db.cache().read().unwrap().is_none());
}

#[tokio::test]
async fn report_failure_degrades_but_keeps_data() {
    let (db, _conn) = setup_db();
    // A regular file where the cache directory should be.
    std::fs::write(db.cache_dir(), b"not a dir").unwrap();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));

    let summary = p.refresh().await.expect("data commit succeeds");
    assert!(summary.is_degraded());
    assert!(matches!(summary.report, ReportOutcome::Failed { .. }));
    assert_eq!(db.store().count_and_last_refresh().unwrap().total_countries, 7);
}

#[tokio::test]
async fn concurrent_refreshes_are_serialized() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));

    let (a, b) = tokio::join!(p.refresh(), p.refresh());
    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.total_countries, 7);
    assert_eq!(b.total_countries, 7);

    let rows = db.store().query(&CountryFilter::default()).unwrap();
    let latest = a.last_refreshed_at.clone().max(b.last_refreshed_at.clone());
    assert!(rows.iter().all(|c| c.last_refreshed_at == latest));
}

#[tokio::test]
async fn written_report_path_is_cache_path() {
    let (db, _conn) = setup_db();
    let p = pipeline(&db, FakeCountries::ok(seven_countries()), FakeRates::ok(seven_rates()));

    let summary = p.refresh().await.unwrap();
    assert_eq!(
        summary.report,
        ReportOutcome::Written {
            path: db.cache().path()
        }
    );
}
