//! Statements against the `countries` table.
//!
//! Every function takes an open connection so callers control the scope; the
//! [`crate::store::CountryStore`] handle opens one per operation. Filter values
//! are always bound parameters.

use diesel::prelude::*;
use diesel::{SqliteConnection, dsl::max, insert_into};

use crate::{
    models::{Country, NewCountry, StoreStatus},
    schema::countries,
    store::{
        StoreError, StoreResult,
        filter::{CountryFilter, GdpSort},
    },
};

/// Lookup key stored in `name_key`. Folds Unicode case, which SQLite's
/// `lower()` does not.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Insertable, AsChangeset, Debug)]
#[diesel(table_name = countries, treat_none_as_null = true)]
struct CountryRow<'a> {
    name: &'a str,
    capital: Option<&'a str>,
    region: Option<&'a str>,
    population: i64,
    currency_code: Option<&'a str>,
    exchange_rate: Option<f64>,
    estimated_gdp: Option<f64>,
    flag_url: Option<&'a str>,
    last_refreshed_at: &'a str, // RFC3339 UTC
    name_key: String,
}

impl<'a> CountryRow<'a> {
    fn new(c: &'a NewCountry, last_refreshed_at: &'a str) -> Self {
        Self {
            name: &c.name,
            capital: c.capital.as_deref(),
            region: c.region.as_deref(),
            population: c.population,
            currency_code: c.currency_code.as_deref(),
            exchange_rate: c.exchange_rate,
            estimated_gdp: c.estimated_gdp,
            flag_url: c.flag_url.as_deref(),
            last_refreshed_at,
            name_key: name_key(&c.name),
        }
    }
}

/// Insert or update one country keyed by `name`.
///
/// On conflict every fetched/derived column is overwritten (NULLs included);
/// `id` is left alone.
pub fn upsert_country(
    conn: &mut SqliteConnection,
    country: &NewCountry,
    last_refreshed_at: &str,
) -> StoreResult<usize> {
    let row = CountryRow::new(country, last_refreshed_at);
    let n = insert_into(countries::table)
        .values(&row)
        .on_conflict(countries::name)
        .do_update()
        .set(&row)
        .execute(conn)?;
    Ok(n)
}

/// Upsert a whole batch inside one `BEGIN IMMEDIATE` transaction.
///
/// Either every row carries `last_refreshed_at` afterwards or none of the batch
/// was written. Returns the number of rows written.
pub fn upsert_all(
    conn: &mut SqliteConnection,
    batch: &[NewCountry],
    last_refreshed_at: &str,
) -> StoreResult<usize> {
    conn.immediate_transaction::<_, StoreError, _>(|conn| {
        let mut written = 0;
        for country in batch {
            written += upsert_country(conn, country, last_refreshed_at)?;
        }
        Ok(written)
    })
}

/// List countries matching `filter`.
///
/// Without a sort the order is ascending `id`. GDP sorts put NULL estimates
/// last in both directions and break ties by `id`. An empty result is
/// [`StoreError::NotFound`].
pub fn query(conn: &mut SqliteConnection, filter: &CountryFilter) -> StoreResult<Vec<Country>> {
    let mut q = countries::table.select(Country::as_select()).into_boxed();

    if let Some(region) = &filter.region {
        q = q.filter(countries::region.like(region.clone()));
    }
    if let Some(currency) = &filter.currency {
        q = q.filter(countries::currency_code.like(currency.clone()));
    }

    q = match filter.sort {
        Some(GdpSort::Desc) => q.order((
            countries::estimated_gdp.is_null().asc(),
            countries::estimated_gdp.desc(),
            countries::id.asc(),
        )),
        Some(GdpSort::Asc) => q.order((
            countries::estimated_gdp.is_null().asc(),
            countries::estimated_gdp.asc(),
            countries::id.asc(),
        )),
        None => q.order(countries::id.asc()),
    };

    let rows = q.load(conn)?;
    if rows.is_empty() {
        return Err(StoreError::NotFound);
    }
    Ok(rows)
}

/// Case-insensitive exact lookup by name.
pub fn get_by_name(conn: &mut SqliteConnection, name: &str) -> StoreResult<Country> {
    countries::table
        .filter(countries::name_key.eq(name_key(name)))
        .order(countries::id.asc())
        .select(Country::as_select())
        .first(conn)
        .optional()?
        .ok_or(StoreError::NotFound)
}

/// Case-sensitive exact delete by name.
pub fn delete_by_name(conn: &mut SqliteConnection, name: &str) -> StoreResult<()> {
    let n = diesel::delete(countries::table.filter(countries::name.eq(name))).execute(conn)?;
    if n == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

/// Row count plus the most recent batch timestamp, read from one snapshot.
pub fn count_and_last_refresh(conn: &mut SqliteConnection) -> StoreResult<StoreStatus> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let total_countries: i64 = countries::table.count().get_result(conn)?;
        let last_refreshed_at: Option<String> = countries::table
            .select(max(countries::last_refreshed_at))
            .get_result(conn)?;
        Ok(StoreStatus {
            total_countries,
            last_refreshed_at,
        })
    })
}

/// Up to `limit` `(name, estimated_gdp)` pairs with an estimate, highest first.
pub fn top_by_gdp(conn: &mut SqliteConnection, limit: i64) -> StoreResult<Vec<(String, f64)>> {
    let rows: Vec<(String, Option<f64>)> = countries::table
        .filter(countries::estimated_gdp.is_not_null())
        .order((countries::estimated_gdp.desc(), countries::id.asc()))
        .select((countries::name, countries::estimated_gdp))
        .limit(limit)
        .load(conn)?;
    Ok(rows
        .into_iter()
        .filter_map(|(name, gdp)| gdp.map(|g| (name, g)))
        .collect())
}

/// Status plus the top `limit` GDP pairs, read from one snapshot.
pub fn report_snapshot(
    conn: &mut SqliteConnection,
    limit: i64,
) -> StoreResult<(StoreStatus, Vec<(String, f64)>)> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let status = count_and_last_refresh(conn)?;
        let top = top_by_gdp(conn, limit)?;
        Ok((status, top))
    })
}
