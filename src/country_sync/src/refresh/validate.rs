//! Record validation.
//!
//! A refresh is all-or-nothing: the first invalid record aborts the whole
//! batch before anything is written.

use country_sources::models::RawCountry;
use thiserror::Error;

/// A source record failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("record {index}: {field} {reason}")]
pub struct ValidationError {
    /// Name of the offending field (`"name"` or `"population"`).
    pub field: &'static str,
    /// Short human-readable reason, reported to API callers as-is.
    pub reason: &'static str,
    /// Position of the record in the source payload.
    pub index: usize,
}

/// A record whose required fields are present and sane.
#[derive(Debug, Clone, Copy)]
pub struct ValidCountry<'a> {
    pub name: &'a str,
    pub population: i64,
    pub raw: &'a RawCountry,
}

pub fn validate(index: usize, raw: &RawCountry) -> Result<ValidCountry<'_>, ValidationError> {
    let name = raw
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or(ValidationError {
            field: "name",
            reason: "is required",
            index,
        })?;

    let population = raw
        .population
        .filter(|p| *p >= 0)
        .ok_or(ValidationError {
            field: "population",
            reason: "must be non-negative",
            index,
        })?;

    Ok(ValidCountry {
        name,
        population,
        raw,
    })
}

/// Validate every record, stopping at the first failure.
pub fn validate_all(raw: &[RawCountry]) -> Result<Vec<ValidCountry<'_>>, ValidationError> {
    raw.iter()
        .enumerate()
        .map(|(i, c)| validate(i, c))
        .collect()
}
