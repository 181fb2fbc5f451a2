//! Clients for the two upstream datasets a country refresh joins:
//! country metadata (REST Countries) and USD exchange rates (open.er-api.com).
//!
//! Both sides sit behind small async traits in [`providers`] so callers can
//! swap the REST clients for fakes.

pub mod models;
pub mod providers;
