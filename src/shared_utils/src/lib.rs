//! Small helpers shared by the country crates: environment access and config errors.

pub mod config;
pub mod env;
