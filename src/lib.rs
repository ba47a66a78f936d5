//! Crime Stats - outcome statistics over the data.police.uk API
//!
//! Fetches crime outcome records for a fixed point in central London,
//! reduces them to ranked frequency tables by outcome, crime category or
//! location subtype, and optionally renders them as hosted bar charts.
//! A small user table gates the heavier endpoints behind Basic or token
//! authentication.

pub mod auth;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{aggregate_by, frequency_table, normalize_label, Breakdown, FrequencyRow, YearMonth};
pub use error::ApiError;
pub use models::{CrimeRecord, User};
pub use routes::AppState;
