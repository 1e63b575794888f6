#![forbid(unsafe_code)]

//! Core domain model and business logic for fitlog, a personal workout log.
//!
//! This crate provides:
//! - Domain types (workouts, daily progress, BMI readings)
//! - The workout store and its JSON persistence
//! - Aggregates (totals, daily goal progress, BMI, per-type summary)
//! - Input validation, chart data, CSV export
//! - Configuration, persisted settings and logging setup

pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod logging;
pub mod store;
pub mod settings;
pub mod stats;
pub mod validate;
pub mod chart;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use store::WorkoutStore;
pub use settings::UserSettings;
pub use chart::{calorie_series, ChartPoint};
pub use export::export_csv;
