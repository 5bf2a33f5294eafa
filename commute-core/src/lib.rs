//! Core library for the `commute` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over the forecast provider (Met Office DataPoint)
//! - The commute computation: bracketing, interpolation, bearing
//! - Report rendering and CSV persistence
//!
//! It is used by `commute-cli`, but can also be reused by other binaries or services.

pub mod bearing;
pub mod commute;
pub mod config;
pub mod model;
pub mod provider;
pub mod report;

pub use commute::{Bracket, CommuteError, CommutePlan, Forecaster, either_side};
pub use config::Config;
pub use model::{
    CommuteReport, CommuteResults, Coordinates, DayForecast, Forecast, ForecastDay, Site, Timestep,
};
pub use provider::{ForecastProvider, Resolution, provider_from_config};
