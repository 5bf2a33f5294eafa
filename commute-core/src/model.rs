use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A (longitude, latitude) pair. Longitude first, matching the provider API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self { longitude, latitude }
    }
}

/// A forecast site resolved from coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

/// One 3-hourly forecast record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timestep {
    /// Hour of day, 0..=23.
    pub hour: u32,
    pub temperature: f64,
    pub precipitation_prob: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
}

/// All timesteps the provider returned for a single day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub timesteps: Vec<Timestep>,
}

/// A site forecast: one entry per day, in provider order (today first).
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub site_id: String,
    pub days: Vec<DayForecast>,
}

/// Which day of the forecast to report on.
///
/// `TestDay` points one day ahead, which keeps every 3-hourly timestep
/// available regardless of when the run happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForecastDay {
    #[default]
    Today,
    TestDay,
}

impl ForecastDay {
    pub fn index(self) -> usize {
        match self {
            ForecastDay::Today => 0,
            ForecastDay::TestDay => 1,
        }
    }
}

/// The eight interpolated commute values. Built once per run, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommuteResults {
    pub in_rain: f64,
    pub out_rain: f64,
    pub in_temp: f64,
    pub out_temp: f64,
    pub in_wind: f64,
    pub out_wind: f64,
    pub in_gust: f64,
    pub out_gust: f64,
}

impl CommuteResults {
    /// Rows in the order they are persisted and displayed.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("in_rain", self.in_rain),
            ("out_rain", self.out_rain),
            ("in_temp", self.in_temp),
            ("out_temp", self.out_temp),
            ("in_wind", self.in_wind),
            ("out_wind", self.out_wind),
            ("in_gust", self.in_gust),
            ("out_gust", self.out_gust),
        ]
    }
}

/// Everything the reporter needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct CommuteReport {
    pub results: CommuteResults,
    /// Rounded commute-in hour.
    pub in_time: u32,
    /// Rounded commute-out hour.
    pub out_time: u32,
    pub in_direction: Option<&'static str>,
    pub out_direction: Option<&'static str>,
}
