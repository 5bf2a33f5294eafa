use thiserror::Error;

use crate::{
    bearing,
    model::{CommuteReport, CommuteResults, Coordinates, DayForecast, ForecastDay, Timestep},
    provider::{ForecastProvider, Resolution},
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommuteError {
    /// The forecast holds no hour past the commute hour, so the right side
    /// of the bracket doesn't exist. Runs scheduled after the commute
    /// window hit this; the fix is to run earlier in the day.
    #[error("no forecast hour later than {target}:00 (latest available is {latest}:00)")]
    NoLaterHour { target: u32, latest: u32 },

    #[error("no forecast hour earlier than {target}:00 (first available is {first}:00)")]
    NoEarlierHour { target: u32, first: u32 },

    #[error("forecast day has no timesteps")]
    EmptyDay,

    #[error("expected two {window} samples at hours {left} and {right}, found {found}")]
    BracketSamples {
        window: &'static str,
        left: u32,
        right: u32,
        found: usize,
    },
}

/// The forecast hours immediately either side of a commute hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bracket {
    pub left: u32,
    pub right: u32,
}

/// Find the available hours either side of `target`.
///
/// `hours` is sorted internally; callers may pass timestep hours in
/// whatever order the provider returned them.
pub fn either_side(target: u32, hours: &[u32]) -> Result<Bracket, CommuteError> {
    let mut sorted = hours.to_vec();
    sorted.sort_unstable();

    let latest = *sorted.last().ok_or(CommuteError::EmptyDay)?;
    let right_idx = sorted
        .iter()
        .position(|&h| h > target)
        .ok_or(CommuteError::NoLaterHour { target, latest })?;

    if right_idx == 0 {
        return Err(CommuteError::NoEarlierHour {
            target,
            first: sorted[0],
        });
    }

    Ok(Bracket {
        left: sorted[right_idx - 1],
        right: sorted[right_idx],
    })
}

fn round_hour(time: f64) -> u32 {
    time.round() as u32
}

/// The two commute windows for one day, ready to interpolate against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommutePlan {
    pub in_time: u32,
    pub out_time: u32,
    pub in_hours: Bracket,
    pub out_hours: Bracket,
}

impl CommutePlan {
    pub fn new(in_time: f64, out_time: f64, hours: &[u32]) -> Result<Self, CommuteError> {
        let in_time = round_hour(in_time);
        let out_time = round_hour(out_time);

        Ok(Self {
            in_time,
            out_time,
            in_hours: either_side(in_time, hours)?,
            out_hours: either_side(out_time, hours)?,
        })
    }

    /// Interpolate one metric at both commute hours.
    ///
    /// Each endpoint is weighted by the distance to that same endpoint, so
    /// the nearer sample gets the smaller weight. That is backwards from a
    /// conventional lerp but is kept bit-for-bit; see DESIGN.md.
    fn weighted_avg(&self, in_set: [f64; 2], out_set: [f64; 2]) -> (f64, f64) {
        let in_avg = ((self.in_time - self.in_hours.left) as f64 * in_set[0]
            + (self.in_hours.right - self.in_time) as f64 * in_set[1])
            / (self.in_hours.right - self.in_hours.left) as f64;

        let out_avg = ((self.out_time - self.out_hours.left) as f64 * out_set[0]
            + (self.out_hours.right - self.out_time) as f64 * out_set[1])
            / (self.out_hours.right - self.out_hours.left) as f64;

        (in_avg, out_avg)
    }

    /// Bucket the day's timesteps into the two windows and interpolate all
    /// four metrics. The in window wins when both windows share an hour.
    pub fn build_results(&self, day: &DayForecast) -> Result<CommuteResults, CommuteError> {
        let mut steps: Vec<&Timestep> = day.timesteps.iter().collect();
        steps.sort_by_key(|step| step.hour);

        let mut in_samples = WindowSamples::default();
        let mut out_samples = WindowSamples::default();

        for step in steps {
            if step.hour == self.in_hours.left || step.hour == self.in_hours.right {
                in_samples.push(step);
            } else if step.hour == self.out_hours.left || step.hour == self.out_hours.right {
                out_samples.push(step);
            }
        }

        let in_pairs = in_samples.into_pairs("in", self.in_hours)?;
        let out_pairs = out_samples.into_pairs("out", self.out_hours)?;

        let (in_rain, out_rain) = self.weighted_avg(in_pairs.rain, out_pairs.rain);
        let (in_temp, out_temp) = self.weighted_avg(in_pairs.temp, out_pairs.temp);
        let (in_wind, out_wind) = self.weighted_avg(in_pairs.wind, out_pairs.wind);
        let (in_gust, out_gust) = self.weighted_avg(in_pairs.gust, out_pairs.gust);

        Ok(CommuteResults {
            in_rain,
            out_rain,
            in_temp,
            out_temp,
            in_wind,
            out_wind,
            in_gust,
            out_gust,
        })
    }
}

/// Metric values collected for one window, in ascending hour order.
#[derive(Debug, Default)]
struct WindowSamples {
    rain: Vec<f64>,
    temp: Vec<f64>,
    wind: Vec<f64>,
    gust: Vec<f64>,
}

/// The same values with exactly one (left, right) pair per metric.
#[derive(Debug)]
struct WindowPairs {
    rain: [f64; 2],
    temp: [f64; 2],
    wind: [f64; 2],
    gust: [f64; 2],
}

impl WindowSamples {
    fn push(&mut self, step: &Timestep) {
        self.rain.push(step.precipitation_prob);
        self.temp.push(step.temperature);
        self.wind.push(step.wind_speed);
        self.gust.push(step.wind_gust);
    }

    fn into_pairs(self, window: &'static str, bracket: Bracket) -> Result<WindowPairs, CommuteError> {
        let found = self.rain.len();
        if found != 2 {
            return Err(CommuteError::BracketSamples {
                window,
                left: bracket.left,
                right: bracket.right,
                found,
            });
        }

        Ok(WindowPairs {
            rain: [self.rain[0], self.rain[1]],
            temp: [self.temp[0], self.temp[1]],
            wind: [self.wind[0], self.wind[1]],
            gust: [self.gust[0], self.gust[1]],
        })
    }
}

/// Fetches one day of forecast data and reduces it to a commute report.
///
/// The provider calls in [`Forecaster::fetch_day`] are the only
/// side-effecting step; everything downstream is a pure function of the
/// fetched day.
#[derive(Debug)]
pub struct Forecaster {
    provider: Box<dyn ForecastProvider>,
    home: Coordinates,
    work: Coordinates,
    in_time: f64,
    out_time: f64,
    day: ForecastDay,
}

impl Forecaster {
    pub fn new(
        provider: Box<dyn ForecastProvider>,
        home: Coordinates,
        work: Coordinates,
        in_time: f64,
        out_time: f64,
        day: ForecastDay,
    ) -> Self {
        Self {
            provider,
            home,
            work,
            in_time,
            out_time,
            day,
        }
    }

    /// Resolve the nearest site to home and fetch the selected day.
    pub async fn fetch_day(&self) -> anyhow::Result<DayForecast> {
        let site = self.provider.nearest_site(self.home).await?;
        let forecast = self
            .provider
            .forecast_for_site(&site.id, Resolution::ThreeHourly)
            .await?;

        let index = self.day.index();
        forecast
            .days
            .into_iter()
            .nth(index)
            .ok_or_else(|| anyhow::anyhow!("forecast contained no day at index {index}"))
    }

    /// Pure reduction of a fetched day to the commute report.
    pub fn build_report(&self, day: &DayForecast) -> Result<CommuteReport, CommuteError> {
        let hours: Vec<u32> = day.timesteps.iter().map(|step| step.hour).collect();
        let plan = CommutePlan::new(self.in_time, self.out_time, &hours)?;

        tracing::debug!(
            date = %day.date,
            in_bracket = ?plan.in_hours,
            out_bracket = ?plan.out_hours,
            "built commute plan"
        );

        let results = plan.build_results(day)?;

        Ok(CommuteReport {
            results,
            in_time: plan.in_time,
            out_time: plan.out_time,
            in_direction: bearing::direction(self.home, self.work),
            out_direction: bearing::direction(self.work, self.home),
        })
    }

    pub async fn produce(&self) -> anyhow::Result<CommuteReport> {
        let day = self.fetch_day().await?;
        Ok(self.build_report(&day)?)
    }
}
