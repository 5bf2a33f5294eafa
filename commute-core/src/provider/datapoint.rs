use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

use crate::model::{Coordinates, DayForecast, Forecast, Site, Timestep};

use super::{ForecastProvider, Resolution};

const BASE_URL: &str = "http://datapoint.metoffice.gov.uk/public/data";

/// Client for the Met Office DataPoint forecast API.
#[derive(Debug, Clone)]
pub struct DataPointProvider {
    api_key: String,
    http: Client,
}

impl DataPointProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn fetch_sitelist(&self) -> Result<Vec<DpSiteEntry>> {
        let url = format!("{BASE_URL}/val/wxfcs/all/json/sitelist");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to DataPoint (sitelist)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read DataPoint sitelist response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "DataPoint sitelist request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: DpSitelistResponse =
            serde_json::from_str(&body).context("Failed to parse DataPoint sitelist JSON")?;

        Ok(parsed.locations.location)
    }

    async fn fetch_forecast(
        &self,
        site_id: &str,
        resolution: Resolution,
    ) -> Result<DpForecastResponse> {
        let url = format!("{BASE_URL}/val/wxfcs/all/json/{site_id}");

        let res = self
            .http
            .get(&url)
            .query(&[("res", resolution.as_str()), ("key", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to DataPoint (site forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read DataPoint forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "DataPoint forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).context("Failed to parse DataPoint forecast JSON")
    }
}

#[async_trait]
impl ForecastProvider for DataPointProvider {
    async fn nearest_site(&self, coords: Coordinates) -> Result<Site> {
        let entries = self.fetch_sitelist().await?;
        tracing::debug!(sites = entries.len(), "fetched DataPoint sitelist");

        let site = pick_nearest(entries.iter().filter_map(DpSiteEntry::to_site), coords)
            .ok_or_else(|| anyhow!("DataPoint sitelist contained no usable sites"))?;

        tracing::info!(site_id = %site.id, name = %site.name, "resolved nearest forecast site");
        Ok(site)
    }

    async fn forecast_for_site(&self, site_id: &str, resolution: Resolution) -> Result<Forecast> {
        let parsed = self.fetch_forecast(site_id, resolution).await?;
        let location = parsed.site_rep.data.location;

        let days = location
            .periods
            .iter()
            .map(parse_period)
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(site_id = %location.id, days = days.len(), "fetched site forecast");

        Ok(Forecast {
            site_id: location.id,
            days,
        })
    }
}

/// Great-circle distance in kilometres.
fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

fn pick_nearest(sites: impl Iterator<Item = Site>, coords: Coordinates) -> Option<Site> {
    sites
        .map(|site| {
            let dist = haversine_km(coords, Coordinates::new(site.longitude, site.latitude));
            (dist, site)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, site)| site)
}

// DataPoint encodes every scalar as a JSON string, including the "$" field
// holding minutes after midnight.

#[derive(Debug, Deserialize)]
struct DpSitelistResponse {
    #[serde(rename = "Locations")]
    locations: DpLocations,
}

#[derive(Debug, Deserialize)]
struct DpLocations {
    #[serde(rename = "Location")]
    location: Vec<DpSiteEntry>,
}

#[derive(Debug, Deserialize)]
struct DpSiteEntry {
    id: String,
    name: String,
    latitude: String,
    longitude: String,
}

impl DpSiteEntry {
    /// Entries with unparseable coordinates are skipped rather than failing
    /// the whole sitelist.
    fn to_site(&self) -> Option<Site> {
        Some(Site {
            id: self.id.clone(),
            name: self.name.clone(),
            longitude: self.longitude.parse().ok()?,
            latitude: self.latitude.parse().ok()?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct DpForecastResponse {
    #[serde(rename = "SiteRep")]
    site_rep: DpSiteRep,
}

#[derive(Debug, Deserialize)]
struct DpSiteRep {
    #[serde(rename = "DV")]
    data: DpDataView,
}

#[derive(Debug, Deserialize)]
struct DpDataView {
    #[serde(rename = "Location")]
    location: DpForecastLocation,
}

#[derive(Debug, Deserialize)]
struct DpForecastLocation {
    #[serde(rename = "i")]
    id: String,
    #[serde(rename = "Period", default)]
    periods: Vec<DpPeriod>,
}

#[derive(Debug, Deserialize)]
struct DpPeriod {
    /// Date in the form "2026-08-07Z".
    value: String,
    #[serde(rename = "Rep", default)]
    reps: Vec<DpRep>,
}

#[derive(Debug, Deserialize)]
struct DpRep {
    /// Minutes after midnight.
    #[serde(rename = "$")]
    minutes: String,
    #[serde(rename = "T")]
    temperature: String,
    #[serde(rename = "Pp")]
    precipitation_prob: String,
    #[serde(rename = "S")]
    wind_speed: String,
    #[serde(rename = "G")]
    wind_gust: String,
}

fn parse_period(period: &DpPeriod) -> Result<DayForecast> {
    let date = parse_period_date(&period.value)?;
    let timesteps = period
        .reps
        .iter()
        .map(parse_rep)
        .collect::<Result<Vec<_>>>()?;

    Ok(DayForecast { date, timesteps })
}

fn parse_period_date(value: &str) -> Result<NaiveDate> {
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .with_context(|| format!("Failed to parse DataPoint period date '{value}'"))
}

fn parse_rep(rep: &DpRep) -> Result<Timestep> {
    let minutes: u32 = rep
        .minutes
        .parse()
        .with_context(|| format!("Failed to parse timestep offset '{}'", rep.minutes))?;

    Ok(Timestep {
        hour: minutes / 60,
        temperature: num("T", &rep.temperature)?,
        precipitation_prob: num("Pp", &rep.precipitation_prob)?,
        wind_speed: num("S", &rep.wind_speed)?,
        wind_gust: num("G", &rep.wind_gust)?,
    })
}

fn num(field: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("Failed to parse DataPoint field {field}='{value}'"))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}
