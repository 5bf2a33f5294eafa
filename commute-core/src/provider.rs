use crate::{
    Config,
    model::{Coordinates, Forecast, Site},
    provider::datapoint::DataPointProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod datapoint;

/// Forecast resolution understood by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
    ThreeHourly,
    Daily,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::ThreeHourly => "3hourly",
            Resolution::Daily => "daily",
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two calls the forecaster needs from a weather service.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Resolve the forecast site closest to the given coordinates.
    async fn nearest_site(&self, coords: Coordinates) -> anyhow::Result<Site>;

    /// Retrieve the multi-day forecast for a site.
    async fn forecast_for_site(
        &self,
        site_id: &str,
        resolution: Resolution,
    ) -> anyhow::Result<Forecast>;
}

/// Construct the DataPoint provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastProvider>> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
             Hint: run `commute configure` and enter your DataPoint API key."
        )
    })?;

    Ok(Box::new(DataPointProvider::new(api_key.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn resolution_as_str() {
        assert_eq!(Resolution::ThreeHourly.as_str(), "3hourly");
        assert_eq!(Resolution::Daily.as_str(), "daily");
        assert_eq!(Resolution::ThreeHourly.to_string(), "3hourly");
    }

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            ..Config::default()
        };

        let provider = provider_from_config(&cfg);
        assert!(provider.is_ok());
    }
}
