use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::model::{Coordinates, ForecastDay};

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// api_key = "..."
/// in_time = 8.0
/// out_time = 17.0
///
/// [home]
/// longitude = -2.788885
/// latitude = 54.039055
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Met Office DataPoint API key.
    pub api_key: Option<String>,

    /// Commute-in hour of day; fractional values are rounded at run time.
    #[serde(default = "default_in_time")]
    pub in_time: f64,

    /// Commute-out hour of day.
    #[serde(default = "default_out_time")]
    pub out_time: f64,

    /// Report on tomorrow's forecast instead of today's, so every
    /// 3-hourly timestep is still ahead of both commute hours.
    #[serde(default)]
    pub use_test_day: bool,

    // Tables last so TOML serialization stays valid.
    pub home: Option<Coordinates>,
    pub work: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            in_time: default_in_time(),
            out_time: default_out_time(),
            use_test_day: false,
            home: None,
            work: None,
        }
    }
}

fn default_in_time() -> f64 {
    8.0
}

fn default_out_time() -> f64 {
    17.0
}

impl Config {
    pub fn home_coords(&self) -> Result<Coordinates> {
        self.home.ok_or_else(|| {
            anyhow!(
                "No home coordinates configured.\n\
                 Hint: run `commute configure` and enter your route."
            )
        })
    }

    pub fn work_coords(&self) -> Result<Coordinates> {
        self.work.ok_or_else(|| {
            anyhow!(
                "No work coordinates configured.\n\
                 Hint: run `commute configure` and enter your route."
            )
        })
    }

    pub fn forecast_day(&self) -> ForecastDay {
        if self.use_test_day {
            ForecastDay::TestDay
        } else {
            ForecastDay::Today
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "commute-forecast", "commute-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_coords_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.home_coords().unwrap_err();

        assert!(err.to_string().contains("No home coordinates configured"));
        assert!(err.to_string().contains("Hint: run `commute configure`"));
    }

    #[test]
    fn default_commute_times() {
        let cfg = Config::default();

        assert_eq!(cfg.in_time, 8.0);
        assert_eq!(cfg.out_time, 17.0);
        assert_eq!(cfg.forecast_day(), ForecastDay::Today);
    }

    #[test]
    fn test_day_flag_selects_tomorrow() {
        let cfg = Config {
            use_test_day: true,
            ..Config::default()
        };

        assert_eq!(cfg.forecast_day(), ForecastDay::TestDay);
        assert_eq!(cfg.forecast_day().index(), 1);
    }

    #[test]
    fn toml_round_trip_preserves_route() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            home: Some(Coordinates::new(-2.788885, 54.039055)),
            work: Some(Coordinates::new(-2.784804, 54.008047)),
            in_time: 7.5,
            out_time: 17.0,
            use_test_day: true,
        };

        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        let parsed: Config = toml::from_str(&toml).expect("parse");

        assert_eq!(parsed.api_key.as_deref(), Some("KEY"));
        assert_eq!(parsed.home, cfg.home);
        assert_eq!(parsed.work, cfg.work);
        assert_eq!(parsed.in_time, 7.5);
        assert!(parsed.use_test_day);
    }

    #[test]
    fn partial_config_falls_back_to_default_times() {
        let parsed: Config = toml::from_str("api_key = \"KEY\"").expect("parse");

        assert_eq!(parsed.in_time, 8.0);
        assert_eq!(parsed.out_time, 17.0);
        assert!(!parsed.use_test_day);
    }
}
