use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};

use commute_core::{Config, Coordinates, Forecaster, provider_from_config, report};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "commute", version, about = "Commute weather forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the DataPoint API key, route coordinates and commute hours.
    Configure,

    /// Fetch today's forecast and print the commute report.
    Run {
        /// Also write the results to forecast_results.csv in the current directory.
        #[arg(long)]
        write: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Run { write } => run_forecast(write).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Text::new("DataPoint API key:")
        .with_initial_value(cfg.api_key.as_deref().unwrap_or(""))
        .prompt()?;
    cfg.api_key = Some(api_key);

    cfg.home = Some(prompt_coords("Home", cfg.home)?);
    cfg.work = Some(prompt_coords("Work", cfg.work)?);

    cfg.in_time = CustomType::<f64>::new("Commute in at (hour of day, e.g. 8 or 8.5):")
        .with_default(cfg.in_time)
        .prompt()?;
    cfg.out_time = CustomType::<f64>::new("Commute out at (hour of day):")
        .with_default(cfg.out_time)
        .prompt()?;

    cfg.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

fn prompt_coords(label: &str, existing: Option<Coordinates>) -> Result<Coordinates> {
    let longitude_msg = format!("{label} longitude:");
    let latitude_msg = format!("{label} latitude:");

    let mut longitude = CustomType::<f64>::new(&longitude_msg);
    let mut latitude = CustomType::<f64>::new(&latitude_msg);

    if let Some(coords) = existing {
        longitude = longitude.with_default(coords.longitude);
        latitude = latitude.with_default(coords.latitude);
    }

    Ok(Coordinates::new(longitude.prompt()?, latitude.prompt()?))
}

async fn run_forecast(write: bool) -> Result<()> {
    let cfg = Config::load()?;
    let provider = provider_from_config(&cfg)?;

    let forecaster = Forecaster::new(
        provider,
        cfg.home_coords()?,
        cfg.work_coords()?,
        cfg.in_time,
        cfg.out_time,
        cfg.forecast_day(),
    );

    let report = forecaster.produce().await?;
    report::print_report(&report);

    if write {
        report::write_results(&report.results, Path::new(report::RESULTS_FILE))?;
        println!("Wrote {}", report::RESULTS_FILE);
    }

    Ok(())
}
