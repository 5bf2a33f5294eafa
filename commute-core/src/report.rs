use anyhow::{Context, Result};
use std::path::Path;

use crate::model::{CommuteReport, CommuteResults};

/// Fixed name of the results file, overwritten on each run.
pub const RESULTS_FILE: &str = "forecast_results.csv";

/// Render a message centred in a fixed-width box.
pub fn boxed(msg: &str) -> String {
    let width = msg.len().max(68) + 10;
    let pad = width - msg.len();
    let left = pad / 2;
    let right = pad - left;

    format!(
        "{rule}\n|{space_l}{msg}{space_r}|\n{rule}",
        rule = "-".repeat(width + 2),
        space_l = " ".repeat(left),
        space_r = " ".repeat(right),
    )
}

/// "8AM" / "5PM" style label for an hour of day.
pub fn am_or_pm(hour: u32) -> String {
    if hour < 12 {
        format!("{hour}AM")
    } else {
        format!("{}PM", hour - 12)
    }
}

fn direction_label(direction: Option<&'static str>) -> &'static str {
    direction.unwrap_or("?")
}

/// Print the five boxed report lines to stdout.
pub fn print_report(report: &CommuteReport) {
    let results = &report.results;

    println!(
        "{}",
        boxed(&format!(
            "Commuting in at {}({}), out at {}({})",
            am_or_pm(report.in_time),
            direction_label(report.in_direction),
            am_or_pm(report.out_time),
            direction_label(report.out_direction),
        ))
    );
    println!(
        "{}",
        boxed(&format!(
            "Rain In: {:.1}%, Rain out: {:.1}%",
            results.in_rain, results.out_rain
        ))
    );
    println!(
        "{}",
        boxed(&format!(
            "Temperature In: {:.1}degrees, Temperature out: {:.1}degrees",
            results.in_temp, results.out_temp
        ))
    );
    println!(
        "{}",
        boxed(&format!(
            "Wind In: {:.1}mph, Wind out: {:.1}mph",
            results.in_wind, results.out_wind
        ))
    );
    println!(
        "{}",
        boxed(&format!(
            "Gusts In: {:.1}mph, Gusts out: {:.1}mph",
            results.in_gust, results.out_gust
        ))
    );
}

/// Write the results as `Metric,Value` rows, replacing any previous file.
pub fn write_results(results: &CommuteResults, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open results file: {}", path.display()))?;

    writer
        .write_record(["Metric", "Value"])
        .context("Failed to write results header")?;

    for (metric, value) in results.rows() {
        writer
            .write_record([metric, value.to_string().as_str()])
            .with_context(|| format!("Failed to write result row '{metric}'"))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush results file: {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote commute results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_results() -> CommuteResults {
        CommuteResults {
            in_rain: 14.0,
            out_rain: 16.0,
            in_temp: 38.0 / 3.0,
            out_temp: 15.5,
            in_wind: 7.0,
            out_wind: 10.0,
            in_gust: 15.0,
            out_gust: 21.5,
        }
    }

    #[test]
    fn am_or_pm_labels() {
        assert_eq!(am_or_pm(8), "8AM");
        assert_eq!(am_or_pm(0), "0AM");
        assert_eq!(am_or_pm(17), "5PM");
        assert_eq!(am_or_pm(12), "0PM");
    }

    #[test]
    fn boxed_has_minimum_width() {
        let text = boxed("hi");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].len(), 80);
        assert_eq!(lines[1].len(), 80);
        assert!(lines[1].starts_with('|') && lines[1].ends_with('|'));
        assert!(lines[1].contains("hi"));
    }

    #[test]
    fn boxed_grows_with_long_messages() {
        let msg = "x".repeat(100);
        let text = boxed(&msg);
        let lines: Vec<&str> = text.lines().collect();

        // 10 columns of padding plus the two borders.
        assert_eq!(lines[0].len(), 112);
        assert_eq!(lines[1].len(), 112);
    }

    #[test]
    fn results_round_trip_through_csv() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(RESULTS_FILE);

        let results = sample_results();
        write_results(&results, &path).expect("write");

        let mut reader = csv::Reader::from_path(&path).expect("open");
        assert_eq!(
            reader.headers().expect("headers"),
            &csv::StringRecord::from(vec!["Metric", "Value"])
        );

        let mut read_back = HashMap::new();
        for record in reader.records() {
            let record = record.expect("record");
            let value: f64 = record[1].parse().expect("float value");
            read_back.insert(record[0].to_string(), value);
        }

        assert_eq!(read_back.len(), 8);
        for (metric, value) in results.rows() {
            let got = read_back[metric];
            assert!((got - value).abs() < 1e-9, "{metric}: {got} != {value}");
        }
    }

    #[test]
    fn rewrite_replaces_previous_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(RESULTS_FILE);

        write_results(&sample_results(), &path).expect("first write");

        let updated = CommuteResults {
            in_rain: 0.0,
            ..sample_results()
        };
        write_results(&updated, &path).expect("second write");

        let contents = std::fs::read_to_string(&path).expect("read");
        let rows = contents.lines().count();
        assert_eq!(rows, 9);
        assert!(contents.contains("in_rain,0"));
    }
}
