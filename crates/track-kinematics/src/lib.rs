//! Track Kinematics - command line front-end
//!
//! Loads a JSON track, runs it through
//! [`TrackMetricsComputer`](track_kinematics_lib::TrackMetricsComputer) and
//! prints the report on stdout. Logs go to stderr so the output stays pipeable.

pub mod cli;
pub mod input;
pub mod logging;
pub mod output;

pub use cli::{Cli, OutputFormat};

use std::io::Write;
use std::path::PathBuf;
use track_kinematics_lib::{KinematicsError, Track, TrackMetricsComputer};

/// Errors surfaced to the user
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("Cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Kinematics(#[from] KinematicsError),

    #[error("Cannot write output: {0}")]
    Write(#[source] std::io::Error),
}

/// Load, compute and render according to `cli`
pub fn run(cli: &Cli, out: &mut impl Write) -> Result<(), CliError> {
    #[cfg(feature = "profiling")]
    profiling::scope!("run");

    let config = cli.config();
    let records = input::load_records(&cli.input)?;
    tracing::info!("Loaded {} records from {}", records.len(), cli.input.display());

    let track = Track::from_records(&records, &config.time_format)?;
    let computer = TrackMetricsComputer::new(config)?;
    let report = computer.compute(&track)?;

    let failures = report.failures().count();
    if failures > 0 {
        tracing::warn!("{failures} per-method failure(s), affected values are left blank");
    }

    output::render(&report, cli.format, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn write_input(name: &str, json: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "track-kinematics-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, json).unwrap();
        path
    }

    fn run_on(path: &std::path::Path, format: &str) -> Result<String, CliError> {
        let cli = Cli::try_parse_from([
            "track-kinematics",
            path.to_str().unwrap(),
            "--format",
            format,
        ])
        .unwrap();
        let mut out = Vec::new();
        run(&cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_end_to_end_csv() {
        let path = write_input(
            "ok",
            r#"{"photos": [
                {"lat": "48.8584", "lng": "2.2945", "shot_date": "2017-07-14 10:00:00"},
                {"lat": "48.8590", "lng": "2.2950", "shot_date": "2017-07-14 10:01:00"},
                {"lat": "48.8600", "lng": "2.2960", "shot_date": "2017-07-14 10:03:00"}
            ]}"#,
        );
        let csv = run_on(&path, "csv").unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(csv.lines().count(), 4);
    }

    #[test]
    fn test_end_to_end_non_monotonic() {
        let path = write_input(
            "backwards",
            r#"[
                {"lat": 1, "lng": 1, "shot_date": "2017-07-14 10:01:00"},
                {"lat": 1, "lng": 2, "shot_date": "2017-07-14 10:00:00"}
            ]"#,
        );
        let err = run_on(&path, "table").unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            CliError::Kinematics(KinematicsError::NonMonotonicTime { segment: 0, .. })
        ));
    }

    #[test]
    fn test_end_to_end_malformed_point() {
        let path = write_input(
            "malformed",
            r#"[
                {"lat": 1, "lng": 1, "shot_date": "2017-07-14 10:00:00"},
                {"lat": 1, "lng": 2, "shot_date": "yesterday"}
            ]"#,
        );
        let err = run_on(&path, "json").unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            err,
            CliError::Kinematics(KinematicsError::MalformedPoint { index: 1, .. })
        ));
    }
}
