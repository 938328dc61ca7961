use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use track_kinematics_lib::{Config, Crs, utils};

/// Output renderings of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns for reading in a terminal
    Table,
    /// One row per point, for spreadsheets and plotting tools
    Csv,
    /// The full report, pretty-printed
    Json,
}

/// Distance, elapsed time and speed between consecutive track points,
/// computed with a planar projection, the haversine formula and the
/// spherical law of cosines.
#[derive(Parser, Debug, Clone)]
#[command(name = "track-kinematics", version, about)]
pub struct Cli {
    /// JSON file holding an array of records, or an object with a `photos` array
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Sphere radius in meters for the haversine and law-of-cosines methods
    #[arg(long, default_value_t = utils::EARTH_RADIUS_METERS)]
    pub earth_radius: f64,

    /// chrono format of the capture timestamps
    #[arg(long, default_value = "%Y-%m-%d %H:%M:%S")]
    pub time_format: String,

    /// Planar CRS for the projected method
    #[arg(long, default_value = "EPSG:3857")]
    pub crs: Crs,

    /// Segment count from which segments are computed in parallel
    #[arg(long, default_value_t = 4096)]
    pub parallel_threshold: usize,

    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            earth_radius_meters: self.earth_radius,
            time_format: self.time_format.clone(),
            projection_crs: self.crs,
            parallel_threshold: self.parallel_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_config() {
        let cli = Cli::try_parse_from(["track-kinematics", "photos.json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.config(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "track-kinematics",
            "photos.json",
            "--format",
            "csv",
            "--earth-radius",
            "6378137",
            "--crs",
            "epsg:3857",
            "--parallel-threshold",
            "1",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
        let config = cli.config();
        assert_eq!(config.earth_radius_meters, 6_378_137.0);
        assert_eq!(config.projection_crs, Crs::WEB_MERCATOR);
        assert_eq!(config.parallel_threshold, 1);
    }

    #[test]
    fn test_rejects_bad_crs() {
        assert!(Cli::try_parse_from(["track-kinematics", "photos.json", "--crs", "x:y"]).is_err());
    }
}
