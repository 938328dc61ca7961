//! Explicit configuration for the kinematics computer and the point loader

use crate::{Crs, KinematicsError, Result, utils};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`TrackMetricsComputer`](crate::TrackMetricsComputer)
///
/// Nothing in the library reads process-wide state: every constant the
/// computation depends on is carried here.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Sphere radius used by the haversine and law-of-cosines methods.
    /// Default: 6,371,000 m (mean Earth radius)
    pub earth_radius_meters: f64,
    /// `chrono` format string for capture timestamps.
    /// Default: `%Y-%m-%d %H:%M:%S`
    pub time_format: String,
    /// Planar CRS used by the projected method. Default: EPSG:3857
    pub projection_crs: Crs,
    /// Minimum number of segments before the per-segment pass runs on the rayon pool.
    pub parallel_threshold: usize,
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Default for Config {
    fn default() -> Self {
        Self {
            earth_radius_meters: utils::EARTH_RADIUS_METERS,
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
            projection_crs: Crs::WEB_MERCATOR,
            parallel_threshold: 4096,
        }
    }
}

impl Config {
    /// Check that the configured constants can produce meaningful results
    pub fn validate(&self) -> Result<()> {
        if !self.earth_radius_meters.is_finite() || self.earth_radius_meters <= 0.0 {
            return Err(KinematicsError::InvalidConfig(format!(
                "earth radius must be positive and finite, got {}",
                self.earth_radius_meters
            )));
        }
        if self.time_format.trim().is_empty() {
            return Err(KinematicsError::InvalidConfig(
                "time format must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.earth_radius_meters, 6_371_000.0);
        assert_eq!(config.projection_crs, Crs::WEB_MERCATOR);
    }

    #[test]
    fn test_rejects_bad_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = Config {
                earth_radius_meters: radius,
                ..Config::default()
            };
            assert!(matches!(
                config.validate(),
                Err(KinematicsError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_rejects_empty_time_format() {
        let config = Config {
            time_format: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
