//! Track Kinematics Library - Distance, Time and Speed along GPS Tracks
//!
//! This library turns an ordered sequence of geotagged, timestamped observations
//! (for example photo capture points along a walk) into per-segment distances,
//! running totals, elapsed times and speeds. Every distance is computed with three
//! independent geometric models so they can be compared side by side.
//!
//! # Architecture
//!
//! - **[`GeoPoint`]** / **[`Track`]**: Validated, immutable input points
//! - **[`DistanceCalculator`]**: Swappable distance strategies ([`Projected`],
//!   [`Haversine`], [`SphericalLawOfCosines`])
//! - **[`Projector`]**: Forward projection into a planar CRS ([`WebMercator`])
//! - **[`TrackMetricsComputer`]**: Runs a track through every calculator
//! - **[`MetricsReport`]**: Per-segment and cumulative results
//!
//! # Example
//!
//! ```
//! use track_kinematics_lib::{Config, DistanceMethod, RawPoint, Track, TrackMetricsComputer};
//!
//! let config = Config::default();
//! let records = vec![
//!     RawPoint::new(0.0, 0.0, "2020-01-01 10:00:00"),
//!     RawPoint::new(0.0, 0.001, "2020-01-01 10:00:10"),
//! ];
//! let track = Track::from_records(&records, &config.time_format).unwrap();
//! let computer = TrackMetricsComputer::new(config).unwrap();
//! let report = computer.compute(&track).unwrap();
//!
//! assert_eq!(report.segments().len(), 1);
//! let meters = report.segments()[0].distance(DistanceMethod::Haversine).unwrap();
//! assert!((meters - 111.19).abs() < 0.01);
//! ```

mod computer;
mod config;
mod distance;
mod point;
mod projection;
mod report;
pub mod utils;

// Public API exports
pub use computer::TrackMetricsComputer;
pub use config::Config;
pub use distance::{
    DistanceCalculator, DistanceError, DistanceMethod, Endpoint, Haversine, Projected,
    SphericalLawOfCosines,
};
pub use point::{GeoPoint, InvalidField, PointField, RawCoordinate, RawPoint, Track};
pub use projection::{Crs, ProjectionError, Projector, WebMercator};
pub use report::{
    CumulativeMetrics, MethodSummary, MetricsReport, SegmentMetrics, Speed, UndefinedSpeed,
};

/// Error types for the kinematics core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KinematicsError {
    #[error("Malformed point at index {index}: invalid {field}: {reason}")]
    MalformedPoint {
        index: usize,
        field: PointField,
        reason: String,
    },

    #[error("Non-monotonic time at segment {segment}: time goes back by {seconds_back}s")]
    NonMonotonicTime { segment: usize, seconds_back: f64 },

    #[error("Projection failure for point {point_index} ({method}): {source}")]
    ProjectionFailure {
        point_index: usize,
        method: DistanceMethod,
        #[source]
        source: ProjectionError,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, KinematicsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Config) -> Result<TrackMetricsComputer> = TrackMetricsComputer::new;
        let _: fn() -> Config = Config::default;
    }

    #[test]
    fn test_error_messages_locate_the_input() {
        let err = KinematicsError::MalformedPoint {
            index: 3,
            field: PointField::Latitude,
            reason: "not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed point at index 3: invalid latitude: not a number"
        );

        let err = KinematicsError::NonMonotonicTime {
            segment: 7,
            seconds_back: 12.0,
        };
        assert!(err.to_string().contains("segment 7"));
        assert!(err.to_string().ends_with("by 12s"));
    }
}
