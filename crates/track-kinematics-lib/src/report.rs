//! Output of a metrics computation
//!
//! A [`MetricsReport`] is built once by the computer and only read afterwards.
//! Besides the raw per-segment and cumulative records it exposes flat series
//! per method, which is what charting and tabular outputs consume.

use crate::{DistanceMethod, KinematicsError, Track};
#[cfg(feature = "serde")]
use serde::Serialize;
use std::collections::BTreeMap;

/// Why a speed could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum UndefinedSpeed {
    /// Some distance was covered in zero elapsed seconds
    ZeroElapsedTime,
    /// No distance and no elapsed time (duplicate observation)
    Stationary,
}

/// Speed of a segment under one distance method
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub enum Speed {
    MetersPerSecond(f64),
    Undefined(UndefinedSpeed),
}

impl Speed {
    /// `distance / elapsed`, or the matching sentinel when no time elapsed
    pub fn from_distance(distance_meters: f64, elapsed_seconds: i64) -> Self {
        if elapsed_seconds == 0 {
            if distance_meters == 0.0 {
                Speed::Undefined(UndefinedSpeed::Stationary)
            } else {
                Speed::Undefined(UndefinedSpeed::ZeroElapsedTime)
            }
        } else {
            Speed::MetersPerSecond(distance_meters / elapsed_seconds as f64)
        }
    }

    #[inline]
    pub fn meters_per_second(&self) -> Option<f64> {
        match self {
            Speed::MetersPerSecond(value) => Some(*value),
            Speed::Undefined(_) => None,
        }
    }

    /// Plain value for plotting, NaN when undefined
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.meters_per_second().unwrap_or(f64::NAN)
    }
}

#[cfg(feature = "serde")]
fn serialize_errors<S: serde::Serializer>(
    errors: &[KinematicsError],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}

/// Metrics for the consecutive pair `(index, index + 1)`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct SegmentMetrics {
    pub(crate) index: usize,
    pub(crate) elapsed_seconds: i64,
    pub(crate) distances: BTreeMap<DistanceMethod, f64>,
    pub(crate) speeds: BTreeMap<DistanceMethod, Speed>,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_errors"))]
    pub(crate) failures: Vec<KinematicsError>,
}

impl SegmentMetrics {
    /// Index of the segment's first point
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whole seconds between both points, never negative
    #[inline]
    pub fn elapsed_seconds(&self) -> i64 {
        self.elapsed_seconds
    }

    /// Distance in meters, `None` if the method failed on this segment
    #[inline]
    pub fn distance(&self, method: DistanceMethod) -> Option<f64> {
        self.distances.get(&method).copied()
    }

    #[inline]
    pub fn speed(&self, method: DistanceMethod) -> Option<Speed> {
        self.speeds.get(&method).copied()
    }

    pub fn distances(&self) -> &BTreeMap<DistanceMethod, f64> {
        &self.distances
    }

    pub fn speeds(&self) -> &BTreeMap<DistanceMethod, Speed> {
        &self.speeds
    }

    /// Per-method failures that left a gap in this segment
    pub fn failures(&self) -> &[KinematicsError] {
        &self.failures
    }
}

/// Running distance totals at one point of the track
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CumulativeMetrics {
    pub(crate) totals: BTreeMap<DistanceMethod, f64>,
}

impl CumulativeMetrics {
    /// All methods at zero, the state at the first point
    pub(crate) fn zero(methods: &[DistanceMethod]) -> Self {
        Self {
            totals: methods.iter().map(|&method| (method, 0.0)).collect(),
        }
    }

    /// Total distance covered up to this point, `None` once the method has failed
    #[inline]
    pub fn total(&self, method: DistanceMethod) -> Option<f64> {
        self.totals.get(&method).copied()
    }

    pub fn totals(&self) -> &BTreeMap<DistanceMethod, f64> {
        &self.totals
    }
}

/// Whole-track figures for one method
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MethodSummary {
    pub method: DistanceMethod,
    /// `None` if any segment failed under this method
    pub total_distance_meters: Option<f64>,
    /// Total distance over total elapsed time
    pub mean_speed: Option<Speed>,
    pub failed_segments: usize,
}

/// Everything computed for a track
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MetricsReport<'t> {
    track: &'t Track,
    methods: Vec<DistanceMethod>,
    segments: Vec<SegmentMetrics>,
    cumulative: Vec<CumulativeMetrics>,
}

impl<'t> MetricsReport<'t> {
    pub(crate) fn new(
        track: &'t Track,
        methods: Vec<DistanceMethod>,
        segments: Vec<SegmentMetrics>,
        cumulative: Vec<CumulativeMetrics>,
    ) -> Self {
        debug_assert_eq!(segments.len(), track.segment_count());
        debug_assert_eq!(cumulative.len(), track.len());
        Self {
            track,
            methods,
            segments,
            cumulative,
        }
    }

    #[inline]
    pub fn track(&self) -> &'t Track {
        self.track
    }

    /// Methods that were run, in report order
    #[inline]
    pub fn methods(&self) -> &[DistanceMethod] {
        &self.methods
    }

    /// One entry per consecutive pair (N - 1)
    #[inline]
    pub fn segments(&self) -> &[SegmentMetrics] {
        &self.segments
    }

    /// One entry per point (N), starting at zero
    #[inline]
    pub fn cumulative(&self) -> &[CumulativeMetrics] {
        &self.cumulative
    }

    /// True when the track had fewer than two points
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segment distances under `method`, NaN where it failed
    pub fn distance_series(&self, method: DistanceMethod) -> Vec<f64> {
        self.segments
            .iter()
            .map(|s| s.distance(method).unwrap_or(f64::NAN))
            .collect()
    }

    /// Cumulative distances under `method`, NaN once it failed
    pub fn cumulative_series(&self, method: DistanceMethod) -> Vec<f64> {
        self.cumulative
            .iter()
            .map(|c| c.total(method).unwrap_or(f64::NAN))
            .collect()
    }

    /// Segment speeds under `method`, NaN where undefined or failed
    pub fn speed_series(&self, method: DistanceMethod) -> Vec<f64> {
        self.segments
            .iter()
            .map(|s| s.speed(method).map_or(f64::NAN, |speed| speed.as_f64()))
            .collect()
    }

    pub fn elapsed_series(&self) -> Vec<i64> {
        self.segments.iter().map(|s| s.elapsed_seconds).collect()
    }

    pub fn total_elapsed_seconds(&self) -> i64 {
        self.segments.iter().map(|s| s.elapsed_seconds).sum()
    }

    /// Distance over the whole track, `None` if the method failed anywhere
    pub fn total_distance(&self, method: DistanceMethod) -> Option<f64> {
        self.cumulative.last().and_then(|c| c.total(method))
    }

    /// Every per-method failure, in segment order
    pub fn failures(&self) -> impl Iterator<Item = &KinematicsError> {
        self.segments.iter().flat_map(|s| s.failures.iter())
    }

    pub fn summary(&self) -> Vec<MethodSummary> {
        let total_elapsed = self.total_elapsed_seconds();
        self.methods
            .iter()
            .map(|&method| {
                let total_distance_meters = self.total_distance(method);
                MethodSummary {
                    method,
                    total_distance_meters,
                    mean_speed: total_distance_meters
                        .filter(|_| !self.is_empty())
                        .map(|distance| Speed::from_distance(distance, total_elapsed)),
                    failed_segments: self
                        .segments
                        .iter()
                        .filter(|s| s.distance(method).is_none())
                        .count(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_from_distance() {
        assert_eq!(
            Speed::from_distance(100.0, 10),
            Speed::MetersPerSecond(10.0)
        );
        assert_eq!(
            Speed::from_distance(5.0, 0),
            Speed::Undefined(UndefinedSpeed::ZeroElapsedTime)
        );
        assert_eq!(
            Speed::from_distance(0.0, 0),
            Speed::Undefined(UndefinedSpeed::Stationary)
        );
        assert_eq!(Speed::from_distance(0.0, 3), Speed::MetersPerSecond(0.0));
    }

    #[test]
    fn test_undefined_speed_is_nan_not_infinite() {
        let speed = Speed::from_distance(5.0, 0);
        assert_eq!(speed.meters_per_second(), None);
        assert!(speed.as_f64().is_nan());
    }

    #[test]
    fn test_cumulative_zero() {
        let zero = CumulativeMetrics::zero(&DistanceMethod::ALL);
        for method in DistanceMethod::ALL {
            assert_eq!(zero.total(method), Some(0.0));
        }
        assert_eq!(CumulativeMetrics::default().total(DistanceMethod::Haversine), None);
    }
}
