//! TrackMetricsComputer - runs a track through every distance method
//!
//! The pass has three steps: elapsed times (which also validates time order),
//! per-segment distances and speeds, then the cumulative scan. The middle step
//! has no cross-segment dependency and runs on the rayon pool for large tracks.

use crate::report::{CumulativeMetrics, MetricsReport, SegmentMetrics, Speed};
use crate::{
    Config, DistanceCalculator, DistanceError, DistanceMethod, GeoPoint, Haversine,
    KinematicsError, Projected, Projector, Result, SphericalLawOfCosines, Track, WebMercator,
};
use chrono::TimeDelta;
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Computes a [`MetricsReport`] for a [`Track`]
pub struct TrackMetricsComputer {
    config: Config,
    calculators: Vec<Box<dyn DistanceCalculator>>,
}

impl std::fmt::Debug for TrackMetricsComputer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackMetricsComputer")
            .field("config", &self.config)
            .field("methods", &self.methods())
            .finish()
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl TrackMetricsComputer {
    /// Create a computer running the three standard methods, projecting with [`WebMercator`]
    pub fn new(config: Config) -> Result<Self> {
        Self::with_projector(config, WebMercator)
    }

    /// Create a computer running the three standard methods with a custom projector
    pub fn with_projector<P: Projector + 'static>(config: Config, projector: P) -> Result<Self> {
        let calculators: Vec<Box<dyn DistanceCalculator>> = vec![
            Box::new(Projected::new(projector, config.projection_crs)),
            Box::new(Haversine {
                radius_meters: config.earth_radius_meters,
            }),
            Box::new(SphericalLawOfCosines {
                radius_meters: config.earth_radius_meters,
            }),
        ];
        Self::with_calculators(config, calculators)
    }

    /// Create a computer running an arbitrary set of methods
    ///
    /// Each method may appear only once.
    pub fn with_calculators(
        config: Config,
        calculators: Vec<Box<dyn DistanceCalculator>>,
    ) -> Result<Self> {
        config.validate()?;
        if calculators.is_empty() {
            return Err(KinematicsError::InvalidConfig(
                "at least one distance method is required".to_string(),
            ));
        }
        let mut seen = Vec::with_capacity(calculators.len());
        for calculator in &calculators {
            let method = calculator.method();
            if seen.contains(&method) {
                return Err(KinematicsError::InvalidConfig(format!(
                    "distance method {method} registered twice"
                )));
            }
            seen.push(method);
        }
        Ok(Self {
            config,
            calculators,
        })
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Methods in the order they are run
    pub fn methods(&self) -> Vec<DistanceMethod> {
        self.calculators.iter().map(|c| c.method()).collect()
    }

    /// Compute all metrics for `track`
    ///
    /// Fails only on time going backwards; per-method projection failures are
    /// recorded in the affected segments instead.
    pub fn compute<'t>(&self, track: &'t Track) -> Result<MetricsReport<'t>> {
        #[cfg(feature = "profiling")]
        profiling::scope!("computer::compute");

        let methods = self.methods();
        if track.len() < 2 {
            tracing::debug!(
                "Track has {} point(s), no segments to compute",
                track.len()
            );
            let cumulative = track
                .points()
                .iter()
                .map(|_| CumulativeMetrics::zero(&methods))
                .collect();
            return Ok(MetricsReport::new(track, methods, Vec::new(), cumulative));
        }

        let elapsed = Self::elapsed_times(track)?;
        let points = track.points();
        let segment_count = track.segment_count();

        let segments: Vec<SegmentMetrics> = if segment_count >= self.config.parallel_threshold {
            tracing::debug!("Computing {segment_count} segments in parallel");
            (0..segment_count)
                .into_par_iter()
                .map(|i| self.segment(i, &points[i], &points[i + 1], elapsed[i]))
                .collect()
        } else {
            tracing::debug!("Computing {segment_count} segments");
            (0..segment_count)
                .map(|i| self.segment(i, &points[i], &points[i + 1], elapsed[i]))
                .collect()
        };

        for failure in segments.iter().flat_map(|s| s.failures()) {
            tracing::warn!("{failure}");
        }

        let cumulative = Self::accumulate(&methods, &segments);
        Ok(MetricsReport::new(track, methods, segments, cumulative))
    }

    /// Whole seconds between consecutive points
    ///
    /// Order is checked at full resolution, before truncation.
    fn elapsed_times(track: &Track) -> Result<Vec<i64>> {
        track
            .segments()
            .enumerate()
            .map(|(segment, (from, to))| {
                let delta = to.timestamp() - from.timestamp();
                if delta < TimeDelta::zero() {
                    return Err(KinematicsError::NonMonotonicTime {
                        segment,
                        seconds_back: (-delta).num_milliseconds() as f64 / 1000.0,
                    });
                }
                Ok(delta.num_seconds())
            })
            .collect()
    }

    fn segment(
        &self,
        index: usize,
        from: &GeoPoint,
        to: &GeoPoint,
        elapsed_seconds: i64,
    ) -> SegmentMetrics {
        let mut distances = BTreeMap::new();
        let mut speeds = BTreeMap::new();
        let mut failures = Vec::new();

        for calculator in &self.calculators {
            let method = calculator.method();
            match calculator.distance(from, to) {
                Ok(distance) => {
                    distances.insert(method, distance);
                    speeds.insert(method, Speed::from_distance(distance, elapsed_seconds));
                }
                Err(DistanceError::Projection { endpoint, source }) => {
                    failures.push(KinematicsError::ProjectionFailure {
                        point_index: index + endpoint.offset(),
                        method,
                        source,
                    });
                }
            }
        }

        SegmentMetrics {
            index,
            elapsed_seconds,
            distances,
            speeds,
            failures,
        }
    }

    /// Running totals in index order
    ///
    /// A method that fails on a segment has no total from the next point on.
    fn accumulate(
        methods: &[DistanceMethod],
        segments: &[SegmentMetrics],
    ) -> Vec<CumulativeMetrics> {
        let mut running = CumulativeMetrics::zero(methods);
        let mut cumulative = Vec::with_capacity(segments.len() + 1);
        cumulative.push(running.clone());

        for segment in segments {
            running = CumulativeMetrics {
                totals: running
                    .totals
                    .iter()
                    .filter_map(|(&method, &total)| {
                        segment.distance(method).map(|d| (method, total + d))
                    })
                    .collect(),
            };
            cumulative.push(running.clone());
        }
        cumulative
    }
}
