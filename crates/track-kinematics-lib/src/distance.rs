//! Distance methods
//!
//! Each method models the same physical quantity with a different
//! approximation, so results agree closely on short segments and drift apart
//! on long ones (flat vs spherical Earth). They are kept as independent
//! strategies behind [`DistanceCalculator`] so the computer never needs to know
//! which ones it runs.

use crate::{Crs, GeoPoint, ProjectionError, Projector, WebMercator, utils};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a distance method in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMethod {
    Projected,
    Haversine,
    SphericalLawOfCosines,
}

impl DistanceMethod {
    pub const ALL: [DistanceMethod; 3] = [
        DistanceMethod::Projected,
        DistanceMethod::Haversine,
        DistanceMethod::SphericalLawOfCosines,
    ];

    /// Short machine-friendly name
    pub fn name(self) -> &'static str {
        match self {
            DistanceMethod::Projected => "projected",
            DistanceMethod::Haversine => "haversine",
            DistanceMethod::SphericalLawOfCosines => "spherical_law_of_cosines",
        }
    }

    /// Human readable label
    pub fn label(self) -> &'static str {
        match self {
            DistanceMethod::Projected => "Planar projection",
            DistanceMethod::Haversine => "Haversine formula",
            DistanceMethod::SphericalLawOfCosines => "Spherical law of cosines",
        }
    }
}

impl fmt::Display for DistanceMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which end of a segment a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    From,
    To,
}

impl Endpoint {
    /// Offset of this endpoint from the segment's first point index
    pub fn offset(self) -> usize {
        match self {
            Endpoint::From => 0,
            Endpoint::To => 1,
        }
    }
}

/// Failure of a single method on a single segment
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DistanceError {
    #[error("projection of the {endpoint:?} point failed: {source}")]
    Projection {
        endpoint: Endpoint,
        #[source]
        source: ProjectionError,
    },
}

/// A distance strategy between two validated points
pub trait DistanceCalculator: Send + Sync {
    fn method(&self) -> DistanceMethod;

    /// Distance in meters, always non-negative and finite on success
    fn distance(&self, from: &GeoPoint, to: &GeoPoint) -> Result<f64, DistanceError>;
}

/// Great-circle distance through the haversine formula
#[derive(Debug, Clone, Copy)]
pub struct Haversine {
    pub radius_meters: f64,
}

impl Default for Haversine {
    fn default() -> Self {
        Self {
            radius_meters: utils::EARTH_RADIUS_METERS,
        }
    }
}

impl Haversine {
    /// `sin²(Δlat/2) + cos(latA)·cos(latB)·sin²(Δlng/2)`
    #[inline]
    pub fn haversine(from: &GeoPoint, to: &GeoPoint) -> f64 {
        let lat_a = from.latitude().to_radians();
        let lat_b = to.latitude().to_radians();
        let lng_a = from.longitude().to_radians();
        let lng_b = to.longitude().to_radians();
        utils::sin_squared_half(lat_a - lat_b)
            + lat_a.cos() * lat_b.cos() * utils::sin_squared_half(lng_a - lng_b)
    }

    #[inline]
    pub fn meters(&self, from: &GeoPoint, to: &GeoPoint) -> f64 {
        let s = Self::haversine(from, to);
        utils::arc_length(2.0 * utils::clamped_asin_sqrt(s), self.radius_meters)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl DistanceCalculator for Haversine {
    fn method(&self) -> DistanceMethod {
        DistanceMethod::Haversine
    }

    fn distance(&self, from: &GeoPoint, to: &GeoPoint) -> Result<f64, DistanceError> {
        Ok(self.meters(from, to))
    }
}

/// Great-circle distance through the spherical law of cosines
///
/// The north pole is the third vertex of the spherical triangle, so two sides
/// are the co-latitudes and the angle between them is the longitude gap.
#[derive(Debug, Clone, Copy)]
pub struct SphericalLawOfCosines {
    pub radius_meters: f64,
}

impl Default for SphericalLawOfCosines {
    fn default() -> Self {
        Self {
            radius_meters: utils::EARTH_RADIUS_METERS,
        }
    }
}

impl SphericalLawOfCosines {
    /// Central angle between both points in radians
    #[inline]
    pub fn central_angle(from: &GeoPoint, to: &GeoPoint) -> f64 {
        // acos loses all precision near 1, coincident points would land a few cm apart
        if from.same_position(to) {
            return 0.0;
        }
        let ac = (90.0 - from.latitude()).to_radians();
        let bc = (90.0 - to.latitude()).to_radians();
        let gamma = (from.longitude() - to.longitude()).abs().to_radians();

        let cos_ab = ac.cos() * bc.cos() + ac.sin() * bc.sin() * gamma.cos();
        utils::clamped_acos(cos_ab)
    }

    #[inline]
    pub fn meters(&self, from: &GeoPoint, to: &GeoPoint) -> f64 {
        utils::arc_length(Self::central_angle(from, to), self.radius_meters)
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl DistanceCalculator for SphericalLawOfCosines {
    fn method(&self) -> DistanceMethod {
        DistanceMethod::SphericalLawOfCosines
    }

    fn distance(&self, from: &GeoPoint, to: &GeoPoint) -> Result<f64, DistanceError> {
        Ok(self.meters(from, to))
    }
}

/// Euclidean distance between both points after forward projection
///
/// Only accurate over short distances, no scale-factor correction is applied.
#[derive(Debug, Clone)]
pub struct Projected<P = WebMercator> {
    projector: P,
    target: Crs,
}

impl Projected<WebMercator> {
    /// Euclidean distance in EPSG:3857
    pub fn web_mercator() -> Self {
        Self::new(WebMercator, Crs::WEB_MERCATOR)
    }
}

impl Default for Projected<WebMercator> {
    fn default() -> Self {
        Self::web_mercator()
    }
}

impl<P: Projector> Projected<P> {
    pub fn new(projector: P, target: Crs) -> Self {
        Self { projector, target }
    }

    pub fn target(&self) -> Crs {
        self.target
    }

    fn project(
        &self,
        point: &GeoPoint,
        endpoint: Endpoint,
    ) -> Result<geo::Point<f64>, DistanceError> {
        self.projector
            .forward(point.longitude(), point.latitude(), self.target)
            .map_err(|source| DistanceError::Projection { endpoint, source })
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl<P: Projector> DistanceCalculator for Projected<P> {
    fn method(&self) -> DistanceMethod {
        DistanceMethod::Projected
    }

    fn distance(&self, from: &GeoPoint, to: &GeoPoint) -> Result<f64, DistanceError> {
        // Coincident points are 0 apart even where the projection is undefined (poles)
        if from.same_position(to) {
            return Ok(0.0);
        }
        let a = self.project(from, Endpoint::From)?;
        let b = self.project(to, Endpoint::To)?;
        Ok(utils::planar_distance(a, b))
    }
}
