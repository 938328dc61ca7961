//! Forward projection from geographic coordinates into a planar CRS
//!
//! The projected distance method only needs a forward transform, so this module
//! defines the narrow [`Projector`] seam and ships a single adapter for the
//! spherical Web Mercator system.

use crate::utils;
use geo::Point;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a coordinate reference system, by EPSG code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Crs(pub u32);

impl Crs {
    /// Geographic WGS84 (longitude, latitude in degrees)
    pub const WGS84: Crs = Crs(4326);
    /// Spherical ("pseudo") Web Mercator, meters
    pub const WEB_MERCATOR: Crs = Crs(3857);
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    /// Accepts `EPSG:3857`, `epsg:3857` or a bare `3857`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let code = match s.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            Some(_) => return Err(ProjectionError::InvalidCrs(s.to_string())),
            None => s,
        };
        code.trim()
            .parse::<u32>()
            .map(Crs)
            .map_err(|_| ProjectionError::InvalidCrs(s.to_string()))
    }
}

/// Failure of a forward projection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProjectionError {
    #[error("Unsupported target CRS: {0}")]
    UnsupportedCrs(Crs),

    #[error("Invalid CRS identifier: {0}")]
    InvalidCrs(String),

    #[error("Coordinate ({lon}, {lat}) is outside the domain of {crs}")]
    OutOfDomain { lon: f64, lat: f64, crs: Crs },

    #[error("Projection of ({lon}, {lat}) did not produce a finite result")]
    NonFinite { lon: f64, lat: f64 },
}

/// A forward geographic-to-planar transform
///
/// Implementations must be stateless from the caller's point of view; any
/// caching is their own business.
pub trait Projector: Send + Sync {
    /// Project `(lon, lat)` in degrees into `target`, returning `(x, y)` in meters
    fn forward(&self, lon: f64, lat: f64, target: Crs) -> Result<Point<f64>, ProjectionError>;
}

/// Spherical Web Mercator (EPSG:3857) projector
///
/// Defined for every latitude strictly between the poles. Points above the
/// ±85.05° tile edge are projected as well, only the poles themselves map to
/// infinity and are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebMercator;

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl Projector for WebMercator {
    fn forward(&self, lon: f64, lat: f64, target: Crs) -> Result<Point<f64>, ProjectionError> {
        if target != Crs::WEB_MERCATOR {
            return Err(ProjectionError::UnsupportedCrs(target));
        }
        let inside = lat.abs() < 90.0 && (-180.0..=180.0).contains(&lon);
        if !inside {
            return Err(ProjectionError::OutOfDomain {
                lon,
                lat,
                crs: target,
            });
        }

        let point = utils::wgs84_to_mercator(lat, lon);
        if !point.x().is_finite() || !point.y().is_finite() {
            return Err(ProjectionError::NonFinite { lon, lat });
        }
        Ok(point)
    }
}
