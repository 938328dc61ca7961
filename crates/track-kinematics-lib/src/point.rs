//! Validated track points and their raw input form
//!
//! Raw records come from an external loader with loosely typed fields
//! (numbers or numeric strings, timestamp strings). They are parsed once into
//! immutable [`GeoPoint`]s; everything downstream works on typed data only.

use crate::{KinematicsError, Result};
use chrono::NaiveDateTime;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field of a raw record, used to locate parse failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PointField {
    Latitude,
    Longitude,
    Timestamp,
}

impl fmt::Display for PointField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PointField::Latitude => "latitude",
            PointField::Longitude => "longitude",
            PointField::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A coordinate as found in the input: either a number or a numeric string
#[derive(Debug, Clone, PartialEq)]
pub enum RawCoordinate {
    Number(f64),
    Text(String),
}

impl RawCoordinate {
    fn parse(&self) -> std::result::Result<f64, String> {
        match self {
            RawCoordinate::Number(value) => Ok(*value),
            RawCoordinate::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|e| format!("{text:?} is not a number ({e})")),
        }
    }
}

impl From<f64> for RawCoordinate {
    fn from(value: f64) -> Self {
        RawCoordinate::Number(value)
    }
}

impl From<&str> for RawCoordinate {
    fn from(value: &str) -> Self {
        RawCoordinate::Text(value.to_string())
    }
}

impl From<String> for RawCoordinate {
    fn from(value: String) -> Self {
        RawCoordinate::Text(value)
    }
}

/// An unvalidated input record
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub lat: RawCoordinate,
    pub lng: RawCoordinate,
    /// Capture time, formatted per [`Config::time_format`](crate::Config::time_format)
    pub shot_date: String,
}

impl RawPoint {
    pub fn new(
        lat: impl Into<RawCoordinate>,
        lng: impl Into<RawCoordinate>,
        shot_date: impl Into<String>,
    ) -> Self {
        Self {
            lat: lat.into(),
            lng: lng.into(),
            shot_date: shot_date.into(),
        }
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid {field}: {reason}")]
pub struct InvalidField {
    pub field: PointField,
    pub reason: String,
}

impl InvalidField {
    pub fn new(field: PointField, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    /// Attach the record position the field came from
    pub fn at(self, index: usize) -> KinematicsError {
        KinematicsError::MalformedPoint {
            index,
            field: self.field,
            reason: self.reason,
        }
    }
}

/// A validated, immutable observation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
    timestamp: NaiveDateTime,
}

impl GeoPoint {
    /// Build a point, checking both coordinates are finite and in range
    pub fn new(
        latitude: f64,
        longitude: f64,
        timestamp: NaiveDateTime,
    ) -> std::result::Result<Self, InvalidField> {
        check_range(PointField::Latitude, latitude, 90.0)?;
        check_range(PointField::Longitude, longitude, 180.0)?;
        Ok(Self {
            latitude,
            longitude,
            timestamp,
        })
    }

    /// Parse a raw record at position `index` of its track
    pub fn parse(index: usize, raw: &RawPoint, time_format: &str) -> Result<Self> {
        let latitude = raw
            .lat
            .parse()
            .map_err(|reason| InvalidField::new(PointField::Latitude, reason).at(index))?;
        let longitude = raw
            .lng
            .parse()
            .map_err(|reason| InvalidField::new(PointField::Longitude, reason).at(index))?;
        let timestamp = NaiveDateTime::parse_from_str(raw.shot_date.trim(), time_format)
            .map_err(|e| {
                InvalidField::new(
                    PointField::Timestamp,
                    format!("{:?} does not match {time_format:?} ({e})", raw.shot_date),
                )
                .at(index)
            })?;
        Self::new(latitude, longitude, timestamp).map_err(|e| e.at(index))
    }

    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    #[inline]
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Whether both points sit on exactly the same coordinates
    #[inline]
    pub fn same_position(&self, other: &GeoPoint) -> bool {
        self.latitude == other.latitude && self.longitude == other.longitude
    }
}

fn check_range(field: PointField, value: f64, limit: f64) -> std::result::Result<(), InvalidField> {
    if !value.is_finite() {
        return Err(InvalidField::new(field, format!("{value} is not finite")));
    }
    if !(-limit..=limit).contains(&value) {
        return Err(InvalidField::new(
            field,
            format!("{value} is outside [-{limit}, {limit}]"),
        ));
    }
    Ok(())
}

/// An ordered sequence of observations
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Track {
    points: Vec<GeoPoint>,
}

impl Track {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Parse raw records in order, failing on the first malformed one
    pub fn from_records(records: &[RawPoint], time_format: &str) -> Result<Self> {
        #[cfg(feature = "profiling")]
        profiling::scope!("track::from_records");

        let points = records
            .iter()
            .enumerate()
            .map(|(index, raw)| GeoPoint::parse(index, raw, time_format))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Parsed {} track points", points.len());
        Ok(Self { points })
    }

    #[inline]
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of consecutive pairs
    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Consecutive pairs `(i, i + 1)` in order
    pub fn segments(&self) -> impl Iterator<Item = (&GeoPoint, &GeoPoint)> {
        self.points.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

impl FromIterator<GeoPoint> for Track {
    fn from_iter<I: IntoIterator<Item = GeoPoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
