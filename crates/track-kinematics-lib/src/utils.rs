//! Numeric helpers shared by the distance methods and the projection adapter

use geo::Point;

/// Mean spherical Earth radius in meters
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// WGS84 semi-major axis in meters, the sphere radius used by Web Mercator (EPSG:3857)
pub const WEB_MERCATOR_RADIUS: f64 = 6_378_137.0;

/// `acos` with its argument clamped to [-1, 1]
///
/// Rounding can push a mathematically valid cosine slightly outside the domain
/// (coincident or antipodal points), which would otherwise yield NaN.
#[inline(always)]
pub fn clamped_acos(cosine: f64) -> f64 {
    cosine.clamp(-1.0, 1.0).acos()
}

/// `asin(sqrt(s))` with `s` clamped to [0, 1]
#[inline(always)]
pub fn clamped_asin_sqrt(s: f64) -> f64 {
    s.clamp(0.0, 1.0).sqrt().asin()
}

/// Square of the sine of half an angle given in radians
#[inline(always)]
pub fn sin_squared_half(angle_rad: f64) -> f64 {
    (angle_rad / 2.0).sin().powi(2)
}

/// Angular distance in radians to meters on a sphere of the given radius
#[inline(always)]
pub fn arc_length(central_angle_rad: f64, radius_meters: f64) -> f64 {
    central_angle_rad * radius_meters
}

/// Convert WGS84 (lat, lon) to Web Mercator (x, y) in meters
///
/// No clamping: `y` grows without bound towards the poles, callers keep `lat`
/// strictly inside (-90, 90).
#[inline(always)]
pub fn wgs84_to_mercator(lat: f64, lon: f64) -> Point<f64> {
    let x = lon.to_radians() * WEB_MERCATOR_RADIUS;
    let lat_rad = lat.to_radians();
    let y = (lat_rad.tan() + (1.0 / lat_rad.cos())).ln() * WEB_MERCATOR_RADIUS;
    Point::new(x, y)
}

/// Euclidean distance between two planar points
#[inline(always)]
pub fn planar_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    (a.x() - b.x()).hypot(a.y() - b.y())
}
