//! Ellipsoidal earth transforms on the WGS84 ellipsoid.
//!
//! Public functions take degrees; radians are only used internally. Local
//! tangent-plane offsets are (north, east, down).

use crate::interface::geometry::{CartesianPoint, GeodeticPoint};
use crate::interface::measurement::RangeBearingElevation;
use crate::math::matrix::MatrixHelper;

/// Semi-major axis in metres.
pub const WGS84_A: f64 = 6378137.0;
/// First eccentricity squared.
pub const WGS84_E_SQ: f64 = 0.00669437999014;

const GEODETIC_ITERATIONS: usize = 10;

fn prime_vertical_radius(lat_rad: f64) -> f64 {
    let sin_lat = lat_rad.sin();
    WGS84_A / (1.0 - WGS84_E_SQ * sin_lat * sin_lat).sqrt()
}

/// Geodetic latitude/longitude/altitude to ECEF.
pub fn to_geocentric(point: &GeodeticPoint) -> CartesianPoint {
    let lat = point.latitude_deg.to_radians();
    let lon = point.longitude_deg.to_radians();
    let alt = point.altitude_m;
    let n = prime_vertical_radius(lat);

    CartesianPoint::new(
        (n + alt) * lat.cos() * lon.cos(),
        (n + alt) * lat.cos() * lon.sin(),
        (n * (1.0 - WGS84_E_SQ) + alt) * lat.sin(),
    )
}

/// ECEF to geodetic latitude/longitude/altitude by fixed-point iteration on
/// the latitude.
pub fn to_geodetic(point: &CartesianPoint) -> GeodeticPoint {
    let p = point.x.hypot(point.y);
    let lon = point.y.atan2(point.x);
    let polar_radius = WGS84_A * (1.0 - WGS84_E_SQ).sqrt();

    if p < 1e-9 {
        let lat_deg = if point.z >= 0.0 { 90.0 } else { -90.0 };
        return GeodeticPoint::new(lat_deg, lon.to_degrees(), point.z.abs() - polar_radius);
    }

    let mut lat = point.z.atan2(p * (1.0 - WGS84_E_SQ));
    let mut alt = 0.0;
    for _ in 0..GEODETIC_ITERATIONS {
        let n = prime_vertical_radius(lat);
        alt = p / lat.cos() - n;
        lat = point.z.atan2(p * (1.0 - WGS84_E_SQ * n / (n + alt)));
    }

    GeodeticPoint::new(lat.to_degrees(), lon.to_degrees(), alt)
}

/// Rotates a local (north, east, down) offset at `rotation_origin` into the
/// geocentric frame and adds `base`.
pub fn local_offset_to_geocentric_from(
    rotation_origin: &GeodeticPoint,
    base: &CartesianPoint,
    ned_offset: &CartesianPoint,
) -> CartesianPoint {
    let rotation = MatrixHelper::ned_to_ecef(
        rotation_origin.latitude_deg.to_radians(),
        rotation_origin.longitude_deg.to_radians(),
    );
    let delta = MatrixHelper::apply(rotation.view(), ned_offset.to_array());
    base.add(&CartesianPoint::from(delta))
}

/// Local (north, east, down) offset from `origin` to an absolute ECEF point.
pub fn local_offset_to_geocentric(
    origin: &GeodeticPoint,
    ned_offset: &CartesianPoint,
) -> CartesianPoint {
    local_offset_to_geocentric_from(origin, &to_geocentric(origin), ned_offset)
}

/// Inverse of [`local_offset_to_geocentric`].
pub fn geocentric_to_local_offset(origin: &GeodeticPoint, point: &CartesianPoint) -> CartesianPoint {
    let rotation = MatrixHelper::ned_to_ecef(
        origin.latitude_deg.to_radians(),
        origin.longitude_deg.to_radians(),
    );
    let delta = point.sub(&to_geocentric(origin));
    CartesianPoint::from(MatrixHelper::apply(rotation.t(), delta.to_array()))
}

/// Range, bearing and elevation of `target` seen from `observer`, both ECEF.
///
/// Bearing is `atan2(dy, dx)` and elevation `asin(dz / range)` in degrees.
/// Coincident points or an out-of-domain asin argument give NaN elevation.
pub fn range_bearing_elevation(
    observer: &CartesianPoint,
    target: &CartesianPoint,
) -> RangeBearingElevation {
    let delta = target.sub(observer);
    let range = delta.norm();
    RangeBearingElevation::new(
        range,
        delta.y.atan2(delta.x).to_degrees(),
        (delta.z / range).asin().to_degrees(),
    )
}
