//! Small-field geometry on the sky [deg].

use super::PathError;

/// Offset `(lon, lat)` by `(d_lon, d_lat)` measured in the tangent plane.
///
/// Longitude steps are widened by `1/cos(lat)` so `d_lon` is a true angular
/// distance. At the poles the longitude is left unchanged.
pub fn cartesian_offset(lon: f64, lat: f64, d_lon: f64, d_lat: f64) -> (f64, f64) {
    let cos_lat = lat.to_radians().cos();
    let lon = if cos_lat.abs() > f64::EPSILON {
        lon + d_lon / cos_lat
    } else {
        lon
    };
    (lon, lat + d_lat)
}

/// Direction of travel from `start` to `end`, counter-clockwise from +lon [rad].
pub fn position_angle(start: (f64, f64), end: (f64, f64)) -> f64 {
    let (d_lon, d_lat) = (end.0 - start.0, end.1 - start.1);
    d_lat.atan2(d_lon)
}

/// Point `margin` before `start`, along the scan direction.
///
/// The drive accelerates from here so the scan itself runs at constant
/// speed. Diagonal scans back off along the scan vector.
pub fn standby_position(
    start: (f64, f64),
    end: (f64, f64),
    margin: f64,
) -> Result<(f64, f64), PathError> {
    let (d_lon, d_lat) = (end.0 - start.0, end.1 - start.1);
    let length = d_lon.hypot(d_lat);
    if length == 0.0 || !length.is_finite() {
        return Err(PathError::ZeroLengthScan {
            lon: start.0,
            lat: start.1,
        });
    }
    let angle = position_angle(start, end);
    Ok((
        start.0 - margin * angle.cos(),
        start.1 - margin * angle.sin(),
    ))
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: (f64, f64), b: (f64, f64), ratio: f64) -> (f64, f64) {
    (
        a.0 * (1.0 - ratio) + b.0 * ratio,
        a.1 * (1.0 - ratio) + b.1 * ratio,
    )
}
