//! # Equatorial → horizontal coordinates
//!
//! Converts right ascension / declination into azimuth / altitude for an observer at a
//! given latitude, local sidereal time and height, including the topocentric parallax
//! correction.
//!
//! ## Conventions
//!
//! * Azimuth is measured from the north through the east, in [0, 2π).
//! * Altitude is measured from the horizon, in [-π/2, π/2].
//! * Hour angles are positive to the west.
//!
//! The parallax correction uses the *solar* equatorial horizontal parallax scaled by the
//! Sun-Earth distance, for every body.

use std::f64::consts::PI;

use nalgebra::Vector3;

use crate::{
    constants::{Hour, Meter, Radian, DPI, EARTH_RADIUS_METERS, HORIZONTAL_PARALLAX_SCALE, RADEG},
    earth_orientation::geocentric_observer,
    kepler::principal_angle,
};

/// Lower bound on `|cos φ · cos h|` before dividing.
const COS_EPS: f64 = 1e-20;

/// Equatorial horizontal parallax for a Sun-Earth distance in AU.
#[inline]
pub fn horizontal_parallax(sun_distance: f64) -> Radian {
    HORIZONTAL_PARALLAX_SCALE / sun_distance
}

/// Apparent hour angle and declination of a body seen from the Earth's surface.
///
/// Arguments
/// ---------
/// * `hour_angle`, `declination`: geocentric (true) values, radians.
/// * `latitude`: geographical latitude, radians.
/// * `height`: height above sea level in Earth radii.
/// * `ehp`: equatorial horizontal parallax, the angle subtended at the body by the
///   Earth's equatorial radius.
///
/// Return
/// ------
/// * `(apparent_hour_angle, apparent_declination)`, the hour angle in [0, 2π).
pub fn apply_parallax(
    hour_angle: Radian,
    declination: Radian,
    latitude: Radian,
    height: f64,
    ehp: Radian,
) -> (Radian, Radian) {
    let (rsp, rcp) = geocentric_observer(latitude, height);

    // distance to the body in Earth radii
    let rp = 1.0 / ehp.sin();
    let (sha, cha) = hour_angle.sin_cos();
    let (sdec, cdec) = declination.sin_cos();

    // the denominator turns negative close to a pole, the shift is then near π
    let dha = (rcp * sha).atan2(rp * cdec - rcp * cha);
    let aha = hour_angle + dha;
    let caha = aha.cos();

    let adec = (caha * (rp * sdec - rsp) / (rp * cdec * cha - rcp)).atan();
    (principal_angle(aha), adec)
}

/// Rotate an hour angle / declination pair into azimuth / altitude.
///
/// Arguments
/// ---------
/// * `latitude`: observer latitude, radians.
/// * `hour_angle`: apparent hour angle, radians.
/// * `declination`: apparent declination, radians.
///
/// Return
/// ------
/// * `(azimuth, altitude)` in radians.
pub fn hour_angle_to_horizontal(
    latitude: Radian,
    hour_angle: Radian,
    declination: Radian,
) -> (Radian, Radian) {
    let (sinlat, coslat) = latitude.sin_cos();
    let (sy, cy) = declination.sin_cos();
    let (sx, cx) = hour_angle.sin_cos();

    let sq = (sy * sinlat + cy * coslat * cx).clamp(-1.0, 1.0);
    let alt = sq.asin();

    let mut a = coslat * alt.cos();
    if a.abs() < COS_EPS {
        a = if a < 0.0 { -COS_EPS } else { COS_EPS };
    }

    let cp = (sy - sinlat * sq) / a;
    let mut az = if cp >= 1.0 {
        0.0
    } else if cp <= -1.0 {
        PI
    } else {
        cp.acos()
    };

    if sx > 0.0 {
        az = DPI - az;
    }
    (az, alt)
}

/// Topocentric azimuth and altitude of a body from its geocentric RA/Dec.
///
/// Arguments
/// ---------
/// * `right_ascension`, `declination`: radians, any RA range.
/// * `latitude`: observer latitude, radians.
/// * `local_sidereal_time`: hours.
/// * `elevation`: observer height above sea level, meters.
/// * `sun_distance`: Sun-Earth distance in AU, scales the parallax.
///
/// Return
/// ------
/// * `(azimuth, altitude)` in radians.
///
/// See also
/// --------
/// * [`apply_parallax`]
/// * [`hour_angle_to_horizontal`]
pub fn equatorial_to_horizontal(
    right_ascension: Radian,
    declination: Radian,
    latitude: Radian,
    local_sidereal_time: Hour,
    elevation: Meter,
    sun_distance: f64,
) -> (Radian, Radian) {
    let ra = principal_angle(right_ascension);
    let ha = local_sidereal_time * 15.0 * RADEG - ra;
    let height = elevation / EARTH_RADIUS_METERS;

    let (aha, adec) = apply_parallax(
        ha,
        declination,
        latitude,
        height,
        horizontal_parallax(sun_distance),
    );
    hour_angle_to_horizontal(latitude, aha, adec)
}

/// Unit direction of an azimuth/altitude pair: x east, y north, z up.
pub fn horizontal_to_direction(azimuth: Radian, altitude: Radian) -> Vector3<f64> {
    let (saz, caz) = azimuth.sin_cos();
    let (salt, calt) = altitude.sin_cos();
    Vector3::new(saz * calt, caz * calt, salt)
}
