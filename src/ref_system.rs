//! # Reference frames
//!
//! Geocentric and heliocentric positions are produced in the **mean ecliptic of date** and
//! turned into the **mean equator of date** by a single rotation around the X axis (the
//! equinox direction) by the obliquity of the ecliptic.
//!
//! ## Overview
//!
//! * [`equinox_rotation`] turns a frame around the equinox direction,
//! * [`rotation_between`] gives the rotation between two [`RefSystem`]s at a given day and
//!   is what the body solvers apply to their ecliptic positions,
//! * [`to_spherical`] / [`from_spherical`] convert between Cartesian and angular forms.

use nalgebra::{Matrix3, Rotation3, Vector3};

use crate::{
    constants::{Radian, MJD},
    earth_orientation::obliquity,
};

/// Frames of date the solvers work in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSystem {
    /// Mean ecliptic and equinox of date
    Ecliptic,
    /// Mean equator and equinox of date
    Equatorial,
}

/// Rotation by `angle` around the X axis (the equinox direction), `x' = R · x`.
pub fn equinox_rotation(angle: Radian) -> Matrix3<f64> {
    Rotation3::from_axis_angle(&Vector3::x_axis(), angle).into()
}

/// Rotation matrix taking coordinates expressed in `from` into `to`, at the given day.
///
/// The two frames share the equinox and differ by the obliquity of the ecliptic, see
/// [`obliquity`].
pub fn rotation_between(from: RefSystem, to: RefSystem, day: MJD) -> Matrix3<f64> {
    match (from, to) {
        (RefSystem::Ecliptic, RefSystem::Equatorial) => equinox_rotation(obliquity(day)),
        (RefSystem::Equatorial, RefSystem::Ecliptic) => equinox_rotation(-obliquity(day)),
        (RefSystem::Ecliptic, RefSystem::Ecliptic)
        | (RefSystem::Equatorial, RefSystem::Equatorial) => Matrix3::identity(),
    }
}

/// Longitude-like and latitude-like angles of a vector, plus its norm.
///
/// Returns `(atan2(y, x), atan2(z, hypot(x, y)), |v|)`; the longitude lies in (-π, π].
pub fn to_spherical(v: &Vector3<f64>) -> (Radian, Radian, f64) {
    let lon = v.y.atan2(v.x);
    let lat = v.z.atan2(v.x.hypot(v.y));
    (lon, lat, v.norm())
}

/// Cartesian vector from longitude, latitude and distance.
pub fn from_spherical(lon: Radian, lat: Radian, r: f64) -> Vector3<f64> {
    let (slon, clon) = lon.sin_cos();
    let (slat, clat) = lat.sin_cos();
    Vector3::new(r * clon * clat, r * slon * clat, r * slat)
}

#[cfg(test)]
mod ref_system_test {
    use super::*;
    use crate::constants::{J2000, RADEG};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_equinox_rotation() {
        let v = Vector3::new(0.0, 1.0, 0.0);
        let r = equinox_rotation(90.0 * RADEG) * v;
        assert_abs_diff_eq!(r, Vector3::new(0.0, 0.0, 1.0), epsilon = 1e-15);
        // the equinox direction itself is fixed
        let x = equinox_rotation(0.4) * Vector3::x();
        assert_abs_diff_eq!(x, Vector3::x(), epsilon = 1e-15);
    }

    #[test]
    fn test_round_trip_frames() {
        let v = Vector3::new(0.3, -0.5, 0.8);
        let forth = rotation_between(RefSystem::Ecliptic, RefSystem::Equatorial, J2000);
        let back = rotation_between(RefSystem::Equatorial, RefSystem::Ecliptic, J2000);
        assert_abs_diff_eq!(back * (forth * v), v, epsilon = 1e-14);
        assert_eq!(
            rotation_between(RefSystem::Ecliptic, RefSystem::Ecliptic, J2000),
            Matrix3::identity()
        );
    }

    #[test]
    fn test_summer_solstice_declination() {
        // ecliptic longitude 90° lies at the maximum declination
        let to_equator = rotation_between(RefSystem::Ecliptic, RefSystem::Equatorial, J2000);
        let v = to_equator * from_spherical(90.0 * RADEG, 0.0, 1.0);
        let (ra, dec, r) = to_spherical(&v);
        assert_abs_diff_eq!(ra, 90.0 * RADEG, epsilon = 1e-12);
        assert_abs_diff_eq!(dec, obliquity(J2000), epsilon = 1e-12);
        assert_abs_diff_eq!(r, 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_spherical_round_trip() {
        let v = from_spherical(-2.0, 0.4, 3.5);
        let (lon, lat, r) = to_spherical(&v);
        assert_abs_diff_eq!(lon, -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(lat, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(r, 3.5, epsilon = 1e-12);
    }
}
