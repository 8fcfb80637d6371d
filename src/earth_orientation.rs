use crate::{
    constants::{Radian, MJD, RADEG},
    orbital_elements::days_since_elements_epoch,
};

/// Ratio of the polar to the equatorial Earth radius (b/a)
pub const EARTH_AXIS_RATIO: f64 = 9.96647e-1;

/// Compute the mean obliquity of the ecliptic, linear model.
///
/// This is the obliquity used together with the two-term orbital elements: its value at
/// the element epoch plus a secular drift, valid within a few centuries of 2000.
///
/// Arguments
/// ---------
/// * `day`: ephemeris day number.
///
/// Returns
/// --------
/// * Mean obliquity of the ecliptic in radians.
///
/// Formula
/// -------
/// ```text
/// ε(d) = 23.4393° − 3.563e-7° · d,    d = day − ELEMENTS_EPOCH
/// ```
///
/// # See also
/// * [`crate::ref_system::rotation_between`] – applies this rotation
pub fn obliquity(day: MJD) -> Radian {
    (23.4393 - 3.563E-7 * days_since_elements_epoch(day)) * RADEG
}

/// Observer position relative to the Earth's center, in Earth equatorial radii, projected
/// on the rotation axis (`rho·sin φ'`) and on the equatorial plane (`rho·cos φ'`).
///
/// Arguments
/// ---------
/// * `latitude`: geodetic latitude φ in radians.
/// * `height`: height above sea level in Earth radii.
///
/// Returns
/// --------
/// * `(rho_sin, rho_cos)`.
pub fn geocentric_observer(latitude: Radian, height: f64) -> (f64, f64) {
    let (sphi, cphi) = latitude.sin_cos();
    let u = (EARTH_AXIS_RATIO * sphi / cphi).atan();
    let rho_sin = EARTH_AXIS_RATIO * u.sin() + height * sphi;
    let rho_cos = u.cos() + height * cphi;
    (rho_sin, rho_cos)
}

/// Approximate geocentric latitude and geocentric radius (Earth radii) of a sea-level observer.
///
/// Arguments
/// ---------
/// * `latitude`: geodetic latitude in radians.
///
/// Returns
/// --------
/// * `(geocentric_latitude, rho)`.
pub fn geocentric_latitude(latitude: Radian) -> (Radian, f64) {
    let gclat = latitude - 0.003358 * (2.0 * latitude).sin();
    let rho = 0.99883 + 0.00167 * (2.0 * latitude).cos();
    (gclat, rho)
}

#[cfg(test)]
mod earth_orientation_test {
    use super::*;
    use crate::constants::{ELEMENTS_EPOCH, J2000};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_obliquity() {
        assert_abs_diff_eq!(obliquity(ELEMENTS_EPOCH), 23.4393 * RADEG, epsilon = 1e-15);
        // within 1" of the IAU 1976 value at J2000
        assert_abs_diff_eq!(obliquity(J2000), 0.4090928042223289, epsilon = 5e-6);
        assert!(obliquity(J2000 + 36525.0) < obliquity(J2000));
    }

    #[test]
    fn test_geocentric_observer() {
        let (s, c) = geocentric_observer(0.0, 0.0);
        assert_abs_diff_eq!(s, 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(c, 1.0, epsilon = 1e-15);

        // at 45° the geocentric latitude is about 11.5' smaller
        let (s, c) = geocentric_observer(45.0 * RADEG, 0.0);
        let gclat = s.atan2(c);
        assert_abs_diff_eq!(gclat / RADEG, 45.0 - 0.1924, epsilon = 1e-3);
    }

    #[test]
    fn test_geocentric_latitude() {
        let (gclat, rho) = geocentric_latitude(0.0);
        assert_eq!(gclat, 0.0);
        assert_abs_diff_eq!(rho, 1.0005, epsilon = 1e-12);

        let (gclat, rho) = geocentric_latitude(45.0 * RADEG);
        assert_abs_diff_eq!(gclat, 45.0 * RADEG - 0.003358, epsilon = 1e-12);
        assert_abs_diff_eq!(rho, 0.99883, epsilon = 1e-12);
    }
}
