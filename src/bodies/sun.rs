use log::trace;
use nalgebra::Vector3;

use crate::{
    bodies::BodyState,
    constants::{Radian, DPI, MJD, RADEG},
    kepler::{approximate_eccentric_anomaly, true_and_eccentric_anomaly},
    orbital_elements::{ElementsAt, OrbitalElements, SUN_ELEMENTS},
    ref_system::{rotation_between, to_spherical, RefSystem},
};

/// The Sun, solved as the Earth's orbit seen from the Earth.
#[derive(Debug, Clone)]
pub struct Sun {
    elements: OrbitalElements,
    current: ElementsAt,
    state: BodyState,
    /// Geocentric ecliptic rectangular coordinates (AU)
    xs: f64,
    ys: f64,
}

impl Default for Sun {
    fn default() -> Self {
        Sun::new()
    }
}

impl Sun {
    pub fn new() -> Self {
        Sun {
            elements: SUN_ELEMENTS,
            current: SUN_ELEMENTS.at(0.0),
            state: BodyState::default(),
            xs: 0.0,
            ys: 0.0,
        }
    }

    /// Solve the Sun's geocentric position at `day`.
    ///
    /// The ecliptic latitude is taken as zero and no magnitude is computed.
    pub fn update_position(&mut self, day: MJD) {
        let el = self.elements.at(day);
        let to_equator = rotation_between(RefSystem::Ecliptic, RefSystem::Equatorial, day);

        let ea = approximate_eccentric_anomaly(el.mean_anomaly, el.eccentricity);
        let xv = ea.cos() - el.eccentricity;
        let yv = (1.0 - el.eccentricity * el.eccentricity).sqrt() * ea.sin();
        let v = yv.atan2(xv);
        let r = xv.hypot(yv);

        let lon = v + el.periapsis_argument;
        self.xs = r * lon.cos();
        self.ys = r * lon.sin();

        let eq = to_equator * Vector3::new(self.xs, self.ys, 0.0);
        let (ra, dec, _) = to_spherical(&eq);

        self.current = el;
        self.state = BodyState {
            heliocentric_distance: r,
            geocentric_distance: r,
            ecliptic_longitude: lon,
            ecliptic_latitude: 0.0,
            right_ascension: ra,
            declination: dec,
            magnitude: 0.0,
            phase_angle: 0.0,
        };
        trace!("Sun: ra = {ra:.6} rad, dec = {dec:.6} rad, r = {r:.6} AU");
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    /// Geocentric ecliptic X coordinate (AU).
    pub fn xs(&self) -> f64 {
        self.xs
    }

    /// Geocentric ecliptic Y coordinate (AU).
    pub fn ys(&self) -> f64 {
        self.ys
    }

    /// Sun-Earth distance (AU) from the last update.
    pub fn distance(&self) -> f64 {
        self.state.heliocentric_distance
    }

    /// Mean anomaly at the last update (radians).
    pub fn mean_anomaly(&self) -> Radian {
        self.current.mean_anomaly
    }

    /// Argument of perihelion at the last update (radians).
    pub fn periapsis_argument(&self) -> Radian {
        self.current.periapsis_argument
    }
}

/// Fractional part of `x`, truncating toward zero.
#[inline]
fn frac(x: f64) -> f64 {
    x - x.trunc()
}

/// True geocentric ecliptic longitude of the Sun for the mean equinox of date, and the
/// Sun-Earth distance.
///
/// This series includes the main planetary and lunar perturbations of the Earth's orbit.
/// The ecliptic latitude never exceeds 1.2" and is taken as zero. For the apparent
/// longitude, nutation and aberration (about −9.93e-5 rad) would still have to be added.
///
/// Arguments
/// ---------
/// * `day`: ephemeris day number.
///
/// Return
/// ------
/// * `(longitude, distance)`: longitude in radians within [0, 2π), distance in AU.
pub fn sun_longitude_distance(day: MJD) -> (Radian, f64) {
    let t = day / 36525.0;
    let t2 = t * t;

    // mean longitude, mean anomaly (degrees) and eccentricity
    let ls = 279.69668 + 0.0003025 * t2 + 360.0 * frac(100.0021359 * t);
    let ms = 358.47583 - (0.00015 + 0.0000033 * t * t2) + 360.0 * frac(99.99736042000039 * t);
    let s = 0.016751 - 0.0000418 * t - 1.26e-07 * t2;

    let (nu, ea) = true_and_eccentric_anomaly(ms * RADEG, s);

    let a1 = (153.23 + 360.0 * frac(62.55209472000015 * t)) * RADEG;
    let b1 = (216.57 + 360.0 * frac(125.1041894 * t)) * RADEG;
    let c1 = (312.69 + 360.0 * frac(91.56766028 * t)) * RADEG;
    let d1 = (350.74 - 0.00144 * t2 + 360.0 * frac(1236.853095 * t)) * RADEG;
    let e1 = (231.19 + 20.2 * t) * RADEG;
    let h1 = (353.4 + 360.0 * frac(183.1353208 * t)) * RADEG;

    let dl = 0.00134 * (a1.cos() + 0.00154) * (b1.cos() + 0.002) * c1.cos()
        + 0.00179 * d1.sin()
        + 0.00178 * e1.sin();
    let dr = 5.43e-06 * a1.sin()
        + 1.575e-05 * b1.sin()
        + 1.627e-05 * c1.sin()
        + 3.076e-05 * d1.cos()
        + 9.27e-06 * h1.sin();

    let lsn = nu + (ls - ms + dl) * RADEG;
    let lsn = lsn - DPI * (lsn / DPI).floor();
    let rsn = 1.0000002 * (1.0 - s * ea.cos()) + dr;

    (lsn, rsn)
}

#[cfg(test)]
mod sun_test {
    use super::*;
    use crate::constants::J2000;
    use crate::kepler::principal_angle;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_sun_j2000() {
        let mut sun = Sun::new();
        sun.update_position(J2000);
        let st = sun.state();

        // apparent place at 2000-01-01 12:00: RA 18h45m09s, Dec -23°02'
        assert_abs_diff_eq!(
            principal_angle(st.right_ascension) / RADEG,
            281.29,
            epsilon = 0.01
        );
        assert_abs_diff_eq!(st.declination / RADEG, -23.03, epsilon = 0.01);
        assert_abs_diff_eq!(sun.distance(), 0.98333, epsilon = 1e-4);
        assert_abs_diff_eq!(
            principal_angle(st.ecliptic_longitude) / RADEG,
            280.38,
            epsilon = 0.01
        );
        assert_eq!(st.ecliptic_latitude, 0.0);
    }

    #[test]
    fn test_sun_offset_matches_longitude() {
        let mut sun = Sun::new();
        sun.update_position(J2000 + 91.3);
        let r = sun.distance();
        let lon = sun.state().ecliptic_longitude;
        assert_abs_diff_eq!(sun.xs(), r * lon.cos(), epsilon = 1e-15);
        assert_abs_diff_eq!(sun.ys(), r * lon.sin(), epsilon = 1e-15);
        assert_abs_diff_eq!(sun.xs().hypot(sun.ys()), r, epsilon = 1e-12);
    }

    #[test]
    fn test_sun_longitude_distance() {
        let (lsn, rsn) = sun_longitude_distance(J2000);
        assert_abs_diff_eq!(lsn / RADEG, 280.38, epsilon = 0.01);
        assert_abs_diff_eq!(rsn, 0.98333, epsilon = 2e-4);

        // around the July aphelion
        let (_, rsn) = sun_longitude_distance(J2000 + 184.0);
        assert!(rsn > 1.015 && rsn < 1.018);
    }

    #[test]
    fn test_sun_series_agrees_with_elements() {
        let mut sun = Sun::new();
        for k in 0..24 {
            let day = J2000 + 15.25 * k as f64;
            sun.update_position(day);
            let (lsn, rsn) = sun_longitude_distance(day);
            let dlon = principal_angle(lsn - sun.state().ecliptic_longitude + 1.0) - 1.0;
            assert!(dlon.abs() < 0.02 * RADEG, "longitude off by {dlon} at {day}");
            assert_abs_diff_eq!(rsn, sun.distance(), epsilon = 2e-4);
        }
    }
}
