//! # Two-term orbital elements
//!
//! Each body carries six mean orbital elements, each written as a constant value at the
//! element epoch plus a secular rate per day:
//!
//! ```text
//! x(d) = x₀ + ẋ · d,      d = mjd − ELEMENTS_EPOCH
//! ```
//!
//! Angles are tabulated in degrees and returned in radians by [`OrbitalElements::at`].
//! Semi-major axes are in AU for the Sun and planets and in Earth radii for the Moon.
//! The tables below are the low-precision elements of the Schlyter theory
//! ("How to compute planetary positions"), valid to roughly one arc-minute over a few
//! centuries around 2000.

use crate::constants::{Radian, ELEMENTS_EPOCH, MJD, RADEG};

/// One orbital element as `first + rate · days`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTerm {
    pub first: f64,
    pub rate: f64,
}

impl ElementTerm {
    pub const fn new(first: f64, rate: f64) -> Self {
        ElementTerm { first, rate }
    }

    /// Value of the element `days` days after the element epoch.
    #[inline]
    pub fn at(&self, days: f64) -> f64 {
        self.first + self.rate * days
    }
}

/// Mean orbital elements of a body.
/// Units of the tabulated terms:
/// * `ascending_node_longitude`, `inclination`, `periapsis_argument`, `mean_anomaly`: degrees
///   and degrees per day
/// * `semi_major_axis`: AU (Earth radii for the Moon)
/// * `eccentricity`: unitless
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    pub ascending_node_longitude: ElementTerm,
    pub inclination: ElementTerm,
    pub periapsis_argument: ElementTerm,
    pub semi_major_axis: ElementTerm,
    pub eccentricity: ElementTerm,
    pub mean_anomaly: ElementTerm,
}

/// Instantaneous elements; angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementsAt {
    pub ascending_node_longitude: Radian,
    pub inclination: Radian,
    pub periapsis_argument: Radian,
    pub semi_major_axis: f64,
    pub eccentricity: f64,
    pub mean_anomaly: Radian,
}

/// Days elapsed since the element epoch (1999-12-31 00:00 UTC).
#[inline]
pub fn days_since_elements_epoch(mjd: MJD) -> f64 {
    mjd - ELEMENTS_EPOCH
}

impl OrbitalElements {
    /// Evaluate the elements at `mjd`.
    pub fn at(&self, mjd: MJD) -> ElementsAt {
        let d = days_since_elements_epoch(mjd);
        ElementsAt {
            ascending_node_longitude: self.ascending_node_longitude.at(d) * RADEG,
            inclination: self.inclination.at(d) * RADEG,
            periapsis_argument: self.periapsis_argument.at(d) * RADEG,
            semi_major_axis: self.semi_major_axis.at(d),
            eccentricity: self.eccentricity.at(d),
            mean_anomaly: self.mean_anomaly.at(d) * RADEG,
        }
    }

    /// Build from a table of `(first, rate)` pairs in the order N, i, w, a, e, M.
    pub const fn from_table(t: [(f64, f64); 6]) -> Self {
        OrbitalElements {
            ascending_node_longitude: ElementTerm::new(t[0].0, t[0].1),
            inclination: ElementTerm::new(t[1].0, t[1].1),
            periapsis_argument: ElementTerm::new(t[2].0, t[2].1),
            semi_major_axis: ElementTerm::new(t[3].0, t[3].1),
            eccentricity: ElementTerm::new(t[4].0, t[4].1),
            mean_anomaly: ElementTerm::new(t[5].0, t[5].1),
        }
    }
}

pub const SUN_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (0.0, 0.0),
    (0.0, 0.0),
    (282.9404, 4.70935E-5),
    (1.0, 0.0),
    (0.016709, -1.151E-9),
    (356.0470, 0.9856002585),
]);

pub const MOON_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (125.1228, -0.0529538083),
    (5.1454, 0.0),
    (318.0634, 0.1643573223),
    (60.2666, 0.0),
    (0.054900, 0.0),
    (115.3654, 13.0649929509),
]);

pub const MERCURY_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (48.3313, 3.24587E-5),
    (7.0047, 5.00E-8),
    (29.1241, 1.01444E-5),
    (0.387098, 0.0),
    (0.205635, 5.59E-10),
    (168.6562, 4.0923344368),
]);

pub const VENUS_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (76.6799, 2.46590E-5),
    (3.3946, 2.75E-8),
    (54.8910, 1.38374E-5),
    (0.723330, 0.0),
    (0.006773, -1.302E-9),
    (48.0052, 1.6021302244),
]);

pub const MARS_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (49.5574, 2.11081E-5),
    (1.8497, -1.78E-8),
    (286.5016, 2.92961E-5),
    (1.523688, 0.0),
    (0.093405, 2.516E-9),
    (18.6021, 0.5240207766),
]);

pub const JUPITER_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (100.4542, 2.76854E-5),
    (1.3030, -1.557E-7),
    (273.8777, 1.64505E-5),
    (5.20256, 0.0),
    (0.048498, 4.469E-9),
    (19.8950, 0.0830853001),
]);

pub const SATURN_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (113.6634, 2.38980E-5),
    (2.4886, -1.081E-7),
    (339.3939, 2.97661E-5),
    (9.55475, 0.0),
    (0.055546, -9.499E-9),
    (316.9670, 0.0334442282),
]);

pub const URANUS_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (74.0005, 1.3978E-5),
    (0.7733, 1.9E-8),
    (96.6612, 3.0565E-5),
    (19.18171, -1.55E-8),
    (0.047318, 7.45E-9),
    (142.5905, 0.011725806),
]);

pub const NEPTUNE_ELEMENTS: OrbitalElements = OrbitalElements::from_table([
    (131.7806, 3.0173E-5),
    (1.7700, -2.55E-7),
    (272.8461, -6.027E-6),
    (30.05826, 3.313E-8),
    (0.008606, 2.15E-9),
    (260.2471, 0.005995147),
]);

#[cfg(test)]
mod orbital_elements_test {
    use super::*;
    use crate::constants::J2000;
    use approx::assert_relative_eq;

    #[test]
    fn test_epoch_values() {
        let el = MARS_ELEMENTS.at(ELEMENTS_EPOCH);
        assert_relative_eq!(el.mean_anomaly, 18.6021 * RADEG);
        assert_relative_eq!(el.semi_major_axis, 1.523688);
        assert_relative_eq!(el.eccentricity, 0.093405);
    }

    #[test]
    fn test_secular_rate() {
        // Sun mean anomaly one and a half days past the element epoch
        let el = SUN_ELEMENTS.at(J2000);
        assert_relative_eq!(
            el.mean_anomaly,
            (356.0470 + 1.5 * 0.9856002585) * RADEG,
            epsilon = 1e-12
        );
        assert_eq!(el.ascending_node_longitude, 0.0);

        // Moon node regresses
        let later = MOON_ELEMENTS.at(J2000 + 100.0);
        assert!(later.ascending_node_longitude < MOON_ELEMENTS.at(J2000).ascending_node_longitude);
    }
}
