//! # Celestial bodies
//!
//! Position solvers for the Sun, the Moon and the seven major planets from Mercury to
//! Neptune, built on the two-term elements of [`crate::orbital_elements`].
//!
//! ## Overview
//!
//! * [`Sun`](crate::bodies::sun::Sun) is solved first: its geocentric ecliptic position is the
//!   offset every other body needs to go from heliocentric to geocentric coordinates.
//! * [`Moon`](crate::bodies::moon::Moon) is geocentric by construction. It adds the main
//!   periodic perturbations and a topocentric correction that needs the local sidereal time
//!   and the observer latitude.
//! * [`Planet`](crate::bodies::planets::Planet) shares one algorithm for all seven planets
//!   and differs only by its elements and its magnitude formula.
//!
//! [`CelestialBody`] is the tagged variant the engine iterates over once the Sun is known.
//!
//! ## Units
//!
//! * Angles: **radians**, except the phase angle `FV` which is in **degrees**.
//! * Distances: **AU** for the Sun and planets, **Earth radii** for the Moon.

pub mod moon;
pub mod planets;
pub mod sun;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Hour, Radian, MJD, NUM_BODIES},
    sky_errors::SkyError,
};

use self::{moon::Moon, planets::Planet, sun::Sun};

/// Slot of a body in an [`EphemerisData`](crate::ephemeris_data::EphemerisData) record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CelestialBodyName {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl CelestialBodyName {
    /// All bodies in slot order, which is also the update order.
    pub const ALL: [CelestialBodyName; NUM_BODIES] = [
        CelestialBodyName::Sun,
        CelestialBodyName::Moon,
        CelestialBodyName::Mercury,
        CelestialBodyName::Venus,
        CelestialBodyName::Mars,
        CelestialBodyName::Jupiter,
        CelestialBodyName::Saturn,
        CelestialBodyName::Uranus,
        CelestialBodyName::Neptune,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CelestialBodyName::Sun => "Sun",
            CelestialBodyName::Moon => "Moon",
            CelestialBodyName::Mercury => "Mercury",
            CelestialBodyName::Venus => "Venus",
            CelestialBodyName::Mars => "Mars",
            CelestialBodyName::Jupiter => "Jupiter",
            CelestialBodyName::Saturn => "Saturn",
            CelestialBodyName::Uranus => "Uranus",
            CelestialBodyName::Neptune => "Neptune",
        }
    }
}

impl fmt::Display for CelestialBodyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CelestialBodyName {
    type Err = SkyError;

    /// Case-insensitive lookup by English name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| SkyError::UnknownBody(s.to_string()))
    }
}

/// Transient state computed by a body's position update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BodyState {
    /// Distance to the Sun (AU), or to the Earth for the Sun and the Moon
    pub heliocentric_distance: f64,
    /// Distance to the Earth's center (AU, Earth radii for the Moon)
    pub geocentric_distance: f64,
    /// Ecliptic longitude of date, geocentric for the Sun and the Moon, heliocentric for
    /// the planets
    pub ecliptic_longitude: Radian,
    /// Ecliptic latitude of date, same origin as [`BodyState::ecliptic_longitude`]
    pub ecliptic_latitude: Radian,
    pub right_ascension: Radian,
    pub declination: Radian,
    pub magnitude: f64,
    /// Sun-body-Earth angle
    pub phase_angle: Degree,
}

/// Phase angle `FV` from the law of cosines on the Sun-body-Earth triangle.
///
/// Arguments
/// ---------
/// * `r`: body-Sun distance.
/// * `big_r`: body-Earth distance.
/// * `s`: Sun-Earth distance.
///
/// Return
/// ------
/// * The angle at the body, in degrees. The cosine is clamped to [-1, 1] first, so a
///   degenerate (collinear) triangle gives exactly 0° or 180°.
pub fn phase_angle(r: f64, big_r: f64, s: f64) -> Degree {
    let cos_fv = ((r * r + big_r * big_r - s * s) / (2.0 * r * big_r)).clamp(-1.0, 1.0);
    cos_fv.acos().to_degrees()
}

/// A body solved after the Sun, as a tagged variant over the two solver kinds.
#[derive(Debug, Clone)]
pub enum CelestialBody {
    Moon(Moon),
    Planet(Planet),
}

impl CelestialBody {
    pub fn name(&self) -> CelestialBodyName {
        match self {
            CelestialBody::Moon(_) => CelestialBodyName::Moon,
            CelestialBody::Planet(p) => p.name(),
        }
    }

    pub fn state(&self) -> &BodyState {
        match self {
            CelestialBody::Moon(m) => m.state(),
            CelestialBody::Planet(p) => p.state(),
        }
    }

    /// Update the position for `day`, given the Sun already solved for the same day.
    ///
    /// Arguments
    /// ---------
    /// * `day`: ephemeris day number.
    /// * `local_sidereal_time`: hours, used by the Moon's topocentric correction.
    /// * `latitude`: observer latitude in radians, used by the Moon.
    /// * `sun`: the Sun updated for `day`.
    pub fn update_position(
        &mut self,
        day: MJD,
        local_sidereal_time: Hour,
        latitude: Radian,
        sun: &Sun,
    ) {
        match self {
            CelestialBody::Moon(m) => m.update_position(day, local_sidereal_time, latitude, sun),
            CelestialBody::Planet(p) => p.update_position(day, sun),
        }
    }

    /// The Moon and the seven planets in slot order.
    pub fn all_after_sun() -> [CelestialBody; NUM_BODIES - 1] {
        [
            CelestialBody::Moon(Moon::new()),
            CelestialBody::Planet(Planet::mercury()),
            CelestialBody::Planet(Planet::venus()),
            CelestialBody::Planet(Planet::mars()),
            CelestialBody::Planet(Planet::jupiter()),
            CelestialBody::Planet(Planet::saturn()),
            CelestialBody::Planet(Planet::uranus()),
            CelestialBody::Planet(Planet::neptune()),
        ]
    }
}

#[cfg(test)]
mod bodies_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_body_names() {
        for (i, b) in CelestialBodyName::ALL.iter().enumerate() {
            assert_eq!(b.index(), i);
            assert_eq!(CelestialBodyName::from_index(i), Some(*b));
        }
        assert_eq!(CelestialBodyName::from_index(NUM_BODIES), None);
        assert_eq!("  saturn".parse::<CelestialBodyName>(), Ok(CelestialBodyName::Saturn));
        assert_eq!(
            "Pluto".parse::<CelestialBodyName>(),
            Err(SkyError::UnknownBody("Pluto".into()))
        );
    }

    #[test]
    fn test_phase_angle_clamp() {
        // degenerate triangle: cosine exactly 1
        assert_eq!(phase_angle(2.0, 1.0, 1.0), 0.0);

        // inconsistent distances push the cosine above 1
        assert_eq!(phase_angle(5.0, 4.0, 0.5), 0.0);

        // body halfway between the Sun and the Earth
        assert_abs_diff_eq!(phase_angle(0.5, 0.5, 1.0), 180.0, epsilon = 1e-12);

        let fv = phase_angle(1.5, 1.0, 1.0);
        assert!(fv > 0.0 && fv < 90.0);
    }

    #[test]
    fn test_slot_order() {
        let bodies = CelestialBody::all_after_sun();
        for (i, b) in bodies.iter().enumerate() {
            assert_eq!(b.name().index(), i + 1);
        }
    }
}
