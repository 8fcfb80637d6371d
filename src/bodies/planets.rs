use std::fmt;

use log::trace;
use nalgebra::Vector3;

use crate::{
    bodies::{phase_angle, sun::Sun, BodyState, CelestialBodyName},
    constants::{Degree, Radian, MJD},
    kepler::approximate_eccentric_anomaly,
    orbital_elements::{
        days_since_elements_epoch, OrbitalElements, JUPITER_ELEMENTS, MARS_ELEMENTS,
        MERCURY_ELEMENTS, NEPTUNE_ELEMENTS, SATURN_ELEMENTS, URANUS_ELEMENTS, VENUS_ELEMENTS,
    },
    ref_system::{rotation_between, to_spherical, RefSystem},
};

/// Geometry a magnitude formula may depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeInputs {
    /// Distance to the Sun (AU)
    pub r: f64,
    /// Distance to the Earth (AU)
    pub big_r: f64,
    /// Phase angle FV
    pub phase_angle: Degree,
    /// Days since the element epoch
    pub days: f64,
    pub right_ascension: Radian,
    pub declination: Radian,
}

impl MagnitudeInputs {
    /// `5·log10(r·R)`, common to every planet formula.
    #[inline]
    fn distance_term(&self) -> f64 {
        5.0 * (self.r * self.big_r).log10()
    }
}

/// Per-planet visual magnitude formula.
pub type MagnitudeFn = fn(&MagnitudeInputs) -> f64;

pub fn mercury_magnitude(m: &MagnitudeInputs) -> f64 {
    -0.36 + m.distance_term() + 0.027 * m.phase_angle + 2.2E-13 * m.phase_angle.powi(6)
}

pub fn venus_magnitude(m: &MagnitudeInputs) -> f64 {
    -4.34 + m.distance_term() + 0.013 * m.phase_angle + 4.2E-07 * m.phase_angle.powi(3)
}

pub fn mars_magnitude(m: &MagnitudeInputs) -> f64 {
    -1.51 + m.distance_term() + 0.016 * m.phase_angle
}

pub fn jupiter_magnitude(m: &MagnitudeInputs) -> f64 {
    -9.25 + m.distance_term() + 0.014 * m.phase_angle
}

/// Saturn's magnitude, including the brightening from the rings' tilt toward the Earth.
pub fn saturn_magnitude(m: &MagnitudeInputs) -> f64 {
    -9.0 + m.distance_term() + 0.044 * m.phase_angle + saturn_ring_magnitude(m)
}

/// Ring contribution from the ring-plane tilt `B` seen from the Earth.
pub fn saturn_ring_magnitude(m: &MagnitudeInputs) -> f64 {
    // inclination and node of the ring plane on the equator
    let ir: Radian = 0.4897394;
    let nr: Radian = 2.9585076 + 6.6672E-7 * m.days;

    let sin_b = (m.declination.sin() * ir.cos()
        - m.declination.cos() * ir.sin() * (m.right_ascension - nr).sin())
    .clamp(-1.0, 1.0);
    let b = sin_b.asin();
    -2.6 * b.abs().sin() + 1.2 * b.sin().powi(2)
}

pub fn uranus_magnitude(m: &MagnitudeInputs) -> f64 {
    -7.15 + m.distance_term() + 0.001 * m.phase_angle
}

pub fn neptune_magnitude(m: &MagnitudeInputs) -> f64 {
    -6.90 + m.distance_term() + 0.001 * m.phase_angle
}

/// A major planet: its elements and its magnitude formula.
#[derive(Clone)]
pub struct Planet {
    name: CelestialBodyName,
    elements: OrbitalElements,
    magnitude: MagnitudeFn,
    state: BodyState,
}

impl fmt::Debug for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Planet")
            .field("name", &self.name)
            .field("elements", &self.elements)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Planet {
    pub fn new(name: CelestialBodyName, elements: OrbitalElements, magnitude: MagnitudeFn) -> Self {
        Planet {
            name,
            elements,
            magnitude,
            state: BodyState::default(),
        }
    }

    pub fn mercury() -> Self {
        Planet::new(CelestialBodyName::Mercury, MERCURY_ELEMENTS, mercury_magnitude)
    }

    pub fn venus() -> Self {
        Planet::new(CelestialBodyName::Venus, VENUS_ELEMENTS, venus_magnitude)
    }

    pub fn mars() -> Self {
        Planet::new(CelestialBodyName::Mars, MARS_ELEMENTS, mars_magnitude)
    }

    pub fn jupiter() -> Self {
        Planet::new(CelestialBodyName::Jupiter, JUPITER_ELEMENTS, jupiter_magnitude)
    }

    pub fn saturn() -> Self {
        Planet::new(CelestialBodyName::Saturn, SATURN_ELEMENTS, saturn_magnitude)
    }

    pub fn uranus() -> Self {
        Planet::new(CelestialBodyName::Uranus, URANUS_ELEMENTS, uranus_magnitude)
    }

    pub fn neptune() -> Self {
        Planet::new(CelestialBodyName::Neptune, NEPTUNE_ELEMENTS, neptune_magnitude)
    }

    pub fn name(&self) -> CelestialBodyName {
        self.name
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    /// Solve the planet's geocentric position and magnitude at `day`.
    ///
    /// Arguments
    /// ---------
    /// * `day`: ephemeris day number.
    /// * `sun`: the Sun already updated for `day`, providing the Earth→Sun offset.
    ///
    /// The ecliptic longitude/latitude stored in the state are heliocentric; RA/Dec are
    /// geocentric.
    pub fn update_position(&mut self, day: MJD, sun: &Sun) {
        let el = self.elements.at(day);
        let to_equator = rotation_between(RefSystem::Ecliptic, RefSystem::Equatorial, day);
        let (n, i, w, a, e, m) = (
            el.ascending_node_longitude,
            el.inclination,
            el.periapsis_argument,
            el.semi_major_axis,
            el.eccentricity,
            el.mean_anomaly,
        );

        let ea = approximate_eccentric_anomaly(m, e);
        let xv = a * (ea.cos() - e);
        let yv = a * ((1.0 - e * e).sqrt() * ea.sin());
        let v = yv.atan2(xv);
        let r = xv.hypot(yv);

        let (svw, cvw) = (v + w).sin_cos();
        let helio = Vector3::new(
            r * (n.cos() * cvw - n.sin() * svw * i.cos()),
            r * (n.sin() * cvw + n.cos() * svw * i.cos()),
            r * (svw * i.sin()),
        );
        let (lon, lat, _) = to_spherical(&helio);

        let geo = helio + Vector3::new(sun.xs(), sun.ys(), 0.0);
        let (ra, dec, _) = to_spherical(&(to_equator * geo));

        let big_r = geo.norm();
        let fv = phase_angle(r, big_r, sun.distance());

        let magnitude = (self.magnitude)(&MagnitudeInputs {
            r,
            big_r,
            phase_angle: fv,
            days: days_since_elements_epoch(day),
            right_ascension: ra,
            declination: dec,
        });

        self.state = BodyState {
            heliocentric_distance: r,
            geocentric_distance: big_r,
            ecliptic_longitude: lon,
            ecliptic_latitude: lat,
            right_ascension: ra,
            declination: dec,
            magnitude,
            phase_angle: fv,
        };
        trace!(
            "{}: ra = {ra:.6} rad, dec = {dec:.6} rad, mag = {magnitude:.2}",
            self.name
        );
    }
}

#[cfg(test)]
mod planets_test {
    use super::*;
    use crate::constants::{J2000, RADEG};
    use crate::kepler::principal_angle;
    use crate::ref_system::from_spherical;
    use approx::assert_abs_diff_eq;

    fn solve(mut planet: Planet, day: MJD) -> BodyState {
        let mut sun = Sun::new();
        sun.update_position(day);
        planet.update_position(day, &sun);
        *planet.state()
    }

    #[test]
    fn test_planets_j2000() {
        // geocentric RA/Dec (degrees) and visual magnitude at 2000-01-01 12:00
        let expected = [
            (Planet::mercury(), 272.1, -24.4, -0.8),
            (Planet::venus(), 239.9, -18.5, -3.9),
            (Planet::mars(), 330.5, -13.2, 1.0),
            (Planet::jupiter(), 24.0, 8.6, -2.3),
            (Planet::saturn(), 38.6, 12.5, -0.3),
            (Planet::uranus(), 317.5, -17.0, 5.9),
            (Planet::neptune(), 305.4, -19.2, 8.0),
        ];

        for (planet, ra, dec, mag) in expected {
            let name = planet.name();
            let st = solve(planet, J2000);
            let got_ra = principal_angle(st.right_ascension) / RADEG;
            assert!((got_ra - ra).abs() < 0.3, "{name} ra {got_ra}");
            assert!((st.declination / RADEG - dec).abs() < 0.3, "{name} dec");
            assert!((st.magnitude - mag).abs() < 0.2, "{name} mag {}", st.magnitude);
            assert!(st.phase_angle >= 0.0 && st.phase_angle <= 180.0);
        }
    }

    #[test]
    fn test_outer_planet_phase_is_small() {
        for k in 0..20 {
            let st = solve(Planet::neptune(), J2000 + 50.0 * k as f64);
            assert!(st.phase_angle < 2.5);
        }
    }

    #[test]
    fn test_magnitude_distance_term() {
        let base = MagnitudeInputs {
            r: 1.0,
            big_r: 1.0,
            phase_angle: 0.0,
            days: 0.0,
            right_ascension: 0.0,
            declination: 0.0,
        };
        assert_abs_diff_eq!(mars_magnitude(&base), -1.51, epsilon = 1e-12);
        let far = MagnitudeInputs { big_r: 10.0, ..base };
        assert_abs_diff_eq!(jupiter_magnitude(&far) - jupiter_magnitude(&base), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_saturn_rings_brighten() {
        // rings seen edge-on contribute nothing, open rings make Saturn brighter
        let base = MagnitudeInputs {
            r: 9.5,
            big_r: 8.5,
            phase_angle: 5.0,
            days: 0.0,
            right_ascension: 2.9585076,
            declination: 0.0,
        };
        assert_abs_diff_eq!(saturn_ring_magnitude(&base), 0.0, epsilon = 1e-12);

        let open = MagnitudeInputs {
            declination: 0.3,
            right_ascension: 2.9585076 + 1.2,
            ..base
        };
        assert!(saturn_ring_magnitude(&open) < 0.0);
        assert!(saturn_magnitude(&open) < saturn_magnitude(&base));
    }

    #[test]
    fn test_ecliptic_coordinates_are_heliocentric() {
        let day = J2000 + 250.0;
        let mut sun = Sun::new();
        sun.update_position(day);
        let mut mars = Planet::mars();
        mars.update_position(day, &sun);
        let state = mars.state();

        // the stored longitude/latitude plus the Earth→Sun offset give back RA/Dec
        let helio = from_spherical(
            state.ecliptic_longitude,
            state.ecliptic_latitude,
            state.heliocentric_distance,
        );
        let geo = helio + Vector3::new(sun.xs(), sun.ys(), 0.0);
        let to_equator = rotation_between(RefSystem::Ecliptic, RefSystem::Equatorial, day);
        let (ra, dec, big_r) = to_spherical(&(to_equator * geo));
        assert_abs_diff_eq!(
            principal_angle(ra),
            principal_angle(state.right_ascension),
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(dec, state.declination, epsilon = 1e-12);
        assert_abs_diff_eq!(big_r, state.geocentric_distance, epsilon = 1e-12);

        let (geo_lon, _, _) = to_spherical(&geo);
        let shift = principal_angle(geo_lon) - principal_angle(state.ecliptic_longitude);
        assert!(shift.abs() > 1e-3);
    }
}
