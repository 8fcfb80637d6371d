use log::trace;

use crate::{
    bodies::{sun::Sun, BodyState},
    constants::{Degree, Hour, Radian, DPI, MJD, RADEG, RADH},
    earth_orientation::geocentric_latitude,
    kepler::approximate_eccentric_anomaly,
    orbital_elements::{OrbitalElements, MOON_ELEMENTS},
    ref_system::{from_spherical, rotation_between, to_spherical, RefSystem},
};

/// Longitude perturbations: amplitude (degrees) and multipliers of (M, D, Ms, F).
const LONGITUDE_TERMS: [(f64, [f64; 4]); 12] = [
    (-1.274, [1.0, -2.0, 0.0, 0.0]),
    (0.658, [0.0, 2.0, 0.0, 0.0]),
    (-0.186, [0.0, 0.0, 1.0, 0.0]),
    (-0.059, [2.0, -2.0, 0.0, 0.0]),
    (-0.057, [1.0, -2.0, 1.0, 0.0]),
    (0.053, [1.0, 2.0, 0.0, 0.0]),
    (0.046, [0.0, 2.0, -1.0, 0.0]),
    (0.041, [1.0, 0.0, -1.0, 0.0]),
    (-0.035, [0.0, 1.0, 0.0, 0.0]),
    (-0.031, [1.0, 0.0, 1.0, 0.0]),
    (-0.015, [0.0, -2.0, 0.0, 2.0]),
    (0.011, [1.0, -4.0, 0.0, 0.0]),
];

/// Latitude perturbations: amplitude (degrees) and multipliers of (M, D, Ms, F).
const LATITUDE_TERMS: [(f64, [f64; 4]); 5] = [
    (-0.173, [0.0, -2.0, 0.0, 1.0]),
    (-0.055, [1.0, -2.0, 0.0, -1.0]),
    (-0.046, [1.0, -2.0, 0.0, 1.0]),
    (0.033, [0.0, 2.0, 0.0, 1.0]),
    (0.017, [2.0, 0.0, 0.0, 1.0]),
];

fn periodic_sum(terms: &[(f64, [f64; 4])], args: [f64; 4]) -> Degree {
    terms
        .iter()
        .map(|(amp, k)| {
            let arg: f64 = k.iter().zip(args.iter()).map(|(k, a)| k * a).sum();
            amp * arg.sin()
        })
        .sum()
}

/// The Moon, solved geocentrically then corrected to the observer's position.
#[derive(Debug, Clone)]
pub struct Moon {
    elements: OrbitalElements,
    state: BodyState,
    geocentric_right_ascension: Radian,
    geocentric_declination: Radian,
}

impl Default for Moon {
    fn default() -> Self {
        Moon::new()
    }
}

impl Moon {
    pub fn new() -> Self {
        Moon {
            elements: MOON_ELEMENTS,
            state: BodyState::default(),
            geocentric_right_ascension: 0.0,
            geocentric_declination: 0.0,
        }
    }

    /// Solve the Moon's topocentric RA/Dec at `day`.
    ///
    /// Arguments
    /// ---------
    /// * `day`: ephemeris day number.
    /// * `local_sidereal_time`: hours.
    /// * `latitude`: observer geodetic latitude, radians.
    /// * `sun`: the Sun already updated for `day`; its mean anomaly and argument of
    ///   perihelion enter the perturbation arguments.
    ///
    /// The ecliptic position carries the twelve largest longitude terms, five latitude terms
    /// and two distance terms. The topocentric correction uses the lunar horizontal parallax
    /// `asin(1/r)` and the observer's geocentric latitude.
    pub fn update_position(
        &mut self,
        day: MJD,
        local_sidereal_time: Hour,
        latitude: Radian,
        sun: &Sun,
    ) {
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
        let mut r = xv.hypot(yv);

        let (svw, cvw) = (v + w).sin_cos();
        let xh = r * (n.cos() * cvw - n.sin() * svw * i.cos());
        let yh = r * (n.sin() * cvw + n.cos() * svw * i.cos());
        let zh = r * (svw * i.sin());

        let mut lon = yh.atan2(xh);
        let mut lat = zh.atan2(xh.hypot(yh));

        let ms = sun.mean_anomaly();
        let ls = ms + sun.periapsis_argument();
        let lm = m + w + n;
        let d = lm - ls;
        let f = lm - n;

        let args = [m, d, ms, f];
        lon += periodic_sum(&LONGITUDE_TERMS, args) * RADEG;
        lat += periodic_sum(&LATITUDE_TERMS, args) * RADEG;
        r += -0.58 * (m - 2.0 * d).cos() - 0.46 * (2.0 * d).cos();

        let eq = to_equator * from_spherical(lon, lat, r);
        let (mut geo_ra, geo_dec, _) = to_spherical(&eq);
        if geo_ra < 0.0 {
            geo_ra += DPI;
        }

        let (ra, dec) =
            topocentric_correction(geo_ra, geo_dec, r, local_sidereal_time, latitude);

        self.geocentric_right_ascension = geo_ra;
        self.geocentric_declination = geo_dec;
        self.state = BodyState {
            heliocentric_distance: r,
            geocentric_distance: r,
            ecliptic_longitude: lon,
            ecliptic_latitude: lat,
            right_ascension: ra,
            declination: dec,
            magnitude: 0.0,
            phase_angle: phase_angle_from_elongation(lon, lat, sun.state().ecliptic_longitude),
        };
        trace!("Moon: ra = {ra:.6} rad, dec = {dec:.6} rad, r = {r:.3} Earth radii");
    }

    pub fn state(&self) -> &BodyState {
        &self.state
    }

    /// Right ascension seen from the Earth's center (radians, [0, 2π)).
    pub fn geocentric_right_ascension(&self) -> Radian {
        self.geocentric_right_ascension
    }

    /// Declination seen from the Earth's center (radians).
    pub fn geocentric_declination(&self) -> Radian {
        self.geocentric_declination
    }

    /// Fraction of the disk lit by the Sun, in [0, 1].
    pub fn illuminated_fraction(&self) -> f64 {
        illuminated_fraction(self.state.phase_angle)
    }
}

/// Shift geocentric RA/Dec to the observer's position on the Earth's surface.
///
/// Arguments
/// ---------
/// * `geo_ra`, `geo_dec`: geocentric coordinates, radians.
/// * `distance`: Earth-Moon distance in Earth radii.
/// * `local_sidereal_time`: hours.
/// * `latitude`: geodetic latitude, radians.
///
/// Return
/// ------
/// * `(ra, dec)` topocentric, radians. On the equator the declination is left unchanged.
pub fn topocentric_correction(
    geo_ra: Radian,
    geo_dec: Radian,
    distance: f64,
    local_sidereal_time: Hour,
    latitude: Radian,
) -> (Radian, Radian) {
    let mpar = (1.0 / distance).asin();
    let (gclat, rho) = geocentric_latitude(latitude);

    let ha = (local_sidereal_time - RADH * geo_ra) / RADH;
    let g = (gclat.tan() / ha.cos()).atan();

    let ra = geo_ra - mpar * rho * gclat.cos() * ha.sin() / geo_dec.cos();
    let dec = if latitude.abs() > 0.0 {
        geo_dec - mpar * rho * gclat.sin() * (g - geo_dec).sin() / g.sin()
    } else {
        geo_dec
    };
    (ra, dec)
}

/// Sun-Moon-Earth angle (degrees) from the Moon's ecliptic position and the Sun's longitude.
pub fn phase_angle_from_elongation(
    moon_longitude: Radian,
    moon_latitude: Radian,
    sun_longitude: Radian,
) -> Degree {
    let cos_elong = ((moon_longitude - sun_longitude).cos() * moon_latitude.cos()).clamp(-1.0, 1.0);
    180.0 - cos_elong.acos().to_degrees()
}

/// Lit fraction of a disk seen at the given phase angle (degrees).
pub fn illuminated_fraction(phase_angle: Degree) -> f64 {
    (1.0 + (phase_angle * RADEG).cos()) / 2.0
}
