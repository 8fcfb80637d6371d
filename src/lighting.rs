//! # Scene lighting
//!
//! Ambient and diffuse light colors for a sun light and a moon light, derived from the
//! published Sun and Moon positions. Colors are linear RGB in [0, 1]; directions are unit
//! vectors in the local frame (x east, y north, z up).

use nalgebra::Vector3;

use crate::{
    bodies::CelestialBodyName,
    constants::RADEG,
    ephemeris_data::{CelestialBodyData, EphemerisData},
    horizon::horizontal_to_direction,
};

/// Constant starlight always present in the moon light ambient term.
const STARLIGHT: f64 = 0.05;

/// Colors and direction of one directional light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    pub ambient: Vector3<f64>,
    pub diffuse: Vector3<f64>,
    /// Unit vector toward the light source
    pub direction: Vector3<f64>,
}

/// Unit vector toward a body from its published azimuth/altitude.
pub fn body_direction(body: &CelestialBodyData) -> Vector3<f64> {
    horizontal_to_direction(body.azimuth, body.altitude)
}

/// Sunlight colors: reddish and dim near the horizon, white when the Sun is high.
///
/// Diffuse is `(h·0.5, h·0.25, h·0.125)` clamped to [0, 1], ambient is
/// `((h+10)·0.04, (h+10)·0.02, (h+10)·0.01)` clamped to [0, 0.2], with `h` the Sun's
/// altitude in degrees.
pub fn sun_light(sun: &CelestialBodyData) -> LightColors {
    let h = sun.altitude / RADEG;
    let diffuse = Vector3::new(h * 0.5, h * 0.25, h * 0.125).map(|c| c.clamp(0.0, 1.0));
    let ambient = Vector3::new(0.04, 0.02, 0.01)
        .map(|k| ((h + 10.0) * k).clamp(0.0, 0.2));
    LightColors {
        ambient,
        diffuse,
        direction: body_direction(sun),
    }
}

/// Moonlight colors, slightly blue, fading as the Sun rises and as the Moon sets.
///
/// The moonlight intensity is
/// `(−0.5·(sun·moon) + 0.5) · sunfactor · visible · 0.5` where `sunfactor` is
/// `−2·sun_altitude` (degrees) clamped to [0, 1] and `visible` the Moon direction's
/// vertical component over 0.05, clamped to [0, 1].
pub fn moon_light(sun: &CelestialBodyData, moon: &CelestialBodyData) -> LightColors {
    let to_sun = body_direction(sun);
    let to_moon = body_direction(moon);

    let sunfactor = (-2.0 * sun.altitude / RADEG).clamp(0.0, 1.0);
    let brightness = (to_sun.dot(&to_moon) * -0.5 + 0.5) * sunfactor;
    let visible = (to_moon.z / 0.05).clamp(0.0, 1.0);
    let m = brightness * visible * 0.5;

    LightColors {
        ambient: Vector3::new(
            m * 0.32 + STARLIGHT,
            m * 0.32 + STARLIGHT,
            m * 0.4 + STARLIGHT,
        ),
        diffuse: Vector3::new(m * 0.8, m * 0.8, m),
        direction: to_moon,
    }
}

/// Sun and Moon lights for a record.
pub fn scene_lights(data: &EphemerisData) -> (LightColors, LightColors) {
    let sun = data.body(CelestialBodyName::Sun);
    let moon = data.body(CelestialBodyName::Moon);
    (sun_light(sun), moon_light(sun, moon))
}
