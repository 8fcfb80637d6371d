//! # Sky color model
//!
//! Turbidity-parameterized approximation of daylight scattering: gives the RGB color of
//! the sky in any direction from the Sun's azimuth and altitude.
//!
//! ## Overview
//!
//! Each color channel is the sum of three terms, scaled by a global daylight factor:
//!
//! ```text
//! channel = ( A · θ01^B · (1 − horizon_atten · sunset)     horizon light
//!           + C · γ10^D · (1 − solar_atten · sunset)       circumsolar glow
//!           + E )                                          overall light
//!           · light_due_to_altitude
//! ```
//!
//! with `θ01` the texel zenith angle remapped to [0, 1], `γ10` the angle between the texel
//! and the Sun remapped from [0, π] to [1, 0], and `sunset = sin(θsun)^20` the reddening
//! that kicks in when the Sun is low. The result is tone mapped with a fixed exposure.
//!
//! Driving a texture from [`SkyColorModel::texel_color`] is left to the caller; see
//! [`texel_direction`] for the dome parameterization used by the renderers.

use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;

use crate::{
    constants::{Degree, Meter, Radian, ATMOSPHERE_DEPTH, EARTH_RADIUS_ATMOSPHERE, RADEG},
    horizon::horizontal_to_direction,
};

pub const MIN_TURBIDITY: f64 = 1.0;
pub const MAX_TURBIDITY: f64 = 60.0;

/// Sun altitude (radians) below which the sky is black.
const DARK_ALTITUDE: Radian = -0.29;
/// Brightening exponent applied to the daylight factor.
const DAY_EXPONENT: f64 = 0.2;
const EXPOSURE: f64 = 5.0;

/// Distribution coefficients of one color channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub horizon_attenuation: f64,
    pub solar_attenuation: f64,
}

impl ChannelCoefficients {
    fn red(t: f64) -> Self {
        ChannelCoefficients {
            a: t * 0.00367 + 0.09,
            b: t * -0.08 + 6.0,
            c: 0.5,
            d: t * -0.63333 + 40.0,
            e: 0.19,
            horizon_attenuation: 0.0,
            solar_attenuation: 0.0,
        }
    }

    fn green(t: f64) -> Self {
        ChannelCoefficients {
            a: t * 0.00367 + 0.11,
            b: t * -0.08 + 6.0,
            c: 0.5,
            d: t * -0.63333 + 40.0,
            e: 0.17,
            horizon_attenuation: 0.2_f64.powf(1.0 + 0.1 * t),
            solar_attenuation: 0.4_f64.powf(1.0 + 0.1 * t),
        }
    }

    fn blue(t: f64) -> Self {
        ChannelCoefficients {
            a: 0.1,
            b: t * -0.11 + 8.0,
            c: 0.5,
            d: t * -0.63333 + 40.0,
            e: 0.4,
            horizon_attenuation: 0.3_f64.powf(1.0 + 0.1 * t),
            solar_attenuation: 0.6_f64.powf(1.0 + 0.1 * t),
        }
    }

    /// Unscaled channel value.
    fn evaluate(&self, theta_0_1: f64, gamma_1_0: f64, sunset_attenuation: f64) -> f64 {
        self.a * theta_0_1.powf(self.b) * (1.0 - self.horizon_attenuation * sunset_attenuation)
            + self.c * gamma_1_0.powf(self.d) * (1.0 - self.solar_attenuation * sunset_attenuation)
            + self.e
    }
}

/// Daylight factor in [0, 1] from the Sun's altitude in degrees.
///
/// Zero below [`DARK_ALTITUDE`]; above it the altitude range is remapped onto a half cosine
/// and brightened by [`DAY_EXPONENT`].
pub fn light_due_to_altitude(sun_altitude: Degree) -> f64 {
    let alt = sun_altitude * RADEG;
    if alt < DARK_ALTITUDE {
        return 0.0;
    }
    let remapped = (((alt - DARK_ALTITUDE) / (PI + DARK_ALTITUDE)) * FRAC_PI_2 - PI).max(-PI);
    (remapped.cos() * 0.5 + 0.5).powf(DAY_EXPONENT)
}

/// Exposure tone mapping of a linear color, clamped to 1 per channel.
pub fn tone_map(color: Vector3<f64>) -> Vector3<f64> {
    let luminance = color.x * 0.299 + color.y * 0.587 + color.z * 0.114;
    let brightness = 1.0 - (-luminance * EXPOSURE).exp();
    let scale = brightness / (luminance + 0.001);
    (color * scale).map(|c| c.min(1.0))
}

/// Quantize a tone mapped color to 8 bits per channel, truncating.
pub fn to_rgb8(color: Vector3<f64>) -> [u8; 3] {
    let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0) as u8;
    [q(color.x), q(color.y), q(color.z)]
}

/// Altitude and azimuth (radians) at the center of texel `(i, j)` of a `width` × `height`
/// dome texture.
///
/// Row 0 is at the zenith and the last row at the horizon. Columns run clockwise seen from
/// above, starting at azimuth −π/2.
pub fn texel_direction(i: usize, j: usize, width: usize, height: usize) -> (Radian, Radian) {
    let altitude = FRAC_PI_2 - (j as f64 + 0.5) * FRAC_PI_2 / height as f64;
    let azimuth = -FRAC_PI_2 - (i as f64 + 0.5) * 2.0 * PI / width as f64;
    (altitude, azimuth)
}

/// Path length through the atmosphere of a ray leaving the ground at elevation `alpha`.
///
/// Straight up gives [`ATMOSPHERE_DEPTH`]; the length grows toward the horizon.
pub fn incidence_length(alpha: Radian) -> Meter {
    let a = EARTH_RADIUS_ATMOSPHERE + ATMOSPHERE_DEPTH;
    let b = EARTH_RADIUS_ATMOSPHERE;

    let big_a = alpha + FRAC_PI_2;
    if big_a.sin().abs() < 1e-5 {
        return ATMOSPHERE_DEPTH;
    }
    let big_b = (b * big_a.sin() / a).clamp(-1.0, 1.0).asin();
    let big_c = PI - (big_a + big_b);
    a * big_c.sin() / big_a.sin()
}

/// Sky color as a function of direction, for one Sun position and turbidity.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyColorModel {
    turbidity: f64,
    red: ChannelCoefficients,
    green: ChannelCoefficients,
    blue: ChannelCoefficients,
    sun_azimuth: Degree,
    sun_altitude: Degree,
    sun_direction: Vector3<f64>,
    sunset_attenuation: f64,
    light_due_to_altitude: f64,
}

impl Default for SkyColorModel {
    fn default() -> Self {
        SkyColorModel::new(crate::ephemeris_data::DEFAULT_TURBIDITY)
    }
}

impl SkyColorModel {
    /// Model with the Sun at the zenith.
    pub fn new(turbidity: f64) -> Self {
        let mut model = SkyColorModel {
            turbidity: MIN_TURBIDITY,
            red: ChannelCoefficients::red(MIN_TURBIDITY),
            green: ChannelCoefficients::green(MIN_TURBIDITY),
            blue: ChannelCoefficients::blue(MIN_TURBIDITY),
            sun_azimuth: 0.0,
            sun_altitude: 90.0,
            sun_direction: Vector3::z(),
            sunset_attenuation: 0.0,
            light_due_to_altitude: 0.0,
        };
        model.set_turbidity(turbidity);
        model.set_sun_position(0.0, 90.0);
        model
    }

    /// Set the haziness, clamped to [[`MIN_TURBIDITY`], [`MAX_TURBIDITY`]].
    pub fn set_turbidity(&mut self, turbidity: f64) {
        let t = turbidity.clamp(MIN_TURBIDITY, MAX_TURBIDITY);
        self.turbidity = t;
        self.red = ChannelCoefficients::red(t);
        self.green = ChannelCoefficients::green(t);
        self.blue = ChannelCoefficients::blue(t);
    }

    pub fn turbidity(&self) -> f64 {
        self.turbidity
    }

    /// Place the Sun, in degrees.
    pub fn set_sun_position(&mut self, azimuth: Degree, altitude: Degree) {
        self.sun_azimuth = azimuth;
        self.sun_altitude = altitude;
        self.sun_direction = horizontal_to_direction(azimuth * RADEG, altitude * RADEG);

        let theta_sun = (90.0 - altitude) * RADEG;
        self.sunset_attenuation = theta_sun.sin().powi(20);
        self.light_due_to_altitude = light_due_to_altitude(altitude);
    }

    pub fn sun_position(&self) -> (Degree, Degree) {
        (self.sun_azimuth, self.sun_altitude)
    }

    pub fn coefficients(&self) -> [&ChannelCoefficients; 3] {
        [&self.red, &self.green, &self.blue]
    }

    /// Linear (not tone mapped) color toward `altitude`/`azimuth`, in radians.
    pub fn linear_color(&self, altitude: Radian, azimuth: Radian) -> Vector3<f64> {
        let texel = horizontal_to_direction(azimuth, altitude);

        let theta = FRAC_PI_2 - altitude;
        let theta_0_1 = (theta / FRAC_PI_2).max(0.0);

        let gamma = self.sun_direction.dot(&texel).clamp(-1.0, 1.0).acos();
        let gamma_1_0 = 1.0 - gamma / PI;
        // larger toward the horizon, for a less circular glow
        let weighted = gamma_1_0.powf(1.0 - theta_0_1 * 0.9);

        let s = self.sunset_attenuation;
        Vector3::new(
            self.red.evaluate(theta_0_1, weighted, s),
            self.green.evaluate(theta_0_1, weighted, s),
            self.blue.evaluate(theta_0_1, weighted, s),
        ) * self.light_due_to_altitude
    }

    /// Tone mapped color in [0, 1] toward `altitude`/`azimuth`, in radians.
    pub fn color(&self, altitude: Radian, azimuth: Radian) -> Vector3<f64> {
        tone_map(self.linear_color(altitude, azimuth))
    }

    /// 8-bit color of texel `(i, j)` of a `width` × `height` dome texture.
    pub fn texel_color(&self, i: usize, j: usize, width: usize, height: usize) -> [u8; 3] {
        let (altitude, azimuth) = texel_direction(i, j, width, height);
        to_rgb8(self.color(altitude, azimuth))
    }
}

#[cfg(test)]
mod sky_color_test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_turbidity_clamp() {
        let mut model = SkyColorModel::new(0.2);
        assert_eq!(model.turbidity(), MIN_TURBIDITY);
        model.set_turbidity(250.0);
        assert_eq!(model.turbidity(), MAX_TURBIDITY);
        model.set_turbidity(2.0);
        let [red, green, blue] = model.coefficients();
        assert_abs_diff_eq!(red.a, 0.09734, epsilon = 1e-12);
        assert_abs_diff_eq!(green.horizon_attenuation, 0.2_f64.powf(1.2), epsilon = 1e-12);
        assert_abs_diff_eq!(blue.b, 7.78, epsilon = 1e-12);
    }

    #[test]
    fn test_light_due_to_altitude() {
        assert_eq!(light_due_to_altitude(-30.0), 0.0);
        let dusk = light_due_to_altitude(-10.0);
        let noon = light_due_to_altitude(60.0);
        assert!(dusk > 0.0 && dusk < noon && noon <= 1.0);
    }

    #[test]
    fn test_night_sky_is_black() {
        let mut model = SkyColorModel::default();
        model.set_sun_position(180.0, -40.0);
        for j in (0..32).step_by(5) {
            for i in (0..32).step_by(7) {
                assert_eq!(model.texel_color(i, j, 32, 32), [0, 0, 0]);
            }
        }
    }

    #[test]
    fn test_day_sky_is_blue_and_glows_near_sun() {
        let mut model = SkyColorModel::default();
        model.set_sun_position(180.0, 45.0);

        let zenith = model.color(FRAC_PI_2 - 0.01, 0.0);
        assert!(zenith.z > zenith.x, "zenith should be blue: {zenith:?}");

        let near_sun = model.linear_color(45.0 * RADEG, PI);
        let opposite = model.linear_color(45.0 * RADEG, 0.0);
        assert!(near_sun.norm() > opposite.norm());
    }

    #[test]
    fn test_tone_map_bounds() {
        let c = tone_map(Vector3::new(10.0, 0.5, 0.0));
        assert!(c.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(to_rgb8(Vector3::new(1.0, 0.0, 0.5)), [255, 0, 127]);
    }

    #[test]
    fn test_texel_direction() {
        let (alt, _) = texel_direction(0, 0, 128, 128);
        assert!(alt < FRAC_PI_2 && alt > 1.55);
        let (alt, azi) = texel_direction(127, 127, 128, 128);
        assert!(alt > 0.0 && alt < 0.02);
        assert_abs_diff_eq!(azi, -FRAC_PI_2 - 127.5 * 2.0 * PI / 128.0, epsilon = 1e-12);
    }

    #[test]
    fn test_incidence_length() {
        assert_abs_diff_eq!(incidence_length(FRAC_PI_2), ATMOSPHERE_DEPTH, epsilon = 1e-6);
        let low = incidence_length(2.0 * RADEG);
        assert!(low > 10.0 * ATMOSPHERE_DEPTH);
        assert!(incidence_length(0.0) > low);
    }
}
