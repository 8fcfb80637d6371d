//! # Constants and type definitions for skyephem
//!
//! This module centralizes the **astronomical constants**, **conversion factors**, and
//! **type aliases** used by the ephemeris engine, the coordinate transforms and the
//! sky color model.
//!
//! ## Time axis
//!
//! All orbital math runs on the *ephemeris day number* returned by
//! [`DateTime::modified_julian_date`](crate::date_time::DateTime::modified_julian_date):
//! a continuous day count whose origin is JD 2415020.0 (1899-12-31 12:00 UTC).
//! On this axis J2000.0 is exactly [`J2000`] = 36525.0 and the orbital-element epoch
//! (1999-12-31 00:00 UTC) is [`ELEMENTS_EPOCH`] = 36523.5.
//!
//! Use [`to_standard_mjd`] / [`from_standard_mjd`] to move between this axis and the
//! usual MJD (JD − 2400000.5).

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Radians → hours (12/π)
pub const RADH: f64 = 12.0 / std::f64::consts::PI;

/// Julian Date of the origin of the ephemeris day number
pub const MJD0: f64 = 2_415_020.0;

/// Conversion factor between Julian Date and the standard Modified Julian Date
pub const JDTOMJD: f64 = 2_400_000.5;

/// Offset to add to an ephemeris day number to obtain a standard MJD
pub const MJD_OFFSET: f64 = MJD0 - JDTOMJD;

/// J2000.0 (2000-01-01 12:00 UTC) on the ephemeris day axis
pub const J2000: f64 = 2_451_545.0 - MJD0;

/// Epoch of the two-term orbital elements (1999-12-31 00:00 UTC) on the ephemeris day axis
pub const ELEMENTS_EPOCH: f64 = 36_523.5;

/// Ratio of a mean solar day to a sidereal day
pub const SIDRATE: f64 = 0.997_269_567_7;

/// Mean radius of the Earth used for observer elevation, in meters
pub const EARTH_RADIUS_METERS: f64 = 6_378_160.0;

/// Equatorial horizontal parallax scale: Earth diameter over the mean Sun distance (km/km)
pub const HORIZONTAL_PARALLAX_SCALE: f64 = 2.0 * 6378.0 / 146.0e6;

/// Atmosphere depth used by the incidence length helper, in meters
pub const ATMOSPHERE_DEPTH: f64 = 30_000.0;

/// Earth radius used by the incidence length helper, in meters
pub const EARTH_RADIUS_ATMOSPHERE: f64 = 6_378_140.0;

/// Kepler convergence threshold on the eccentric anomaly, in radians
pub const KEPLER_TOLERANCE: f64 = 1e-6;

/// Iteration cap for the Kepler solvers
pub const KEPLER_MAX_ITER: usize = 100;

/// Number of celestial body slots in an [`EphemerisData`](crate::ephemeris_data::EphemerisData) record
pub const NUM_BODIES: usize = 9;

/// Fixed size of a body name in the shared record, NUL padded
pub const BODY_NAME_LEN: usize = 16;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Angle in hours (sidereal time, hour angle)
pub type Hour = f64;
/// Distance in meters
pub type Meter = f64;
/// Day number on the ephemeris axis (see module documentation)
pub type MJD = f64;

/// Convert an ephemeris day number to a standard Modified Julian Date.
pub fn to_standard_mjd(day: MJD) -> f64 {
    day + MJD_OFFSET
}

/// Convert a standard Modified Julian Date to an ephemeris day number.
pub fn from_standard_mjd(mjd: f64) -> MJD {
    mjd - MJD_OFFSET
}

#[cfg(test)]
mod constants_test {
    use super::*;

    #[test]
    fn test_epochs() {
        assert_eq!(J2000, 36525.0);
        assert_eq!(MJD_OFFSET, 15019.5);
        assert_eq!(to_standard_mjd(J2000), 51544.5);
        assert_eq!(from_standard_mjd(51544.5), J2000);
    }
}
