use hifitime::Epoch;

use crate::constants::{from_standard_mjd, to_standard_mjd, Degree, Hour, J2000, MJD, SIDRATE};

/// Transformation from an ephemeris day number to a hifitime epoch (UTC)
///
/// Argument
/// --------
/// * `day`: ephemeris day number (days since JD 2415020.0)
///
/// Return
/// ------
/// * the corresponding [`Epoch`]
pub fn day_to_epoch(day: MJD) -> Epoch {
    Epoch::from_mjd_utc(to_standard_mjd(day))
}

/// Transformation from a hifitime epoch to an ephemeris day number (UTC)
///
/// Argument
/// --------
/// * `epoch`: any [`Epoch`]
///
/// Return
/// ------
/// * the ephemeris day number of the epoch in the UTC time scale
pub fn epoch_to_day(epoch: Epoch) -> MJD {
    from_standard_mjd(epoch.to_mjd_utc_days())
}

/// Compute the Greenwich mean sidereal time in hours for an ephemeris day number.
///
/// The cubic GMST polynomial is evaluated at the preceding 0h UT, then the elapsed
/// fraction of the day is added at the sidereal rate.
///
/// Arguments
/// ---------
/// * `day`: ephemeris day number (UTC, used as UT1)
///
/// Return
/// ------
/// * GMST in hours, not wrapped (may exceed 24).
fn greenwich_sidereal_hours(day: MJD) -> Hour {
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 0.093104;
    const C3: f64 = -6.2e-6;

    // The day number is a half-integer at 0h UT
    let midnight = (day - 0.5).floor() + 0.5;
    let hr = (day - midnight) * 24.0;

    let t = ((day - 0.5).trunc() + 0.5 - J2000) / 36525.0;
    let gmst0 = (C0 + (C1 + (C2 + C3 * t) * t) * t) / 3600.0;

    hr / SIDRATE + gmst0
}

/// Wrap an angle in hours into [0, 24).
#[inline]
pub fn wrap_hours(h: Hour) -> Hour {
    h - 24.0 * (h / 24.0).floor()
}

/// Local mean sidereal time at an east-positive longitude.
///
/// Arguments
/// ---------
/// * `day`: ephemeris day number
/// * `longitude`: observer longitude in degrees, east positive
///
/// Return
/// ------
/// * LST in hours within [0, 24).
///
/// See also
/// --------
/// * [`crate::horizon::equatorial_to_horizontal`] – consumes the LST to build hour angles
pub fn local_sidereal_time(day: MJD, longitude: Degree) -> Hour {
    wrap_hours(greenwich_sidereal_hours(day) + longitude / 15.0)
}
