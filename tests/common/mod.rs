#![allow(dead_code)]

use approx::assert_abs_diff_eq;
use skyephem::date_time::DateTime;
use skyephem::ephemeris_data::{CelestialBodyData, EphemerisData};

/// Paris, 21 June 2024 at 22:30.
pub fn paris_record() -> EphemerisData {
    let mut data = EphemerisData::default();
    data.latitude = 48.8566;
    data.longitude = 2.3522;
    data.altitude = 35.0;
    data.date_time = DateTime::new(2024, 6, 21, 22, 30, 0);
    data
}

pub fn assert_body_close(actual: &CelestialBodyData, expected: &CelestialBodyData, epsilon: f64) {
    assert_eq!(actual.name(), expected.name());
    assert_abs_diff_eq!(
        actual.right_ascension,
        expected.right_ascension,
        epsilon = epsilon
    );
    assert_abs_diff_eq!(actual.declination, expected.declination, epsilon = epsilon);
    assert_abs_diff_eq!(actual.magnitude, expected.magnitude, epsilon = epsilon);
    assert_abs_diff_eq!(actual.azimuth, expected.azimuth, epsilon = epsilon);
    assert_abs_diff_eq!(actual.altitude, expected.altitude, epsilon = epsilon);
}

pub fn assert_record_close(actual: &EphemerisData, expected: &EphemerisData, epsilon: f64) {
    assert_eq!(actual.date_time, expected.date_time);
    assert_abs_diff_eq!(
        actual.modified_julian_date,
        expected.modified_julian_date,
        epsilon = epsilon
    );
    assert_abs_diff_eq!(
        actual.local_sidereal_time,
        expected.local_sidereal_time,
        epsilon = epsilon
    );
    for (a, e) in actual.data.iter().zip(expected.data.iter()) {
        assert_body_close(a, e, epsilon);
    }
}
