//! # Shared ephemeris record
//!
//! [`EphemerisData`] is the only interface between the ephemeris engine and its consumers:
//! observer state, current date/time, derived day number and sidereal time, and one
//! [`CelestialBodyData`] slot per body.
//!
//! ## Layout
//!
//! Every type in the record is `#[repr(C)]` plain-old-data (bytemuck [`Pod`]) without
//! padding, so the record can be copied byte for byte into a memory-mapped file and read
//! back by another process (see [`crate::shmem`]).
//!
//! | offset | field                  | size |
//! |-------:|------------------------|-----:|
//! | 0      | latitude … turbidity   | 32   |
//! | 32     | date_time              | 32   |
//! | 64     | modified_julian_date   | 8    |
//! | 72     | local_sidereal_time    | 8    |
//! | 80     | data (9 × 56)          | 504  |

use std::fmt;

use bytemuck::{Pod, Zeroable};

use crate::{
    bodies::CelestialBodyName,
    constants::{Degree, Hour, Meter, Radian, BODY_NAME_LEN, MJD, NUM_BODIES},
    date_time::DateTime,
};

/// Greenwich observatory latitude (degrees)
pub const DEFAULT_LATITUDE: Degree = 51.4779;
/// Greenwich observatory longitude (degrees, east positive)
pub const DEFAULT_LONGITUDE: Degree = -0.0015;
pub const DEFAULT_ALTITUDE: Meter = 0.0;
pub const DEFAULT_TURBIDITY: f64 = 2.0;

/// Published position of one body.
#[repr(C)]
#[derive(Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct CelestialBodyData {
    /// NUL padded ASCII name
    pub name: [u8; BODY_NAME_LEN],
    pub right_ascension: Radian,
    pub declination: Radian,
    pub magnitude: f64,
    pub azimuth: Radian,
    pub altitude: Radian,
}

impl CelestialBodyData {
    pub fn named(name: &str) -> Self {
        let mut data = CelestialBodyData::zeroed();
        data.set_name(name);
        data
    }

    /// Store `name`, truncated to fit with at least one trailing NUL.
    pub fn set_name(&mut self, name: &str) {
        self.name = [0; BODY_NAME_LEN];
        let bytes = name.as_bytes();
        let n = bytes.len().min(BODY_NAME_LEN - 1);
        self.name[..n].copy_from_slice(&bytes[..n]);
    }

    /// Display name up to the first NUL; empty if the bytes are not UTF-8.
    pub fn name(&self) -> &str {
        let end = self
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(BODY_NAME_LEN);
        std::str::from_utf8(&self.name[..end]).unwrap_or_default()
    }
}

impl fmt::Debug for CelestialBodyData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CelestialBodyData")
            .field("name", &self.name())
            .field("right_ascension", &self.right_ascension)
            .field("declination", &self.declination)
            .field("magnitude", &self.magnitude)
            .field("azimuth", &self.azimuth)
            .field("altitude", &self.altitude)
            .finish()
    }
}

/// Observer state plus the computed position of every body.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EphemerisData {
    /// Degrees, north positive
    pub latitude: Degree,
    /// Degrees, east positive
    pub longitude: Degree,
    /// Meters above sea level
    pub altitude: Meter,
    pub turbidity: f64,
    pub date_time: DateTime,
    pub modified_julian_date: MJD,
    pub local_sidereal_time: Hour,
    pub data: [CelestialBodyData; NUM_BODIES],
}

impl Default for EphemerisData {
    /// Observer at Greenwich, sea level, at J2000.0, with named but empty body slots.
    fn default() -> Self {
        let mut data = [CelestialBodyData::zeroed(); NUM_BODIES];
        for (slot, name) in data.iter_mut().zip(CelestialBodyName::ALL) {
            slot.set_name(name.as_str());
        }
        EphemerisData {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            altitude: DEFAULT_ALTITUDE,
            turbidity: DEFAULT_TURBIDITY,
            date_time: DateTime::default(),
            modified_julian_date: 0.0,
            local_sidereal_time: 0.0,
            data,
        }
    }
}

impl EphemerisData {
    pub fn body(&self, name: CelestialBodyName) -> &CelestialBodyData {
        &self.data[name.index()]
    }

    pub fn body_mut(&mut self, name: CelestialBodyName) -> &mut CelestialBodyData {
        &mut self.data[name.index()]
    }

    /// Iterate over `(name, slot)` pairs in slot order.
    pub fn bodies(&self) -> impl Iterator<Item = (CelestialBodyName, &CelestialBodyData)> {
        CelestialBodyName::ALL.into_iter().zip(self.data.iter())
    }
}
