//! # Ephemeris engine
//!
//! Orchestrates one full ephemeris update over an [`EphemerisData`] record.
//!
//! ## Overview
//!
//! [`EphemerisEngine::update`] runs, in this fixed order:
//!
//! 1. the injected [`UpdateCallback`], if any,
//! 2. optionally advance the record's date/time to the system clock,
//! 3. day number and local sidereal time from the date/time and observer longitude,
//! 4. the Sun, which every other body depends on,
//! 5. the Moon (needs the Sun, the sidereal time and the observer latitude),
//! 6. Mercury through Neptune (need the Sun only),
//!
//! and after each body, converts its RA/Dec to azimuth/altitude for the observer and writes
//! the result into the body's slot.
//!
//! ## Storage
//!
//! The record lives behind the [`EphemerisStore`] trait: an owned [`EphemerisData`] for
//! in-process use, or an [`EphemerisWriter`](crate::shmem::EphemerisWriter) to publish into
//! a shared region. An engine built with [`EphemerisEngine::detached`] has no record at
//! all; every setter and update is then a no-op and getters return zero / defaults.
//!
//! ## Example
//!
//! ```rust
//! use skyephem::bodies::CelestialBodyName;
//! use skyephem::date_time::DateTime;
//! use skyephem::engine::EphemerisEngine;
//!
//! let mut engine = EphemerisEngine::default();
//! engine.set_latitude_longitude_altitude(48.8566, 2.3522, 35.0);
//! engine.set_date_time(DateTime::new(2024, 6, 21, 12, 0, 0));
//! engine.update(false);
//!
//! let sun = engine.body(CelestialBodyName::Sun).unwrap();
//! assert!(sun.altitude > 0.0);
//! ```

use log::{debug, trace};

use crate::{
    bodies::{
        moon::Moon, planets::Planet, sun::sun_longitude_distance, sun::Sun, BodyState,
        CelestialBody, CelestialBodyName,
    },
    config::SkyConfig,
    constants::{Degree, Hour, Meter, MJD, NUM_BODIES, RADEG},
    date_time::DateTime,
    ephemeris_data::{CelestialBodyData, EphemerisData},
    horizon::equatorial_to_horizontal,
    kepler::principal_angle,
    time::local_sidereal_time,
};

/// Somewhere an [`EphemerisData`] record can be read and written.
pub trait EphemerisStore {
    fn record(&self) -> &EphemerisData;
    fn record_mut(&mut self) -> &mut EphemerisData;
}

impl EphemerisStore for EphemerisData {
    fn record(&self) -> &EphemerisData {
        self
    }

    fn record_mut(&mut self) -> &mut EphemerisData {
        self
    }
}

impl EphemerisStore for Box<EphemerisData> {
    fn record(&self) -> &EphemerisData {
        self
    }

    fn record_mut(&mut self) -> &mut EphemerisData {
        self
    }
}

/// Hook run at the start of every [`EphemerisEngine::update`], before any computation.
///
/// Typical use is to drive the record's date/time from an external clock or UI.
pub type UpdateCallback = Box<dyn FnMut(&mut EphemerisData) + Send>;

/// Computes sun, moon and planet positions into a record.
pub struct EphemerisEngine<S: EphemerisStore = EphemerisData> {
    store: Option<S>,
    callback: Option<UpdateCallback>,
    sun: Sun,
    bodies: [CelestialBody; NUM_BODIES - 1],
}

impl Default for EphemerisEngine<EphemerisData> {
    /// Engine over an owned record at Greenwich, J2000.0.
    fn default() -> Self {
        EphemerisEngine::new(EphemerisData::default())
    }
}

impl<S: EphemerisStore> EphemerisEngine<S> {
    /// Engine over `store`. The body names of the record are (re)written.
    pub fn new(mut store: S) -> Self {
        let record = store.record_mut();
        for (slot, name) in record.data.iter_mut().zip(CelestialBodyName::ALL) {
            slot.set_name(name.as_str());
        }
        EphemerisEngine {
            store: Some(store),
            callback: None,
            sun: Sun::new(),
            bodies: CelestialBody::all_after_sun(),
        }
    }

    /// Engine without any record: updates and setters do nothing.
    pub fn detached() -> Self {
        EphemerisEngine {
            store: None,
            callback: None,
            sun: Sun::new(),
            bodies: CelestialBody::all_after_sun(),
        }
    }

    pub fn with_update_callback(mut self, callback: UpdateCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn set_update_callback(&mut self, callback: Option<UpdateCallback>) {
        self.callback = callback;
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&S> {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> Option<&mut S> {
        self.store.as_mut()
    }

    /// Give back the store, leaving the engine detached.
    pub fn take_store(&mut self) -> Option<S> {
        self.store.take()
    }

    pub fn ephemeris_data(&self) -> Option<&EphemerisData> {
        self.store.as_ref().map(|s| s.record())
    }

    pub fn ephemeris_data_mut(&mut self) -> Option<&mut EphemerisData> {
        self.store.as_mut().map(|s| s.record_mut())
    }

    fn with_record(&mut self, f: impl FnOnce(&mut EphemerisData)) {
        if let Some(record) = self.ephemeris_data_mut() {
            f(record);
        }
    }

    fn read<T>(&self, f: impl FnOnce(&EphemerisData) -> T) -> Option<T> {
        self.ephemeris_data().map(f)
    }

    pub fn set_latitude(&mut self, latitude: Degree) {
        self.with_record(|r| r.latitude = latitude);
    }

    pub fn set_longitude(&mut self, longitude: Degree) {
        self.with_record(|r| r.longitude = longitude);
    }

    /// Set the observer position at sea level.
    pub fn set_latitude_longitude(&mut self, latitude: Degree, longitude: Degree) {
        self.set_latitude_longitude_altitude(latitude, longitude, 0.0);
    }

    pub fn set_latitude_longitude_altitude(
        &mut self,
        latitude: Degree,
        longitude: Degree,
        altitude: Meter,
    ) {
        self.with_record(|r| {
            r.latitude = latitude;
            r.longitude = longitude;
            r.altitude = altitude;
        });
    }

    pub fn set_date_time(&mut self, date_time: DateTime) {
        self.with_record(|r| r.date_time = date_time);
    }

    /// Load the system clock into the record's date/time.
    pub fn set_date_time_now(&mut self) {
        self.with_record(|r| r.date_time.now());
    }

    pub fn set_turbidity(&mut self, turbidity: f64) {
        self.with_record(|r| r.turbidity = turbidity);
    }

    /// Apply observer, turbidity and start time from a configuration.
    pub fn configure(&mut self, config: &SkyConfig) {
        self.with_record(|r| config.apply(r));
    }

    pub fn latitude(&self) -> Degree {
        self.read(|r| r.latitude).unwrap_or_default()
    }

    pub fn longitude(&self) -> Degree {
        self.read(|r| r.longitude).unwrap_or_default()
    }

    pub fn altitude(&self) -> Meter {
        self.read(|r| r.altitude).unwrap_or_default()
    }

    pub fn turbidity(&self) -> f64 {
        self.read(|r| r.turbidity).unwrap_or_default()
    }

    /// Record date/time, or J2000.0 when detached.
    pub fn date_time(&self) -> DateTime {
        self.read(|r| r.date_time).unwrap_or_default()
    }

    pub fn modified_julian_date(&self) -> MJD {
        self.read(|r| r.modified_julian_date).unwrap_or_default()
    }

    pub fn local_sidereal_time(&self) -> Hour {
        self.read(|r| r.local_sidereal_time).unwrap_or_default()
    }

    /// Published slot of a body, `None` when detached.
    pub fn body(&self, name: CelestialBodyName) -> Option<&CelestialBodyData> {
        self.ephemeris_data().map(|r| r.body(name))
    }

    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    pub fn moon(&self) -> Option<&Moon> {
        self.bodies.iter().find_map(|b| match b {
            CelestialBody::Moon(m) => Some(m),
            CelestialBody::Planet(_) => None,
        })
    }

    pub fn planet(&self, name: CelestialBodyName) -> Option<&Planet> {
        self.bodies.iter().find_map(|b| match b {
            CelestialBody::Planet(p) if p.name() == name => Some(p),
            _ => None,
        })
    }

    /// Solver state of a body from the last update, including values not published in the
    /// record (distances, ecliptic coordinates, phase angle).
    pub fn body_state(&self, name: CelestialBodyName) -> Option<&BodyState> {
        match name {
            CelestialBodyName::Sun => Some(self.sun.state()),
            _ => self
                .bodies
                .iter()
                .find(|b| b.name() == name)
                .map(CelestialBody::state),
        }
    }

    /// Lit fraction of the Moon's disk at the last update.
    pub fn moon_illuminated_fraction(&self) -> f64 {
        self.moon().map(Moon::illuminated_fraction).unwrap_or_default()
    }

    /// Run the update callback then recompute every body into the engine's record.
    ///
    /// Arguments
    /// ---------
    /// * `advance_time`: load the system clock into the record's date/time first.
    ///
    /// Does nothing on a detached engine.
    pub fn update(&mut self, advance_time: bool) {
        let EphemerisEngine {
            store,
            callback,
            sun,
            bodies,
        } = self;

        let Some(store) = store.as_mut() else {
            trace!("detached ephemeris engine, skipping update");
            return;
        };
        let record = store.record_mut();
        if let Some(callback) = callback.as_mut() {
            callback(record);
        }
        compute(sun, bodies, record, advance_time);
    }

    /// Recompute every body into an arbitrary record, using this engine's solvers.
    ///
    /// The update callback is not run.
    pub fn update_data(&mut self, data: &mut EphemerisData, advance_time: bool) {
        compute(&mut self.sun, &mut self.bodies, data, advance_time);
    }
}

fn compute(sun: &mut Sun, bodies: &mut [CelestialBody], data: &mut EphemerisData, advance_time: bool) {
    if advance_time {
        data.date_time.now();
    }

    let day = data.date_time.modified_julian_date();
    data.modified_julian_date = day;

    let (_, rsn) = sun_longitude_distance(day);
    let lst = local_sidereal_time(day, data.longitude);
    data.local_sidereal_time = lst;
    let latitude = data.latitude * RADEG;

    sun.update_position(day);
    publish(data, CelestialBodyName::Sun, sun.state(), rsn);

    for body in bodies.iter_mut() {
        body.update_position(day, lst, latitude, sun);
        publish(data, body.name(), body.state(), rsn);
    }

    debug!(
        "ephemeris updated for {} (day {day:.6}, LST {lst:.4} h)",
        data.date_time
    );
}

/// Copy a body's RA/Dec/magnitude into its slot and derive azimuth/altitude.
fn publish(data: &mut EphemerisData, name: CelestialBodyName, state: &BodyState, sun_distance: f64) {
    let latitude = data.latitude * RADEG;
    let lst = data.local_sidereal_time;
    let elevation = data.altitude;

    let slot = data.body_mut(name);
    slot.right_ascension = principal_angle(state.right_ascension);
    slot.declination = state.declination;
    slot.magnitude = state.magnitude;

    let (azimuth, altitude) = equatorial_to_horizontal(
        slot.right_ascension,
        slot.declination,
        latitude,
        lst,
        elevation,
        sun_distance,
    );
    slot.azimuth = azimuth;
    slot.altitude = altitude;
}
