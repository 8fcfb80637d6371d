mod common;

use common::{assert_record_close, paris_record};
use skyephem::{
    bodies::CelestialBodyName,
    engine::EphemerisEngine,
    shmem::{EphemerisReader, EphemerisWriter},
    sky_errors::SkyError,
};

#[test]
fn reader_sees_engine_updates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sky.shm");

    let mut writer = EphemerisWriter::attach(&path).unwrap();
    writer.publish(&paris_record());
    let mut engine = EphemerisEngine::new(writer);
    engine.update(false);

    let reader = EphemerisReader::attach(&path).unwrap();
    let snapshot = reader.snapshot();
    assert_record_close(&snapshot, engine.ephemeris_data().unwrap(), 0.0);
    assert_eq!(snapshot.body(CelestialBodyName::Venus).name(), "Venus");

    engine.set_turbidity(7.5);
    assert_eq!(reader.snapshot().turbidity, 7.5);
}

#[test]
fn writer_reattach_keeps_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sky.shm");

    {
        let mut engine = EphemerisEngine::new(EphemerisWriter::attach(&path).unwrap());
        engine.set_latitude_longitude_altitude(-33.86, 151.21, 58.0);
        engine.update(false);
        engine.store().unwrap().flush().unwrap();
    }

    let engine = EphemerisEngine::new(EphemerisWriter::attach(&path).unwrap());
    assert_eq!(engine.latitude(), -33.86);
    assert_eq!(engine.longitude(), 151.21);
    assert_eq!(engine.altitude(), 58.0);
    assert!(engine.modified_julian_date() > 0.0);
}

#[test]
fn reader_without_writer_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.shm");
    assert!(matches!(
        EphemerisReader::attach(&path),
        Err(SkyError::SharedRegionIo { .. })
    ));
}
