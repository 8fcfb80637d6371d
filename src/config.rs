//! Observer and runtime configuration with defaults and RON persistence.
//!
//! A missing field in a configuration file takes its default value, so a file only needs
//! to list what differs from the Greenwich / J2000.0 setup:
//!
//! ```ron
//! (
//!     observer: (latitude: 48.8566, longitude: 2.3522, altitude: 35.0),
//!     time: (start: Now, time_zone: Hours(1), auto_advance: true),
//! )
//! ```

use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    constants::{Degree, Meter},
    date_time::{DateTime, TimeZoneOffset},
    ephemeris_data::{
        EphemerisData, DEFAULT_ALTITUDE, DEFAULT_LATITUDE, DEFAULT_LONGITUDE, DEFAULT_TURBIDITY,
    },
    shmem::EphemerisWriter,
    sky_errors::SkyError,
};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyConfig {
    pub observer: ObserverConfig,
    pub time: TimeConfig,
    /// Atmospheric haziness fed to the sky color model.
    pub turbidity: f64,
    pub shared_region: SharedRegionConfig,
    /// Star catalog file, the built-in bright stars when absent.
    pub star_catalog: Option<PathBuf>,
    /// Log level used when `RUST_LOG` is not set (e.g. "debug", "info", "warn").
    pub log_level: String,
}

/// Observer position.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObserverConfig {
    /// Degrees, north positive.
    pub latitude: Degree,
    /// Degrees, east positive.
    pub longitude: Degree,
    /// Meters above sea level.
    pub altitude: Meter,
}

/// Where the clock starts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StartTime {
    /// The system clock at startup.
    Now,
    /// A fixed local date and time.
    At {
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
    },
}

/// Date/time handling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeConfig {
    pub start: StartTime,
    pub time_zone: TimeZoneOffset,
    /// Follow the system clock on every update.
    pub auto_advance: bool,
    /// Delay between two updates of a publishing loop, in milliseconds.
    pub update_interval_ms: u64,
    /// Simulated seconds per update when the clock does not auto-advance (0 freezes time).
    pub time_step_seconds: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct SharedRegionConfig {
    /// Region file, `skyephem.shm` in the temporary directory when absent.
    pub path: Option<PathBuf>,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            observer: ObserverConfig::default(),
            time: TimeConfig::default(),
            turbidity: DEFAULT_TURBIDITY,
            shared_region: SharedRegionConfig::default(),
            star_catalog: None,
            log_level: "info".to_string(),
        }
    }
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            latitude: DEFAULT_LATITUDE,
            longitude: DEFAULT_LONGITUDE,
            altitude: DEFAULT_ALTITUDE,
        }
    }
}

impl Default for StartTime {
    fn default() -> Self {
        StartTime::At {
            year: 2000,
            month: 1,
            day: 1,
            hour: 12,
            minute: 0,
            second: 0,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            start: StartTime::default(),
            time_zone: TimeZoneOffset::default(),
            auto_advance: false,
            update_interval_ms: 1000,
            time_step_seconds: 0,
        }
    }
}

impl SharedRegionConfig {
    pub fn resolved_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(EphemerisWriter::default_path)
    }
}

impl SkyConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self, SkyError> {
        let contents = std::fs::read_to_string(path).map_err(SkyError::ConfigRead)?;
        let config: SkyConfig = ron::from_str(&contents).map_err(SkyError::ConfigParse)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, the defaults otherwise. A file that exists but does not
    /// parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, SkyError> {
        if path.exists() {
            SkyConfig::load(path)
        } else {
            info!("No config at {}, using defaults", path.display());
            Ok(SkyConfig::default())
        }
    }

    /// Save as pretty-printed RON, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), SkyError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(SkyError::ConfigWrite)?;
        }
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(SkyError::ConfigSerialize)?;
        std::fs::write(path, serialized).map_err(SkyError::ConfigWrite)?;
        Ok(())
    }

    /// Date/time the clock starts at, with the configured timezone.
    ///
    /// For [`StartTime::Now`] the system clock is read; on failure J2000.0 is kept and a
    /// warning is logged.
    pub fn start_date_time(&self) -> DateTime {
        let mut dt = match self.time.start {
            StartTime::Now => DateTime::default(),
            StartTime::At {
                year,
                month,
                day,
                hour,
                minute,
                second,
            } => DateTime::new(year, month, day, hour, minute, second),
        };
        dt.set_time_zone_offset(self.time.time_zone);
        if self.time.start == StartTime::Now {
            dt.now();
        }
        dt
    }

    /// Write observer, turbidity and start time into a record.
    pub fn apply(&self, data: &mut EphemerisData) {
        data.latitude = self.observer.latitude;
        data.longitude = self.observer.longitude;
        data.altitude = self.observer.altitude;
        data.turbidity = self.turbidity;
        data.date_time = self.start_date_time();
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = SkyConfig::default();
        let ron_str = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new()).unwrap();
        assert!(ron_str.contains("latitude: 51.4779"));
        assert!(ron_str.contains("turbidity: 2.0"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let text = "(observer: (latitude: -33.86), time: (start: Now, time_zone: Hours(10)))";
        let config: SkyConfig = ron::from_str(text).unwrap();
        assert_eq!(config.observer.latitude, -33.86);
        assert_eq!(config.observer.longitude, DEFAULT_LONGITUDE);
        assert_eq!(config.time.start, StartTime::Now);
        assert_eq!(config.time.time_zone, TimeZoneOffset::Hours(10));
        assert_eq!(config.time.update_interval_ms, 1000);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("skyephem.ron");

        let mut config = SkyConfig::default();
        config.observer.altitude = 1250.0;
        config.time.time_zone = TimeZoneOffset::System;
        config.time.auto_advance = true;
        config.star_catalog = Some(PathBuf::from("stars.csv"));
        config.save(&path).unwrap();

        assert_eq!(SkyConfig::load(&path).unwrap(), config);
        assert_eq!(SkyConfig::load_or_default(&path).unwrap(), config);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.ron");
        assert!(matches!(SkyConfig::load(&missing), Err(SkyError::ConfigRead(_))));
        assert_eq!(SkyConfig::load_or_default(&missing).unwrap(), SkyConfig::default());

        let broken = dir.path().join("broken.ron");
        std::fs::write(&broken, "(observer: (latitude: \"north\"))").unwrap();
        assert!(matches!(
            SkyConfig::load_or_default(&broken),
            Err(SkyError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_apply() {
        let mut config = SkyConfig::default();
        config.observer.latitude = 10.0;
        config.turbidity = 5.0;
        config.time.start = StartTime::At {
            year: 2024,
            month: 2,
            day: 30,
            hour: 0,
            minute: 0,
            second: 0,
        };
        config.time.time_zone = TimeZoneOffset::Hours(2);

        let mut data = EphemerisData::default();
        config.apply(&mut data);
        assert_eq!(data.latitude, 10.0);
        assert_eq!(data.turbidity, 5.0);
        assert_eq!(data.date_time.month(), 3);
        assert_eq!(data.date_time.day_of_month(), 1);
        assert_eq!(data.date_time.time_zone_offset(), 2);
    }

    #[test]
    fn test_region_path() {
        let config = SharedRegionConfig::default();
        assert!(config.resolved_path().ends_with("skyephem.shm"));
        let config = SharedRegionConfig {
            path: Some(PathBuf::from("/tmp/custom.shm")),
        };
        assert_eq!(config.resolved_path(), PathBuf::from("/tmp/custom.shm"));
    }
}
