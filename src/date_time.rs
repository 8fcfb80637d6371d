//! # Calendar date/time and ephemeris day number
//!
//! [`DateTime`] stores local wall-clock calendar fields together with a timezone offset
//! (seconds east of UTC). Every mutation goes through [`normalize`], a pure function that
//! rolls out-of-range fields over with proleptic Gregorian calendar arithmetic, so
//! "day + 1" stepping on the 31st of a month lands on the 1st of the next one.
//!
//! The struct is `#[repr(C)]` plain-old-data so that it can live inside the shared
//! [`EphemerisData`](crate::ephemeris_data::EphemerisData) record.
//!
//! ## UTC policy
//!
//! The stored offset is the *only* source of the local → UTC conversion:
//! [`DateTime::gmt`] subtracts it from the local fields and
//! [`DateTime::modified_julian_date`] works on that UTC view. The host timezone is consulted
//! only when [`TimeZoneOffset::System`] is explicitly requested, and then it is copied into
//! the stored offset. Identical fields and offset therefore always yield the same day number.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use chrono::Local;
use hifitime::Epoch;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::MJD;
use crate::sky_errors::SkyError;

const WEEKDAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const MAX_OFFSET_HOURS: i32 = 24;

/// Source of the timezone offset applied to a [`DateTime`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeZoneOffset {
    /// Adopt the offset currently configured on the host.
    System,
    /// Explicit offset in whole hours east of UTC, clamped to ±24.
    Hours(i32),
}

impl Default for TimeZoneOffset {
    fn default() -> Self {
        TimeZoneOffset::Hours(0)
    }
}

/// Raw calendar fields, possibly out of range, as consumed and produced by [`normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFields {
    pub year: i64,
    pub month: i64,
    pub day: i64,
    pub hour: i64,
    pub minute: i64,
    pub second: i64,
}

/// Days since 1970-01-01 of a proleptic Gregorian date (month in 1..=12).
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

/// Inverse of [`days_from_civil`].
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

/// Roll calendar fields over into their canonical ranges.
///
/// Seconds carry into minutes, minutes into hours, hours into days, months into years and
/// finally the day of month is applied as an offset from the first day of the (normalized)
/// month. Negative values borrow in the same way.
///
/// Arguments
/// ---------
/// * `fields`: calendar fields, any of which may be out of range.
///
/// Return
/// ------
/// * The equivalent fields with month in 1..=12, day within the month, hour in 0..24,
///   minute and second in 0..60.
pub fn normalize(fields: CalendarFields) -> CalendarFields {
    let secs = fields.hour * 3600 + fields.minute * 60 + fields.second;
    let day_carry = secs.div_euclid(86_400);
    let secs = secs.rem_euclid(86_400);

    let year = fields.year + (fields.month - 1).div_euclid(12);
    let month = (fields.month - 1).rem_euclid(12) + 1;

    let days = days_from_civil(year, month, 1) + (fields.day - 1) + day_carry;
    let (year, month, day) = civil_from_days(days);

    CalendarFields {
        year,
        month,
        day,
        hour: secs / 3600,
        minute: (secs % 3600) / 60,
        second: secs % 60,
    }
}

/// Whether `year` is a leap year in the Gregorian calendar.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Local calendar date and time with a timezone offset.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable, Serialize, Deserialize)]
pub struct DateTime {
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
    /// Seconds east of UTC
    tz_offset: i32,
    #[serde(skip)]
    reserved: i32,
}

impl Default for DateTime {
    /// J2000.0, 2000-01-01 12:00:00 UTC.
    fn default() -> Self {
        DateTime::new(2000, 1, 1, 12, 0, 0)
    }
}

impl DateTime {
    /// Build a date/time from explicit local fields with a zero timezone offset.
    ///
    /// Out-of-range fields are normalized, never rejected.
    pub fn new(year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) -> Self {
        let mut dt = DateTime::zeroed();
        dt.set(year, month, day, hour, minute, second);
        dt
    }

    /// Build a date/time from explicit local fields and an offset in seconds east of UTC.
    pub fn with_offset(
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        tz_offset_seconds: i32,
    ) -> Self {
        let mut dt = DateTime::new(year, month, day, hour, minute, second);
        dt.tz_offset = tz_offset_seconds;
        dt
    }

    /// Current system time shifted to local time by a zero offset.
    ///
    /// If the system clock cannot be read the J2000.0 default is returned and a warning is
    /// logged.
    pub fn current() -> Self {
        let mut dt = DateTime::default();
        dt.now();
        dt
    }

    fn fields(&self) -> CalendarFields {
        CalendarFields {
            year: self.year as i64,
            month: self.month as i64,
            day: self.day as i64,
            hour: self.hour as i64,
            minute: self.minute as i64,
            second: self.second as i64,
        }
    }

    fn apply(&mut self, fields: CalendarFields) {
        let n = normalize(fields);
        self.year = n.year as i32;
        self.month = n.month as i32;
        self.day = n.day as i32;
        self.hour = n.hour as i32;
        self.minute = n.minute as i32;
        self.second = n.second as i32;
    }

    /// Store all calendar fields at once and normalize.
    pub fn set(&mut self, year: i32, month: i32, day: i32, hour: i32, minute: i32, second: i32) {
        self.apply(CalendarFields {
            year: year as i64,
            month: month as i64,
            day: day as i64,
            hour: hour as i64,
            minute: minute as i64,
            second: second as i64,
        });
    }

    /// Load the system UTC time, then apply the stored timezone offset.
    ///
    /// Return
    /// ------
    /// * `Err(SkyError::SystemClock)` when the clock cannot be read; the fields are left
    ///   untouched in that case.
    pub fn try_now(&mut self) -> Result<(), SkyError> {
        let epoch = Epoch::now().map_err(|e| SkyError::SystemClock(e.to_string()))?;
        let (y, mo, d, h, mi, s, _ns) = epoch.to_gregorian_utc();
        self.apply(CalendarFields {
            year: y as i64,
            month: mo as i64,
            day: d as i64,
            hour: h as i64,
            minute: mi as i64,
            second: s as i64 + self.tz_offset as i64,
        });
        Ok(())
    }

    /// Same as [`DateTime::try_now`] but never fails: a clock error is logged and the
    /// current fields are kept.
    pub fn now(&mut self) {
        if let Err(err) = self.try_now() {
            warn!("keeping {self}: {err}");
        }
    }

    pub fn set_year(&mut self, year: i32) {
        let mut f = self.fields();
        f.year = year as i64;
        self.apply(f);
    }

    pub fn set_month(&mut self, month: i32) {
        let mut f = self.fields();
        f.month = month as i64;
        self.apply(f);
    }

    pub fn set_day_of_month(&mut self, day: i32) {
        let mut f = self.fields();
        f.day = day as i64;
        self.apply(f);
    }

    pub fn set_hour(&mut self, hour: i32) {
        let mut f = self.fields();
        f.hour = hour as i64;
        self.apply(f);
    }

    pub fn set_minute(&mut self, minute: i32) {
        let mut f = self.fields();
        f.minute = minute as i64;
        self.apply(f);
    }

    pub fn set_second(&mut self, second: i32) {
        let mut f = self.fields();
        f.second = second as i64;
        self.apply(f);
    }

    /// Shift the instant by a signed number of seconds, keeping the offset.
    pub fn add_seconds(&mut self, seconds: i64) {
        let mut f = self.fields();
        f.second += seconds;
        self.apply(f);
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> i32 {
        self.month
    }

    pub fn day_of_month(&self) -> i32 {
        self.day
    }

    pub fn hour(&self) -> i32 {
        self.hour
    }

    pub fn minute(&self) -> i32 {
        self.minute
    }

    pub fn second(&self) -> i32 {
        self.second
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(&self) -> u32 {
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        // 1970-01-01 was a Thursday
        (days + 4).rem_euclid(7) as u32
    }

    /// Day of year, 0 = January 1st.
    pub fn day_of_year(&self) -> u32 {
        let days = days_from_civil(self.year as i64, self.month as i64, self.day as i64);
        (days - days_from_civil(self.year as i64, 1, 1)) as u32
    }

    pub fn month_name(&self) -> &'static str {
        Self::month_name_of(self.month)
    }

    /// English name of a month given as 1..=12; other values wrap.
    pub fn month_name_of(month: i32) -> &'static str {
        MONTH_NAMES[(month - 1).rem_euclid(12) as usize]
    }

    pub fn day_of_week_name(&self) -> &'static str {
        Self::day_of_week_name_of(self.day_of_week() as i32)
    }

    /// English name of a weekday given as 0 = Sunday; other values wrap.
    pub fn day_of_week_name_of(wday: i32) -> &'static str {
        WEEKDAY_NAMES[wday.rem_euclid(7) as usize]
    }

    /// Set the offset from UTC, either from the host configuration or explicit hours.
    ///
    /// Explicit hours outside ±24 are clamped.
    pub fn set_time_zone_offset(&mut self, offset: TimeZoneOffset) {
        self.tz_offset = match offset {
            TimeZoneOffset::System => Local::now().offset().local_minus_utc(),
            TimeZoneOffset::Hours(hours) => {
                hours.clamp(-MAX_OFFSET_HOURS, MAX_OFFSET_HOURS) * 3600
            }
        };
    }

    /// Offset from UTC in whole hours.
    pub fn time_zone_offset(&self) -> i32 {
        self.tz_offset / 3600
    }

    /// Offset from UTC in seconds.
    pub fn time_zone_offset_seconds(&self) -> i32 {
        self.tz_offset
    }

    /// The UTC-equivalent instant (offset zero).
    pub fn gmt(&self) -> DateTime {
        let mut f = self.fields();
        f.second -= self.tz_offset as i64;
        let mut utc = DateTime::zeroed();
        utc.apply(f);
        utc
    }

    /// Ephemeris day number of this instant (days since JD 2415020.0, see
    /// [`constants`](crate::constants)).
    ///
    /// The local fields are first converted to UTC with the stored offset. Dates before
    /// 1582-10-15 use the Julian calendar, later dates the Gregorian correction term.
    /// The day of month carries the time of day as a fraction.
    ///
    /// Return
    /// ------
    /// * The day number; J2000.0 (2000-01-01 12:00 UTC) maps to exactly 36525.0.
    pub fn modified_julian_date(&self) -> MJD {
        let utc = self.gmt();

        let day = (utc.day as f64)
            + (utc.hour as f64 / 24.0)
            + (utc.minute as f64 / (24.0 * 60.0))
            + (utc.second as f64 / (24.0 * 3600.0));

        let month = utc.month as i64;
        let year = utc.year as i64;
        let mut m = month;
        let mut y = if year < 0 { year + 1 } else { year };
        if month < 3 {
            m += 12;
            y -= 1;
        }

        let b = if year < 1582 || (year == 1582 && (month < 10 || (month == 10 && day < 15.0))) {
            0
        } else {
            let a = y / 100;
            2 - a + a / 4
        };

        let c = if y < 0 {
            ((365.25 * y as f64) - 0.75) as i64 - 694_025
        } else {
            (365.25 * y as f64) as i64 - 694_025
        };

        let d = (30.6001 * (m + 1) as f64) as i64;

        (b + c + d) as f64 + day - 0.5
    }

    /// The same instant as a hifitime [`Epoch`] in the UTC time scale.
    pub fn to_epoch(&self) -> Epoch {
        let utc = self.gmt();
        Epoch::from_gregorian_utc(
            utc.year,
            utc.month as u8,
            utc.day as u8,
            utc.hour as u8,
            utc.minute as u8,
            utc.second as u8,
            0,
        )
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.tz_offset < 0 { '-' } else { '+' };
        let off = self.tz_offset.abs();
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02} {}{:02}:{:02}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            sign,
            off / 3600,
            (off % 3600) / 60
        )
    }
}
