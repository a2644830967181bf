//! Civil time → Julian Day (UT) conversion.
//!
//! Offsets come from the IANA tables shipped with `chrono-tz`, so the rule
//! in force on the requested date is used rather than the zone's current
//! one. Local times inside a DST gap or overlap are rejected.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Timelike,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, Result};

/// Julian Day of the J2000.0 epoch (2000-01-01 12:00 TT).
pub const J2000: f64 = 2451545.0;

/// A calendar date with an optional clock time, as typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivilDateTime {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
}

impl CivilDateTime {
    pub fn new(year: i32, month: u32, day: u32, hour: Option<u32>, minute: Option<u32>) -> Self {
        Self { year, month, day, hour, minute }
    }

    pub fn date_only(year: i32, month: u32, day: u32) -> Self {
        Self::new(year, month, day, None, None)
    }

    /// True only when both hour and minute were given.
    pub fn has_time_of_day(&self) -> bool {
        self.hour.is_some() && self.minute.is_some()
    }

    /// The naive local datetime, with missing clock fields read as zero.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or(
            ChartError::InvalidDate { year: self.year, month: self.month, day: self.day },
        )?;
        let (h, m) = (self.hour.unwrap_or(0), self.minute.unwrap_or(0));
        let time = NaiveTime::from_hms_opt(h, m, 0).ok_or_else(|| {
            ChartError::TimeFormat(format!("Invalid time of day {:02}:{:02}", h, m))
        })?;
        Ok(NaiveDateTime::new(date, time))
    }
}

/// Parse an IANA timezone identifier.
pub fn parse_timezone(timezone_id: &str) -> Result<Tz> {
    timezone_id
        .parse::<Tz>()
        .map_err(|_| ChartError::UnknownTimezone(timezone_id.to_string()))
}

/// Attach a timezone to a local time, refusing anything but a single mapping.
fn localize(tz: Tz, timezone_id: &str, local: &NaiveDateTime) -> Result<DateTime<Tz>> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(_, _) | LocalResult::None => {
            Err(ChartError::AmbiguousOrInvalidLocalTime {
                timezone: timezone_id.to_string(),
                local: local.format("%Y-%m-%d %H:%M").to_string(),
            })
        }
    }
}

/// UTC offset in hours that applies at `local` in `timezone_id`.
pub fn resolve_utc_offset(timezone_id: &str, local: &NaiveDateTime) -> Result<f64> {
    let tz = parse_timezone(timezone_id)?;
    let dt = localize(tz, timezone_id, local)?;
    Ok(dt.offset().fix().local_minus_utc() as f64 / 3600.0)
}

/// Convert a civil date/time in `timezone_id` to a Julian Day in UT.
pub fn to_julian_day(timezone_id: &str, civil: &CivilDateTime) -> Result<f64> {
    let local = civil.to_naive()?;
    let offset_hours = resolve_utc_offset(timezone_id, &local)?;
    let utc = local - Duration::seconds((offset_hours * 3600.0).round() as i64);
    log::debug!(
        "{} in {} is UTC{:+.2} -> {} UT",
        local,
        timezone_id,
        offset_hours,
        utc
    );
    Ok(julian_date(&utc))
}

/// Julian Day of a UT datetime (Meeus ch. 7, Gregorian calendar).
pub fn julian_date(dt: &NaiveDateTime) -> f64 {
    let y = dt.year() as f64;
    let m = dt.month() as f64;
    let d = dt.day() as f64;
    let h = dt.hour() as f64 + dt.minute() as f64 / 60.0 + dt.second() as f64 / 3600.0;

    let (y2, m2) = if m <= 2.0 {
        (y - 1.0, m + 12.0)
    } else {
        (y, m)
    };

    let a = (y2 / 100.0_f64).floor();
    let b = 2.0 - a + (a / 4.0_f64).floor();

    (365.25_f64 * (y2 + 4716.0)).floor()
        + (30.6001_f64 * (m2 + 1.0)).floor()
        + d
        + h / 24.0
        + b
        - 1524.5
}

/// Parse a clock time given as `HH:MM` (hour 0–23, minute 0–59).
pub fn parse_clock_time(s: &str) -> Result<(u32, u32)> {
    let bad = || ChartError::TimeFormat("Time must be in HH:MM format".to_string());
    let (h, m) = s.trim().split_once(':').ok_or_else(bad)?;
    let hour: u32 = h.parse().map_err(|_| bad())?;
    let minute: u32 = m.parse().map_err(|_| bad())?;
    if hour > 23 || minute > 59 {
        return Err(bad());
    }
    Ok((hour, minute))
}

/// Inverse of [`julian_date`]: the UT datetime for a Julian Day,
/// rounded to the nearest second.
pub fn julian_day_to_utc(jd: f64) -> Option<NaiveDateTime> {
    let shifted = jd + 0.5;
    let z = shifted.floor();
    let f = shifted - z;

    let a = if z < 2299161.0 {
        z
    } else {
        let alpha = ((z - 1867216.25) / 36524.25).floor();
        z + 1.0 + alpha - (alpha / 4.0).floor()
    };
    let b = a + 1524.0;
    let c = ((b - 122.1) / 365.25).floor();
    let d = (365.25 * c).floor();
    let e = ((b - d) / 30.6001).floor();

    let day = (b - d - (30.6001 * e).floor()) as u32;
    let month = (if e < 14.0 { e - 1.0 } else { e - 13.0 }) as u32;
    let year = (if month > 2 { c - 4716.0 } else { c - 4715.0 }) as i32;

    let midnight = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?;
    Some(midnight + Duration::seconds((f * 86400.0).round() as i64))
}
