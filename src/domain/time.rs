//! Time-of-day handling for ACE daily records.
//!
//! ACE text products carry the sample time as a 4-digit `HHMM` code with no
//! separator. Internally we work in whole seconds since midnight (UTC).

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

/// Seconds in one calendar day.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Seconds since midnight, always within `[0, 86399]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Build from seconds since midnight.
    pub fn from_seconds(seconds: i64) -> Option<Self> {
        if (0..SECONDS_PER_DAY as i64).contains(&seconds) {
            Some(Self(seconds as u32))
        } else {
            None
        }
    }

    /// Decode an `HHMM` code (`hours*3600 + minutes*60`).
    ///
    /// Returns `None` unless the code is exactly four ASCII digits and the
    /// decoded value lands inside the day. Minutes are not range-checked on
    /// their own: `"0075"` decodes to 01:15, while `"2360"` (86400s) and
    /// `"9999"` are rejected.
    pub fn from_hhmm(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }
        let digit = |i: usize| i64::from(bytes[i] - b'0');
        let hours = digit(0) * 10 + digit(1);
        let minutes = digit(2) * 10 + digit(3);
        Self::from_seconds(hours * 3600 + minutes * 60)
    }

    /// Canonical `HHMM` code, zero-padded.
    ///
    /// Sub-minute seconds are dropped, so the round trip through
    /// [`TimeOfDay::from_hhmm`] is exact for minute-aligned values only.
    pub fn to_hhmm(self) -> String {
        format!("{:02}{:02}", self.hours(), self.minutes())
    }

    pub fn seconds(self) -> u32 {
        self.0
    }

    pub fn hours(self) -> u32 {
        self.0 / 3600
    }

    pub fn minutes(self) -> u32 {
        (self.0 % 3600) / 60
    }

    /// Fractional hours since midnight (chart x-axis unit).
    pub fn as_hours_f64(self) -> f64 {
        f64::from(self.0) / 3600.0
    }

    pub fn is_minute_aligned(self) -> bool {
        self.0 % 60 == 0
    }

    /// Move back by `delta`, or `None` when that would cross midnight.
    pub fn checked_sub(self, delta: TimeDelta) -> Option<Self> {
        Self::from_seconds(i64::from(self.0) - delta.num_seconds())
    }

    pub fn to_naive_time(self) -> NaiveTime {
        // In range by construction.
        NaiveTime::from_num_seconds_from_midnight_opt(self.0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Absolute UTC instant for this time on `date`.
    ///
    /// This is the one timestamp rule used for every product: calendar date of
    /// the daily file plus the record's `HHMM` time, interpreted as UTC.
    pub fn on(self, date: NaiveDate) -> DateTime<Utc> {
        date.and_time(self.to_naive_time()).and_utc()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours(), self.minutes())?;
        let secs = self.0 % 60;
        if secs != 0 {
            write!(f, ":{secs:02}")?;
        }
        Ok(())
    }
}
