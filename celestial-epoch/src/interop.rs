//! Conversions to and from `chrono` civil timestamps.
//!
//! chrono has no notion of time scales. Going out, the scale is dropped and
//! the epoch's own calendar reading is kept; coming in, the timestamp is taken
//! to be UTC. chrono represents a leap second as `23:59:59` with a nanosecond
//! count of one billion or more, which maps to and from `23:59:60`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};

use crate::epoch::Epoch;
use crate::errors::{TimeError, TimeResult};
use crate::scales::{TimeScale, UTC};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

impl<S: TimeScale + Copy> Epoch<S> {
    /// The calendar reading as a naive chrono timestamp, rounded to the
    /// nanosecond.
    pub fn to_naive_datetime(&self) -> TimeResult<NaiveDateTime> {
        let (parts, nanos) = self.rounded_parts(9)?;
        let year = i32::try_from(parts.year).map_err(|_| out_of_range(parts.year))?;
        let date = NaiveDate::from_ymd_opt(year, parts.month as u32, parts.day as u32)
            .ok_or_else(|| out_of_range(parts.year))?;

        let (second, nanos) = if parts.second >= 60 {
            (59, NANOS_PER_SECOND + nanos as u32)
        } else {
            (parts.second as u32, nanos as u32)
        };
        let time = NaiveTime::from_hms_nano_opt(parts.hour as u32, parts.minute as u32, second, nanos)
            .ok_or_else(|| {
                TimeError::CalculationError(format!(
                    "cannot represent {:02}:{:02}:{:02} as a chrono time",
                    parts.hour, parts.minute, parts.second
                ))
            })?;
        Ok(NaiveDateTime::new(date, time))
    }
}

fn out_of_range(year: i64) -> TimeError {
    TimeError::RangeError(format!("year {} outside chrono's supported range", year))
}

impl TryFrom<NaiveDateTime> for Epoch<UTC> {
    type Error = TimeError;

    fn try_from(value: NaiveDateTime) -> TimeResult<Self> {
        let nanos = value.nanosecond();
        let (second, nanos) = if nanos >= NANOS_PER_SECOND {
            (value.second() + 1, nanos - NANOS_PER_SECOND)
        } else {
            (value.second(), nanos)
        };
        Epoch::from_calendar(
            UTC,
            value.year() as i64,
            value.month() as u8,
            value.day() as u8,
            value.hour() as u8,
            value.minute() as u8,
            second as f64 + nanos as f64 / NANOS_PER_SECOND as f64,
        )
    }
}

impl TryFrom<DateTime<Utc>> for Epoch<UTC> {
    type Error = TimeError;

    fn try_from(value: DateTime<Utc>) -> TimeResult<Self> {
        Epoch::try_from(value.naive_utc())
    }
}
