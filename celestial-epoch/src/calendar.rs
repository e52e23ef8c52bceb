//! Proleptic Gregorian calendar arithmetic on whole-day counts.
//!
//! Day numbers are counted from 2000-01-01 (day 0), the civil date that
//! contains the J2000 reference noon. The conversions use era/day-of-era
//! integer arithmetic with floor division, so they are exact for negative
//! years as well as positive ones.

use crate::errors::{TimeError, TimeResult};

/// Civil days from 0000-03-01 to 2000-01-01.
const DAYS_TO_2000: i64 = 730_425;

/// Supported calendar years for component input.
pub const MIN_YEAR: i64 = -1_000_000;
pub const MAX_YEAR: i64 = 1_000_000;

pub const MONTH_NAMES: [&str; 12] = [
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

/// Broken-down calendar reading of an epoch on its own scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarParts {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    /// 0..=59, or 60 during a leap second.
    pub second: u8,
    /// Sub-second part in `[0, 1)`.
    pub fraction: f64,
}

pub fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0) && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

pub fn days_in_year(year: i64) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

pub fn validate_date(year: i64, month: u8, day: u8) -> TimeResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(TimeError::invalid_date(
            year,
            month,
            day,
            "year outside supported range",
        ));
    }
    if !(1..=12).contains(&month) {
        return Err(TimeError::invalid_date(
            year,
            month,
            day,
            "month must be in 1..=12",
        ));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(TimeError::invalid_date(
            year,
            month,
            day,
            "day out of range for month",
        ));
    }
    Ok(())
}

/// Days from 2000-01-01 to the given (valid) civil date.
pub fn day_number(year: i64, month: u8, day: u8) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let m = month as i64;
    let doy = (153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + day as i64 - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - DAYS_TO_2000
}

/// Inverse of [`day_number`].
pub fn date_from_day_number(days: i64) -> (i64, u8, u8) {
    let z = days + DAYS_TO_2000;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = if month <= 2 { y + 1 } else { y };
    (year, month, day)
}

pub fn day_of_year(year: i64, month: u8, day: u8) -> u16 {
    (day_number(year, month, day) - day_number(year, 1, 1) + 1) as u16
}

/// Month and day for a 1-based day of the year.
pub fn from_day_of_year(year: i64, day_of_year: u16) -> TimeResult<(u8, u8)> {
    if day_of_year < 1 || day_of_year > days_in_year(year) {
        return Err(TimeError::ValidationError(format!(
            "day of year {} out of range for {}",
            day_of_year, year
        )));
    }
    let (_, month, day) = date_from_day_number(day_number(year, 1, 1) + day_of_year as i64 - 1);
    Ok((month, day))
}

pub fn validate_time(hour: u8, minute: u8, second: f64) -> TimeResult<()> {
    if hour > 23 {
        return Err(TimeError::ValidationError(format!(
            "hour {} must be in 0..=23",
            hour
        )));
    }
    if minute > 59 {
        return Err(TimeError::ValidationError(format!(
            "minute {} must be in 0..=59",
            minute
        )));
    }
    if !second.is_finite() || !(0.0..61.0).contains(&second) {
        return Err(TimeError::ValidationError(format!(
            "second {} must be in [0, 60), or [60, 61) during a leap second",
            second
        )));
    }
    Ok(())
}

pub fn month_from_name(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    MONTH_NAMES.iter().position(|m| {
        let m = m.to_ascii_lowercase();
        m == lower || (lower.len() == 3 && m.starts_with(&lower))
    })
    .map(|i| i as u8 + 1)
}
