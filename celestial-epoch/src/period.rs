//! Durations tagged with a time unit.
//!
//! Years and centuries are Julian (365.25 and 36525 days of 86400 SI seconds),
//! so converting a [`Period`] never depends on a calendar or a time scale.
//!
//! ```
//! use celestial_epoch::{Period, TimeUnit};
//!
//! let p = 1.5 * TimeUnit::Day;
//! assert_eq!(p.to(TimeUnit::Hour).unwrap().value(), 36.0);
//! assert_eq!(p.to_string(), "1.5 days");
//! ```

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use celestial_core::constants::{
    DAYS_PER_JULIAN_CENTURY, DAYS_PER_JULIAN_YEAR, SECONDS_PER_DAY_F64, SECONDS_PER_HOUR,
    SECONDS_PER_MINUTE,
};

use crate::errors::{TimeError, TimeResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Year,
    Century,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Year,
        TimeUnit::Century,
    ];

    /// SI seconds in one of this unit.
    pub const fn seconds(self) -> f64 {
        match self {
            TimeUnit::Second => 1.0,
            TimeUnit::Minute => SECONDS_PER_MINUTE,
            TimeUnit::Hour => SECONDS_PER_HOUR,
            TimeUnit::Day => SECONDS_PER_DAY_F64,
            TimeUnit::Year => DAYS_PER_JULIAN_YEAR * SECONDS_PER_DAY_F64,
            TimeUnit::Century => DAYS_PER_JULIAN_CENTURY * SECONDS_PER_DAY_F64,
        }
    }

    pub const fn singular(self) -> &'static str {
        match self {
            TimeUnit::Second => "second",
            TimeUnit::Minute => "minute",
            TimeUnit::Hour => "hour",
            TimeUnit::Day => "day",
            TimeUnit::Year => "year",
            TimeUnit::Century => "century",
        }
    }

    pub const fn plural(self) -> &'static str {
        match self {
            TimeUnit::Second => "seconds",
            TimeUnit::Minute => "minutes",
            TimeUnit::Hour => "hours",
            TimeUnit::Day => "days",
            TimeUnit::Year => "years",
            TimeUnit::Century => "centuries",
        }
    }

    /// Multiplier taking a value in `self` to a value in `target`.
    ///
    /// Every ratio between two units is an exactly representable integer or
    /// Julian-year multiple, so the factor is applied as a single multiply or
    /// divide by that exact ratio.
    fn rescale(self, value: f64, target: TimeUnit) -> f64 {
        let from = self.seconds();
        let to = target.seconds();
        if from >= to {
            value * (from / to)
        } else {
            value / (to / from)
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// A scalar multiple of a [`TimeUnit`].
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Period {
    value: f64,
    unit: TimeUnit,
}

impl Period {
    pub const fn new(value: f64, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    pub const fn seconds(value: f64) -> Self {
        Self::new(value, TimeUnit::Second)
    }

    pub const fn minutes(value: f64) -> Self {
        Self::new(value, TimeUnit::Minute)
    }

    pub const fn hours(value: f64) -> Self {
        Self::new(value, TimeUnit::Hour)
    }

    pub const fn days(value: f64) -> Self {
        Self::new(value, TimeUnit::Day)
    }

    pub const fn years(value: f64) -> Self {
        Self::new(value, TimeUnit::Year)
    }

    pub const fn centuries(value: f64) -> Self {
        Self::new(value, TimeUnit::Century)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Re-expresses this period in `unit`.
    pub fn to(&self, unit: TimeUnit) -> TimeResult<Period> {
        if unit == self.unit {
            return Ok(*self);
        }
        let value = self.unit.rescale(self.value, unit);
        finite(value, "unit conversion")?;
        Ok(Period::new(value, unit))
    }

    /// Length in SI seconds.
    pub fn in_seconds(&self) -> TimeResult<f64> {
        self.to(TimeUnit::Second).map(|p| p.value)
    }

    /// Sum in the unit of `self`; the right operand is converted first.
    pub fn checked_add(&self, rhs: Period) -> TimeResult<Period> {
        let rhs = rhs.to(self.unit)?;
        let value = self.value + rhs.value;
        finite(value, "period addition")?;
        Ok(Period::new(value, self.unit))
    }

    pub fn checked_sub(&self, rhs: Period) -> TimeResult<Period> {
        self.checked_add(-rhs)
    }

    pub fn checked_mul(&self, factor: f64) -> TimeResult<Period> {
        let value = self.value * factor;
        finite(value, "period scaling")?;
        Ok(Period::new(value, self.unit))
    }
}

fn finite(value: f64, operation: &str) -> TimeResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TimeError::RangeError(format!(
            "{} produced a non-finite value ({})",
            operation, value
        )))
    }
}

/// Periods are equal when they describe the same length; differing units are
/// compared after converting the right operand.
impl PartialEq for Period {
    fn eq(&self, other: &Self) -> bool {
        match other.to(self.unit) {
            Ok(other) => self.value == other.value,
            Err(_) => false,
        }
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        let other = other.to(self.unit).ok()?;
        self.value.partial_cmp(&other.value)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = if self.value.abs() == 1.0 {
            self.unit.singular()
        } else {
            self.unit.plural()
        };
        write!(f, "{:?} {}", self.value, unit)
    }
}

impl Neg for Period {
    type Output = Period;

    fn neg(self) -> Period {
        Period::new(-self.value, self.unit)
    }
}

impl Add for Period {
    type Output = Period;

    /// # Panics
    ///
    /// If the sum overflows; use [`Period::checked_add`] to handle that case.
    fn add(self, rhs: Period) -> Period {
        match self.checked_add(rhs) {
            Ok(p) => p,
            Err(e) => panic!("overflow when adding periods: {}", e),
        }
    }
}

impl Sub for Period {
    type Output = Period;

    fn sub(self, rhs: Period) -> Period {
        match self.checked_sub(rhs) {
            Ok(p) => p,
            Err(e) => panic!("overflow when subtracting periods: {}", e),
        }
    }
}

impl Mul<f64> for Period {
    type Output = Period;

    fn mul(self, factor: f64) -> Period {
        match self.checked_mul(factor) {
            Ok(p) => p,
            Err(e) => panic!("overflow when scaling period: {}", e),
        }
    }
}

impl Mul<Period> for f64 {
    type Output = Period;

    fn mul(self, period: Period) -> Period {
        period * self
    }
}

impl Mul<TimeUnit> for f64 {
    type Output = Period;

    fn mul(self, unit: TimeUnit) -> Period {
        Period::new(self, unit)
    }
}
