use std::fmt;

use celestial_core::constants::{J2000_JD, J2000_MJD, SECONDS_PER_DAY, SECONDS_PER_DAY_F64};
use celestial_core::math::split_floor;

use crate::errors::{TimeError, TimeResult};
use crate::instant::Instant;

/// Zero point for Julian-date style day counts.
///
/// Each origin is a fixed day offset from the J2000 reference noon. The day
/// count is read on the epoch's own scale, so a TT epoch at 2000-01-01T12:00 TT
/// has a J2000 value of exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JulianOrigin {
    J2000,
    Julian,
    ModifiedJulian,
}

impl JulianOrigin {
    /// The day count this origin assigns to the J2000 reference noon.
    pub const fn j2000_value(self) -> f64 {
        match self {
            JulianOrigin::J2000 => 0.0,
            JulianOrigin::Julian => J2000_JD,
            JulianOrigin::ModifiedJulian => J2000_MJD,
        }
    }
}

/// A day count split in two for precision: `jd1 + jd2`.
///
/// Following the SOFA/ERFA convention the split is arbitrary on input. On output
/// [`JulianDate::from_instant`] puts the whole days in `jd1` and the day
/// fraction in `jd2`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JulianDate {
    pub jd1: f64,
    pub jd2: f64,
}

impl JulianDate {
    pub fn new(jd1: f64, jd2: f64) -> Self {
        Self { jd1, jd2 }
    }

    /// The combined day count. Loses the precision the split preserves.
    pub fn total(&self) -> f64 {
        self.jd1 + self.jd2
    }

    /// Two-part day count for a scale reading given in seconds from J2000.
    pub(crate) fn from_instant(reading: &Instant, origin: JulianOrigin) -> Self {
        let days = reading.seconds().div_euclid(SECONDS_PER_DAY);
        let rem = reading.seconds().rem_euclid(SECONDS_PER_DAY);
        let jd2 = (rem as f64 + (reading.fraction() + reading.error())) / SECONDS_PER_DAY_F64;
        Self::new(origin.j2000_value() + days as f64, jd2)
    }

    /// Inverse of [`JulianDate::from_instant`].
    pub(crate) fn to_instant(self, origin: JulianOrigin) -> TimeResult<Instant> {
        if !self.jd1.is_finite() || !self.jd2.is_finite() {
            return Err(TimeError::ValidationError(format!(
                "Julian date parts must be finite, got ({}, {})",
                self.jd1, self.jd2
            )));
        }
        let (whole1, frac1) = split_floor(self.jd1 - origin.j2000_value());
        let (whole2, frac2) = split_floor(self.jd2);
        let whole_days = whole1 + whole2;
        let whole_seconds = whole_days * SECONDS_PER_DAY_F64;
        if whole_seconds.abs() >= i64::MAX as f64 {
            return Err(TimeError::RangeError(format!(
                "Julian date {} outside representable range",
                self
            )));
        }
        Instant::new(whole_seconds as i64, 0.0)?
            .shifted(frac1 * SECONDS_PER_DAY_F64)?
            .shifted(frac2 * SECONDS_PER_DAY_F64)
    }
}

impl fmt::Display for JulianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.jd1, self.jd2)
    }
}
