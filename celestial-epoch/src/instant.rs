//! Two-component instant anchored at J2000.
//!
//! An [`Instant`] counts whole SI seconds in an `i64` and keeps the remainder as
//! a compensated pair of `f64`s (`fraction` in `[0, 1)` plus a sub-ulp
//! `error` term). The whole count grows without touching the precision of the
//! fraction, so an instant three centuries from J2000 still resolves far below
//! a nanosecond. Every operation renormalizes, carrying any excursion of the
//! fraction outside `[0, 1)` into the whole count.
//!
//! Instants are always expressed on the TAI scale; scale readings are derived
//! by the epoch layer.

use std::cmp::Ordering;

use celestial_core::math::two_sum;

use crate::errors::{TimeError, TimeResult};

/// ±2^53 s (~285 million years); beyond this the whole count is no longer
/// exactly representable as an `f64`.
const SECONDS_LIMIT: i64 = 1 << 53;

/// Seconds since 2000-01-01T12:00:00 TAI.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Instant {
    seconds: i64,
    fraction: f64,
    error: f64,
}

impl Instant {
    pub const J2000: Instant = Instant {
        seconds: 0,
        fraction: 0.0,
        error: 0.0,
    };

    /// Builds an instant from a whole count and any finite fractional part.
    pub fn new(seconds: i64, fraction: f64) -> TimeResult<Self> {
        Self::normalized(seconds, fraction, 0.0)
    }

    pub fn from_seconds(seconds: f64) -> TimeResult<Self> {
        if !seconds.is_finite() {
            return Err(TimeError::RangeError(format!(
                "non-finite seconds value {}",
                seconds
            )));
        }
        Self::normalized(0, seconds, 0.0)
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Sub-second part in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Rounding residual carried below the precision of `fraction`.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Collapses to a single `f64`; fine for offset models, lossy for storage.
    pub fn as_seconds_f64(&self) -> f64 {
        self.seconds as f64 + (self.fraction + self.error)
    }

    /// Returns this instant moved by `offset` seconds.
    pub fn shifted(&self, offset: f64) -> TimeResult<Self> {
        if !offset.is_finite() {
            return Err(TimeError::RangeError(format!(
                "cannot shift instant by non-finite offset {}",
                offset
            )));
        }
        let (sum, residual) = two_sum(self.fraction, offset);
        Self::normalized(self.seconds, sum, residual + self.error)
    }

    /// Returns this instant moved by a whole number of seconds plus `offset`.
    pub fn shifted_whole(&self, whole: i64, offset: f64) -> TimeResult<Self> {
        let moved = Self {
            seconds: self.seconds.checked_add(whole).ok_or_else(overflow)?,
            ..*self
        };
        moved.shifted(offset)
    }

    /// `self − other` in seconds, correctly rounded.
    ///
    /// The whole-second delta goes in last, so a fraction that carried into
    /// the whole count during a shift does not cost the low bits of the
    /// result.
    pub fn seconds_since(&self, other: &Instant) -> f64 {
        let (part, part_error) = two_sum(self.fraction, -other.fraction);
        let tail = part_error + (self.error - other.error);
        let whole = (self.seconds - other.seconds) as f64;
        let (sum, sum_error) = two_sum(whole, part);
        sum + (sum_error + tail)
    }

    fn normalized(mut seconds: i64, fraction: f64, error: f64) -> TimeResult<Self> {
        if !fraction.is_finite() || !error.is_finite() {
            return Err(TimeError::RangeError(
                "instant fraction is not finite".to_string(),
            ));
        }
        let (mut fraction, mut error) = two_sum(fraction, error);

        let whole = libm::floor(fraction);
        if whole != 0.0 {
            seconds = seconds
                .checked_add(to_whole_seconds(whole)?)
                .ok_or_else(overflow)?;
            let (rest, rest_error) = two_sum(fraction, -whole);
            (fraction, error) = two_sum(rest, rest_error + error);
        }
        if fraction >= 1.0 {
            seconds = seconds.checked_add(1).ok_or_else(overflow)?;
            (fraction, error) = two_sum(fraction - 1.0, error);
        }
        if fraction < 0.0 {
            // Less than half an ulp below the second boundary.
            error += fraction;
            fraction = 0.0;
        }

        if seconds.abs() > SECONDS_LIMIT {
            return Err(overflow());
        }
        Ok(Self {
            seconds,
            fraction,
            error,
        })
    }
}

fn overflow() -> TimeError {
    TimeError::RangeError("instant outside representable range".to_string())
}

fn to_whole_seconds(whole: f64) -> TimeResult<i64> {
    if whole.abs() > SECONDS_LIMIT as f64 {
        return Err(overflow());
    }
    Ok(whole as i64)
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.seconds == other.seconds && self.fraction == other.fraction
    }
}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.seconds.cmp(&other.seconds) {
            Ordering::Equal => self.fraction.partial_cmp(&other.fraction),
            ord => Some(ord),
        }
    }
}
