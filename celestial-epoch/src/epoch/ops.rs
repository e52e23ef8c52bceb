use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use super::Epoch;
use crate::errors::TimeResult;
use crate::instant::Instant;
use crate::period::Period;
use crate::scales::TimeScale;

impl<S: TimeScale + Copy> Epoch<S> {
    /// Epoch `period` later on the same scale.
    ///
    /// The offset is re-evaluated at the new instant with the parameters the
    /// epoch was built with, so a UTC epoch shifted across a leap second picks
    /// up the new TAI−UTC value.
    pub fn checked_add(&self, period: Period) -> TimeResult<Self> {
        let tai = self.tai.shifted(period.in_seconds()?)?;
        self.relocated(tai)
    }

    pub fn checked_sub(&self, period: Period) -> TimeResult<Self> {
        self.checked_add(-period)
    }

    /// Elapsed SI seconds from `other` to `self`, whatever their scales.
    pub fn since<T: TimeScale + Copy>(&self, other: &Epoch<T>) -> Period {
        Period::seconds(self.tai.seconds_since(&other.tai))
    }

    fn relocated(&self, tai: Instant) -> TimeResult<Self> {
        let (offset, leap) = match &self.params {
            Some(params) => (
                self.scale.offset_from_tai(&tai, params.as_slice())?,
                self.scale.leap_second(&tai)?,
            ),
            None => (self.offset, None),
        };
        Ok(Self {
            tai,
            local: tai.shifted(offset)?,
            offset,
            leap,
            ..*self
        })
    }
}

impl<S: TimeScale + Copy> Add<Period> for Epoch<S> {
    type Output = Epoch<S>;

    /// # Panics
    ///
    /// Whenever [`Epoch::checked_add`] would fail: the result leaves the
    /// representable range, or the scale's offset cannot be evaluated there
    /// (e.g. UTC before 1960 with no provider installed).
    fn add(self, period: Period) -> Epoch<S> {
        match self.checked_add(period) {
            Ok(epoch) => epoch,
            Err(e) => panic!("failed to add {} to epoch: {}", period, e),
        }
    }
}

impl<S: TimeScale + Copy> Sub<Period> for Epoch<S> {
    type Output = Epoch<S>;

    /// # Panics
    ///
    /// Whenever [`Epoch::checked_sub`] would fail, as for `+`.
    fn sub(self, period: Period) -> Epoch<S> {
        match self.checked_sub(period) {
            Ok(epoch) => epoch,
            Err(e) => panic!("failed to subtract {} from epoch: {}", period, e),
        }
    }
}

impl<S: TimeScale + Copy> AddAssign<Period> for Epoch<S> {
    fn add_assign(&mut self, period: Period) {
        *self = *self + period;
    }
}

impl<S: TimeScale + Copy> SubAssign<Period> for Epoch<S> {
    fn sub_assign(&mut self, period: Period) {
        *self = *self - period;
    }
}

/// Difference in SI seconds; epochs on different scales are compared through
/// their TAI instants.
impl<S: TimeScale + Copy, T: TimeScale + Copy> Sub<Epoch<T>> for Epoch<S> {
    type Output = Period;

    fn sub(self, other: Epoch<T>) -> Period {
        self.since(&other)
    }
}

impl<S, T> PartialEq<Epoch<T>> for Epoch<S> {
    fn eq(&self, other: &Epoch<T>) -> bool {
        self.tai == other.tai
    }
}

impl<S, T> PartialOrd<Epoch<T>> for Epoch<S> {
    fn partial_cmp(&self, other: &Epoch<T>) -> Option<Ordering> {
        self.tai.partial_cmp(&other.tai)
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::TimeError;
    use crate::instant::Instant;
    use crate::period::Period;
    use crate::scales::{TAI, TDB, TT, UTC};
    use crate::Epoch;
    use proptest::prelude::*;

    #[test]
    fn test_day_difference() {
        let a = Epoch::from_date(UTC, 2000, 1, 1).unwrap();
        let b = Epoch::from_date(UTC, 2000, 1, 2).unwrap();
        let diff = b - a;
        assert_eq!(diff, Period::seconds(86_400.0));
        assert_eq!(diff.value(), 86_400.0);
    }

    #[test]
    fn test_add_days_keeps_scale() {
        let start = Epoch::from_calendar(TT, 1999, 12, 31, 12, 0, 0.0).unwrap();
        let next = start + Period::days(1.0);
        assert_eq!(next.to_string(), "2000-01-01T12:00:00.000 TT");
        assert_eq!(next - Period::days(1.0), start);
    }

    #[test]
    fn test_utc_shift_across_leap_second() {
        let before = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 59.0).unwrap();
        let leap = before + Period::seconds(1.0);
        assert_eq!(leap.to_string(), "2016-12-31T23:59:60.000 UTC");
        let after = leap + Period::seconds(1.0);
        assert_eq!(after.to_string(), "2017-01-01T00:00:00.000 UTC");
        assert_eq!(after.tai_offset(), -37.0);

        // A calendar day containing a leap second lasts 86401 s.
        let a = Epoch::from_date(UTC, 2016, 12, 31).unwrap();
        let b = Epoch::from_date(UTC, 2017, 1, 1).unwrap();
        assert_eq!((b - a).value(), 86_401.0);
    }

    #[test]
    fn test_cross_scale_comparison() {
        let tt = Epoch::from_calendar(TT, 2000, 1, 1, 12, 0, 32.184).unwrap();
        let tai = Epoch::from_calendar(TAI, 2000, 1, 1, 12, 0, 0.0).unwrap();
        assert_eq!(tt, tai);
        assert_eq!((tt - tai).value(), 0.0);
        let tdb = tt.to_scale(TDB).unwrap();
        assert_eq!(tdb, tt);
        assert!(tai < tt + Period::seconds(1e-9));
    }

    #[test]
    fn test_assign_operators() {
        let mut e = Epoch::from_date(TT, 2020, 1, 1).unwrap();
        e += Period::hours(36.0);
        assert_eq!(e.to_string(), "2020-01-02T12:00:00.000 TT");
        e -= Period::minutes(90.0);
        assert_eq!(e.to_string(), "2020-01-02T10:30:00.000 TT");
    }

    #[test]
    fn test_overflow_is_range_error() {
        let e = Epoch::from_date(TT, 2000, 1, 1).unwrap();
        let err = e.checked_add(Period::centuries(1e9)).unwrap_err();
        assert!(matches!(err, TimeError::RangeError(_)));
    }

    #[test]
    #[should_panic(expected = "failed to add")]
    fn test_add_operator_panics_on_overflow() {
        let e = Epoch::from_date(TT, 2000, 1, 1).unwrap();
        let _ = e + Period::centuries(1e9);
    }

    #[test]
    fn test_difference_is_exact_after_carry() {
        let e = Epoch::from_calendar(TT, 2000, 1, 1, 1, 2, 0.1).unwrap();
        assert_eq!(((e + Period::seconds(0.1)) - e).value(), 0.1);
        let e = e.to_scale(TDB).unwrap();
        assert_eq!(((e + Period::seconds(0.1)) - e).value(), 0.1);
    }

    #[test]
    fn test_shift_before_utc_data_is_data_unavailable() {
        let e = Epoch::from_date(UTC, 1960, 1, 2).unwrap();
        let err = e.checked_sub(Period::days(2.0)).unwrap_err();
        assert!(matches!(err, TimeError::DataUnavailable(_)));
    }

    #[test]
    #[should_panic(expected = "failed to subtract 2.0 days from epoch: Data unavailable")]
    fn test_sub_operator_panics_without_offset_data() {
        let e = Epoch::from_date(UTC, 1960, 1, 2).unwrap();
        let _ = e - Period::days(2.0);
    }

    proptest! {
        #[test]
        fn prop_add_then_sub_restores_epoch(
            whole in -12_600_000_000i64..12_600_000_000,
            frac in 0.0..1.0f64,
            value in -1e9..1e9f64,
        ) {
            let e = Epoch::from_local(TAI, Instant::new(whole, frac).unwrap(), &[]).unwrap();
            let p = Period::seconds(value);
            prop_assert_eq!((e + p) - p, e);
        }

        #[test]
        fn prop_difference_recovers_seconds_exactly(
            days in -146_000i64..146_000,
            millis in 0.0..86_400_000.0f64,
            value in -1e9..1e9f64,
        ) {
            let e = Epoch::from_date(TDB, 2000, 1, 1).unwrap()
                + Period::days(days as f64)
                + Period::seconds(millis * 1e-3);
            let diff = (e + Period::seconds(value)) - e;
            prop_assert_eq!(diff.value(), value);
        }

        #[test]
        fn prop_difference_recovers_days_exactly(
            start in -1e9..1e9f64,
            days in -36_525.0..36_525.0f64,
        ) {
            let e = Epoch::from_date(TT, 2000, 1, 1).unwrap() + Period::seconds(start);
            let p = Period::days(days);
            prop_assert_eq!(((e + p) - e).value(), p.in_seconds().unwrap());
        }
    }
}
