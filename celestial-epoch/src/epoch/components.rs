use celestial_core::constants::{DAYS_PER_JULIAN_CENTURY, SECONDS_PER_DAY, SECONDS_PER_DAY_F64};

use super::{Epoch, NOON_OFFSET};
use crate::calendar::{self, CalendarParts};
use crate::errors::{TimeError, TimeResult};
use crate::instant::Instant;
use crate::julian::{JulianDate, JulianOrigin};
use crate::period::Period;
use crate::scales::TimeScale;

impl<S: TimeScale + Copy> Epoch<S> {
    /// Calendar reading on the epoch's own scale.
    ///
    /// Inside a leap second the reading is shown as `23:59:60` of the day that
    /// receives it, rather than as a repeat of `23:59:59`.
    pub fn parts(&self) -> CalendarParts {
        let fraction = self.local.fraction();
        let Some(length) = self.leap else {
            return civil_parts(self.local.seconds(), fraction);
        };

        let (days, second_of_day) = day_and_second(self.local.seconds());
        let (year, month, day) = calendar::date_from_day_number(days);
        let into_leap =
            ((second_of_day as f64 - (SECONDS_PER_DAY_F64 - length)) + fraction).max(0.0);
        let whole = libm::floor(into_leap);
        CalendarParts {
            year,
            month,
            day,
            hour: 23,
            minute: 59,
            second: 60 + whole as u8,
            fraction: into_leap - whole,
        }
    }

    /// Calendar reading with the fraction rounded to `digits` decimals,
    /// returned alongside the rounded fraction as an integer.
    ///
    /// A fraction that rounds up to a whole second moves the reading to the
    /// next second, which may be a leap second or the day after one.
    pub(crate) fn rounded_parts(&self, digits: u32) -> TimeResult<(CalendarParts, u64)> {
        let parts = self.parts();
        let unit = 10u64.pow(digits);
        let scaled = libm::round(parts.fraction * unit as f64) as u64;
        if scaled < unit {
            return Ok((parts, scaled));
        }

        if self.leap.is_none() && self.scale.is_utc_family() {
            let next_second = self.tai.shifted(1.0 - parts.fraction + 1e-9)?;
            if self.scale.leap_second(&next_second)?.is_some() {
                let leap = CalendarParts {
                    second: 60,
                    fraction: 0.0,
                    ..parts
                };
                return Ok((leap, 0));
            }
        }
        let next = self
            .local
            .seconds()
            .checked_add(1)
            .ok_or_else(|| TimeError::RangeError("epoch outside representable range".to_string()))?;
        Ok((civil_parts(next, 0.0), 0))
    }

    pub fn year(&self) -> i64 {
        self.parts().year
    }

    pub fn month(&self) -> u8 {
        self.parts().month
    }

    pub fn day(&self) -> u8 {
        self.parts().day
    }

    pub fn hour(&self) -> u8 {
        self.parts().hour
    }

    pub fn minute(&self) -> u8 {
        self.parts().minute
    }

    /// Whole seconds of the minute; 60 inside a leap second.
    pub fn second(&self) -> u8 {
        self.parts().second
    }

    pub fn fraction_of_second(&self) -> f64 {
        self.parts().fraction
    }

    pub fn millisecond(&self) -> u16 {
        let ms = libm::floor(self.fraction_of_second() * 1000.0) as u16;
        ms.min(999)
    }

    pub fn day_of_year(&self) -> u16 {
        let parts = self.parts();
        calendar::day_of_year(parts.year, parts.month, parts.day)
    }

    /// Elapsed part of the civil day in `[0, 1)`.
    pub fn fraction_of_day(&self) -> f64 {
        let (_, second_of_day) = day_and_second(self.local.seconds());
        (second_of_day as f64 + self.local.fraction()) / SECONDS_PER_DAY_F64
    }

    /// Two-part day count on this epoch's scale.
    ///
    /// On a UTC-family day that ends in a leap second the day is
    /// `86400 + step` seconds long, and `jd2` is the elapsed part of that
    /// longer day counted from midnight, as ERFA's `dtf2d` does. Otherwise
    /// `jd1` holds whole days from noon and `jd2` the fraction since.
    pub fn julian_twopart(&self, origin: JulianOrigin) -> JulianDate {
        let (days, _) = day_and_second(self.local.seconds());
        let midnight = days * SECONDS_PER_DAY - NOON_OFFSET;
        let leap = match &self.params {
            Some(params) => leap_ending_day(self.scale, params.as_slice(), midnight),
            None => Ok(None),
        };
        let Ok(Some(step)) = leap else {
            return JulianDate::from_instant(&self.local, origin);
        };
        let parts = self.parts();
        let elapsed = (parts.hour as i64 * 3600 + parts.minute as i64 * 60 + parts.second as i64)
            as f64
            + parts.fraction;
        JulianDate::new(
            origin.j2000_value() + days as f64 - 0.5,
            elapsed / (SECONDS_PER_DAY_F64 + step),
        )
    }

    /// Days since the J2000 reference noon on this epoch's scale.
    pub fn j2000(&self) -> Period {
        Period::days(self.julian_twopart(JulianOrigin::J2000).total())
    }

    pub fn julian(&self) -> Period {
        Period::days(self.julian_twopart(JulianOrigin::Julian).total())
    }

    pub fn modified_julian(&self) -> Period {
        Period::days(self.julian_twopart(JulianOrigin::ModifiedJulian).total())
    }

    /// Julian centuries since J2000, the time argument of precession and
    /// nutation series.
    pub fn centuries_since_j2000(&self) -> f64 {
        self.julian_twopart(JulianOrigin::J2000).total() / DAYS_PER_JULIAN_CENTURY
    }
}

/// Length of the leap second that closes the civil day starting at the local
/// reading `midnight`, if that day has one.
pub(super) fn leap_ending_day<S: TimeScale + Copy>(
    scale: S,
    params: &[f64],
    midnight: i64,
) -> TimeResult<Option<f64>> {
    if !scale.is_utc_family() {
        return Ok(None);
    }
    let last_second = midnight + SECONDS_PER_DAY - 1;
    let before = Epoch::from_local(scale, Instant::new(last_second, 0.0)?, params)?;
    // 1 ms into the day's end covers the drift of pre-1972 UTC seconds.
    scale.leap_second(&before.tai.shifted(1.001)?)
}

pub(super) fn day_and_second(reading: i64) -> (i64, i64) {
    let since_midnight = reading + NOON_OFFSET;
    (
        since_midnight.div_euclid(SECONDS_PER_DAY),
        since_midnight.rem_euclid(SECONDS_PER_DAY),
    )
}

fn civil_parts(reading: i64, fraction: f64) -> CalendarParts {
    let (days, second_of_day) = day_and_second(reading);
    let (year, month, day) = calendar::date_from_day_number(days);
    CalendarParts {
        year,
        month,
        day,
        hour: (second_of_day / 3600) as u8,
        minute: (second_of_day % 3600 / 60) as u8,
        second: (second_of_day % 60) as u8,
        fraction,
    }
}

#[cfg(test)]
mod tests {
    use crate::calendar::CalendarParts;
    use crate::julian::JulianOrigin;
    use crate::period::{Period, TimeUnit};
    use crate::scales::{TT, UTC};
    use crate::Epoch;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parts() {
        let e = Epoch::from_calendar(TT, 2024, 2, 29, 17, 3, 9.25).unwrap();
        assert_eq!(
            e.parts(),
            CalendarParts {
                year: 2024,
                month: 2,
                day: 29,
                hour: 17,
                minute: 3,
                second: 9,
                fraction: 0.25,
            }
        );
        assert_eq!(e.day_of_year(), 60);
        assert_eq!(e.millisecond(), 250);
    }

    #[test]
    fn test_negative_years() {
        let e = Epoch::from_calendar(TT, -4712, 1, 1, 12, 0, 0.0).unwrap();
        assert_eq!((e.year(), e.month(), e.day(), e.hour()), (-4712, 1, 1, 12));
        // Proleptic Gregorian, so not JD 0.
        assert_relative_eq!(e.julian().value(), 38.0, epsilon = 1e-9);
    }

    #[test]
    fn test_julian_accessors() {
        let e = Epoch::from_date(TT, 2000, 1, 2).unwrap();
        assert_eq!(e.j2000(), Period::days(0.5));
        assert_eq!(e.j2000().unit(), TimeUnit::Day);
        assert_eq!(e.julian().value(), 2_451_545.5);
        assert_eq!(e.modified_julian().value(), 51_545.0);
        let jd = e.julian_twopart(JulianOrigin::Julian);
        assert_eq!((jd.jd1, jd.jd2), (2_451_545.0, 0.5));

        let back = Epoch::from_julian_date(TT, 0.5, 0.0, JulianOrigin::J2000).unwrap();
        assert_eq!(back.to_string(), "2000-01-02T00:00:00.000 TT");
        assert_eq!(back, e);
    }

    #[test]
    fn test_julian_date_inside_leap_second() {
        let leap = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 60.5).unwrap();
        let jd = leap.julian_twopart(JulianOrigin::Julian);
        assert_eq!(jd.jd1, 2_457_753.5);
        assert_relative_eq!(jd.jd2, 86_400.5 / 86_401.0, epsilon = 1e-15);

        let back = Epoch::from_julian_date(UTC, jd.jd1, jd.jd2, JulianOrigin::Julian).unwrap();
        assert!(back.is_leap_second());
        assert!((back - leap).value().abs() < 1e-6);
        assert_eq!(back.to_string(), "2016-12-31T23:59:60.500 UTC");
    }

    #[test]
    fn test_julian_date_stretches_only_the_leap_day() {
        let noon = Epoch::from_calendar(UTC, 2016, 12, 31, 12, 0, 0.0).unwrap();
        let jd = noon.julian_twopart(JulianOrigin::ModifiedJulian);
        assert_eq!(jd.jd1, 57_753.0);
        assert_eq!(jd.jd2, 43_200.0 / 86_401.0);
        let back = Epoch::from_julian_date(UTC, jd.jd1, jd.jd2, JulianOrigin::ModifiedJulian)
            .unwrap();
        assert!((back - noon).value().abs() < 1e-6);

        let next = Epoch::from_date(UTC, 2017, 1, 1).unwrap();
        assert_eq!(next.modified_julian().value(), 57_754.0);
        assert_eq!((next - noon).value(), 43_201.0);
    }

    #[test]
    fn test_fraction_of_day() {
        let e = Epoch::from_calendar(UTC, 2010, 5, 5, 18, 0, 0.0).unwrap();
        assert_eq!(e.fraction_of_day(), 0.75);
        assert_relative_eq!(e.centuries_since_j2000(), 0.103_415_468_857, epsilon = 1e-11);
    }

    #[test]
    fn test_leap_second_parts() {
        let e = Epoch::from_calendar(UTC, 2015, 6, 30, 23, 59, 60.25).unwrap();
        let parts = e.parts();
        assert_eq!((parts.month, parts.day), (6, 30));
        assert_eq!((parts.hour, parts.minute, parts.second), (23, 59, 60));
        assert_relative_eq!(parts.fraction, 0.25, epsilon = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_components_round_trip(
            year in 1600i64..2400,
            month in 1u8..=12,
            day in 1u8..=28,
            hour in 0u8..24,
            minute in 0u8..60,
            second in 0.0..60.0f64,
        ) {
            let e = Epoch::from_calendar(TT, year, month, day, hour, minute, second).unwrap();
            let parts = e.parts();
            prop_assert_eq!(
                (parts.year, parts.month, parts.day, parts.hour, parts.minute),
                (year, month, day, hour, minute)
            );
            let back = parts.second as f64 + parts.fraction;
            prop_assert!((back - second).abs() < 1e-12, "{} vs {}", back, second);
        }
    }
}
