//! Coordinated Universal Time.
//!
//! UTC follows TAI minus a tabulated offset. From 1972 the offset is a whole
//! number of seconds that changes only at inserted leap seconds. Between 1960
//! and 1972 it drifted linearly ("rubber seconds") with occasional small steps,
//! and those drift terms are reproduced here. Before 1960 there is no table; an
//! installed [`OffsetProvider`](crate::provider::OffsetProvider) may supply
//! values, otherwise conversion fails with `DataUnavailable`.
//!
//! # Leap seconds
//!
//! At the end of a day that gains a leap second the TAI−UTC offset grows by the
//! leap length. On the TAI axis the new offset applies from
//! `start + old offset`, which makes the UTC reading repeat the last second of
//! the day. [`TimeScale::leap_second`] reports when an instant sits in that
//! repeated stretch so the calendar layer can show it as `23:59:60`.

use celestial_core::constants::{J2000_MJD, SECONDS_PER_DAY_F64};
use once_cell::sync::Lazy;

use super::{check_parameters, TimeScale};
use crate::calendar::day_number;
use crate::constants::{PRE_LEAP_SECOND_ENTRIES, TAI_UTC_OFFSETS, UTC_DRIFT_CORRECTIONS};
use crate::errors::{TimeError, TimeResult};
use crate::instant::Instant;
use crate::provider;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UTC;

impl TimeScale for UTC {
    fn name(&self) -> &str {
        "UTC"
    }

    fn is_utc_family(&self) -> bool {
        true
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        check_parameters(self, params)?;
        utc_offset_from_tai(tai)
    }

    fn offset_from_local(&self, local: &Instant, params: &[f64]) -> TimeResult<f64> {
        check_parameters(self, params)?;
        utc_offset_from_local(local)
    }

    fn leap_second(&self, tai: &Instant) -> TimeResult<Option<f64>> {
        Ok(leap_second_at(tai))
    }
}

#[derive(Debug)]
struct LeapEntry {
    /// UTC reading at 0h on the first day the entry applies (s from J2000).
    start: f64,
    /// TAI reading from which the entry applies.
    tai_start: f64,
    /// Length of the discontinuity at `start`; positive for inserted time.
    step: f64,
    base: f64,
    drift: Option<(f64, f64)>,
}

impl LeapEntry {
    fn tai_minus_utc(&self, utc: f64) -> f64 {
        match self.drift {
            Some((reference_mjd, rate)) => {
                self.base + (J2000_MJD + utc / SECONDS_PER_DAY_F64 - reference_mjd) * rate
            }
            None => self.base,
        }
    }

    /// Solves `tai = utc + tai_minus_utc(utc)` for `utc`.
    fn utc_from_tai(&self, tai: f64) -> f64 {
        match self.drift {
            Some((reference_mjd, rate)) => {
                (tai - self.base - (J2000_MJD - reference_mjd) * rate)
                    / (1.0 + rate / SECONDS_PER_DAY_F64)
            }
            None => tai - self.base,
        }
    }
}

static LEAP_SECONDS: Lazy<Vec<LeapEntry>> = Lazy::new(|| {
    let mut entries: Vec<LeapEntry> = Vec::with_capacity(TAI_UTC_OFFSETS.len());
    for (i, &(year, month, base)) in TAI_UTC_OFFSETS.iter().enumerate() {
        let start = day_number(year, month, 1) as f64 * SECONDS_PER_DAY_F64 - 43_200.0;
        let drift = (i < PRE_LEAP_SECOND_ENTRIES).then(|| UTC_DRIFT_CORRECTIONS[i]);
        let mut entry = LeapEntry {
            start,
            tai_start: start,
            step: 0.0,
            base,
            drift,
        };
        let new_offset = entry.tai_minus_utc(start);
        let old_offset = entries.last().map_or(new_offset, |prev| prev.tai_minus_utc(start));
        entry.tai_start = start + new_offset.min(old_offset);
        entry.step = new_offset - old_offset;
        entries.push(entry);
    }
    entries
});

fn at_or_after(instant: &Instant, seconds: f64) -> bool {
    let whole = libm::floor(seconds);
    let own = instant.seconds() as f64;
    own > whole || (own == whole && instant.fraction() >= seconds - whole)
}

fn entry_for_tai(tai: &Instant) -> Option<&'static LeapEntry> {
    let entry = LEAP_SECONDS.iter().rev().find(|e| at_or_after(tai, e.tai_start));
    log::trace!(
        "leap second lookup for TAI {}s: {:?}",
        tai.seconds(),
        entry.map(|e| e.base)
    );
    entry
}

fn entry_for_utc(local: &Instant) -> Option<&'static LeapEntry> {
    LEAP_SECONDS.iter().rev().find(|e| at_or_after(local, e.start))
}

fn no_data(seconds: f64) -> TimeError {
    TimeError::DataUnavailable(format!(
        "no TAI-UTC value for MJD {:.1}; the leap second table starts at 1960-01-01",
        J2000_MJD + seconds / SECONDS_PER_DAY_F64
    ))
}

fn provided_tai_minus_utc(utc: f64) -> TimeResult<f64> {
    provider::tai_minus_utc(J2000_MJD + utc / SECONDS_PER_DAY_F64).ok_or_else(|| no_data(utc))
}

/// UTC − TAI in seconds at a TAI instant.
pub(crate) fn utc_offset_from_tai(tai: &Instant) -> TimeResult<f64> {
    let t = tai.as_seconds_f64();
    match entry_for_tai(tai) {
        Some(entry) => Ok(-entry.tai_minus_utc(entry.utc_from_tai(t))),
        None => {
            let first = provided_tai_minus_utc(t)?;
            Ok(-provided_tai_minus_utc(t - first)?)
        }
    }
}

/// UTC − TAI in seconds for a UTC reading.
pub(crate) fn utc_offset_from_local(local: &Instant) -> TimeResult<f64> {
    let utc = local.as_seconds_f64();
    match entry_for_utc(local) {
        Some(entry) => Ok(-entry.tai_minus_utc(utc)),
        None => Ok(-provided_tai_minus_utc(utc)?),
    }
}

/// Leap length when `tai` lies inside an inserted leap second.
pub(crate) fn leap_second_at(tai: &Instant) -> Option<f64> {
    let entry = entry_for_tai(tai)?;
    let end = entry.start + entry.tai_minus_utc(entry.start);
    (entry.step > 0.0 && !at_or_after(tai, end)).then_some(entry.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day_number;

    fn utc_midnight(year: i64, month: u8, day: u8) -> f64 {
        day_number(year, month, day) as f64 * 86_400.0 - 43_200.0
    }

    fn tai_at(utc: f64, dat: f64) -> Instant {
        Instant::from_seconds(utc + dat).unwrap()
    }

    #[test]
    fn test_modern_offsets() {
        let cases = [
            ((1972, 1, 1), 10.0),
            ((1980, 1, 1), 19.0),
            ((1999, 1, 1), 32.0),
            ((2000, 1, 1), 32.0),
            ((2017, 1, 1), 37.0),
            ((2018, 2, 6), 37.0),
        ];
        for ((y, m, d), dat) in cases {
            let utc = utc_midnight(y, m, d);
            let local = Instant::from_seconds(utc).unwrap();
            assert_eq!(utc_offset_from_local(&local).unwrap(), -dat, "{}-{}-{}", y, m, d);
            assert_eq!(utc_offset_from_tai(&tai_at(utc, dat)).unwrap(), -dat);
        }
    }

    #[test]
    fn test_drift_era_round_trip() {
        let utc = utc_midnight(1970, 6, 15) + 43_200.0;
        let local = Instant::from_seconds(utc).unwrap();
        let offset = utc_offset_from_local(&local).unwrap();
        assert!(-offset > 8.0 && -offset < 9.0, "{}", offset);

        let tai = local.shifted(-offset).unwrap();
        let back = utc_offset_from_tai(&tai).unwrap();
        assert!((back - offset).abs() < 1e-9);
    }

    #[test]
    fn test_leap_second_window_2016() {
        let midnight = utc_midnight(2017, 1, 1);
        // 2016-12-31T23:59:59.5 UTC, still 36 s.
        let before = tai_at(midnight - 0.5, 36.0);
        assert_eq!(utc_offset_from_tai(&before).unwrap(), -36.0);
        assert_eq!(leap_second_at(&before), None);

        // Half way through 23:59:60.
        let inside = Instant::from_seconds(midnight + 36.5).unwrap();
        assert_eq!(utc_offset_from_tai(&inside).unwrap(), -37.0);
        assert_eq!(leap_second_at(&inside), Some(1.0));

        let after = tai_at(midnight + 0.5, 37.0);
        assert_eq!(utc_offset_from_tai(&after).unwrap(), -37.0);
        assert_eq!(leap_second_at(&after), None);
    }

    #[test]
    fn test_before_1960_is_unavailable() {
        let local = Instant::from_seconds(utc_midnight(1959, 12, 31)).unwrap();
        let err = utc_offset_from_local(&local).unwrap_err();
        assert!(matches!(err, TimeError::DataUnavailable(_)));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_negative_step_1961_has_no_leap_flag() {
        let start = utc_midnight(1961, 8, 1);
        let tai = Instant::from_seconds(start + 1.4).unwrap();
        assert_eq!(leap_second_at(&tai), None);
    }

    #[test]
    fn test_rejects_parameters() {
        assert!(UTC.offset_from_tai(&Instant::J2000, &[1.0]).is_err());
    }
}
