//! Scale-tagged epochs.
//!
//! An [`Epoch`] pairs a time scale with the moment it names. The moment is kept
//! as a TAI [`Instant`]; the reading on the epoch's own scale is derived from
//! the scale's offset function once at construction and cached alongside it, so
//! calendar accessors are exact inverses of the constructors.
//!
//! The scale parameter is either a zero-sized marker such as [`TT`](crate::TT),
//! which fixes the scale in the type, or the [`Scale`] handle for scales chosen
//! at run time.
//!
//! ```
//! use celestial_epoch::{Epoch, TAI, UTC};
//!
//! let utc = Epoch::from_calendar(UTC, 2018, 2, 6, 20, 45, 0.0).unwrap();
//! let tai = utc.to_scale(TAI).unwrap();
//! assert_eq!(tai.to_string(), "2018-02-06T20:45:37.000 TAI");
//! ```

mod components;
mod ops;

use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use celestial_core::constants::{NANOSECONDS_PER_SECOND_F64, SECONDS_PER_DAY, SECONDS_PER_DAY_F64};

use crate::calendar;
use crate::errors::{TimeError, TimeResult};
use crate::format::DateFormat;
use crate::instant::Instant;
use crate::julian::{JulianDate, JulianOrigin};
use crate::scales::{Scale, TimeScale, MAX_PARAMETERS, TAI, TCB, TCG, TDB, TT, UT1, UTC};

/// Seconds from the J2000 reference noon back to the start of that civil day.
pub(crate) const NOON_OFFSET: i64 = 43_200;

/// 1970-01-01T00:00:00 as a reading in seconds from J2000 noon.
const UNIX_EPOCH_READING: i64 = -10_957 * SECONDS_PER_DAY - NOON_OFFSET;

/// Offset parameters an epoch was built with, reused when it is shifted.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScaleParams {
    values: [f64; MAX_PARAMETERS],
    len: usize,
}

impl ScaleParams {
    fn new(params: &[f64]) -> TimeResult<Self> {
        if params.len() > MAX_PARAMETERS {
            return Err(TimeError::ValidationError(format!(
                "at most {} offset parameters are supported, got {}",
                MAX_PARAMETERS,
                params.len()
            )));
        }
        let mut values = [0.0; MAX_PARAMETERS];
        values[..params.len()].copy_from_slice(params);
        Ok(Self {
            values,
            len: params.len(),
        })
    }

    fn as_slice(&self) -> &[f64] {
        &self.values[..self.len]
    }
}

/// A moment in time tagged with the scale it is read on.
#[derive(Clone, Copy)]
pub struct Epoch<S = Scale> {
    scale: S,
    tai: Instant,
    local: Instant,
    offset: f64,
    leap: Option<f64>,
    /// `None` for epochs built with an explicit offset, which is then kept as-is.
    params: Option<ScaleParams>,
}

impl<S: TimeScale + Copy> Epoch<S> {
    /// Epoch whose reading on `scale` is `local` seconds past J2000 noon.
    ///
    /// During a leap second the reading repeats; this always picks the earlier
    /// of the two moments.
    pub fn from_local(scale: S, local: Instant, params: &[f64]) -> TimeResult<Self> {
        let stored = ScaleParams::new(params)?;
        let offset = scale.offset_from_local(&local, params)?;
        let tai = local.shifted(-offset)?;
        Ok(Self {
            scale,
            tai,
            local,
            offset,
            leap: scale.leap_second(&tai)?,
            params: Some(stored),
        })
    }

    /// Epoch on `scale` at a TAI instant.
    pub fn from_tai(scale: S, tai: Instant, params: &[f64]) -> TimeResult<Self> {
        let stored = ScaleParams::new(params)?;
        let offset = scale.offset_from_tai(&tai, params)?;
        Ok(Self {
            scale,
            tai,
            local: tai.shifted(offset)?,
            offset,
            leap: scale.leap_second(&tai)?,
            params: Some(stored),
        })
    }

    pub fn from_calendar(
        scale: S,
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
    ) -> TimeResult<Self> {
        Self::from_calendar_with_params(scale, &[], year, month, day, hour, minute, second)
    }

    pub fn from_date(scale: S, year: i64, month: u8, day: u8) -> TimeResult<Self> {
        Self::from_calendar(scale, year, month, day, 0, 0, 0.0)
    }

    /// Calendar constructor for scales whose offset takes parameters.
    ///
    /// A `second` in `[60, 61)` names a leap second. It is accepted only on
    /// UTC-family scales and only where the leap second table has one.
    #[allow(clippy::too_many_arguments)]
    pub fn from_calendar_with_params(
        scale: S,
        params: &[f64],
        year: i64,
        month: u8,
        day: u8,
        hour: u8,
        minute: u8,
        second: f64,
    ) -> TimeResult<Self> {
        calendar::validate_date(year, month, day)?;
        calendar::validate_time(hour, minute, second)?;
        let whole = calendar::day_number(year, month, day) * SECONDS_PER_DAY - NOON_OFFSET
            + hour as i64 * 3600
            + minute as i64 * 60;

        if second < 60.0 {
            return Self::from_local(scale, Instant::new(whole, second)?, params);
        }

        if !scale.is_utc_family() {
            return Err(TimeError::ValidationError(format!(
                "second {} is only valid on UTC-family scales, not {}",
                second,
                scale.name()
            )));
        }
        let before = Self::from_local(scale, Instant::new(whole, second - 1.0)?, params)?;
        let tai = before.tai.shifted(1.0)?;
        match scale.leap_second(&tai)? {
            Some(_) => Self::from_tai(scale, tai, params),
            None => Err(TimeError::ValidationError(format!(
                "{:04}-{:02}-{:02}T{:02}:{:02} has no leap second",
                year, month, day, hour, minute
            ))),
        }
    }

    /// Epoch from a two-part day count read on `scale`.
    ///
    /// Inverse of [`Epoch::julian_twopart`], including its stretched days
    /// ending in a leap second.
    pub fn from_julian_date(scale: S, jd1: f64, jd2: f64, origin: JulianOrigin) -> TimeResult<Self> {
        let local = JulianDate::new(jd1, jd2).to_instant(origin)?;
        let (days, second_of_day) = components::day_and_second(local.seconds());
        let midnight = days * SECONDS_PER_DAY - NOON_OFFSET;
        let Some(step) = components::leap_ending_day(scale, &[], midnight)? else {
            return Self::from_local(scale, local, &[]);
        };

        let stretch = (SECONDS_PER_DAY_F64 + step) / SECONDS_PER_DAY_F64;
        let elapsed = (second_of_day as f64 + local.fraction()) * stretch;
        if elapsed < SECONDS_PER_DAY_F64 {
            return Self::from_local(scale, Instant::new(midnight, elapsed)?, &[]);
        }
        let into_leap = elapsed - SECONDS_PER_DAY_F64;
        let last_second = Instant::new(midnight + SECONDS_PER_DAY - 1, into_leap)?;
        let before = Self::from_local(scale, last_second, &[])?;
        Self::from_tai(scale, before.tai.shifted(1.0)?, &[])
    }

    /// Epoch on `scale` for the moment `source` names, read `delta` seconds
    /// away from the source reading.
    ///
    /// `delta` replaces the registered offset difference between the two
    /// scales, e.g. a TDB−TT value from a precise ephemeris. The resulting
    /// epoch keeps `source.tai_offset() + delta` as its offset under
    /// arithmetic.
    pub fn from_epoch_with_offset<U: TimeScale + Copy>(
        scale: S,
        source: &Epoch<U>,
        delta: f64,
    ) -> TimeResult<Self> {
        if !delta.is_finite() {
            return Err(TimeError::ValidationError(format!(
                "explicit offset must be finite, got {}",
                delta
            )));
        }
        Ok(Self {
            scale,
            tai: source.tai,
            local: source.local.shifted(delta)?,
            offset: source.offset + delta,
            leap: None,
            params: None,
        })
    }

    /// Parses the default `yyyy-mm-ddTHH:MM:SS.sss` form, optionally followed by
    /// a space and this epoch's scale name.
    pub fn parse(scale: S, text: &str) -> TimeResult<Self> {
        let (body, suffix) = split_scale_suffix(text);
        if let Some(name) = suffix {
            if name != scale.name() {
                return Err(TimeError::ParseError(format!(
                    "expected a {} timestamp, found scale {}",
                    scale.name(),
                    name
                )));
            }
        }
        Self::parse_with_format(scale, body, DateFormat::iso())
    }

    pub fn parse_with_format(scale: S, text: &str, format: &DateFormat) -> TimeResult<Self> {
        let fields = format.parse_fields(text)?;
        if let Some(found) = fields.scale {
            if found.name() != scale.name() {
                return Err(TimeError::ParseError(format!(
                    "'{}' names scale {}, expected {}",
                    text,
                    found,
                    scale.name()
                )));
            }
        }
        let (year, month, day) = fields.date()?;
        Self::from_calendar(
            scale,
            year,
            month,
            day,
            fields.hour,
            fields.minute,
            fields.second(),
        )
    }

    /// Renders this epoch with `format`.
    pub fn format(&self, format: &DateFormat) -> TimeResult<String> {
        format.format(self)
    }

    /// Converts to another scale through TAI.
    ///
    /// Converting to the epoch's own scale returns it unchanged.
    pub fn to_scale<T: TimeScale + Copy>(&self, target: T) -> TimeResult<Epoch<T>> {
        if target.name() == self.scale.name() {
            return Ok(Epoch {
                scale: target,
                tai: self.tai,
                local: self.local,
                offset: self.offset,
                leap: self.leap,
                params: self.params,
            });
        }
        Epoch::from_tai(target, self.tai, &[])
    }

    /// Converts to a scale whose offset takes parameters, e.g. topocentric TDB.
    pub fn to_scale_with_params<T: TimeScale + Copy>(
        &self,
        target: T,
        params: &[f64],
    ) -> TimeResult<Epoch<T>> {
        Epoch::from_tai(target, self.tai, params)
    }

    pub fn scale(&self) -> S {
        self.scale
    }

    /// The moment as a TAI instant.
    pub fn tai(&self) -> Instant {
        self.tai
    }

    /// The reading on this epoch's scale, in seconds from J2000 noon.
    pub fn reading(&self) -> Instant {
        self.local
    }

    /// Scale reading minus TAI, in seconds.
    pub fn tai_offset(&self) -> f64 {
        self.offset
    }

    /// Offset parameters in use, or `None` for an explicit-offset epoch.
    pub fn params(&self) -> Option<&[f64]> {
        self.params.as_ref().map(ScaleParams::as_slice)
    }

    /// Whether the epoch falls inside an inserted leap second.
    pub fn is_leap_second(&self) -> bool {
        self.leap.is_some()
    }

    /// Erases the static scale into a [`Scale`] handle.
    pub fn into_dyn(self) -> Epoch<Scale>
    where
        S: Into<Scale>,
    {
        Epoch {
            scale: self.scale.into(),
            tai: self.tai,
            local: self.local,
            offset: self.offset,
            leap: self.leap,
            params: self.params,
        }
    }
}

impl Epoch<UTC> {
    /// Current system time. The system clock is assumed to count UTC.
    pub fn now() -> TimeResult<Self> {
        let elapsed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TimeError::CalculationError(format!("system clock before 1970: {}", e)))?;
        let seconds = i64::try_from(elapsed.as_secs())
            .map_err(|_| TimeError::RangeError("system time out of range".to_string()))?;
        Self::from_unix(seconds, elapsed.subsec_nanos())
    }

    /// From a Unix timestamp, which counts UTC days of exactly 86400 s.
    pub fn from_unix(seconds: i64, nanos: u32) -> TimeResult<Self> {
        let whole = seconds
            .checked_add(UNIX_EPOCH_READING)
            .ok_or_else(|| TimeError::RangeError(format!("Unix time {} out of range", seconds)))?;
        let local = Instant::new(whole, nanos as f64 / NANOSECONDS_PER_SECOND_F64)?;
        Self::from_local(UTC, local, &[])
    }
}

impl Epoch<Scale> {
    /// Parses with a format whose `t` field names the scale.
    pub fn parse_with_scale(text: &str, format: &DateFormat) -> TimeResult<Self> {
        let fields = format.parse_fields(text)?;
        let scale = fields.scale.ok_or_else(|| {
            TimeError::ParseError(format!("no time scale found in '{}'", text))
        })?;
        let (year, month, day) = fields.date()?;
        Self::from_calendar(
            scale,
            year,
            month,
            day,
            fields.hour,
            fields.minute,
            fields.second(),
        )
    }
}

/// Splits `"<timestamp> <SCALE>"` into its parts.
fn split_scale_suffix(text: &str) -> (&str, Option<&str>) {
    let text = text.trim();
    match text.rsplit_once(' ') {
        Some((body, name)) if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()) => {
            (body.trim_end(), Some(name))
        }
        _ => (text, None),
    }
}

/// Reads `"<timestamp> <SCALE>"`, resolving the scale through the registry.
impl FromStr for Epoch<Scale> {
    type Err = TimeError;

    fn from_str(s: &str) -> TimeResult<Self> {
        let (body, suffix) = split_scale_suffix(s);
        let name = suffix
            .ok_or_else(|| TimeError::ParseError(format!("no time scale found in '{}'", s)))?;
        let scale = crate::registry::lookup(name)?;
        Epoch::parse_with_format(scale, body, DateFormat::iso())
    }
}

macro_rules! typed_from_str {
    ($($marker:ident),+ $(,)?) => {
        $(
            impl FromStr for Epoch<$marker> {
                type Err = TimeError;

                fn from_str(s: &str) -> TimeResult<Self> {
                    Epoch::parse($marker, s)
                }
            }
        )+
    };
}

typed_from_str!(TAI, UTC, UT1, TT, TCG, TCB, TDB);

impl<S: TimeScale + Copy> fmt::Display for Epoch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = DateFormat::iso().format(self).map_err(|_| fmt::Error)?;
        write!(f, "{} {}", text, self.scale.name())
    }
}

impl<S: TimeScale + Copy> fmt::Debug for Epoch<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Epoch")
            .field("scale", &self.scale.name())
            .field("tai", &self.tai)
            .field("offset", &self.offset)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tt_offset_at_j2000() {
        let tt = Epoch::from_calendar(TT, 2000, 1, 1, 12, 0, 32.184).unwrap();
        let tai = tt.to_scale(TAI).unwrap();
        assert_eq!(tai.tai(), Instant::J2000);
        assert_eq!(tai.to_string(), "2000-01-01T12:00:00.000 TAI");
    }

    #[test]
    fn test_utc_to_tai_2018() {
        let utc = Epoch::from_calendar(UTC, 2018, 2, 6, 20, 45, 0.0).unwrap();
        assert_eq!(utc.tai_offset(), -37.0);
        let tai = utc.to_scale(TAI).unwrap();
        assert_eq!(tai.to_string(), "2018-02-06T20:45:37.000 TAI");
    }

    #[test]
    fn test_self_conversion_is_identity() {
        let tdb = Epoch::from_calendar(TDB, 2024, 3, 1, 6, 30, 12.345678901).unwrap();
        let same = tdb.to_scale(TDB).unwrap();
        assert_eq!(same.tai(), tdb.tai());
        assert_eq!(same.reading(), tdb.reading());
        assert_eq!(same.tai_offset(), tdb.tai_offset());
    }

    #[test]
    fn test_leap_second_construction() {
        let leap = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 60.5).unwrap();
        assert!(leap.is_leap_second());
        assert_eq!(leap.tai_offset(), -37.0);
        assert_eq!(leap.to_string(), "2016-12-31T23:59:60.500 UTC");

        let before = Epoch::from_calendar(UTC, 2016, 12, 31, 23, 59, 59.5).unwrap();
        let after = Epoch::from_calendar(UTC, 2017, 1, 1, 0, 0, 0.5).unwrap();
        assert!(before < leap && leap < after);
        assert_eq!((after - before).value(), 2.0);
    }

    #[test]
    fn test_leap_second_rejected_elsewhere() {
        let err = Epoch::from_calendar(UTC, 2016, 12, 30, 23, 59, 60.0).unwrap_err();
        assert!(matches!(err, TimeError::ValidationError(_)));
        let err = Epoch::from_calendar(TT, 2016, 12, 31, 23, 59, 60.0).unwrap_err();
        assert!(matches!(err, TimeError::ValidationError(_)));
    }

    #[test]
    fn test_invalid_components() {
        assert!(matches!(
            Epoch::from_date(TT, 2023, 2, 29),
            Err(TimeError::InvalidDate { .. })
        ));
        assert!(Epoch::from_calendar(TT, 2023, 1, 1, 24, 0, 0.0).is_err());
        assert!(Epoch::from_calendar(TT, 2023, 1, 1, 0, 60, 0.0).is_err());
        assert!(Epoch::from_calendar(TT, 2023, 1, 1, 0, 0, -1.0).is_err());
    }

    #[test]
    fn test_explicit_offset_constructor() {
        let tt = Epoch::from_calendar(TT, 2000, 1, 1, 12, 0, 0.0).unwrap();
        let tdb = Epoch::from_epoch_with_offset(TDB, &tt, 0.0015).unwrap();
        assert_eq!(tdb.tai(), tt.tai());
        assert!((tdb.reading().seconds_since(&tt.reading()) - 0.0015).abs() < 1e-15);
        assert_eq!(tdb.params(), None);

        let later = tdb.checked_add(crate::Period::days(100.0)).unwrap();
        assert_eq!(later.tai_offset(), tdb.tai_offset());
        assert!(Epoch::from_epoch_with_offset(TDB, &tt, f64::NAN).is_err());
    }

    #[test]
    fn test_parameterized_conversion() {
        let tt = Epoch::from_calendar(TT, 2006, 1, 15, 21, 24, 37.5).unwrap();
        let geo = tt.to_scale(TDB).unwrap();
        let topo = tt.to_scale_with_params(TDB, &[0.0, 6000.0, 0.0]).unwrap();
        assert!((topo.tai_offset() - geo.tai_offset()).abs() < 1e-4);
        assert_eq!(topo.params(), Some(&[0.0, 6000.0, 0.0][..]));
        assert!(tt.to_scale_with_params(TDB, &[1.0]).is_err());
    }

    #[test]
    fn test_into_dyn_keeps_moment() {
        let tcg = Epoch::from_date(TCG, 1999, 7, 4).unwrap();
        let dynamic = tcg.into_dyn();
        assert_eq!(dynamic.scale(), Scale::TCG);
        assert_eq!(dynamic, tcg);
        assert_eq!(dynamic.to_string(), tcg.to_string());
    }

    #[test]
    fn test_from_unix() {
        let epoch = Epoch::from_unix(0, 0).unwrap();
        assert_eq!(epoch.to_string(), "1970-01-01T00:00:00.000 UTC");
        let y2k = Epoch::from_unix(946_684_800, 250_000_000).unwrap();
        assert_eq!(y2k.to_string(), "2000-01-01T00:00:00.250 UTC");
        assert!(Epoch::<UTC>::now().is_ok());
    }

    #[test]
    fn test_parse_default_form() {
        let tt: Epoch<TT> = "2000-01-01T12:00:00.5".parse().unwrap();
        assert_eq!(tt.second(), 0);
        assert_eq!(tt.fraction_of_second(), 0.5);

        let tagged: Epoch<TT> = "2000-01-01T12:00:00.5 TT".parse().unwrap();
        assert_eq!(tagged, tt);
        assert!(matches!(
            "2000-01-01T12:00:00 TAI".parse::<Epoch<TT>>(),
            Err(TimeError::ParseError(_))
        ));

        let dynamic: Epoch<Scale> = "2018-02-06T20:45:37.000 TAI".parse().unwrap();
        assert_eq!(dynamic.scale(), Scale::TAI);
        assert!(matches!(
            "2018-02-06T20:45:37 XYZ".parse::<Epoch<Scale>>(),
            Err(TimeError::UnknownScale(_))
        ));
        assert!("2018-02-06T20:45:37".parse::<Epoch<Scale>>().is_err());
    }

    #[test]
    fn test_ut1_needs_data() {
        let utc = Epoch::from_calendar(UTC, 1850, 1, 1, 0, 0, 0.0);
        assert!(matches!(utc, Err(TimeError::DataUnavailable(_))));

        let ut1 = Epoch::from_calendar_with_params(UT1, &[0.25], 2010, 6, 1, 0, 0, 0.0).unwrap();
        assert!((ut1.tai_offset() - (-34.0 + 0.25)).abs() < 1e-12);
    }

    #[test]
    fn test_too_many_params() {
        let params = [0.0; MAX_PARAMETERS + 1];
        assert!(Epoch::from_tai(TT, Instant::J2000, &params).is_err());
    }
}
