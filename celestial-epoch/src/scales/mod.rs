//! Time scales and their offsets from TAI.
//!
//! Every scale is described by one function: its offset from International
//! Atomic Time at a given TAI instant, in seconds. Converting between any two
//! scales goes through TAI, so a new scale only needs that single function to
//! convert to and from every other scale.
//!
//! | Scale | Full Name | Offset from TAI |
//! |-------|-----------|-----------------|
//! | [`TAI`] | International Atomic Time | 0 (hub) |
//! | [`TT`]  | Terrestrial Time | +32.184 s |
//! | [`UTC`] | Coordinated Universal Time | −(TAI−UTC), leap second table |
//! | [`UT1`] | Universal Time | UTC offset + UT1−UTC (measured) |
//! | [`TCG`] | Geocentric Coordinate Time | TT + L_G/(1−L_G)·(TT − T77) |
//! | [`TDB`] | Barycentric Dynamical Time | TT + periodic terms (~1.7 ms) |
//! | [`TCB`] | Barycentric Coordinate Time | TDB + L_B/(1−L_B)·(TDB − T77) |
//!
//! UTC and UT1 depend on measured data. UTC is exact from 1972 on and follows
//! the drifting pre-1972 definition back to 1960; UT1 is only as good as the
//! UT1−UTC value supplied. Both fail with
//! [`TimeError::DataUnavailable`](crate::TimeError::DataUnavailable) when the
//! data does not cover the date. The other scales are analytic.
//!
//! Scale values are zero-sized markers. [`Scale`] erases the marker into a
//! `Copy` handle so scales chosen at run time (parsed names, user
//! registrations) flow through the same code.

mod custom;
mod tai;
mod tcb;
mod tcg;
mod tdb;
mod tt;
mod ut1;
mod utc;

use std::fmt;

pub use custom::CustomScale;
pub use tai::TAI;
pub use tcb::TCB;
pub use tcg::TCG;
pub use tdb::TDB;
pub use tt::TT;
pub use ut1::UT1;
pub use utc::UTC;

use crate::errors::{TimeError, TimeResult};
use crate::instant::Instant;

/// Largest number of extra offset parameters a scale may take.
pub const MAX_PARAMETERS: usize = 4;

const LOCAL_OFFSET_ITERATIONS: usize = 10;

pub trait TimeScale: fmt::Debug + Send + Sync {
    /// Abbreviation used in text, e.g. `"TT"`.
    fn name(&self) -> &str;

    /// Number of extra parameters the offset function expects.
    fn parameter_count(&self) -> usize {
        0
    }

    /// Whether `params.len()` is an accepted parameter list length.
    fn accepts_parameters(&self, count: usize) -> bool {
        count == self.parameter_count()
    }

    /// Scales sharing UTC's leap seconds; only they may read `:60` seconds.
    fn is_utc_family(&self) -> bool {
        false
    }

    /// Seconds to add to a TAI instant to obtain this scale's reading.
    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64>;

    /// The same offset, located from a reading on this scale instead of TAI.
    fn offset_from_local(&self, local: &Instant, params: &[f64]) -> TimeResult<f64> {
        solve_local_offset(self, local, params)
    }

    /// Length of the leap second `tai` falls inside, if any.
    fn leap_second(&self, _tai: &Instant) -> TimeResult<Option<f64>> {
        Ok(None)
    }
}

/// Fixed-point iteration `offset = f(local − offset)`.
///
/// Converges in two or three steps for every smooth scale since the offsets
/// change by far less than a second per second.
pub fn solve_local_offset<S: TimeScale + ?Sized>(
    scale: &S,
    local: &Instant,
    params: &[f64],
) -> TimeResult<f64> {
    let mut offset = 0.0;
    for _ in 0..LOCAL_OFFSET_ITERATIONS {
        let tai = local.shifted(-offset)?;
        let next = scale.offset_from_tai(&tai, params)?;
        if (next - offset).abs() < 1e-14 {
            return Ok(next);
        }
        offset = next;
    }
    Ok(offset)
}

pub(crate) fn check_parameters<S: TimeScale + ?Sized>(scale: &S, params: &[f64]) -> TimeResult<()> {
    if !scale.accepts_parameters(params.len()) {
        return Err(TimeError::ValidationError(format!(
            "{} does not accept {} offset parameter(s)",
            scale.name(),
            params.len()
        )));
    }
    if let Some(bad) = params.iter().find(|p| !p.is_finite()) {
        return Err(TimeError::ValidationError(format!(
            "{} offset parameter {} is not finite",
            scale.name(),
            bad
        )));
    }
    Ok(())
}

/// Copyable handle to a built-in or registered scale.
#[derive(Clone, Copy)]
pub struct Scale(&'static dyn TimeScale);

impl Scale {
    pub const TAI: Scale = Scale(&TAI);
    pub const UTC: Scale = Scale(&UTC);
    pub const UT1: Scale = Scale(&UT1);
    pub const TT: Scale = Scale(&TT);
    pub const TCG: Scale = Scale(&TCG);
    pub const TCB: Scale = Scale(&TCB);
    pub const TDB: Scale = Scale(&TDB);

    pub const BUILTIN: [Scale; 7] = [
        Scale::TAI,
        Scale::UTC,
        Scale::UT1,
        Scale::TT,
        Scale::TCG,
        Scale::TCB,
        Scale::TDB,
    ];

    pub(crate) fn from_static(scale: &'static dyn TimeScale) -> Self {
        Scale(scale)
    }

    pub fn name(&self) -> &'static str {
        self.0.name()
    }
}

impl TimeScale for Scale {
    fn name(&self) -> &str {
        self.0.name()
    }

    fn parameter_count(&self) -> usize {
        self.0.parameter_count()
    }

    fn accepts_parameters(&self, count: usize) -> bool {
        self.0.accepts_parameters(count)
    }

    fn is_utc_family(&self) -> bool {
        self.0.is_utc_family()
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        self.0.offset_from_tai(tai, params)
    }

    fn offset_from_local(&self, local: &Instant, params: &[f64]) -> TimeResult<f64> {
        self.0.offset_from_local(local, params)
    }

    fn leap_second(&self, tai: &Instant) -> TimeResult<Option<f64>> {
        self.0.leap_second(tai)
    }
}

/// Names are unique across the registry, so they identify the scale.
impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Scale {}

impl fmt::Debug for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scale({})", self.name())
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! builtin_scale {
    ($($marker:ident),+ $(,)?) => {
        $(
            impl From<$marker> for Scale {
                fn from(_: $marker) -> Scale {
                    Scale::$marker
                }
            }

            impl fmt::Display for $marker {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(stringify!($marker))
                }
            }
        )+
    };
}

builtin_scale!(TAI, UTC, UT1, TT, TCG, TCB, TDB);
