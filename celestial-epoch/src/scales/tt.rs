//! Terrestrial Time.
//!
//! TT is TAI shifted by the historical 32.184 s so that it continues Ephemeris
//! Time. The offset is exact and constant.

use super::TimeScale;
use crate::constants::TT_MINUS_TAI;
use crate::errors::TimeResult;
use crate::instant::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TT;

impl TimeScale for TT {
    fn name(&self) -> &str {
        "TT"
    }

    fn offset_from_tai(&self, _tai: &Instant, _params: &[f64]) -> TimeResult<f64> {
        Ok(TT_MINUS_TAI)
    }

    fn offset_from_local(&self, _local: &Instant, _params: &[f64]) -> TimeResult<f64> {
        Ok(TT_MINUS_TAI)
    }
}

/// TT reading in seconds from J2000 for a TAI instant.
pub(crate) fn tt_seconds(tai: &Instant) -> f64 {
    tai.as_seconds_f64() + TT_MINUS_TAI
}
