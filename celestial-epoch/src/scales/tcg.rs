//! Geocentric Coordinate Time.
//!
//! TCG is the coordinate time of the geocentric reference system. It runs
//! faster than TT by the constant rate L_G (IAU 2000 Resolution B1.9), and the
//! two agreed at 1977-01-01T00:00:32.184 TT:
//!
//! ```text
//! TCG − TT = L_G / (1 − L_G) · (TT − T77)
//! ```

use super::tt::tt_seconds;
use super::TimeScale;
use crate::constants::{L_G, T77_SECONDS, TT_MINUS_TAI};
use crate::errors::TimeResult;
use crate::instant::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TCG;

const TT_TO_TCG_RATE: f64 = L_G / (1.0 - L_G);

impl TimeScale for TCG {
    fn name(&self) -> &str {
        "TCG"
    }

    fn offset_from_tai(&self, tai: &Instant, _params: &[f64]) -> TimeResult<f64> {
        let tt = tt_seconds(tai);
        Ok(TT_MINUS_TAI + TT_TO_TCG_RATE * (tt - T77_SECONDS))
    }
}
