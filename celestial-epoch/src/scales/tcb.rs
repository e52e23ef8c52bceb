//! Barycentric Coordinate Time.
//!
//! TCB is the coordinate time of the barycentric reference system. TDB is
//! defined as a linear transformation of it (IAU 2006 Resolution B3):
//!
//! ```text
//! TCB − TDB = L_B / (1 − L_B) · (TDB − T77 − TDB0) − TDB0
//! ```
//!
//! so TCB inherits TDB's periodic terms and its parameter list.

use super::tdb::TDB;
use super::TimeScale;
use crate::constants::{L_B, T77_SECONDS, TDB0};
use crate::errors::TimeResult;
use crate::instant::Instant;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TCB;

const TDB_TO_TCB_RATE: f64 = L_B / (1.0 - L_B);

impl TimeScale for TCB {
    fn name(&self) -> &str {
        "TCB"
    }

    fn accepts_parameters(&self, count: usize) -> bool {
        TDB.accepts_parameters(count)
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        let tdb_offset = TDB.offset_from_tai(tai, params)?;
        let tdb = tai.as_seconds_f64() + tdb_offset;
        Ok(tdb_offset + TDB_TO_TCB_RATE * (tdb - T77_SECONDS - TDB0) - TDB0)
    }
}
