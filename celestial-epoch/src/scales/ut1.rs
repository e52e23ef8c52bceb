//! Universal Time (UT1).
//!
//! UT1 follows Earth's rotation and can only be measured, not computed. Its
//! offset is assembled from UTC's and the observed UT1−UTC (always within
//! ±0.9 s):
//!
//! ```text
//! UT1 − TAI = (UT1 − UTC) + (UTC − TAI)
//! ```
//!
//! UT1−UTC comes from the single optional parameter when given, otherwise
//! from the installed [`OffsetProvider`](crate::provider::OffsetProvider).
//! With neither, conversion fails with `DataUnavailable`; the accuracy is that
//! of the supplied value.

use celestial_core::constants::{J2000_MJD, SECONDS_PER_DAY_F64};

use super::utc::utc_offset_from_tai;
use super::{check_parameters, TimeScale};
use crate::errors::{TimeError, TimeResult};
use crate::instant::Instant;
use crate::provider;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UT1;

impl TimeScale for UT1 {
    fn name(&self) -> &str {
        "UT1"
    }

    fn accepts_parameters(&self, count: usize) -> bool {
        count <= 1
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        check_parameters(self, params)?;
        let utc_offset = utc_offset_from_tai(tai)?;
        let dut1 = match params {
            [dut1] => *dut1,
            _ => {
                let utc = tai.as_seconds_f64() + utc_offset;
                let mjd = J2000_MJD + utc / SECONDS_PER_DAY_F64;
                provider::ut1_minus_utc(mjd).ok_or_else(|| {
                    log::warn!("no UT1-UTC value available for MJD {:.3}", mjd);
                    TimeError::DataUnavailable(format!(
                        "no UT1-UTC value for MJD {:.3}; pass it explicitly or install an offset provider",
                        mjd
                    ))
                })?
            }
        };
        Ok(utc_offset + dut1)
    }
}
