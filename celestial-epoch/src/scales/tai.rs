use super::TimeScale;
use crate::errors::TimeResult;
use crate::instant::Instant;

/// International Atomic Time, the conversion hub.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TAI;

impl TimeScale for TAI {
    fn name(&self) -> &str {
        "TAI"
    }

    fn offset_from_tai(&self, _tai: &Instant, _params: &[f64]) -> TimeResult<f64> {
        Ok(0.0)
    }

    fn offset_from_local(&self, _local: &Instant, _params: &[f64]) -> TimeResult<f64> {
        Ok(0.0)
    }
}
