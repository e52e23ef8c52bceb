//! User-defined time scales.
//!
//! A [`CustomScale`] wraps an offset-from-TAI closure. Register it with
//! [`registry::register`](crate::registry::register) to make it available to
//! parsing and to obtain a [`Scale`](super::Scale) handle.
//!
//! ```
//! use celestial_epoch::scales::{CustomScale, TimeScale, UTC};
//! use celestial_epoch::registry;
//!
//! // Greenwich Mean Time as a civil alias of UTC.
//! let gmt = CustomScale::new("GMT", |tai, _| UTC.offset_from_tai(tai, &[])).utc_family();
//! let gmt = registry::register(gmt).unwrap();
//! assert_eq!(gmt.name(), "GMT");
//! ```

use std::fmt;

use super::utc::leap_second_at;
use super::{check_parameters, TimeScale};
use crate::errors::TimeResult;
use crate::instant::Instant;

type OffsetFn = dyn Fn(&Instant, &[f64]) -> TimeResult<f64> + Send + Sync;

pub struct CustomScale {
    name: String,
    parameters: usize,
    utc_family: bool,
    offset: Box<OffsetFn>,
}

impl CustomScale {
    pub fn new<F>(name: impl Into<String>, offset: F) -> Self
    where
        F: Fn(&Instant, &[f64]) -> TimeResult<f64> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            parameters: 0,
            utc_family: false,
            offset: Box::new(offset),
        }
    }

    /// Declares how many extra parameters the offset closure takes.
    pub fn with_parameters(mut self, count: usize) -> Self {
        self.parameters = count;
        self
    }

    /// Marks the scale as sharing UTC's leap seconds.
    pub fn utc_family(mut self) -> Self {
        self.utc_family = true;
        self
    }
}

impl fmt::Debug for CustomScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomScale")
            .field("name", &self.name)
            .field("parameters", &self.parameters)
            .field("utc_family", &self.utc_family)
            .finish_non_exhaustive()
    }
}

impl TimeScale for CustomScale {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameter_count(&self) -> usize {
        self.parameters
    }

    fn is_utc_family(&self) -> bool {
        self.utc_family
    }

    fn offset_from_tai(&self, tai: &Instant, params: &[f64]) -> TimeResult<f64> {
        check_parameters(self, params)?;
        (self.offset)(tai, params)
    }

    fn leap_second(&self, tai: &Instant) -> TimeResult<Option<f64>> {
        Ok(if self.utc_family {
            leap_second_at(tai)
        } else {
            None
        })
    }
}
