//! Measured offset data supplied from outside the engine.
//!
//! UTC and UT1 depend on values published by the IERS. Fetching and caching
//! those files is not this crate's job; an application loads them however it
//! likes and installs an [`OffsetProvider`] once at start-up. Lookups are
//! synchronous reads of that pre-populated data.
//!
//! ```
//! use std::sync::Arc;
//! use celestial_epoch::provider::{self, EopTable, Ut1Record};
//!
//! let table = EopTable::new(vec![
//!     Ut1Record::new(58_000.0, 0.3550),
//!     Ut1Record::new(58_001.0, 0.3540),
//! ]);
//! assert!((table.ut1_utc(58_000.5).unwrap() - 0.3545).abs() < 1e-12);
//! provider::install(Arc::new(table)).unwrap();
//! ```

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::errors::{TimeError, TimeResult};

/// Source of measured offsets. `None` means "no data for this date".
pub trait OffsetProvider: Send + Sync {
    /// TAI − UTC in seconds at a UTC modified Julian date. Only consulted for
    /// dates before the built-in leap second table.
    fn tai_minus_utc(&self, _mjd: f64) -> Option<f64> {
        None
    }

    /// UT1 − UTC in seconds at a UTC modified Julian date.
    fn ut1_minus_utc(&self, _mjd: f64) -> Option<f64> {
        None
    }
}

static PROVIDER: OnceCell<Arc<dyn OffsetProvider>> = OnceCell::new();

/// Installs the process-wide provider. Only the first call succeeds.
pub fn install(provider: Arc<dyn OffsetProvider>) -> TimeResult<()> {
    PROVIDER.set(provider).map_err(|_| {
        TimeError::ValidationError("an offset provider is already installed".to_string())
    })?;
    log::debug!("installed offset provider");
    Ok(())
}

pub fn installed() -> Option<&'static Arc<dyn OffsetProvider>> {
    PROVIDER.get()
}

pub(crate) fn tai_minus_utc(mjd: f64) -> Option<f64> {
    installed().and_then(|p| p.tai_minus_utc(mjd))
}

pub(crate) fn ut1_minus_utc(mjd: f64) -> Option<f64> {
    installed().and_then(|p| p.ut1_minus_utc(mjd))
}

/// One daily UT1−UTC value at 0h UTC.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ut1Record {
    pub mjd: f64,
    pub ut1_utc: f64,
}

impl Ut1Record {
    pub fn new(mjd: f64, ut1_utc: f64) -> Self {
        Self { mjd, ut1_utc }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EopTableConfig {
    /// Largest spacing between records that may be interpolated across.
    pub max_gap_days: f64,
}

impl Default for EopTableConfig {
    fn default() -> Self {
        Self { max_gap_days: 5.0 }
    }
}

/// UT1−UTC series with linear interpolation, usable as an [`OffsetProvider`].
#[derive(Debug, Clone)]
pub struct EopTable {
    records: Vec<Ut1Record>,
    config: EopTableConfig,
}

impl EopTable {
    pub fn new(mut records: Vec<Ut1Record>) -> Self {
        records.retain(|r| r.mjd.is_finite() && r.ut1_utc.is_finite());
        records.sort_by(|a, b| a.mjd.total_cmp(&b.mjd));
        Self {
            records,
            config: EopTableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EopTableConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_gap(mut self, max_gap_days: f64) -> Self {
        self.config.max_gap_days = max_gap_days;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Interpolated UT1−UTC at `mjd`.
    ///
    /// A jump of about one second between neighbours is a leap second; the
    /// later value is brought onto the earlier one's footing before
    /// interpolating, since the leap happens at the end of the earlier day.
    pub fn ut1_utc(&self, mjd: f64) -> TimeResult<f64> {
        let (first, last) = match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(TimeError::DataUnavailable(
                    "no UT1-UTC records loaded".to_string(),
                ))
            }
        };
        if mjd < first.mjd || mjd > last.mjd {
            return Err(TimeError::DataUnavailable(format!(
                "MJD {:.3} outside UT1-UTC table range [{:.1}, {:.1}]",
                mjd, first.mjd, last.mjd
            )));
        }

        let after = self.records.partition_point(|r| r.mjd <= mjd);
        if after == self.records.len() {
            return Ok(last.ut1_utc);
        }
        let r1 = &self.records[after - 1];
        if r1.mjd == mjd {
            return Ok(r1.ut1_utc);
        }
        let r2 = &self.records[after];

        let gap = r2.mjd - r1.mjd;
        if gap > self.config.max_gap_days {
            return Err(TimeError::DataUnavailable(format!(
                "gap of {:.1} days exceeds maximum interpolation gap of {:.1} days",
                gap, self.config.max_gap_days
            )));
        }

        let step = libm::round(r2.ut1_utc - r1.ut1_utc);
        let v2 = r2.ut1_utc - step;
        let t = (mjd - r1.mjd) / gap;
        Ok(r1.ut1_utc + t * (v2 - r1.ut1_utc))
    }
}

impl OffsetProvider for EopTable {
    fn ut1_minus_utc(&self, mjd: f64) -> Option<f64> {
        self.ut1_utc(mjd).ok()
    }
}
