//! Time-scale-aware epochs with sub-nanosecond precision.
//!
//! Every [`Epoch`] carries the time scale it is read on. Conversions between
//! scales route through International Atomic Time, so each scale only defines
//! its offset from TAI. Users can add scales at run time through
//! [`registry::register`].
//!
//! ```
//! use celestial_epoch::{Epoch, Period, TDB, UTC};
//!
//! let launch = Epoch::from_calendar(UTC, 2021, 12, 25, 12, 20, 0.0).unwrap();
//! let tdb = launch.to_scale(TDB).unwrap();
//! let later = tdb + Period::days(30.0);
//! assert_eq!((later - tdb).value(), 2_592_000.0);
//! ```

pub mod calendar;
pub mod constants;
pub mod epoch;
pub mod errors;
pub mod format;
pub mod instant;
#[cfg(feature = "chrono")]
pub mod interop;
pub mod julian;
pub mod period;
pub mod provider;
pub mod registry;
pub mod scales;

pub use epoch::Epoch;
pub use errors::{TimeError, TimeResult};
pub use format::DateFormat;
pub use instant::Instant;
pub use julian::{JulianDate, JulianOrigin};
pub use period::{Period, TimeUnit};
pub use provider::{EopTable, OffsetProvider, Ut1Record};
pub use scales::{CustomScale, Scale, TimeScale, TAI, TCB, TCG, TDB, TT, UT1, UTC};

pub use celestial_core::Location;
