//! Foundation types shared by the celestial crates.
//!
//! - [`constants`]: astronomical and physical constants
//! - [`errors`]: [`AstroError`] and [`AstroResult`]
//! - [`math`]: error-free float splitting and summation
//! - [`location`]: WGS84 observer positions

pub mod constants;
pub mod errors;
pub mod location;
pub mod math;

pub use errors::{AstroError, AstroResult, MathErrorKind};
pub use location::Location;
