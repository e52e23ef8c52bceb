//! WGS84 geodetic position to the (u, v) pair used by topocentric TDB.

use crate::constants::{WGS84_ECCENTRICITY_SQUARED, WGS84_SEMI_MAJOR_AXIS_KM};
use crate::errors::{AstroError, AstroResult, MathErrorKind};

use super::Location;

/// Radius of curvature in the prime vertical, km.
fn prime_vertical_radius_km(sin_lat: f64) -> AstroResult<f64> {
    let w2 = 1.0 - WGS84_ECCENTRICITY_SQUARED * sin_lat * sin_lat;
    if w2 <= f64::EPSILON {
        return Err(AstroError::math_error(
            "prime_vertical_radius",
            MathErrorKind::DivisionByZero,
            "ellipsoid factor vanished",
        ));
    }
    Ok(WGS84_SEMI_MAJOR_AXIS_KM / libm::sqrt(w2))
}

impl Location {
    /// Distance from the spin axis `u` and north of the equator `v`, in km.
    ///
    /// ```
    /// use celestial_core::Location;
    ///
    /// let (u, v) = Location::greenwich().to_geocentric_km()?;
    /// assert!((u - 3980.6).abs() < 0.1);
    /// assert!((v - 4966.9).abs() < 0.1);
    /// # Ok::<(), celestial_core::AstroError>(())
    /// ```
    pub fn to_geocentric_km(&self) -> AstroResult<(f64, f64)> {
        let (sin_lat, cos_lat) = libm::sincos(self.latitude);
        let n = prime_vertical_radius_km(sin_lat)?;
        let h = self.height * 1e-3;
        Ok((
            (n + h) * cos_lat,
            ((1.0 - WGS84_ECCENTRICITY_SQUARED) * n + h) * sin_lat,
        ))
    }
}
