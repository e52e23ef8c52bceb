//! Observer positions on the WGS84 ellipsoid.
//!
//! The epoch crate needs a position for one thing only: the topocentric
//! terms of TDB−TT, which depend on how far the observer sits from Earth's
//! spin axis and equatorial plane. [`Location::tdb_parameters`] packs those
//! numbers in the order the TDB offset function reads them.

mod geodesy;

use std::f64::consts::{FRAC_PI_2, PI};

use crate::errors::{AstroError, AstroResult, MathErrorKind};

/// Lowest and highest accepted heights, metres.
const HEIGHT_RANGE_M: (f64, f64) = (-12_000.0, 100_000.0);

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    /// Geodetic latitude, radians north.
    pub latitude: f64,
    /// Longitude, radians east.
    pub longitude: f64,
    /// Metres above the ellipsoid.
    pub height: f64,
}

fn reject(message: String) -> AstroError {
    AstroError::math_error("Location::new", MathErrorKind::InvalidInput, &message)
}

impl Location {
    /// Validates and builds a location from radians and metres.
    pub fn new(latitude: f64, longitude: f64, height: f64) -> AstroResult<Self> {
        if !(latitude.is_finite() && longitude.is_finite() && height.is_finite()) {
            return Err(reject(format!(
                "non-finite coordinate ({}, {}, {})",
                latitude, longitude, height
            )));
        }
        if latitude.abs() > FRAC_PI_2 {
            return Err(reject(format!("latitude {} rad beyond a pole", latitude)));
        }
        if longitude.abs() > PI {
            return Err(reject(format!("longitude {} rad outside [-pi, pi]", longitude)));
        }
        let (low, high) = HEIGHT_RANGE_M;
        if height < low || height > high {
            return Err(reject(format!("height {} m outside [{}, {}]", height, low, high)));
        }
        Ok(Self {
            latitude,
            longitude,
            height,
        })
    }

    /// Same as [`Location::new`] with angles in degrees.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64, height_m: f64) -> AstroResult<Self> {
        // to_radians can land one ulp past the limits.
        if lat_deg.abs() > 90.0 || lon_deg.abs() > 180.0 {
            return Err(reject(format!("({}°, {}°) is not on the globe", lat_deg, lon_deg)));
        }
        let lat = lat_deg.to_radians().clamp(-FRAC_PI_2, FRAC_PI_2);
        let lon = lon_deg.to_radians().clamp(-PI, PI);
        Self::new(lat, lon, height_m)
    }

    /// Airy transit circle, Royal Observatory Greenwich.
    pub fn greenwich() -> Self {
        Self {
            latitude: 51.477928_f64.to_radians(),
            longitude: 0.0,
            height: 46.0,
        }
    }

    /// `[east longitude (rad), u (km), v (km)]` for topocentric TDB.
    pub fn tdb_parameters(&self) -> AstroResult<[f64; 3]> {
        let (u, v) = self.to_geocentric_km()?;
        Ok([self.longitude, u, v])
    }
}
