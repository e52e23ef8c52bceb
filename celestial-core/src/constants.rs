pub const J2000_JD: f64 = 2451545.0;

/// Modified Julian Date of the J2000.0 reference (2000-01-01T12:00).
pub const J2000_MJD: f64 = 51544.5;

pub const DAYS_PER_JULIAN_YEAR: f64 = 365.25;

pub const DAYS_PER_JULIAN_CENTURY: f64 = 36525.0;

pub const DAYS_PER_JULIAN_MILLENNIUM: f64 = 365250.0;

pub const SECONDS_PER_MINUTE: f64 = 60.0;

pub const SECONDS_PER_HOUR: f64 = 3_600.0;

pub const SECONDS_PER_DAY: i64 = 86_400;

pub const SECONDS_PER_DAY_F64: f64 = 86_400.0;

pub const NANOSECONDS_PER_SECOND_F64: f64 = 1_000_000_000.0;

#[allow(clippy::excessive_precision)]
pub const TWOPI: f64 = 6.283185307179586476925287;

#[allow(clippy::excessive_precision)]
pub const DEG_TO_RAD: f64 = 1.745329251994329576923691e-2;

/// Speed of light in vacuum, m/s (exact by definition of the metre).
pub const SPEED_OF_LIGHT_M_PER_S: f64 = 299_792_458.0;

/// Astronomical unit in metres (IAU 2012 B2).
pub const AU_M: f64 = 149_597_870_700.0;

/// WGS84 semi-major axis in kilometers.
pub const WGS84_SEMI_MAJOR_AXIS_KM: f64 = 6378.137;

/// WGS84 first eccentricity squared: e² = (a² - b²) / a².
pub const WGS84_ECCENTRICITY_SQUARED: f64 = 6.6943799901413165e-3;
