use celestial_core::AstroError;
use thiserror::Error;

pub type TimeResult<T> = Result<T, TimeError>;

/// Failures surfaced by epoch construction, conversion and arithmetic.
///
/// Nothing is clamped or wrapped: an out-of-range day fails instead of rolling
/// into the next month, and a missing leap-second or UT1 value fails instead of
/// being guessed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("Invalid date {year}-{month:02}-{day:02}: {message}")]
    InvalidDate {
        year: i64,
        month: u8,
        day: u8,
        message: String,
    },

    /// Out-of-range time-of-day component or malformed numeric input.
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown time scale: {0}")]
    UnknownScale(String),

    #[error("Time scale already registered: {0}")]
    DuplicateScale(String),

    /// Measured offset data (leap seconds, UT1−UTC) does not cover the date.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Numeric overflow in unit conversion or instant normalization.
    #[error("Range error: {0}")]
    RangeError(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

impl TimeError {
    pub(crate) fn invalid_date(year: i64, month: u8, day: u8, reason: &str) -> Self {
        Self::InvalidDate {
            year,
            month,
            day,
            message: reason.to_string(),
        }
    }

    /// `true` when installing more offset data and retrying might succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_))
    }
}

impl From<AstroError> for TimeError {
    fn from(err: AstroError) -> Self {
        match err {
            AstroError::DataError { .. } => TimeError::DataUnavailable(err.to_string()),
            AstroError::MathError { .. } => TimeError::CalculationError(err.to_string()),
        }
    }
}
