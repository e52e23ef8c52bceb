//! Failures raised below the time-scale layer.
//!
//! Core code either rejects a number ([`AstroError::MathError`]) or finds that
//! a table does not cover the request ([`AstroError::DataError`]). Only the
//! second can be fixed by the caller, by loading more data.
//!
//! ```
//! use celestial_core::{AstroError, Location};
//!
//! let err: AstroError = Location::from_degrees(95.0, 0.0, 0.0).unwrap_err();
//! assert!(!err.is_recoverable());
//! ```

use thiserror::Error;

/// What went wrong numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathErrorKind {
    Overflow,
    DivisionByZero,
    InvalidInput,
    NotFinite,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AstroError {
    #[error("{operation} failed ({kind:?}): {message}")]
    MathError {
        operation: String,
        kind: MathErrorKind,
        message: String,
    },

    #[error("{table} has no {quantity}: {message}")]
    DataError {
        table: String,
        quantity: String,
        message: String,
    },
}

pub type AstroResult<T> = Result<T, AstroError>;

impl AstroError {
    pub fn math_error(operation: &str, kind: MathErrorKind, message: &str) -> Self {
        Self::MathError {
            operation: operation.to_owned(),
            kind,
            message: message.to_owned(),
        }
    }

    pub fn data_error(table: &str, quantity: &str, message: &str) -> Self {
        Self::DataError {
            table: table.to_owned(),
            quantity: quantity.to_owned(),
            message: message.to_owned(),
        }
    }

    /// `true` when loading more data could make the call succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataError { .. })
    }
}
