//! Error types for sliding-number construction and stepping.

use crate::digits::MAX_DECIMAL_POINTS;

/// Errors raised by [`SlidingNumber`](crate::SlidingNumber) and its configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SlidingNumberError {
    /// Fixed duration is negative, NaN or infinite.
    #[error("Invalid duration: {duration} (expected a finite, non-negative number of milliseconds)")]
    InvalidDuration { duration: f64 },

    /// More fractional digit positions than an f64 can carry.
    #[error("Too many decimal points: {decimal_points} (max {max})")]
    TooManyDecimalPoints { decimal_points: u32, max: u32 },

    /// NaN or infinite value passed as initial value or target.
    #[error("Non-finite value: {value}")]
    NonFiniteValue { value: f64 },

    /// Value whose scaled magnitude does not fit the digit buffer.
    #[error("Value {value} is out of range for {decimal_points} decimal points")]
    ValueOutOfRange { value: f64, decimal_points: u32 },

    /// Easing preset with unusable parameters.
    #[error("Invalid easing: {reason}")]
    InvalidEasing { reason: String },

    /// Negative or non-finite time step passed to `advance`.
    #[error("Invalid time step: {dt}")]
    InvalidTimeStep { dt: f64 },

    /// Configuration could not be parsed.
    #[error("Config error: {reason}")]
    Config { reason: String },
}

impl SlidingNumberError {
    pub(crate) fn too_many_decimal_points(decimal_points: u32) -> Self {
        Self::TooManyDecimalPoints {
            decimal_points,
            max: MAX_DECIMAL_POINTS,
        }
    }

    /// Error category for logging.
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidDuration { .. }
            | Self::TooManyDecimalPoints { .. }
            | Self::InvalidEasing { .. }
            | Self::Config { .. } => "config",
            Self::NonFiniteValue { .. } | Self::ValueOutOfRange { .. } => "value",
            Self::InvalidTimeStep { .. } => "time",
        }
    }
}

impl From<serde_json::Error> for SlidingNumberError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config {
            reason: err.to_string(),
        }
    }
}
