//! Digit decomposition, per-digit interpolation and recomposition.
//!
//! Digits are stored least-significant first: index 0 is position
//! `-decimal_points`, the last index is the most significant integer digit.
//! Signs are dropped; callers reapply them.

use crate::error::SlidingNumberError;

/// Largest supported count of fractional positions (f64 carries ~15 significant digits).
pub const MAX_DECIMAL_POINTS: u32 = 15;

/// Scaled magnitudes at or above this overflow the integer digit buffer.
const MAX_SCALED: f64 = 1e38;

/// Binary fuzz (`0.29 * 100 = 28.999…`) within this many ULPs of an integer snaps onto it.
/// Anything further away is a real fractional digit and is truncated.
const SNAP_ULPS: f64 = 4.0;

#[inline]
fn pow10_f64(decimal_points: u32) -> f64 {
    10f64.powi(decimal_points as i32)
}

/// Check that `value` can be decomposed with `decimal_points` fractional positions.
pub fn check_value(value: f64, decimal_points: u32) -> Result<(), SlidingNumberError> {
    scaled_magnitude(value, decimal_points).map(|_| ())
}

/// |value| expressed as an integer count of `10^-decimal_points` units.
/// Digits past `decimal_points` are truncated.
pub fn scaled_magnitude(value: f64, decimal_points: u32) -> Result<u128, SlidingNumberError> {
    if !value.is_finite() {
        return Err(SlidingNumberError::NonFiniteValue { value });
    }
    if decimal_points > MAX_DECIMAL_POINTS {
        return Err(SlidingNumberError::too_many_decimal_points(decimal_points));
    }
    let raw = value.abs() * pow10_f64(decimal_points);
    if raw >= MAX_SCALED {
        return Err(SlidingNumberError::ValueOutOfRange {
            value,
            decimal_points,
        });
    }
    let nearest = raw.round();
    let scaled = if (raw - nearest).abs() <= SNAP_ULPS * f64::EPSILON * raw.max(1.0) {
        nearest
    } else {
        raw.trunc()
    };
    Ok(scaled as u128)
}

/// Split a scaled magnitude into digits. Always yields at least
/// `decimal_points + 1` digits: a zero integer part still has one digit.
pub fn digits_of_scaled(mut scaled: u128, decimal_points: u32) -> Vec<u8> {
    let min_len = decimal_points as usize + 1;
    let mut digits = Vec::with_capacity(min_len + 8);
    while scaled > 0 || digits.len() < min_len {
        digits.push((scaled % 10) as u8);
        scaled /= 10;
    }
    digits
}

/// Decompose `value` into per-position digits, least-significant first.
pub fn decompose(value: f64, decimal_points: u32) -> Result<Vec<u8>, SlidingNumberError> {
    let scaled = scaled_magnitude(value, decimal_points)?;
    Ok(digits_of_scaled(scaled, decimal_points))
}

/// Recompose digits into a non-negative number: `Σ d[i] * 10^(i - decimal_points)`.
///
/// Accumulates an exact integer and divides once, so a value with at most
/// `decimal_points` fractional digits round-trips bit-for-bit.
pub fn compose(digits: &[u8], decimal_points: u32) -> f64 {
    let scaled = digits
        .iter()
        .rev()
        .fold(0u128, |acc, &d| acc.saturating_mul(10).saturating_add(d as u128));
    scaled as f64 / pow10_f64(decimal_points)
}

/// `round(start + (end - start) * eased)`, rounding halves up and clamped to a digit.
#[inline]
pub fn interpolate_digit(start: u8, end: u8, eased: f64) -> u8 {
    let start_f = start as f64;
    let value = start_f + (end as f64 - start_f) * eased;
    let rounded = (value + 0.5).floor();
    if rounded.is_nan() {
        return start;
    }
    rounded.clamp(0.0, 9.0) as u8
}

/// Interpolate every position spanned by the longer sequence; missing positions are 0.
/// Positions are independent: no carry or borrow between neighbours.
pub fn interpolate_digits(start: &[u8], end: &[u8], eased: f64) -> Vec<u8> {
    let len = start.len().max(end.len());
    (0..len)
        .map(|i| {
            interpolate_digit(
                start.get(i).copied().unwrap_or(0),
                end.get(i).copied().unwrap_or(0),
                eased,
            )
        })
        .collect()
}
