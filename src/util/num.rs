use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Converts an `i64` to `f64`, rounding to the nearest representable value.
///
/// Mixed integer/float arithmetic goes through this helper so the lossy cast
/// lives in one place.
///
/// # Example
/// ```
/// use quill::util::num::int_to_float;
///
/// assert_eq!(int_to_float(9), 9.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_float(value: i64) -> f64 {
    value as f64
}

/// Safely converts an `f64` to `i64` after truncating toward zero.
///
/// # Parameters
/// - `value`: The floating-point value to convert.
/// - `line`: Source code line number for error reporting.
///
/// # Returns
/// - `Ok(i64)`: The truncated value.
/// - `Err(RuntimeError::TypeError)`: For `NaN` or infinities.
/// - `Err(RuntimeError::Overflow)`: When the value does not fit an `i64`.
///
/// # Example
/// ```
/// use quill::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-2.7, 1).unwrap(), -2);
///
/// let err = f64_to_i64_checked(1e20, 5).unwrap_err();
/// assert!(matches!(err, RuntimeError::Overflow { line: 5 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::TypeError { details: format!("cannot convert non-finite value {value} to an integer"),
                                             line });
    }
    let truncated = value.trunc();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range.
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return Err(RuntimeError::Overflow { line });
    }
    Ok(truncated as i64)
}

/// Integer division rounding toward negative infinity.
///
/// Returns `None` for a zero divisor or when the quotient overflows
/// (`i64::MIN / -1`).
///
/// # Example
/// ```
/// use quill::util::num::floor_div;
///
/// assert_eq!(floor_div(7, 2), Some(3));
/// assert_eq!(floor_div(-7, 2), Some(-4));
/// assert_eq!(floor_div(1, 0), None);
/// ```
#[must_use]
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if (a % b != 0) && ((a < 0) != (b < 0)) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

/// Remainder whose sign follows the divisor, matching [`floor_div`].
///
/// # Example
/// ```
/// use quill::util::num::floor_mod;
///
/// assert_eq!(floor_mod(-7, 3), Some(2));
/// assert_eq!(floor_mod(7, -3), Some(-2));
/// ```
#[must_use]
pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    let remainder = a.checked_rem(b)?;
    if remainder != 0 && ((remainder < 0) != (b < 0)) {
        Some(remainder + b)
    } else {
        Some(remainder)
    }
}

/// Floating-point counterpart of [`floor_mod`].
#[must_use]
pub fn floor_mod_f64(a: f64, b: f64) -> f64 {
    a - b * (a / b).floor()
}

/// Rounds `value` to `places` decimal places, ties to even.
///
/// Negative `places` round to tens, hundreds and so on.
///
/// # Example
/// ```
/// use quill::util::num::round_to_places;
///
/// assert_eq!(round_to_places(2.675_f64, 0), 3.0);
/// assert_eq!(round_to_places(0.125, 2), 0.12);
/// assert_eq!(round_to_places(2.5, 400), 2.5);
/// ```
#[must_use]
pub fn round_to_places(value: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    let scaled = value * scale;
    if !scaled.is_finite() {
        return value;
    }
    if scale == 0.0 {
        return 0.0;
    }
    scaled.round_ties_even() / scale
}
