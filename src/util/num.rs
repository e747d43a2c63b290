use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer value exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Validates the result of a floating-point operation on finite inputs.
///
/// NaN means the operation was undefined for its inputs and becomes a domain
/// error; an infinity means the result outgrew `f64` and becomes an overflow.
///
/// ## Errors
/// `RuntimeError::Domain` for NaN, `RuntimeError::Overflow` for ±∞.
///
/// ## Example
/// ```
/// use keycalc::{error::RuntimeError, util::num::checked_finite};
///
/// assert_eq!(checked_finite(2.5, 0).unwrap(), 2.5);
/// assert!(matches!(checked_finite(f64::INFINITY, 4),
///                  Err(RuntimeError::Overflow { offset: 4 })));
/// assert!(matches!(checked_finite(f64::NAN, 4),
///                  Err(RuntimeError::Domain { .. })));
/// ```
pub fn checked_finite(value: f64, offset: usize) -> EvalResult<f64> {
    if value.is_nan() {
        return Err(RuntimeError::Domain { details: "result is undefined".to_string(),
                                          offset });
    }
    if value.is_infinite() {
        return Err(RuntimeError::Overflow { offset });
    }
    Ok(value)
}

/// Safely converts a `usize` to `f64` if and only if it is exactly
/// representable.
///
/// ## Errors
/// Returns `RuntimeError::Overflow` if the value exceeds `MAX_SAFE_U64_INT`.
///
/// ## Example
/// ```
/// use keycalc::util::num::usize_to_f64_checked;
///
/// assert_eq!(usize_to_f64_checked(12, 0).unwrap(), 12.0);
/// ```
#[allow(clippy::cast_precision_loss)]
pub const fn usize_to_f64_checked(value: usize, offset: usize) -> EvalResult<f64> {
    if value as u64 > MAX_SAFE_U64_INT {
        return Err(RuntimeError::Overflow { offset });
    }
    Ok(value as f64)
}

/// Safely converts an `f64` to `i64` if the value is finite, within range, and
/// not fractional.
///
/// ## Errors
/// Returns a domain error for non-finite or fractional values and an overflow
/// for values beyond `±MAX_SAFE_U64_INT`.
///
/// ## Example
/// ```
/// use keycalc::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-12.0, 1).unwrap(), -12);
///
/// let err = f64_to_i64_checked(1.5, 123).unwrap_err();
/// assert!(matches!(err, RuntimeError::Domain { offset: 123, .. }));
///
/// let err = f64_to_i64_checked(1e20, 5).unwrap_err();
/// assert!(matches!(err, RuntimeError::Overflow { offset: 5 }));
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, offset: usize) -> EvalResult<i64> {
    if !value.is_finite() {
        return Err(RuntimeError::Domain { details: format!("{value} is not an integer"),
                                          offset });
    }
    if value.abs() > MAX_SAFE_U64_INT as f64 {
        return Err(RuntimeError::Overflow { offset });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::Domain { details: format!("{value} is not an integer"),
                                          offset });
    }
    Ok(value as i64)
}

/// Safely converts an `f64` to `u64` if the value is a finite, non-negative
/// integer.
///
/// ## Errors
/// Returns a domain error for negative, fractional or non-finite values and an
/// overflow for values beyond `MAX_SAFE_U64_INT`.
///
/// ## Example
/// ```
/// use keycalc::{error::RuntimeError, util::num::f64_to_u64_checked};
///
/// assert_eq!(f64_to_u64_checked(7.0, 9).unwrap(), 7);
///
/// let err = f64_to_u64_checked(-5.0, 10).unwrap_err();
/// assert!(matches!(err, RuntimeError::Domain { offset: 10, .. }));
/// ```
#[allow(clippy::cast_sign_loss)]
pub fn f64_to_u64_checked(value: f64, offset: usize) -> EvalResult<u64> {
    let n = f64_to_i64_checked(value, offset)?;
    if n < 0 {
        return Err(RuntimeError::Domain { details: format!("{value} is negative"),
                                          offset });
    }
    Ok(n as u64)
}

/// Safely converts an `f64` to `usize`, for counts and dimensions.
///
/// ## Errors
/// Same as [`f64_to_u64_checked`], plus an overflow when the count does not
/// fit the platform's `usize`.
pub fn f64_to_usize_checked(value: f64, offset: usize) -> EvalResult<usize> {
    let n = f64_to_u64_checked(value, offset)?;
    usize::try_from(n).map_err(|_| RuntimeError::Overflow { offset })
}
