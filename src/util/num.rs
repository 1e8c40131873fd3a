use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Promotes an integer to `float` for mixed arithmetic.
///
/// Magnitudes above `2^53` round to the nearest representable `f64`, the
/// same loss any float operation on such an integer has.
///
/// ## Example
/// ```
/// use pyrite::util::num::int_to_real;
///
/// assert_eq!(int_to_real(-3), -3.0);
/// assert_eq!(int_to_real(9_007_199_254_740_993), 9_007_199_254_740_992.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn int_to_real(value: i64) -> f64 {
    value as f64
}

/// Converts an integral `f64` to `i64`.
///
/// ## Errors
/// Returns an `ArithmeticError` for `nan`, infinities and values outside the
/// `i64` range, and a `ValueError` for values with a fractional part.
///
/// ## Example
/// ```
/// use pyrite::{error::FaultKind, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(1000.0, 1).unwrap(), 1000);
///
/// let err = f64_to_i64_checked(f64::INFINITY, 5).unwrap_err();
/// assert_eq!(err.kind(), FaultKind::Arithmetic);
///
/// let err = f64_to_i64_checked(1.5, 5).unwrap_err();
/// assert_eq!(err.kind(), FaultKind::Value);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64, line: usize) -> EvalResult<i64> {
    if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(RuntimeError::ArithmeticError { details: format!("cannot convert float {value} to integer"),
                                                   line });
    }
    if value.fract() != 0.0 {
        return Err(RuntimeError::value_error(format!("float {value} has a fractional part"), line));
    }
    Ok(value as i64)
}

/// Converts a length or position to `i64`.
///
/// ## Errors
/// Returns an `ArithmeticError` if the value does not fit.
///
/// ## Example
/// ```
/// use pyrite::util::num::usize_to_i64_checked;
///
/// assert_eq!(usize_to_i64_checked(7, 1).unwrap(), 7);
/// ```
pub fn usize_to_i64_checked(value: usize, line: usize) -> EvalResult<i64> {
    i64::try_from(value).map_err(|_| RuntimeError::ArithmeticError { details: format!("{value} does not fit into an integer"),
                                                                     line })
}
