use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
    util::num::f64_to_i64_checked,
};

/// `abs(x)`
pub fn abs(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Real(r) => Ok(Value::Real(r.abs())),
        n @ (Value::Integer(_) | Value::Bool(_)) => {
            n.as_integer(line)?
             .checked_abs()
             .map(Value::Integer)
             .ok_or_else(|| RuntimeError::ArithmeticError { details: "integer overflow".to_string(),
                                                            line })
        },
        other => Err(RuntimeError::type_error(format!("bad operand type for abs(): '{}'", other.type_name()),
                                              line)),
    }
}

/// `round(x[, ndigits])`
///
/// Halves round to the nearest even number. Without `ndigits` the result is
/// an `int`; with it, the result keeps the type of `x`.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::numeric::round},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// assert_eq!(round(&mut interpreter, &[Value::Real(2.5)], 1).unwrap(), Value::Integer(2));
/// assert_eq!(round(&mut interpreter, &[Value::Real(3.14159), Value::Integer(2)], 1).unwrap(),
///            Value::Real(3.14));
/// ```
pub fn round(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let x = &args[0];
    if !x.is_number() {
        return Err(RuntimeError::type_error(format!("type {} doesn't define __round__", x.type_name()),
                                            line));
    }

    let Some(ndigits) = args.get(1) else {
        return match x {
            Value::Real(r) => f64_to_i64_checked(r.round_ties_even(), line).map(Value::Integer),
            _ => Ok(Value::Integer(x.as_integer(line)?)),
        };
    };

    // Anything past 400 digits rounds like 400 would.
    let ndigits = i32::try_from(ndigits.as_integer(line)?.clamp(-400, 400)).unwrap_or(0);
    match x {
        Value::Real(r) => {
            let factor = 10f64.powi(ndigits);
            if factor.is_infinite() {
                Ok(Value::Real(*r))
            } else if factor == 0.0 {
                Ok(Value::Real(0.0))
            } else {
                Ok(Value::Real((r * factor).round_ties_even() / factor))
            }
        },
        _ if ndigits >= 0 => Ok(Value::Integer(x.as_integer(line)?)),
        _ => {
            let divisor = 10f64.powi(-ndigits);
            let scaled = (x.as_real(line)? / divisor).round_ties_even() * divisor;
            f64_to_i64_checked(scaled, line).map(Value::Integer)
        },
    }
}
