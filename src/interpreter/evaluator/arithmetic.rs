use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{MAX_SEQUENCE_LEN, SetEntries, Value},
    },
};

/// Applies a binary operator to two evaluated operands.
///
/// Integer arithmetic is overflow-checked and mixed operands promote to
/// `float`. `/` always produces a `float`, `%` takes the sign of the divisor.
/// Strings, lists and tuples support `+` and `*`; sets support `-`, `&`, `|`
/// and `^`.
///
/// # Errors
/// - `ZeroDivisionError` for `/` or `%` by zero.
/// - `ArithmeticError` on integer overflow.
/// - `TypeError` for unsupported operand types.
///
/// # Example
/// ```
/// use pyrite::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::arithmetic::binary_op, value::core::Value},
/// };
///
/// let v = binary_op(BinaryOperator::Mod, &Value::Integer(-7), &Value::Integer(3), 1).unwrap();
/// assert_eq!(v, Value::Integer(2));
///
/// let v = binary_op(BinaryOperator::Div, &Value::Integer(7), &Value::Integer(2), 1).unwrap();
/// assert_eq!(v, Value::Real(3.5));
/// ```
pub fn binary_op(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
    match (left, right) {
        (Value::Bool(a), Value::Bool(b))
            if matches!(op, BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor) =>
        {
            Ok(Value::Bool(match op {
                               BinaryOperator::BitAnd => a & b,
                               BinaryOperator::BitOr => a | b,
                               _ => a ^ b,
                           }))
        },
        (Value::Integer(_) | Value::Bool(_), Value::Integer(_) | Value::Bool(_)) => {
            integer_op(op, left.as_integer(line)?, right.as_integer(line)?, line)
        },
        (Value::Real(_), _) | (_, Value::Real(_)) if left.is_number() && right.is_number() => {
            real_op(op, left.as_real(line)?, right.as_real(line)?, line).ok_or_else(|| unsupported(op, left, right, line))?
        },
        _ => sequence_op(op, left, right, line)?.ok_or_else(|| unsupported(op, left, right, line)),
    }
}

/// Applies a unary operator.
///
/// # Errors
/// Returns a `TypeError` for non-numeric operands and an `ArithmeticError`
/// when negating the smallest integer.
pub fn unary_op(op: UnaryOperator, operand: &Value, line: usize) -> EvalResult<Value> {
    match (op, operand) {
        (UnaryOperator::Plus, Value::Real(r)) => Ok(Value::Real(*r)),
        (UnaryOperator::Negate, Value::Real(r)) => Ok(Value::Real(-r)),
        (UnaryOperator::Plus, Value::Integer(_) | Value::Bool(_)) => {
            Ok(Value::Integer(operand.as_integer(line)?))
        },
        (UnaryOperator::Negate, Value::Integer(_) | Value::Bool(_)) => {
            operand.as_integer(line)?
                   .checked_neg()
                   .map(Value::Integer)
                   .ok_or_else(|| overflow(line))
        },
        _ => Err(RuntimeError::type_error(format!("bad operand type for unary {op}: '{}'",
                                                  operand.type_name()),
                                          line)),
    }
}

fn integer_op(op: BinaryOperator, a: i64, b: i64, line: usize) -> EvalResult<Value> {
    let result = match op {
        BinaryOperator::Add => a.checked_add(b),
        BinaryOperator::Sub => a.checked_sub(b),
        BinaryOperator::Mul => a.checked_mul(b),
        BinaryOperator::Div => {
            if b == 0 {
                return Err(division_by_zero("division by zero", line));
            }
            let (a, b) = (Value::Integer(a).as_real(line)?, Value::Integer(b).as_real(line)?);
            return Ok(Value::Real(a / b));
        },
        BinaryOperator::Mod => {
            if b == 0 {
                return Err(division_by_zero("integer division or modulo by zero", line));
            }
            if b == -1 {
                return Ok(Value::Integer(0));
            }
            a.checked_rem_euclid(b).map(|r| if r != 0 && b < 0 { r + b } else { r })
        },
        BinaryOperator::ShiftLeft => shift_left(a, b, line)?,
        BinaryOperator::ShiftRight => {
            if b < 0 {
                return Err(RuntimeError::value_error("negative shift count", line));
            }
            Some(if b >= 64 { if a < 0 { -1 } else { 0 } } else { a >> b })
        },
        BinaryOperator::BitAnd => Some(a & b),
        BinaryOperator::BitXor => Some(a ^ b),
        BinaryOperator::BitOr => Some(a | b),
    };
    result.map(Value::Integer).ok_or_else(|| overflow(line))
}

fn shift_left(a: i64, b: i64, line: usize) -> EvalResult<Option<i64>> {
    if b < 0 {
        return Err(RuntimeError::value_error("negative shift count", line));
    }
    if a == 0 {
        return Ok(Some(0));
    }
    let Ok(shift) = u32::try_from(b) else {
        return Ok(None);
    };
    if shift >= 63 {
        return Ok(None);
    }
    let shifted = a << shift;
    Ok((shifted >> shift == a).then_some(shifted))
}

/// Float arithmetic; `None` for operators floats do not support.
fn real_op(op: BinaryOperator, a: f64, b: f64, line: usize) -> Option<EvalResult<Value>> {
    let value = match op {
        BinaryOperator::Add => a + b,
        BinaryOperator::Sub => a - b,
        BinaryOperator::Mul => a * b,
        BinaryOperator::Div => {
            if b == 0.0 {
                return Some(Err(division_by_zero("float division by zero", line)));
            }
            a / b
        },
        BinaryOperator::Mod => {
            if b == 0.0 {
                return Some(Err(division_by_zero("float modulo", line)));
            }
            let r = a % b;
            if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r }
        },
        _ => return None,
    };
    Some(Ok(Value::Real(value)))
}

/// Concatenation, repetition and set algebra; `None` when the operand types
/// do not combine.
fn sequence_op(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> EvalResult<Option<Value>> {
    let value = match (op, left, right) {
        (BinaryOperator::Add, Value::Str(a), Value::Str(b)) => {
            check_size(a.len(), b.len(), line)?;
            Value::from(format!("{a}{b}"))
        },
        (BinaryOperator::Add, Value::List(a), Value::List(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            check_size(a.len(), b.len(), line)?;
            Value::list(a.iter().chain(b.iter()).cloned().collect())
        },
        (BinaryOperator::Add, Value::Tuple(a), Value::Tuple(b)) => {
            check_size(a.len(), b.len(), line)?;
            Value::tuple(a.iter().chain(b.iter()).cloned().collect())
        },
        (BinaryOperator::Mul, sequence @ (Value::Str(_) | Value::List(_) | Value::Tuple(_)), count)
        | (BinaryOperator::Mul, count, sequence @ (Value::Str(_) | Value::List(_) | Value::Tuple(_)))
            if matches!(count, Value::Integer(_) | Value::Bool(_)) =>
        {
            repeat(sequence, count.as_integer(line)?, line)?
        },
        (BinaryOperator::Sub | BinaryOperator::BitAnd | BinaryOperator::BitOr | BinaryOperator::BitXor,
         Value::Set(a),
         Value::Set(b)) => {
            let (a, b) = (a.borrow(), b.borrow());
            let entries: SetEntries = match op {
                BinaryOperator::Sub => a.iter()
                                        .filter(|(k, _)| !b.contains_key(*k))
                                        .map(|(k, v)| (k.clone(), v.clone()))
                                        .collect(),
                BinaryOperator::BitAnd => a.iter()
                                           .filter(|(k, _)| b.contains_key(*k))
                                           .map(|(k, v)| (k.clone(), v.clone()))
                                           .collect(),
                BinaryOperator::BitOr => {
                    let mut union = a.clone();
                    for (k, v) in b.iter() {
                        union.entry(k.clone()).or_insert_with(|| v.clone());
                    }
                    union
                },
                _ => a.iter()
                      .filter(|(k, _)| !b.contains_key(*k))
                      .chain(b.iter().filter(|(k, _)| !a.contains_key(*k)))
                      .map(|(k, v)| (k.clone(), v.clone()))
                      .collect(),
            };
            Value::Set(Rc::new(std::cell::RefCell::new(entries)))
        },
        _ => return Ok(None),
    };
    Ok(Some(value))
}

fn repeat(sequence: &Value, count: i64, line: usize) -> EvalResult<Value> {
    let count = usize::try_from(count).unwrap_or(0);
    let value = match sequence {
        Value::Str(s) => {
            check_repeat(s.len(), count, line)?;
            Value::from(s.repeat(count))
        },
        Value::List(items) => {
            let items = items.borrow();
            check_repeat(items.len(), count, line)?;
            Value::list(repeat_items(&items, count))
        },
        Value::Tuple(items) => {
            check_repeat(items.len(), count, line)?;
            Value::tuple(repeat_items(items, count))
        },
        _ => return Err(RuntimeError::type_error(format!("can't multiply sequence of type '{}'",
                                                         sequence.type_name()),
                                                 line)),
    };
    Ok(value)
}

fn repeat_items(items: &[Value], count: usize) -> Vec<Value> {
    std::iter::repeat_n(items, count).flatten().cloned().collect()
}

fn check_repeat(len: usize, count: usize, line: usize) -> EvalResult<()> {
    match len.checked_mul(count) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(()),
        _ => Err(too_large(line)),
    }
}

fn check_size(a: usize, b: usize, line: usize) -> EvalResult<()> {
    match a.checked_add(b) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(()),
        _ => Err(too_large(line)),
    }
}

fn too_large(line: usize) -> RuntimeError {
    RuntimeError::OutOfMemory { details: format!("sequence longer than {MAX_SEQUENCE_LEN} elements"),
                                line }
}

fn unsupported(op: BinaryOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::type_error(format!("unsupported operand type(s) for {op}: '{}' and '{}'",
                                     left.type_name(),
                                     right.type_name()),
                             line)
}

fn overflow(line: usize) -> RuntimeError {
    RuntimeError::ArithmeticError { details: "integer overflow".to_string(),
                                    line }
}

fn division_by_zero(details: &str, line: usize) -> RuntimeError {
    RuntimeError::DivisionByZero { details: details.to_string(),
                                   line }
}
