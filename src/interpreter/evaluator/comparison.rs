use std::cmp::Ordering;

use crate::{
    ast::CompareOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::{Value, address},
            key::HashKey,
        },
    },
};

/// Evaluates a comparison or logical connective on two evaluated operands.
///
/// `and` and `or` return one of their operands, chosen by the truthiness of
/// the left one.
///
/// # Errors
/// Returns a `TypeError` when ordering values that cannot be ordered, when
/// the right operand of `in` is not a container, or when a dict or set is
/// probed with an unhashable value.
///
/// # Example
/// ```
/// use pyrite::{
///     ast::CompareOperator,
///     interpreter::{evaluator::comparison::compare, value::core::Value},
/// };
///
/// let v = compare(CompareOperator::Or, Value::Integer(0), Value::from("x"), 1).unwrap();
/// assert_eq!(v, Value::from("x"));
///
/// let v = compare(CompareOperator::Less, Value::Integer(1), Value::Real(1.5), 1).unwrap();
/// assert_eq!(v, Value::Bool(true));
/// ```
pub fn compare(op: CompareOperator, left: Value, right: Value, line: usize) -> EvalResult<Value> {
    let result = match op {
        CompareOperator::And => return Ok(if left.is_truthy() { right } else { left }),
        CompareOperator::Or => return Ok(if left.is_truthy() { left } else { right }),
        CompareOperator::Equal => left == right,
        CompareOperator::NotEqual => left != right,
        CompareOperator::Is => left.is_identical(&right),
        CompareOperator::IsNot => !left.is_identical(&right),
        CompareOperator::In => contains(&right, &left, line)?,
        CompareOperator::NotIn => !contains(&right, &left, line)?,
        CompareOperator::Less
        | CompareOperator::Greater
        | CompareOperator::LessEqual
        | CompareOperator::GreaterEqual => {
            let Some(ordering) = partial_order(&left, &right, &mut Vec::new()) else {
                return Err(not_orderable(op, &left, &right, line));
            };
            ordering.is_some_and(|o| match op {
                                 CompareOperator::Less => o == Ordering::Less,
                                 CompareOperator::Greater => o == Ordering::Greater,
                                 CompareOperator::LessEqual => o != Ordering::Greater,
                                 _ => o != Ordering::Less,
                             })
        },
    };
    Ok(Value::Bool(result))
}

/// Orders two values for sorting, `min` and `max`.
///
/// Unordered floats (`nan`) compare equal.
///
/// # Errors
/// Returns a `TypeError` if the values cannot be ordered.
pub fn order(left: &Value, right: &Value, line: usize) -> EvalResult<Ordering> {
    match partial_order(left, right, &mut Vec::new()) {
        Some(ordering) => Ok(ordering.unwrap_or(Ordering::Equal)),
        None => Err(not_orderable(CompareOperator::Less, left, right, line)),
    }
}

/// The outer `Option` is `None` when the types cannot be ordered at all, the
/// inner one when they can but these values are unordered (`nan`).
type PartialOrdering = Option<Option<Ordering>>;

/// `active` holds the pairs of lists already being ordered; a pair met again
/// is unordered.
fn partial_order(left: &Value, right: &Value, active: &mut Vec<(usize, usize)>) -> PartialOrdering {
    match (left, right) {
        (Value::Integer(_) | Value::Bool(_), Value::Integer(_) | Value::Bool(_)) => {
            let (a, b) = (integer(left), integer(right));
            Some(a.partial_cmp(&b))
        },
        (Value::Real(a), Value::Real(b)) => Some(a.partial_cmp(b)),
        (Value::Real(a), _) if right.is_number() => Some(int_real_order(integer(right), *a).map(Ordering::reverse)),
        (_, Value::Real(b)) if left.is_number() => Some(int_real_order(integer(left), *b)),
        (Value::Str(a), Value::Str(b)) => Some(Some(a.cmp(b))),
        (Value::List(a), Value::List(b)) => {
            let pair = (address(a), address(b));
            if active.contains(&pair) {
                return Some(None);
            }
            active.push(pair);
            let ordering = lexicographic(&a.borrow(), &b.borrow(), active);
            active.pop();
            ordering
        },
        (Value::Tuple(a), Value::Tuple(b)) => lexicographic(a, b, active),
        _ => None,
    }
}

fn integer(value: &Value) -> i64 {
    match value {
        Value::Integer(n) => *n,
        Value::Bool(b) => i64::from(*b),
        _ => 0,
    }
}

/// Orders an integer against a float without rounding the integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn int_real_order(n: i64, r: f64) -> Option<Ordering> {
    if r.is_nan() {
        return None;
    }
    // 2^63 is exact as f64; everything in [-2^63, 2^63) truncates into i64.
    if r >= i64::MAX as f64 {
        return Some(Ordering::Less);
    }
    if r < i64::MIN as f64 {
        return Some(Ordering::Greater);
    }
    let whole = r.trunc() as i64;
    Some(n.cmp(&whole).then_with(|| 0.0_f64.partial_cmp(&r.fract()).unwrap_or(Ordering::Equal)))
}

/// Sequences compare by their first unequal element, then by length.
fn lexicographic(a: &[Value], b: &[Value], active: &mut Vec<(usize, usize)>) -> PartialOrdering {
    for (x, y) in a.iter().zip(b) {
        if x != y {
            return partial_order(x, y, active);
        }
    }
    Some(Some(a.len().cmp(&b.len())))
}

/// Membership test: `item in container`.
///
/// # Errors
/// Returns a `TypeError` if `container` does not support membership or the
/// item is unhashable for a dict or set.
pub fn contains(container: &Value, item: &Value, line: usize) -> EvalResult<bool> {
    match container {
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(needle.as_ref())),
            _ => Err(RuntimeError::type_error(format!("'in <string>' requires string as left operand, not {}",
                                                      item.type_name()),
                                              line)),
        },
        Value::List(items) => Ok(items.borrow().iter().any(|v| v == item)),
        Value::Tuple(items) => Ok(items.iter().any(|v| v == item)),
        Value::Dict(entries) => Ok(entries.borrow().contains_key(&HashKey::from_value(item, line)?)),
        Value::Set(entries) => Ok(entries.borrow().contains_key(&HashKey::from_value(item, line)?)),
        _ => Err(RuntimeError::type_error(format!("argument of type '{}' is not iterable",
                                                  container.type_name()),
                                          line)),
    }
}

fn not_orderable(op: CompareOperator, left: &Value, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::type_error(format!("'{op}' not supported between instances of '{}' and '{}'",
                                     left.type_name(),
                                     right.type_name()),
                             line)
}
