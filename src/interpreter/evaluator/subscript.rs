use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{core::Value, key::HashKey},
    },
};

/// Maps a possibly negative index onto `0..len`.
///
/// # Example
/// ```
/// use pyrite::interpreter::evaluator::subscript::normalize_index;
///
/// assert_eq!(normalize_index(-1, 3), Some(2));
/// assert_eq!(normalize_index(3, 3), None);
/// ```
#[must_use]
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let index = if index < 0 { index + len } else { index };
    if (0..len).contains(&index) { usize::try_from(index).ok() } else { None }
}

/// Clamps a slice bound like Python does: negative bounds count from the
/// end, anything outside `0..=len` is pulled back into range.
fn clamp_bound(bound: Option<&Value>, default: usize, len: usize, line: usize) -> EvalResult<usize> {
    let Some(bound) = bound.filter(|b| !matches!(b, Value::None)) else {
        return Ok(default);
    };
    let index = slice_index(bound, line)?;
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let index = if index < 0 { index.saturating_add(signed_len).max(0) } else { index.min(signed_len) };
    Ok(usize::try_from(index).unwrap_or(0))
}

fn slice_index(bound: &Value, line: usize) -> EvalResult<i64> {
    match bound {
        Value::Integer(_) | Value::Bool(_) => bound.as_integer(line),
        _ => Err(RuntimeError::type_error("slice indices must be integers or None", line)),
    }
}

fn sequence_index(container: &Value, key: &Value, line: usize) -> EvalResult<i64> {
    match key {
        Value::Integer(_) | Value::Bool(_) => key.as_integer(line),
        _ => Err(RuntimeError::type_error(format!("{} indices must be integers, not {}",
                                                  container.type_name(),
                                                  key.type_name()),
                                          line)),
    }
}

fn out_of_range(container: &Value, line: usize) -> RuntimeError {
    RuntimeError::IndexError { details: format!("{} index out of range", container.type_name()),
                               line }
}

/// Reads `container[key]`.
///
/// # Errors
/// - `IndexError` for a sequence index out of range.
/// - `KeyError` for a missing dict key.
/// - `TypeError` for a non-integer sequence index or a value that is not
///   subscriptable.
pub fn get_item(container: &Value, key: &Value, line: usize) -> EvalResult<Value> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            normalize_index(sequence_index(container, key, line)?, items.len()).map(|i| items[i].clone())
                                                                               .ok_or_else(|| out_of_range(container, line))
        },
        Value::Tuple(items) => {
            normalize_index(sequence_index(container, key, line)?, items.len()).map(|i| items[i].clone())
                                                                               .ok_or_else(|| out_of_range(container, line))
        },
        Value::Str(s) => {
            let index = sequence_index(container, key, line)?;
            let count = s.chars().count();
            normalize_index(index, count).and_then(|i| s.chars().nth(i))
                                         .map(|c| Value::from(c.to_string()))
                                         .ok_or_else(|| RuntimeError::IndexError { details: "string index out of range".to_string(),
                                                                                   line })
        },
        Value::Dict(entries) => {
            let hash = HashKey::from_value(key, line)?;
            entries.borrow()
                   .get(&hash)
                   .map(|(_, value)| value.clone())
                   .ok_or_else(|| RuntimeError::KeyError { key: key.repr(),
                                                           line })
        },
        _ => Err(RuntimeError::type_error(format!("'{}' object is not subscriptable",
                                                  container.type_name()),
                                          line)),
    }
}

/// Reads `container[lower:upper]` from a list, tuple or string.
///
/// Missing or `None` bounds default to the start and end.
///
/// # Errors
/// Returns a `TypeError` for non-integer bounds or unsliceable values.
///
/// # Example
/// ```
/// use pyrite::interpreter::{evaluator::subscript::get_slice, value::core::Value};
///
/// let s = Value::from("hello");
/// let v = get_slice(&s, Some(&Value::Integer(1)), Some(&Value::Integer(-1)), 1).unwrap();
/// assert_eq!(v, Value::from("ell"));
/// ```
pub fn get_slice(container: &Value,
                 lower: Option<&Value>,
                 upper: Option<&Value>,
                 line: usize)
                 -> EvalResult<Value> {
    let bounds = |len: usize| -> EvalResult<(usize, usize)> {
        let start = clamp_bound(lower, 0, len, line)?;
        let end = clamp_bound(upper, len, len, line)?;
        Ok((start, end.max(start)))
    };
    match container {
        Value::List(items) => {
            let items = items.borrow();
            let (start, end) = bounds(items.len())?;
            Ok(Value::list(items[start..end].to_vec()))
        },
        Value::Tuple(items) => {
            let (start, end) = bounds(items.len())?;
            Ok(Value::tuple(items[start..end].to_vec()))
        },
        Value::Str(s) => {
            let (start, end) = bounds(s.chars().count())?;
            Ok(Value::from(s.chars().skip(start).take(end - start).collect::<String>()))
        },
        _ => Err(RuntimeError::type_error(format!("'{}' object is not subscriptable",
                                                  container.type_name()),
                                          line)),
    }
}

/// Performs `container[key] = value`.
///
/// # Errors
/// - `IndexError` for a list index out of range.
/// - `TypeError` for immutable or non-subscriptable containers and for
///   unhashable dict keys.
pub fn set_item(container: &Value, key: Value, value: Value, line: usize) -> EvalResult<()> {
    match container {
        Value::List(items) => {
            let index = sequence_index(container, &key, line)?;
            let mut items = items.borrow_mut();
            let len = items.len();
            let slot = normalize_index(index, len).and_then(|i| items.get_mut(i))
                                                  .ok_or_else(|| RuntimeError::IndexError { details: "list assignment index out of range".to_string(),
                                                                                            line })?;
            *slot = value;
            Ok(())
        },
        Value::Dict(entries) => {
            let hash = HashKey::from_value(&key, line)?;
            let mut entries = entries.borrow_mut();
            match entries.get_mut(&hash) {
                Some(entry) => entry.1 = value,
                None => {
                    entries.insert(hash, (key, value));
                },
            }
            Ok(())
        },
        _ => Err(RuntimeError::type_error(format!("'{}' object does not support item assignment",
                                                  container.type_name()),
                                          line)),
    }
}
