use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::{DictEntries, Value},
            key::HashKey,
        },
    },
};

fn entries(receiver: &Value) -> &Rc<RefCell<DictEntries>> {
    match receiver {
        Value::Dict(entries) => entries,
        _ => unreachable!("dict methods are only bound to dicts"),
    }
}

/// `d.keys()`: a list of the keys in insertion order.
pub fn keys(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::list(entries(receiver).borrow().values().map(|(k, _)| k.clone()).collect()))
}

/// `d.values()`
pub fn values(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::list(entries(receiver).borrow().values().map(|(_, v)| v.clone()).collect()))
}

/// `d.items()`: a list of `(key, value)` tuples.
pub fn items(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::list(entries(receiver).borrow()
                                    .values()
                                    .map(|(k, v)| Value::tuple(vec![k.clone(), v.clone()]))
                                    .collect()))
}

/// `d.get(key[, default])`
pub fn get(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let hash = HashKey::from_value(&args[0], line)?;
    Ok(entries(receiver).borrow()
                        .get(&hash)
                        .map(|(_, v)| v.clone())
                        .or_else(|| args.get(1).cloned())
                        .unwrap_or(Value::None))
}

/// `d.pop(key[, default])`: removes `key`, keeping the order of the other
/// entries.
pub fn pop(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let hash = HashKey::from_value(&args[0], line)?;
    let removed = entries(receiver).borrow_mut().shift_remove(&hash);
    match (removed, args.get(1)) {
        (Some((_, value)), _) => Ok(value),
        (None, Some(default)) => Ok(default.clone()),
        (None, None) => Err(RuntimeError::KeyError { key: args[0].repr(),
                                                     line }),
    }
}

/// `d.update(other)`: merges a dict or a sequence of pairs; later keys win.
pub fn update(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let pairs = pairs(&args[0], line)?;
    let mut entries = entries(receiver).borrow_mut();
    for (key, value) in pairs {
        let hash = HashKey::from_value(&key, line)?;
        match entries.get_mut(&hash) {
            Some(entry) => entry.1 = value,
            None => {
                entries.insert(hash, (key, value));
            },
        }
    }
    Ok(Value::None)
}

/// Collects key/value pairs from a dict or an iterable of two-item
/// sequences.
///
/// # Errors
/// Returns a `TypeError` for non-iterables and a `ValueError` for items that
/// are not pairs.
pub fn pairs(source: &Value, line: usize) -> EvalResult<Vec<(Value, Value)>> {
    if let Value::Dict(entries) = source {
        return Ok(entries.borrow().values().cloned().collect());
    }
    let mut pairs = Vec::new();
    for item in source.iterate(line)? {
        match item.iterate(line)?.as_slice() {
            [key, value] => pairs.push((key.clone(), value.clone())),
            other => {
                return Err(RuntimeError::value_error(format!("dictionary update sequence element has length {}; 2 is required",
                                                             other.len()),
                                                     line));
            },
        }
    }
    Ok(pairs)
}
