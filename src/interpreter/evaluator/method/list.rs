use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{builtin::sequence::sort_values, core::EvalResult, subscript::normalize_index},
        value::core::Value,
    },
    util::num::usize_to_i64_checked,
};

fn items(receiver: &Value) -> &Rc<RefCell<Vec<Value>>> {
    match receiver {
        Value::List(items) => items,
        _ => unreachable!("list methods are only bound to lists"),
    }
}

/// `xs.append(x)`
pub fn append(receiver: &Value, args: &[Value], _: usize) -> EvalResult<Value> {
    items(receiver).borrow_mut().push(args[0].clone());
    Ok(Value::None)
}

/// `xs.extend(iterable)`
pub fn extend(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let extra = args[0].iterate(line)?;
    items(receiver).borrow_mut().extend(extra);
    Ok(Value::None)
}

/// `xs.pop([i])`: removes and returns the item at `i`, the last one by
/// default.
pub fn pop(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let mut items = items(receiver).borrow_mut();
    if items.is_empty() {
        return Err(RuntimeError::IndexError { details: "pop from empty list".to_string(),
                                              line });
    }
    let index = match args.first() {
        Some(index) => normalize_index(index.as_integer(line)?, items.len()).ok_or_else(|| {
                           RuntimeError::IndexError { details: "pop index out of range".to_string(),
                                                      line }
                       })?,
        None => items.len() - 1,
    };
    Ok(items.remove(index))
}

/// `xs.insert(i, x)`: out-of-range positions insert at the nearest end.
pub fn insert(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let position = args[0].as_integer(line)?;
    let mut items = items(receiver).borrow_mut();
    let len = usize_to_i64_checked(items.len(), line)?;
    let position = if position < 0 { (position + len).max(0) } else { position.min(len) };
    items.insert(usize::try_from(position).unwrap_or(0), args[1].clone());
    Ok(Value::None)
}

/// `xs.index(x)`: position of the first item equal to `x`.
pub fn index(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let position = items(receiver).borrow().iter().position(|v| *v == args[0]);
    match position {
        Some(position) => usize_to_i64_checked(position, line).map(Value::Integer),
        None => Err(RuntimeError::value_error(format!("{} is not in list", args[0].repr()), line)),
    }
}

/// `xs.count(x)`
pub fn count(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let count = items(receiver).borrow().iter().filter(|v| **v == args[0]).count();
    usize_to_i64_checked(count, line).map(Value::Integer)
}

/// `xs.reverse()`
pub fn reverse(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    items(receiver).borrow_mut().reverse();
    Ok(Value::None)
}

/// `xs.sort()`: sorts in place; the list is left unchanged if two items
/// cannot be compared.
pub fn sort(receiver: &Value, _: &[Value], line: usize) -> EvalResult<Value> {
    let mut sorted = items(receiver).borrow().clone();
    sort_values(&mut sorted, line)?;
    *items(receiver).borrow_mut() = sorted;
    Ok(Value::None)
}

/// `xs.clear()`
pub fn clear(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    items(receiver).borrow_mut().clear();
    Ok(Value::None)
}
