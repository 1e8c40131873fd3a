use std::{cell::RefCell, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            core::{SetEntries, Value},
            key::HashKey,
        },
    },
};

fn entries(receiver: &Value) -> &Rc<RefCell<SetEntries>> {
    match receiver {
        Value::Set(entries) => entries,
        _ => unreachable!("set methods are only bound to sets"),
    }
}

/// `s.add(x)`
pub fn add(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let hash = HashKey::from_value(&args[0], line)?;
    entries(receiver).borrow_mut()
                     .entry(hash)
                     .or_insert_with(|| args[0].clone());
    Ok(Value::None)
}

/// `s.remove(x)`: faults if `x` is absent.
pub fn remove(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let hash = HashKey::from_value(&args[0], line)?;
    match entries(receiver).borrow_mut().shift_remove(&hash) {
        Some(_) => Ok(Value::None),
        None => Err(RuntimeError::KeyError { key: args[0].repr(),
                                             line }),
    }
}

/// `s.discard(x)`: like `remove`, but absent members are ignored.
pub fn discard(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let hash = HashKey::from_value(&args[0], line)?;
    entries(receiver).borrow_mut().shift_remove(&hash);
    Ok(Value::None)
}
