use std::rc::Rc;

use ordered_float::OrderedFloat;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, address},
    },
};

/// The hashable projection of a value, used for dict keys and set members.
///
/// Numbers that compare equal map to the same key: `True`, `1` and `1.0` are
/// all `Integer(1)`. Mutable containers have no key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    /// `None`.
    None,
    /// Integers, booleans and integral floats.
    Integer(i64),
    /// Non-integral floats.
    Real(OrderedFloat<f64>),
    /// Strings.
    Str(Rc<str>),
    /// Tuples of hashable values.
    Tuple(Vec<Self>),
    /// Callables, compared by identity.
    Callable(usize),
}

impl HashKey {
    /// Computes the key of a value.
    ///
    /// # Errors
    /// Returns a `TypeError` for lists, dicts, sets and for tuples that
    /// contain one of them.
    ///
    /// # Example
    /// ```
    /// use pyrite::interpreter::value::{core::Value, key::HashKey};
    ///
    /// let one = HashKey::from_value(&Value::Integer(1), 1).unwrap();
    /// assert_eq!(HashKey::from_value(&Value::Bool(true), 1).unwrap(), one);
    /// assert_eq!(HashKey::from_value(&Value::Real(1.0), 1).unwrap(), one);
    /// assert!(HashKey::from_value(&Value::list(vec![]), 1).is_err());
    /// ```
    pub fn from_value(value: &Value, line: usize) -> EvalResult<Self> {
        match value {
            Value::None => Ok(Self::None),
            Value::Bool(b) => Ok(Self::Integer(i64::from(*b))),
            Value::Integer(n) => Ok(Self::Integer(*n)),
            Value::Real(r) => Ok(real_key(*r)),
            Value::Str(s) => Ok(Self::Str(Rc::clone(s))),
            Value::Tuple(items) => items.iter()
                                        .map(|item| Self::from_value(item, line))
                                        .collect::<EvalResult<Vec<_>>>()
                                        .map(Self::Tuple),
            Value::Function(f) => Ok(Self::Callable(address(f))),
            Value::Builtin(b) => Ok(Self::Callable(std::ptr::from_ref(*b).cast::<()>() as usize)),
            Value::List(_) | Value::Dict(_) | Value::Set(_) | Value::BoundMethod(_) => {
                Err(RuntimeError::type_error(format!("unhashable type: '{}'", value.type_name()),
                                             line))
            },
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn real_key(r: f64) -> HashKey {
    // Range check keeps the cast exact: every integral f64 in this range is
    // an i64.
    if r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64 {
        HashKey::Integer(r as i64)
    } else {
        HashKey::Real(OrderedFloat(r))
    }
}
