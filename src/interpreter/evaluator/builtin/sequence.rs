use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{arithmetic::binary_op, comparison::order, core::{EvalResult, Interpreter}},
        value::core::{MAX_SEQUENCE_LEN, Value},
    },
    util::num::usize_to_i64_checked,
};

/// `len(x)`
pub fn len(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let len = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(entries) => entries.borrow().len(),
        Value::Set(entries) => entries.borrow().len(),
        other => {
            return Err(RuntimeError::type_error(format!("object of type '{}' has no len()",
                                                        other.type_name()),
                                                line));
        },
    };
    usize_to_i64_checked(len, line).map(Value::Integer)
}

/// `range(stop)`, `range(start, stop[, step])`.
///
/// Produces a list.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::sequence::range},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// let args = [Value::Integer(5), Value::Integer(0), Value::Integer(-2)];
///
/// let v = range(&mut interpreter, &args, 1).unwrap();
/// assert_eq!(v.repr(), "[5, 3, 1]");
/// ```
pub fn range(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let bounds = args.iter()
                     .map(|v| v.as_integer(line))
                     .collect::<EvalResult<Vec<_>>>()?;
    let (start, stop, step) = match bounds.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => unreachable!("arity is checked before the call"),
    };
    if step == 0 {
        return Err(RuntimeError::value_error("range() arg 3 must not be zero", line));
    }

    let span = if step > 0 { i128::from(stop) - i128::from(start) } else { i128::from(start) - i128::from(stop) };
    let count = if span <= 0 { 0 } else { (span - 1) / i128::from(step).abs() + 1 };
    if usize::try_from(count).map_or(true, |count| count > MAX_SEQUENCE_LEN) {
        return Err(RuntimeError::OutOfMemory { details: format!("range() of {count} elements is too large"),
                                               line });
    }

    let mut items = Vec::new();
    let mut current = start;
    while (step > 0 && current < stop) || (step < 0 && current > stop) {
        items.push(Value::Integer(current));
        match current.checked_add(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(Value::list(items))
}

/// `enumerate(iterable[, start])`: a list of `(index, item)` tuples.
pub fn enumerate(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let start = match args.get(1) {
        Some(start) => start.as_integer(line)?,
        None => 0,
    };
    let mut index = start;
    let mut pairs = Vec::new();
    for item in args[0].iterate(line)? {
        pairs.push(Value::tuple(vec![Value::Integer(index), item]));
        index = index.checked_add(1)
                     .ok_or_else(|| RuntimeError::ArithmeticError { details: "integer overflow".to_string(),
                                                                    line })?;
    }
    Ok(Value::list(pairs))
}

/// `zip(*iterables)`: a list of tuples, as long as the shortest input.
pub fn zip(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let columns = args.iter()
                      .map(|v| v.iterate(line))
                      .collect::<EvalResult<Vec<_>>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let zipped = (0..rows).map(|i| Value::tuple(columns.iter().map(|c| c[i].clone()).collect()))
                          .collect();
    Ok(Value::list(zipped))
}

/// `reversed(sequence)`: a reversed list.
pub fn reversed(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let mut items = args[0].iterate(line)?;
    items.reverse();
    Ok(Value::list(items))
}

/// `sorted(iterable)`: a new ascending list.
pub fn sorted(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let mut items = args[0].iterate(line)?;
    sort_values(&mut items, line)?;
    Ok(Value::list(items))
}

/// Sorts `items` in place, stopping at the first pair that cannot be
/// ordered.
///
/// # Errors
/// Returns a `TypeError` if two elements cannot be compared.
pub fn sort_values(items: &mut [Value], line: usize) -> EvalResult<()> {
    let mut failure = None;
    items.sort_by(|a, b| match order(a, b, line) {
             Ok(ordering) => ordering,
             Err(e) => {
                 failure.get_or_insert(e);
                 Ordering::Equal
             },
         });
    failure.map_or(Ok(()), Err)
}

/// `sum(iterable[, start])`
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::sequence::sum},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// let xs = Value::list(vec![Value::Integer(1), Value::Real(0.5)]);
///
/// assert_eq!(sum(&mut interpreter, &[xs], 1).unwrap(), Value::Real(1.5));
/// ```
pub fn sum(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let mut total = args.get(1).cloned().unwrap_or(Value::Integer(0));
    if matches!(total, Value::Str(_)) {
        return Err(RuntimeError::type_error("sum() can't sum strings", line));
    }
    for item in args[0].iterate(line)? {
        total = binary_op(BinaryOperator::Add, &total, &item, line)?;
    }
    Ok(total)
}

/// `min`/`max` over a single iterable or over several arguments.
///
/// Ties keep the first candidate.
pub fn extremum(name: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    let candidates = match args {
        [iterable] => iterable.iterate(line)?,
        _ => args.to_vec(),
    };
    let wanted = if name == "max" { Ordering::Greater } else { Ordering::Less };

    let mut candidates = candidates.into_iter();
    let mut best = candidates.next()
                             .ok_or_else(|| RuntimeError::value_error(format!("{name}() arg is an empty sequence"),
                                                                      line))?;
    for candidate in candidates {
        if order(&candidate, &best, line)? == wanted {
            best = candidate;
        }
    }
    Ok(best)
}
