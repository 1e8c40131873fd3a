use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Interpreter},
            method,
        },
        value::core::Value,
    },
    util::num::f64_to_i64_checked,
};

/// `bool([x])`: the truthiness of `x`, `False` without an argument.
pub fn bool(_: &mut Interpreter, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
}

/// `int([x])`: truncates floats and parses decimal strings.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::convert::int},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// assert_eq!(int(&mut interpreter, &[Value::Real(-2.7)], 1).unwrap(), Value::Integer(-2));
/// assert_eq!(int(&mut interpreter, &[Value::from(" 42 ")], 1).unwrap(), Value::Integer(42));
/// assert!(int(&mut interpreter, &[Value::from("4x")], 1).is_err());
/// ```
pub fn int(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let Some(arg) = args.first() else {
        return Ok(Value::Integer(0));
    };
    match arg {
        Value::Integer(_) | Value::Bool(_) => Ok(Value::Integer(arg.as_integer(line)?)),
        Value::Real(r) => f64_to_i64_checked(r.trunc(), line).map(Value::Integer),
        Value::Str(s) => s.trim()
                          .parse::<i64>()
                          .map(Value::Integer)
                          .map_err(|_| {
                              RuntimeError::value_error(format!("invalid literal for int() with base 10: {}",
                                                                arg.repr()),
                                                        line)
                          }),
        _ => Err(RuntimeError::type_error(format!("int() argument must be a string or a number, not '{}'",
                                                  arg.type_name()),
                                          line)),
    }
}

/// `float([x])`: converts numbers and parses strings, including `inf` and
/// `nan`.
pub fn float(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let Some(arg) = args.first() else {
        return Ok(Value::Real(0.0));
    };
    match arg {
        Value::Integer(_) | Value::Bool(_) | Value::Real(_) => Ok(Value::Real(arg.as_real(line)?)),
        Value::Str(s) => s.trim()
                          .parse::<f64>()
                          .map(Value::Real)
                          .map_err(|_| {
                              RuntimeError::value_error(format!("could not convert string to float: {}",
                                                                arg.repr()),
                                                        line)
                          }),
        _ => Err(RuntimeError::type_error(format!("float() argument must be a string or a number, not '{}'",
                                                  arg.type_name()),
                                          line)),
    }
}

/// `str([x])`
pub fn str(_: &mut Interpreter, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(args.first().map_or_else(|| Value::from(""), |v| Value::from(v.to_string())))
}

/// `repr(x)`
pub fn repr(_: &mut Interpreter, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::from(args[0].repr()))
}

/// `chr(i)`: the character with code point `i`.
pub fn chr(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let code = args[0].as_integer(line)?;
    u32::try_from(code).ok()
                       .and_then(char::from_u32)
                       .map(|c| Value::from(c.to_string()))
                       .ok_or_else(|| RuntimeError::value_error("chr() arg not in range(0x110000)", line))
}

/// `ord(c)`: the code point of a one-character string.
pub fn ord(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let Value::Str(s) = &args[0] else {
        return Err(RuntimeError::type_error(format!("ord() expected string of length 1, but {} found",
                                                    args[0].type_name()),
                                            line));
    };
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Integer(i64::from(u32::from(c)))),
        _ => Err(RuntimeError::type_error(format!("ord() expected a character, but string of length {} found",
                                                  s.chars().count()),
                                          line)),
    }
}

/// `type(x)`: the type name as a string, such as `'int'`.
pub fn type_name(_: &mut Interpreter, args: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::from(args[0].type_name()))
}

/// `list([iterable])`
pub fn list(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::list(items(args, line)?))
}

/// `tuple([iterable])`
pub fn tuple(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::tuple(items(args, line)?))
}

/// `set([iterable])`
pub fn set(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    Value::set(items(args, line)?, line)
}

/// `dict([source])`: copies a dict or collects key/value pairs.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::convert::dict},
///     value::core::Value,
/// };
///
/// let mut interpreter = Interpreter::new();
/// let pairs = Value::list(vec![Value::tuple(vec![Value::from("a"), Value::Integer(1)])]);
///
/// let d = dict(&mut interpreter, &[pairs], 1).unwrap();
/// assert_eq!(d.repr(), "{'a': 1}");
/// ```
pub fn dict(_: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let pairs = match args.first() {
        Some(source) => method::dict::pairs(source, line)?,
        None => Vec::new(),
    };
    Value::dict(pairs, line)
}

fn items(args: &[Value], line: usize) -> EvalResult<Vec<Value>> {
    args.first().map_or_else(|| Ok(Vec::new()), |v| v.iterate(line))
}
