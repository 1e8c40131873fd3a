use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    util::num::usize_to_i64_checked,
};

fn text(receiver: &Value) -> &str {
    match receiver {
        Value::Str(s) => s.as_ref(),
        _ => unreachable!("str methods are only bound to strings"),
    }
}

fn str_argument<'a>(method: &str, value: &'a Value, line: usize) -> EvalResult<&'a str> {
    match value {
        Value::Str(s) => Ok(s.as_ref()),
        other => Err(RuntimeError::type_error(format!("{method}() argument must be str, not {}",
                                                      other.type_name()),
                                              line)),
    }
}

/// `s.upper()`
pub fn upper(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::from(text(receiver).to_uppercase()))
}

/// `s.lower()`
pub fn lower(receiver: &Value, _: &[Value], _: usize) -> EvalResult<Value> {
    Ok(Value::from(text(receiver).to_lowercase()))
}

/// `s.strip([chars])`: strips whitespace, or any of `chars`.
pub fn strip(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let s = text(receiver);
    let stripped = match args.first() {
        None | Some(Value::None) => s.trim(),
        Some(chars) => {
            let chars = str_argument("strip", chars, line)?;
            s.trim_matches(|c: char| chars.contains(c))
        },
    };
    Ok(Value::from(stripped))
}

/// `s.split([sep])`: splits on runs of whitespace, or on every `sep`.
///
/// # Example
/// ```
/// use pyrite::interpreter::{evaluator::method::string::split, value::core::Value};
///
/// let parts = split(&Value::from(" a  b "), &[], 1).unwrap();
/// assert_eq!(parts.repr(), "['a', 'b']");
///
/// let parts = split(&Value::from("a,,b"), &[Value::from(",")], 1).unwrap();
/// assert_eq!(parts.repr(), "['a', '', 'b']");
/// ```
pub fn split(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let s = text(receiver);
    let parts: Vec<Value> = match args.first() {
        None | Some(Value::None) => s.split_whitespace().map(Value::from).collect(),
        Some(separator) => {
            let separator = str_argument("split", separator, line)?;
            if separator.is_empty() {
                return Err(RuntimeError::value_error("empty separator", line));
            }
            s.split(separator).map(Value::from).collect()
        },
    };
    Ok(Value::list(parts))
}

/// `sep.join(iterable)`: every item must be a string.
pub fn join(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let mut parts = Vec::new();
    for (i, item) in args[0].iterate(line)?.iter().enumerate() {
        match item {
            Value::Str(s) => parts.push(s.to_string()),
            other => {
                return Err(RuntimeError::type_error(format!("sequence item {i}: expected str instance, {} found",
                                                            other.type_name()),
                                                    line));
            },
        }
    }
    Ok(Value::from(parts.join(text(receiver))))
}

/// `s.replace(old, new)`
pub fn replace(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let old = str_argument("replace", &args[0], line)?;
    let new = str_argument("replace", &args[1], line)?;
    Ok(Value::from(text(receiver).replace(old, new)))
}

/// `s.startswith(prefix)`
pub fn startswith(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let prefix = str_argument("startswith", &args[0], line)?;
    Ok(Value::Bool(text(receiver).starts_with(prefix)))
}

/// `s.endswith(suffix)`
pub fn endswith(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let suffix = str_argument("endswith", &args[0], line)?;
    Ok(Value::Bool(text(receiver).ends_with(suffix)))
}

/// `s.find(sub)`: character position of the first occurrence, or `-1`.
pub fn find(receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
    let s = text(receiver);
    let needle = str_argument("find", &args[0], line)?;
    match s.find(needle) {
        Some(byte) => usize_to_i64_checked(s[..byte].chars().count(), line).map(Value::Integer),
        None => Ok(Value::Integer(-1)),
    }
}
