use std::{cell::RefCell, fmt::Write as _, rc::Rc};

use indexmap::IndexMap;

use crate::{
    ast::{FunctionDef, LiteralValue},
    error::RuntimeError,
    interpreter::{
        evaluator::{builtin::BuiltinDef, core::EvalResult, method::MethodDef},
        scope::Scope,
        value::key::HashKey,
    },
    util::num::int_to_real,
};

/// Insertion-ordered dict storage. Each entry keeps the original key value
/// next to the mapped value so that `{True: 1}` still prints `True`.
pub type DictEntries = IndexMap<HashKey, (Value, Value)>;

/// Insertion-ordered set storage.
pub type SetEntries = IndexMap<HashKey, Value>;

/// Most elements a list, tuple or `range` result may hold, and most bytes a
/// string built by `*` or `+` may hold.
pub const MAX_SEQUENCE_LEN: usize = 10_000_000;

/// Represents a runtime value in the interpreter.
///
/// Scalars are stored inline. Lists, dicts and sets are shared and mutable:
/// cloning a `Value` clones the handle, so mutations through one binding are
/// visible through every other. Tuples and strings are shared but immutable.
#[derive(Clone)]
pub enum Value {
    /// `None`.
    None,
    /// A boolean value (`True` or `False`).
    Bool(bool),
    /// A integer value (64 bit integer).
    Integer(i64),
    /// A numeric value (double precision floating-point).
    Real(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// A mutable list.
    List(Rc<RefCell<Vec<Self>>>),
    /// An immutable tuple.
    Tuple(Rc<Vec<Self>>),
    /// A mutable mapping.
    Dict(Rc<RefCell<DictEntries>>),
    /// A mutable set.
    Set(Rc<RefCell<SetEntries>>),
    /// A user-defined function together with the scope it was defined in.
    Function(Rc<Function>),
    /// A built-in function.
    Builtin(&'static BuiltinDef),
    /// A built-in method bound to its receiver, such as `xs.append`.
    BoundMethod(Rc<BoundMethod>),
}

/// A user-defined function value.
pub struct Function {
    /// The shared definition.
    pub def:     Rc<FunctionDef>,
    /// The scope active where the `def` statement ran.
    pub closure: Scope,
}

/// A method looked up on a value, waiting to be called.
pub struct BoundMethod {
    /// The value the method was looked up on.
    pub receiver: Value,
    /// The method implementation.
    pub method:   &'static MethodDef,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::list(v)
    }
}

impl From<&LiteralValue> for Value {
    fn from(literal: &LiteralValue) -> Self {
        match literal {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Real(r) => Self::Real(*r),
            LiteralValue::Str(s) => Self::from(s.as_str()),
            LiteralValue::Bool(b) => Self::Bool(*b),
            LiteralValue::None => Self::None,
        }
    }
}

impl Value {
    /// Creates a list value.
    #[must_use]
    pub fn list(items: Vec<Self>) -> Self {
        Self::List(Rc::new(RefCell::new(items)))
    }

    /// Creates a tuple value.
    #[must_use]
    pub fn tuple(items: Vec<Self>) -> Self {
        Self::Tuple(Rc::new(items))
    }

    /// Creates a dict value from key/value pairs; later duplicates win.
    ///
    /// # Errors
    /// Returns a `TypeError` if a key is unhashable.
    pub fn dict(pairs: impl IntoIterator<Item = (Self, Self)>, line: usize) -> EvalResult<Self> {
        let mut entries = DictEntries::new();
        for (key, value) in pairs {
            let hash = HashKey::from_value(&key, line)?;
            match entries.get_mut(&hash) {
                Some(entry) => entry.1 = value,
                None => {
                    entries.insert(hash, (key, value));
                },
            }
        }
        Ok(Self::Dict(Rc::new(RefCell::new(entries))))
    }

    /// Creates a set value; duplicates keep their first occurrence.
    ///
    /// # Errors
    /// Returns a `TypeError` if a member is unhashable.
    pub fn set(items: impl IntoIterator<Item = Self>, line: usize) -> EvalResult<Self> {
        let mut entries = SetEntries::new();
        for item in items {
            entries.entry(HashKey::from_value(&item, line)?).or_insert(item);
        }
        Ok(Self::Set(Rc::new(RefCell::new(entries))))
    }

    /// The name of the value's type, as reported by `type()` and in error
    /// messages.
    ///
    /// # Example
    /// ```
    /// use pyrite::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(3).type_name(), "int");
    /// assert_eq!(Value::None.type_name(), "NoneType");
    /// ```
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "int",
            Self::Real(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Dict(_) => "dict",
            Self::Set(_) => "set",
            Self::Function(_) => "function",
            Self::Builtin(_) | Self::BoundMethod(_) => "builtin_function_or_method",
        }
    }

    /// Truthiness: zero, empty and `None` are false, everything else is
    /// true.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Integer(n) => *n != 0,
            Self::Real(r) => *r != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(items) => !items.borrow().is_empty(),
            Self::Tuple(items) => !items.is_empty(),
            Self::Dict(entries) => !entries.borrow().is_empty(),
            Self::Set(entries) => !entries.borrow().is_empty(),
            Self::Function(_) | Self::Builtin(_) | Self::BoundMethod(_) => true,
        }
    }

    /// Converts an integer or boolean to `i64`.
    ///
    /// # Errors
    /// Returns a `TypeError` for every other type.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            Self::Bool(b) => Ok(i64::from(*b)),
            _ => Err(RuntimeError::type_error(format!("'{}' object cannot be interpreted as an integer",
                                                      self.type_name()),
                                              line)),
        }
    }

    /// Converts a number to `f64`.
    ///
    /// # Errors
    /// Returns a `TypeError` for non-numbers.
    pub fn as_real(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Real(r) => Ok(*r),
            Self::Integer(_) | Self::Bool(_) => self.as_integer(line).map(int_to_real),
            _ => Err(RuntimeError::type_error(format!("must be real number, not {}", self.type_name()),
                                              line)),
        }
    }

    /// Returns `true` for `int`, `float` and `bool`.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Real(_) | Self::Bool(_))
    }

    /// Collects the elements of an iterable value.
    ///
    /// Strings yield one-character strings, dicts yield their keys.
    ///
    /// # Errors
    /// Returns a `TypeError` if the value is not iterable.
    pub fn iterate(&self, line: usize) -> EvalResult<Vec<Self>> {
        match self {
            Self::List(items) => Ok(items.borrow().clone()),
            Self::Tuple(items) => Ok(items.to_vec()),
            Self::Str(s) => Ok(s.chars().map(|c| Self::from(c.to_string())).collect()),
            Self::Dict(entries) => Ok(entries.borrow().values().map(|(k, _)| k.clone()).collect()),
            Self::Set(entries) => Ok(entries.borrow().values().cloned().collect()),
            _ => Err(RuntimeError::type_error(format!("'{}' object is not iterable", self.type_name()),
                                              line)),
        }
    }

    /// Identity comparison, as used by `is`.
    ///
    /// Shared containers and functions are identical when they are the same
    /// object; scalars when they have the same type and value.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Real(a), Self::Real(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => Rc::ptr_eq(a, b) || a == b,
            (Self::List(a), Self::List(b)) => Rc::ptr_eq(a, b),
            (Self::Tuple(a), Self::Tuple(b)) => Rc::ptr_eq(a, b),
            (Self::Dict(a), Self::Dict(b)) => Rc::ptr_eq(a, b),
            (Self::Set(a), Self::Set(b)) => Rc::ptr_eq(a, b),
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => std::ptr::eq(*a, *b),
            (Self::BoundMethod(a), Self::BoundMethod(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The printable representation, as produced by `repr()` and echoed by
    /// the interactive prompt.
    ///
    /// # Example
    /// ```
    /// use pyrite::interpreter::value::core::Value;
    ///
    /// let v = Value::list(vec![Value::from("a"), Value::Real(2.0), Value::None]);
    /// assert_eq!(v.repr(), "['a', 2.0, None]");
    /// assert_eq!(Value::from("a").to_string(), "a");
    /// ```
    #[must_use]
    pub fn repr(&self) -> String {
        let mut out = String::new();
        self.write_repr(&mut out, &mut Vec::new());
        out
    }

    /// `active` holds the containers currently being printed; meeting one of
    /// them again prints `[...]` or `{...}` instead of recursing forever.
    fn write_repr(&self, out: &mut String, active: &mut Vec<usize>) {
        match self {
            Self::Str(s) => out.push_str(&quote(s)),
            Self::List(items) => {
                let id = address(items);
                if active.contains(&id) {
                    out.push_str("[...]");
                    return;
                }
                active.push(id);
                write_sequence(out, "[", &items.borrow(), "]", active);
                active.pop();
            },
            Self::Tuple(items) if items.len() == 1 => write_sequence(out, "(", items, ",)", active),
            Self::Tuple(items) => write_sequence(out, "(", items, ")", active),
            Self::Dict(entries) => {
                let id = address(entries);
                if active.contains(&id) {
                    out.push_str("{...}");
                    return;
                }
                active.push(id);
                out.push('{');
                for (i, (key, value)) in entries.borrow().values().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    key.write_repr(out, active);
                    out.push_str(": ");
                    value.write_repr(out, active);
                }
                out.push('}');
                active.pop();
            },
            Self::Set(entries) if entries.borrow().is_empty() => out.push_str("set()"),
            Self::Set(entries) => {
                let members: Vec<Self> = entries.borrow().values().cloned().collect();
                write_sequence(out, "{", &members, "}", active);
            },
            _ => {
                let _ = write!(out, "{self}");
            },
        }
    }

    /// Structural equality. `active` holds the pairs of containers already
    /// being compared; a pair met again is taken as equal, so
    /// self-containing lists and dicts compare without recursing forever.
    fn equals(&self, other: &Self, active: &mut Vec<(usize, usize)>) -> bool {
        match (self, other) {
            (Self::Integer(_) | Self::Bool(_), Self::Integer(_) | Self::Bool(_)) => {
                self.as_integer(0).ok() == other.as_integer(0).ok()
            },
            (Self::Real(a), Self::Real(b)) => a == b,
            (Self::Real(r), Self::Integer(_) | Self::Bool(_))
            | (Self::Integer(_) | Self::Bool(_), Self::Real(r)) => {
                let n = if let Self::Real(_) = self { other } else { self };
                n.as_integer(0).is_ok_and(|n| int_equals_real(n, *r))
            },
            (Self::None, Self::None) => true,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (address(a), address(b));
                if active.contains(&pair) {
                    return true;
                }
                active.push(pair);
                let equal = sequences_equal(&a.borrow(), &b.borrow(), active);
                active.pop();
                equal
            },
            (Self::Tuple(a), Self::Tuple(b)) => Rc::ptr_eq(a, b) || sequences_equal(a, b, active),
            (Self::Dict(a), Self::Dict(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let pair = (address(a), address(b));
                if active.contains(&pair) {
                    return true;
                }
                active.push(pair);
                let (x, y) = (a.borrow(), b.borrow());
                let equal = x.len() == y.len()
                            && x.iter().all(|(key, (_, value))| {
                                           y.get(key).is_some_and(|(_, other)| value.equals(other, active))
                                       });
                active.pop();
                equal
            },
            (Self::Set(a), Self::Set(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len() && a.keys().all(|key| b.contains_key(key))
            },
            _ => self.is_identical(other),
        }
    }
}

/// The address of a shared container, used to recognise it again.
pub(crate) fn address<T>(rc: &Rc<T>) -> usize {
    Rc::as_ptr(rc).cast::<()>() as usize
}

fn sequences_equal(a: &[Value], b: &[Value], active: &mut Vec<(usize, usize)>) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equals(y, active))
}

fn write_sequence(out: &mut String, open: &str, items: &[Value], close: &str, active: &mut Vec<usize>) {
    out.push_str(open);
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        item.write_repr(out, active);
    }
    out.push_str(close);
}

/// Quotes a string the way `repr` does: single quotes unless the text
/// contains a single quote and no double quote.
fn quote(s: &str) -> String {
    let delimiter = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delimiter);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == delimiter => {
                out.push('\\');
                out.push(c);
            },
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", u32::from(c));
            },
            c => out.push(c),
        }
    }
    out.push(delimiter);
    out
}

/// Formats a float like Python: integral values keep a `.0`, very large and
/// very small magnitudes switch to exponent notation.
///
/// # Example
/// ```
/// use pyrite::interpreter::value::core::format_real;
///
/// assert_eq!(format_real(3.0), "3.0");
/// assert_eq!(format_real(0.1), "0.1");
/// assert_eq!(format_real(1e20), "1e+20");
/// assert_eq!(format_real(-1.5e-7), "-1.5e-07");
/// ```
#[must_use]
pub fn format_real(r: f64) -> String {
    if r.is_nan() {
        return "nan".to_string();
    }
    if r.is_infinite() {
        return if r > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = r.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{r:e}");
        let (mantissa, exponent) = formatted.split_once('e').unwrap_or((&formatted, "0"));
        let exponent: i32 = exponent.parse().unwrap_or(0);
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exponent.abs());
    }
    if r.fract() == 0.0 {
        return format!("{r:.1}");
    }
    format!("{r}")
}

impl std::fmt::Display for Value {
    /// The `str()` form: strings print without quotes, containers print their
    /// elements with `repr`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Real(r) => write!(f, "{}", format_real(*r)),
            Self::Str(s) => write!(f, "{s}"),
            Self::Function(func) => write!(f, "<function {}>", func.def.name),
            Self::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name),
            Self::BoundMethod(bound) => write!(f,
                                               "<built-in method {} of {} object>",
                                               bound.method.name,
                                               bound.receiver.type_name()),
            Self::List(_) | Self::Tuple(_) | Self::Dict(_) | Self::Set(_) => {
                write!(f, "{}", self.repr())
            },
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.repr())
    }
}

impl PartialEq for Value {
    /// Value equality as `==` sees it: numbers compare across `bool`, `int`
    /// and `float`, containers compare element-wise, callables by identity.
    fn eq(&self, other: &Self) -> bool {
        self.equals(other, &mut Vec::new())
    }
}

#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
fn int_equals_real(n: i64, r: f64) -> bool {
    r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64 && r as i64 == n
}
