use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{builtin::Arity, core::EvalResult},
        value::core::{BoundMethod, Value},
    },
};

/// `list` methods.
pub mod list;
/// `dict` methods.
pub mod dict;
/// `set` methods.
pub mod set;
/// `str` methods.
pub mod string;

/// Signature shared by all methods: the receiver, the evaluated arguments
/// and the line number of the call.
pub type MethodFn = fn(&Value, &[Value], usize) -> EvalResult<Value>;

/// Metadata of one method.
pub struct MethodDef {
    /// Type name of the receiver, as reported by `type()`.
    pub receiver: &'static str,
    /// The attribute name.
    pub name:     &'static str,
    /// Accepted argument counts, not counting the receiver.
    pub arity:    Arity,
    func:         MethodFn,
}

impl MethodDef {
    /// Checks the argument count and runs the method on `receiver`.
    ///
    /// # Errors
    /// Returns a `TypeError` when the argument count is not accepted, and
    /// whatever the method itself raises.
    pub fn invoke(&self, receiver: &Value, args: &[Value], line: usize) -> EvalResult<Value> {
        if !self.arity.check(args.len()) {
            return Err(RuntimeError::type_error(format!("{}.{}() takes {} arguments ({} given)",
                                                        self.receiver,
                                                        self.name,
                                                        self.arity,
                                                        args.len()),
                                                line));
        }
        (self.func)(receiver, args, line)
    }
}

macro_rules! methods {
    (
        $(
            $receiver:literal . $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every method reachable through attribute lookup.
        pub static METHOD_TABLE: &[MethodDef] = &[
            $(
                MethodDef { receiver: $receiver, name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

methods! {
    "list"."append"     => { arity: Arity::Exact(1), func: list::append },
    "list"."extend"     => { arity: Arity::Exact(1), func: list::extend },
    "list"."pop"        => { arity: Arity::OneOf(&[0, 1]), func: list::pop },
    "list"."insert"     => { arity: Arity::Exact(2), func: list::insert },
    "list"."index"      => { arity: Arity::Exact(1), func: list::index },
    "list"."count"      => { arity: Arity::Exact(1), func: list::count },
    "list"."reverse"    => { arity: Arity::Exact(0), func: list::reverse },
    "list"."sort"       => { arity: Arity::Exact(0), func: list::sort },
    "list"."clear"      => { arity: Arity::Exact(0), func: list::clear },
    "dict"."keys"       => { arity: Arity::Exact(0), func: dict::keys },
    "dict"."values"     => { arity: Arity::Exact(0), func: dict::values },
    "dict"."items"      => { arity: Arity::Exact(0), func: dict::items },
    "dict"."get"        => { arity: Arity::OneOf(&[1, 2]), func: dict::get },
    "dict"."pop"        => { arity: Arity::OneOf(&[1, 2]), func: dict::pop },
    "dict"."update"     => { arity: Arity::Exact(1), func: dict::update },
    "set"."add"         => { arity: Arity::Exact(1), func: set::add },
    "set"."remove"      => { arity: Arity::Exact(1), func: set::remove },
    "set"."discard"     => { arity: Arity::Exact(1), func: set::discard },
    "str"."upper"       => { arity: Arity::Exact(0), func: string::upper },
    "str"."lower"       => { arity: Arity::Exact(0), func: string::lower },
    "str"."strip"       => { arity: Arity::OneOf(&[0, 1]), func: string::strip },
    "str"."split"       => { arity: Arity::OneOf(&[0, 1]), func: string::split },
    "str"."join"        => { arity: Arity::Exact(1), func: string::join },
    "str"."replace"     => { arity: Arity::Exact(2), func: string::replace },
    "str"."startswith"  => { arity: Arity::Exact(1), func: string::startswith },
    "str"."endswith"    => { arity: Arity::Exact(1), func: string::endswith },
    "str"."find"        => { arity: Arity::Exact(1), func: string::find },
}

/// Resolves `receiver.attr` to a bound method.
///
/// # Errors
/// Returns an `AttributeError` if the receiver's type has no such method.
///
/// # Example
/// ```
/// use pyrite::interpreter::{evaluator::method::bind, value::core::Value};
///
/// let xs = Value::list(vec![]);
/// let append = bind(xs.clone(), "append", 1).unwrap();
/// assert_eq!(append.to_string(), "<built-in method append of list object>");
///
/// assert!(bind(xs, "push", 1).is_err());
/// ```
pub fn bind(receiver: Value, attr: &str, line: usize) -> EvalResult<Value> {
    let type_name = receiver.type_name();
    METHOD_TABLE.iter()
                .find(|m| m.receiver == type_name && m.name == attr)
                .map(|method| Value::BoundMethod(Rc::new(BoundMethod { receiver, method })))
                .ok_or_else(|| RuntimeError::AttributeError { type_name: type_name.to_string(),
                                                              attr: attr.to_string(),
                                                              line })
}
