use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Type conversions and constructors: `bool`, `int`, `float`, `str`,
/// `repr`, `chr`, `ord`, `type` and the container constructors.
pub mod convert;
/// Functions over iterables: `len`, `range`, `enumerate`, `zip`,
/// `reversed`, `sorted`, `sum`, `min` and `max`.
pub mod sequence;
/// `abs` and `round`.
pub mod numeric;
/// `print`.
pub mod output;

/// Signature shared by all built-in functions.
///
/// A builtin receives the interpreter (for its output sink), the evaluated
/// arguments and the line number of the call.
pub type BuiltinFn = fn(&mut Interpreter, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(counts) => counts.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::OneOf(counts) => {
                let counts: Vec<String> = counts.iter().map(ToString::to_string).collect();
                write!(f, "{}", counts.join(" or "))
            },
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Metadata of one built-in function.
pub struct BuiltinDef {
    /// The name the builtin is bound to in the root scope.
    pub name:  &'static str,
    /// Accepted argument counts.
    pub arity: Arity,
    func:      BuiltinFn,
}

impl BuiltinDef {
    /// Checks the argument count and runs the builtin.
    ///
    /// # Errors
    /// Returns a `TypeError` when the argument count is not accepted, and
    /// whatever the builtin itself raises.
    pub fn invoke(&self, interpreter: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
        if !self.arity.check(args.len()) {
            return Err(match self.arity {
                           Arity::Exact(expected) => RuntimeError::ArgumentCountMismatch { name: self.name.to_string(),
                                                                                           expected,
                                                                                           found: args.len(),
                                                                                           line },
                           arity => RuntimeError::type_error(format!("{}() takes {arity} arguments ({} given)",
                                                                     self.name,
                                                                     args.len()),
                                                             line),
                       });
        }
        (self.func)(interpreter, args, line)
    }
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BUILTIN_TABLE` (static table bound into the root scope),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every built-in function, in alphabetical order.
        pub static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// The names of all built-in functions.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "abs"       => { arity: Arity::Exact(1), func: numeric::abs },
    "bool"      => { arity: Arity::OneOf(&[0, 1]), func: convert::bool },
    "chr"       => { arity: Arity::Exact(1), func: convert::chr },
    "dict"      => { arity: Arity::OneOf(&[0, 1]), func: convert::dict },
    "enumerate" => { arity: Arity::OneOf(&[1, 2]), func: sequence::enumerate },
    "float"     => { arity: Arity::OneOf(&[0, 1]), func: convert::float },
    "int"       => { arity: Arity::OneOf(&[0, 1]), func: convert::int },
    "len"       => { arity: Arity::Exact(1), func: sequence::len },
    "list"      => { arity: Arity::OneOf(&[0, 1]), func: convert::list },
    "max"       => { arity: Arity::AtLeast(1), func: |_, args, line| sequence::extremum("max", args, line) },
    "min"       => { arity: Arity::AtLeast(1), func: |_, args, line| sequence::extremum("min", args, line) },
    "ord"       => { arity: Arity::Exact(1), func: convert::ord },
    "print"     => { arity: Arity::AtLeast(0), func: output::print },
    "range"     => { arity: Arity::OneOf(&[1, 2, 3]), func: sequence::range },
    "repr"      => { arity: Arity::Exact(1), func: convert::repr },
    "reversed"  => { arity: Arity::Exact(1), func: sequence::reversed },
    "round"     => { arity: Arity::OneOf(&[1, 2]), func: numeric::round },
    "set"       => { arity: Arity::OneOf(&[0, 1]), func: convert::set },
    "sorted"    => { arity: Arity::Exact(1), func: sequence::sorted },
    "str"       => { arity: Arity::OneOf(&[0, 1]), func: convert::str },
    "sum"       => { arity: Arity::OneOf(&[1, 2]), func: sequence::sum },
    "tuple"     => { arity: Arity::OneOf(&[0, 1]), func: convert::tuple },
    "type"      => { arity: Arity::Exact(1), func: convert::type_name },
    "zip"       => { arity: Arity::AtLeast(0), func: sequence::zip },
}

/// Looks up a builtin by name.
///
/// # Example
/// ```
/// use pyrite::interpreter::evaluator::builtin::lookup;
///
/// assert!(lookup("len").is_some());
/// assert!(lookup("eval").is_none());
/// ```
#[must_use]
pub fn lookup(name: &str) -> Option<&'static BuiltinDef> {
    BUILTIN_TABLE.iter().find(|b| b.name == name)
}
