/// Core evaluation state: the interpreter, its configuration and the
/// control-flow results threaded through statement execution.
pub mod core;

/// Expression evaluation and assignment targets.
pub mod expression;

/// Statement execution, including loops and the loop-body state machine.
pub mod statement;

/// Calling user functions, built-ins and bound methods.
///
/// Tracks the activation depth and faults once it exceeds the configured
/// limit.
pub mod call;

/// Arithmetic, bitwise, set and sequence operators.
pub mod arithmetic;

/// Comparisons, membership, identity and the value-returning `and`/`or`.
pub mod comparison;

/// Indexing, slicing and item assignment.
pub mod subscript;

/// The built-in function table.
///
/// Every entry is bound in the outermost scope when an interpreter is created.
pub mod builtin;

/// Methods reachable through attribute lookup on lists, dicts, sets and
/// strings.
pub mod method;

pub use self::core::{Completion, EvalResult, Flow, Interpreter, InterpreterConfig, Signal};
