//! # pyrite
//!
//! pyrite is an interpreter for a small, indentation-structured scripting
//! language written in Rust. Source text goes through a lexer, a recursive
//! descent parser and a tree builder before a tree-walking evaluator runs it.
//! Integers, floats, strings, lists, tuples, dicts, sets, first-class
//! functions and closures are supported, along with an interactive shell.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::debug;

/// Defines the structure of built code.
///
/// This module declares the `Expr` and `Statement` enums that the tree
/// builder produces and the evaluator walks, together with the operator
/// enums and literal values.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source lines to nodes for error reporting.
pub mod ast;
/// Provides unified error types for lexing, parsing and evaluation.
///
/// This module defines all errors that can be raised while turning source
/// text into a running program. Every error carries the source line it is
/// bound to, and runtime errors are tagged with a fault kind.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Distinguishes input that merely ended too early from invalid input.
/// - Supports integration with standard error handling traits.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, tree building, evaluation and
/// the interactive shell.
///
/// # Responsibilities
/// - Coordinates all pipeline stages and their data.
/// - Provides the runtime values and scopes the evaluator works on.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

pub use crate::{
    error::Error,
    interpreter::{
        builder::build_ast,
        evaluator::{Completion, Interpreter, InterpreterConfig},
        lexer::tokenize,
        parser::{StartRule, parse},
    },
};

/// Runs source text through the lexer, the parser and the tree builder.
///
/// # Errors
/// Returns the first error of whichever stage failed.
///
/// # Examples
/// ```
/// use pyrite::{StartRule, ast::Unit, compile};
///
/// let unit = compile("x = 1\n", StartRule::Program).unwrap();
/// assert!(matches!(unit, Unit::Statements(ref s) if s.len() == 1));
///
/// assert!(compile("x = (1\n", StartRule::Program).unwrap_err().is_incomplete());
/// ```
pub fn compile(source: &str, start: StartRule) -> Result<ast::Unit, Error> {
    let tokens = tokenize(source)?;
    let tree = parse(&tokens, start)?;
    let unit = build_ast(&tree, start)?;
    debug!(%start, "compiled unit");
    Ok(unit)
}

/// Evaluates source text on a fresh interpreter.
///
/// `print` writes to standard output.
///
/// # Parameters
/// - `source`: The text to evaluate.
/// - `start`: Whether to treat it as a program, a single interactive
///   statement or an expression.
///
/// # Returns
/// The value of an expression, or status `0` for statements.
///
/// # Errors
/// Returns the first lexing, parsing, building or runtime error.
///
/// # Examples
/// ```
/// use pyrite::{Completion, StartRule, evaluate_unit, error::FaultKind,
///              interpreter::value::core::Value};
///
/// let result = evaluate_unit("3 + 4 * 2", StartRule::Expression).unwrap();
/// assert_eq!(result, Completion::Value(Value::Integer(11)));
///
/// let err = evaluate_unit("1 / 0", StartRule::Expression).unwrap_err();
/// assert_eq!(err.kind(), FaultKind::ZeroDivision);
/// ```
pub fn evaluate_unit(source: &str, start: StartRule) -> Result<Completion, Error> {
    evaluate_in(&mut Interpreter::new(), source, start)
}

/// Evaluates source text on an existing interpreter, so bindings made by
/// earlier units stay visible.
///
/// # Errors
/// Returns the first lexing, parsing, building or runtime error.
pub fn evaluate_in(interpreter: &mut Interpreter,
                   source: &str,
                   start: StartRule)
                   -> Result<Completion, Error> {
    let unit = compile(source, start)?;
    Ok(interpreter.run(&unit)?)
}
