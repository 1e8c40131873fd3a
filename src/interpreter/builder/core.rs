use tracing::debug;

use crate::{
    ast::{Statement, Unit},
    error::RuntimeError,
    interpreter::{
        builder::expression::build_expr,
        parser::{ParseTree, Rule, StartRule},
    },
};

pub type BuildResult<T> = Result<T, RuntimeError>;

/// Converts a parse tree into the AST.
///
/// The root must match `start`: `FileInput` for programs, `SingleInput` for
/// interactive statements and `EvalInput` for expressions.
///
/// # Parameters
/// - `tree`: A tree produced by [`parse`](crate::interpreter::parser::parse).
/// - `start`: The start rule the tree was parsed with.
///
/// # Returns
/// [`Unit::Statements`] for programs and interactive statements,
/// [`Unit::Expression`] for expressions.
///
/// # Errors
/// Returns a `SyntaxError` for `return` outside a function, `break` or
/// `continue` outside a loop and assignments to calls, a `NotImplemented`
/// error for unsupported constructs such as loop `else` clauses, and an
/// `ArithmeticError` for integer literals out of range.
///
/// # Examples
/// ```
/// use pyrite::{
///     ast::{Statement, Unit},
///     interpreter::{
///         builder::build_ast,
///         lexer::tokenize,
///         parser::{StartRule, parse},
///     },
/// };
///
/// let tokens = tokenize("x = 1\npass\n").unwrap();
/// let tree = parse(&tokens, StartRule::Program).unwrap();
/// let Unit::Statements(statements) = build_ast(&tree, StartRule::Program).unwrap() else {
///     panic!("expected statements");
/// };
/// assert_eq!(statements.len(), 2);
/// assert!(matches!(statements[1], Statement::Pass { line: 2 }));
/// ```
pub fn build_ast(tree: &ParseTree, start: StartRule) -> BuildResult<Unit> {
    let mut builder = TreeBuilder::default();
    let unit = match (start, tree.rule()) {
        (StartRule::Program, Some(Rule::FileInput))
        | (StartRule::SingleStatement, Some(Rule::SingleInput)) => {
            Unit::Statements(builder.build_statements(tree.children())?)
        },
        (StartRule::Expression, Some(Rule::EvalInput)) => {
            let expr = tree.children()
                           .first()
                           .ok_or_else(|| malformed(tree, "an expression"))?;
            Unit::Expression(build_expr(expr)?)
        },
        _ => return Err(malformed(tree, &format!("a {start} tree"))),
    };
    debug!(%start, "built syntax tree");
    Ok(unit)
}

/// Tracks where statements are nested while the tree is built.
///
/// A function definition starts a fresh context: a loop enclosing the `def`
/// does not make `break` legal inside the function body.
#[derive(Debug, Default, Clone, Copy)]
pub(in crate::interpreter::builder) struct TreeBuilder {
    pub(in crate::interpreter::builder) in_function: bool,
    pub(in crate::interpreter::builder) loop_depth:  usize,
}

impl TreeBuilder {
    /// Builds every statement among `children`, skipping bare tokens such as
    /// `NEWLINE`, `INDENT` and `EndMarker`.
    pub(in crate::interpreter::builder) fn build_statements(&mut self,
                                                            children: &[ParseTree])
                                                            -> BuildResult<Vec<Statement>> {
        let mut statements = Vec::new();
        for child in children {
            match child.rule() {
                Some(Rule::Stmt) => {
                    for inner in child.children() {
                        statements.extend(self.build_stmt(inner)?);
                    }
                },
                Some(Rule::SimpleStmt | Rule::CompoundStmt) => {
                    statements.extend(self.build_stmt(child)?);
                },
                _ => {},
            }
        }
        Ok(statements)
    }

    /// Builds `body` as the inside of a loop.
    pub(in crate::interpreter::builder) fn within_loop<T>(&mut self,
                                                      body: impl FnOnce(&mut Self) -> BuildResult<T>)
                                                      -> BuildResult<T> {
        self.loop_depth += 1;
        let result = body(self);
        self.loop_depth -= 1;
        result
    }

    /// Builds `body` as the inside of a function.
    pub(in crate::interpreter::builder) fn within_function<T>(&mut self,
                                                          body: impl FnOnce(&mut Self) -> BuildResult<T>)
                                                          -> BuildResult<T> {
        let saved = *self;
        self.in_function = true;
        self.loop_depth = 0;
        let result = body(self);
        *self = saved;
        result
    }
}

/// Reports a tree that does not have the shape the grammar produces.
pub(in crate::interpreter::builder) fn malformed(tree: &ParseTree, expected: &str) -> RuntimeError {
    let found = tree.rule()
                    .map_or_else(|| "a token".to_string(), |rule| format!("'{rule}'"));
    RuntimeError::SyntaxError { details: format!("expected {expected}, found {found}"),
                                line:    tree.line(), }
}
