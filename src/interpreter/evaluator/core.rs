use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tracing::debug;

use crate::{
    ast::{Statement, Unit},
    error::RuntimeError,
    interpreter::{scope::Scope, value::core::Value},
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default limit on nested function activations.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100;

/// Tunable limits of an [`Interpreter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of nested function calls before a `MemoryError`.
    pub max_call_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH }
    }
}

/// A request to leave the normal statement sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// `return`, carrying the returned value.
    Return(Value),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `pass`; never interrupts a block.
    Pass,
}

/// The outcome of executing a statement or a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    /// Execution ran to the end. Holds the non-`None` values produced by
    /// expression statements, in order.
    Values(Vec<Value>),
    /// Execution was interrupted by a control-flow signal.
    Signal(Signal),
}

/// The result of evaluating a whole unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Expression units evaluate to a value.
    Value(Value),
    /// Program and single-statement units report a status code; `0` means
    /// success.
    Status(i32),
}

/// Executes AST units against a persistent root scope.
///
/// The root scope starts out holding the built-in functions. Everything a
/// program binds at top level stays visible to later units run on the same
/// interpreter, which is how the interactive shell keeps its session.
///
/// ## Usage
///
/// ```
/// use pyrite::{
///     interpreter::{
///         builder::build_ast,
///         evaluator::{Completion, Interpreter},
///         lexer::tokenize,
///         parser::{StartRule, parse},
///         value::core::Value,
///     },
/// };
///
/// let mut interpreter = Interpreter::new();
///
/// let tokens = tokenize("x = 1\ny = x + 1\n").unwrap();
/// let tree = parse(&tokens, StartRule::Program).unwrap();
/// let unit = build_ast(&tree, StartRule::Program).unwrap();
///
/// assert_eq!(interpreter.run(&unit).unwrap(), Completion::Status(0));
/// assert_eq!(interpreter.globals().lookup("y"), Some(Value::Integer(2)));
/// ```
pub struct Interpreter {
    globals:               Scope,
    config:                InterpreterConfig,
    output:                Box<dyn Write>,
    interrupt:             Arc<AtomicBool>,
    pub(crate) call_depth: usize,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Creates an interpreter with the default configuration that prints to
    /// standard output.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InterpreterConfig::default())
    }

    /// Creates an interpreter with the given configuration.
    #[must_use]
    pub fn with_config(config: InterpreterConfig) -> Self {
        Self { globals: Scope::root(),
               config,
               output: Box::new(std::io::stdout()),
               interrupt: Arc::new(AtomicBool::new(false)),
               call_depth: 0 }
    }

    /// Redirects everything `print` writes to `output`.
    #[must_use]
    pub fn with_output(mut self, output: impl Write + 'static) -> Self {
        self.output = Box::new(output);
        self
    }

    /// The flag that stops evaluation when set.
    ///
    /// Loops and function calls check it before every iteration or
    /// activation; once it is set the running unit fails with a
    /// `KeyboardInterrupt` and the flag is cleared. A signal handler keeps a
    /// clone and sets it.
    ///
    /// # Example
    /// ```
    /// use std::sync::atomic::Ordering;
    ///
    /// use pyrite::{Interpreter, StartRule, error::FaultKind, evaluate_in};
    ///
    /// let mut interpreter = Interpreter::new();
    /// interpreter.interrupt_flag().store(true, Ordering::SeqCst);
    ///
    /// let err = evaluate_in(&mut interpreter, "while True:\n    pass\n", StartRule::Program).unwrap_err();
    /// assert_eq!(err.kind(), FaultKind::Interrupt);
    /// assert!(!interpreter.interrupt_flag().load(Ordering::SeqCst));
    /// ```
    #[must_use]
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Clears the interrupt flag and reports whether it was set.
    pub fn take_interrupt(&self) -> bool {
        self.interrupt.swap(false, Ordering::SeqCst)
    }

    /// Fails with [`RuntimeError::Interrupted`] if the interrupt flag is set.
    pub(crate) fn check_interrupt(&self, line: usize) -> EvalResult<()> {
        if self.take_interrupt() {
            return Err(RuntimeError::Interrupted { line });
        }
        Ok(())
    }

    /// The root scope.
    #[must_use]
    pub const fn globals(&self) -> &Scope {
        &self.globals
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Drops every binding made so far and starts over with a fresh root
    /// scope.
    pub fn reset(&mut self) {
        self.globals = Scope::root();
        self.call_depth = 0;
    }

    /// Evaluates a unit in the root scope.
    ///
    /// # Returns
    /// - `Completion::Value` with the result for an expression unit.
    /// - `Completion::Status(0)` once every statement of a program has run.
    ///
    /// # Errors
    /// Returns the first fault raised; statements after it do not run.
    pub fn run(&mut self, unit: &Unit) -> EvalResult<Completion> {
        match unit {
            Unit::Expression(expr) => {
                let globals = self.globals.clone();
                self.eval_expr(expr, &globals).map(Completion::Value)
            },
            Unit::Statements(statements) => {
                self.exec_top_level(statements)?;
                Ok(Completion::Status(0))
            },
        }
    }

    /// Executes statements in the root scope and returns the values they
    /// produced, as echoed by the interactive shell.
    ///
    /// # Errors
    /// Returns the first fault raised.
    pub fn exec_top_level(&mut self, statements: &[Statement]) -> EvalResult<Vec<Value>> {
        debug!(statements = statements.len(), "executing unit");
        self.call_depth = 0;
        let globals = self.globals.clone();
        match self.exec_block(statements, &globals)? {
            Flow::Values(values) => Ok(values),
            Flow::Signal(_) => Ok(Vec::new()),
        }
    }

    /// Writes `text` to the output sink.
    ///
    /// # Errors
    /// Returns [`RuntimeError::Io`] if the sink fails.
    pub fn write_output(&mut self, text: &str, line: usize) -> EvalResult<()> {
        self.output
            .write_all(text.as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|e| RuntimeError::Io { details: e.to_string(),
                                            line })
    }
}
