use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::{
    ast::Unit,
    error::Error,
    interpreter::{
        builder::build_ast,
        cst::Cst,
        evaluator::Interpreter,
        lexer::tokenize,
        parser::{StartRule, parse},
        value::core::Value,
    },
};

/// Prompt shown when a new statement is expected.
pub const PRIMARY_PROMPT: &str = ">>> ";
/// Prompt shown while a statement is being continued.
pub const CONTINUATION_PROMPT: &str = "... ";
/// Printed once before the first prompt unless suppressed.
pub const GREETING: &str = "Press Ctrl-D to quit";

/// Whether the shell is between statements or inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplState {
    /// The buffer is empty; the next line starts a statement.
    AwaitingStatement,
    /// The buffer holds an unfinished statement, such as an open block.
    AwaitingContinuation,
}

/// What one line of input did.
#[derive(Debug)]
pub enum Step {
    /// A statement was completed and ran; holds the values to echo.
    Evaluated(Vec<Value>),
    /// The statement is incomplete and needs more lines.
    NeedMore,
    /// The statement could not be tokenized, parsed, built or evaluated.
    /// The buffer was discarded.
    Failed(Error),
    /// A blank or comment-only line outside of a statement.
    Empty,
}

/// An interactive read-evaluate-print loop.
///
/// Lines are buffered until they form a complete statement. One interpreter
/// is kept for the whole session, so definitions stay visible between
/// statements.
///
/// # Example
/// ```
/// use pyrite::interpreter::repl::{Repl, ReplState, Step};
///
/// let mut repl = Repl::new(std::io::empty(), Vec::new());
///
/// assert!(matches!(repl.feed_line("if True:"), Step::NeedMore));
/// assert_eq!(repl.state(), ReplState::AwaitingContinuation);
///
/// assert!(matches!(repl.feed_line("    x = 41"), Step::NeedMore));
/// assert!(matches!(repl.feed_line(""), Step::Evaluated(_)));
///
/// match repl.feed_line("x + 1") {
///     Step::Evaluated(values) => assert_eq!(values[0].repr(), "42"),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub struct Repl<R, W> {
    input:       R,
    output:      W,
    buffer:      String,
    state:       ReplState,
    interpreter: Interpreter,
    diagnostics: String,
    show_cst:    bool,
    parse_only:  bool,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    /// Creates a shell reading from `input` and writing prompts, echoed
    /// values and faults to `output`.
    ///
    /// `print` inside evaluated code goes to the interpreter's own sink,
    /// standard output unless replaced with [`Repl::with_interpreter`].
    pub fn new(input: R, output: W) -> Self {
        Self { input,
               output,
               buffer: String::new(),
               state: ReplState::AwaitingStatement,
               interpreter: Interpreter::new(),
               diagnostics: String::new(),
               show_cst: false,
               parse_only: false }
    }

    /// Replaces the session interpreter.
    #[must_use]
    pub fn with_interpreter(mut self, interpreter: Interpreter) -> Self {
        self.interpreter = interpreter;
        self
    }

    /// Prints the flattened syntax tree of every statement before running
    /// it.
    #[must_use]
    pub const fn show_cst(mut self, show: bool) -> Self {
        self.show_cst = show;
        self
    }

    /// Parses and builds statements without evaluating them.
    #[must_use]
    pub const fn parse_only(mut self, parse_only: bool) -> Self {
        self.parse_only = parse_only;
        self
    }

    /// The current state.
    pub const fn state(&self) -> ReplState {
        self.state
    }

    /// The session interpreter.
    pub const fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Feeds one line (without or with its line break) and performs a single
    /// transition.
    pub fn feed_line(&mut self, line: &str) -> Step {
        let line = line.trim_end_matches(['\n', '\r']);
        if self.state == ReplState::AwaitingStatement {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return Step::Empty;
            }
        }

        self.buffer.push_str(line);
        self.buffer.push('\n');

        match self.compile() {
            Err(e) if e.is_incomplete() => {
                self.transition(ReplState::AwaitingContinuation);
                Step::NeedMore
            },
            Err(e) => {
                self.reset();
                Step::Failed(e)
            },
            Ok(unit) => {
                self.reset();
                self.execute(&unit)
            },
        }
    }

    /// Writes the greeting.
    ///
    /// # Errors
    /// Returns any error from the output stream.
    pub fn greet(&mut self) -> io::Result<()> {
        writeln!(self.output, "pyrite {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.output, "{GREETING}")
    }

    /// Prompts and evaluates until the input is exhausted.
    ///
    /// A statement still open at end of input is completed as if an empty
    /// line had been entered. An interrupt that arrives while a line is being
    /// read discards that line and any buffered statement.
    ///
    /// # Errors
    /// Returns any error from the input or output stream. Faults raised by
    /// the evaluated code are printed and never end the session.
    pub fn run(&mut self) -> io::Result<()> {
        let mut line = String::new();
        loop {
            let prompt = match self.state {
                ReplState::AwaitingStatement => PRIMARY_PROMPT,
                ReplState::AwaitingContinuation => CONTINUATION_PROMPT,
            };
            write!(self.output, "{prompt}")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                if self.state == ReplState::AwaitingContinuation {
                    let step = self.feed_line("");
                    self.report(step)?;
                }
                writeln!(self.output)?;
                debug!("end of interactive input");
                return Ok(());
            }

            if self.interpreter.take_interrupt() {
                self.reset();
                writeln!(self.output, "\nKeyboardInterrupt")?;
                continue;
            }

            let step = self.feed_line(&line);
            self.report(step)?;
        }
    }

    fn compile(&mut self) -> Result<Unit, Error> {
        let tokens = tokenize(&self.buffer)?;
        let tree = parse(&tokens, StartRule::SingleStatement)?;
        if self.show_cst {
            self.diagnostics.push_str(&Cst::flatten(&tree).to_string());
        }
        Ok(build_ast(&tree, StartRule::SingleStatement)?)
    }

    fn execute(&mut self, unit: &Unit) -> Step {
        if self.parse_only {
            return Step::Evaluated(Vec::new());
        }
        let result = match unit {
            Unit::Statements(statements) => self.interpreter.exec_top_level(statements),
            Unit::Expression(expr) => {
                let globals = self.interpreter.globals().clone();
                self.interpreter.eval_expr(expr, &globals).map(|v| vec![v])
            },
        };
        match result {
            Ok(values) => Step::Evaluated(values),
            Err(e) => Step::Failed(e.into()),
        }
    }

    fn report(&mut self, step: Step) -> io::Result<()> {
        let diagnostics = std::mem::take(&mut self.diagnostics);
        self.output.write_all(diagnostics.as_bytes())?;
        match step {
            Step::Evaluated(values) => {
                for value in values {
                    writeln!(self.output, "{}", value.repr())?;
                }
            },
            Step::Failed(error) => writeln!(self.output, "{error}")?,
            Step::NeedMore | Step::Empty => {},
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.transition(ReplState::AwaitingStatement);
    }

    fn transition(&mut self, state: ReplState) {
        if self.state != state {
            debug!(from = ?self.state, to = ?state, "repl state change");
        }
        self.state = state;
    }
}
