/// Lexing errors.
///
/// Raised while turning source text into tokens: characters that start no
/// token and inconsistent indentation. They abort the current unit before the
/// parser ever runs.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while the grammar consumes the
/// token stream, including the distinguished "input ended too early" case the
/// interactive shell relies on.
pub mod parse_error;
/// Runtime errors.
///
/// Contains the flat fault taxonomy raised by the tree builder and the
/// evaluator: name resolution, type mismatches, arithmetic, lookups and
/// unsupported constructs.
pub mod runtime_error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::{FaultKind, RuntimeError};

/// Any failure produced while evaluating a unit of source text.
///
/// Each phase keeps its own error type; this enum is what the public entry
/// points hand back so callers can tell the phases apart.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Tokenization failed.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream did not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The tree builder or the evaluator raised a fault.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// Returns `true` when the source ended before the grammar was satisfied.
    ///
    /// The interactive shell uses this to keep reading lines instead of
    /// reporting a syntax error.
    #[must_use]
    pub const fn is_incomplete(&self) -> bool {
        matches!(self, Self::Parse(ParseError::UnexpectedEndOfInput { .. }))
    }

    /// Maps the error onto the fault taxonomy.
    ///
    /// Lexing and parsing problems are all syntax faults; runtime errors report
    /// their own kind.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::Lex(_) | Self::Parse(_) => FaultKind::Syntax,
            Self::Runtime(e) => e.kind(),
        }
    }

    /// The source line the error is bound to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Lex(e) => e.line(),
            Self::Parse(e) => e.line(),
            Self::Runtime(e) => e.line(),
        }
    }
}
