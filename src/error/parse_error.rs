/// Represents all errors that can occur during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("SyntaxError on line {line}: unexpected {token}, expected {expected}")]
    UnexpectedToken {
        /// Text of the token encountered.
        token:    String,
        /// What the grammar wanted at this point.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input while the grammar still expected tokens.
    ///
    /// In interactive mode this means "keep reading", everywhere else it is a
    /// syntax error.
    #[error("SyntaxError on line {line}: unexpected end of input")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left-hand side of an assignment cannot be written to.
    #[error("SyntaxError on line {line}: can't assign to {what}")]
    InvalidAssignmentTarget {
        /// Short description of the offending target.
        what: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Brackets or operators nested deeper than the parser allows.
    #[error("SyntaxError on line {line}: expression nested more than {limit} levels deep")]
    TooDeeplyNested {
        /// The nesting limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
}

impl ParseError {
    /// The source line the error is bound to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line }
            | Self::InvalidAssignmentTarget { line, .. }
            | Self::TooDeeplyNested { line, .. } => *line,
        }
    }
}
