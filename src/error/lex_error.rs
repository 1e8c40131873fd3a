/// Represents all errors that can occur while tokenizing source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// A character (or character sequence) that starts no token, such as a `$`
    /// or an unterminated string literal.
    #[error("SyntaxError on line {line}: invalid character sequence '{text}'")]
    UnexpectedCharacter {
        /// The offending source text.
        text:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The column where the offending text starts.
        column: usize,
    },
    /// A dedent to a width that does not match any enclosing block.
    #[error("IndentationError on line {line}: unindent does not match any outer indentation level")]
    Indentation {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl LexError {
    /// The source line the error is bound to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. } | Self::Indentation { line } => *line,
        }
    }
}
