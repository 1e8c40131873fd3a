/// The flat taxonomy every runtime fault belongs to.
///
/// Two kinds act as bases: [`FaultKind::Memory`] for name resolution and
/// [`FaultKind::Arithmetic`] for numeric failures. Use [`FaultKind::is_a`] to
/// test against a base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Base kind for name resolution and call-depth exhaustion.
    Memory,
    /// An identifier that is bound nowhere on the scope chain.
    Name,
    /// Arity mismatch, invalid operand types, unhashable keys and similar.
    Type,
    /// Base kind for numeric failures such as integer overflow.
    Arithmetic,
    /// Division or modulo by zero.
    ZeroDivision,
    /// Misplaced `return`/`break`/`continue`, bad assignment targets and
    /// indentation problems.
    Syntax,
    /// Missing attribute on a value.
    Attribute,
    /// Missing key in a mapping or set.
    Key,
    /// Sequence index out of range.
    Index,
    /// An argument of the right type but an unusable value, such as
    /// `int('x')`.
    Value,
    /// A construct the interpreter deliberately does not support.
    NotImplemented,
    /// The output sink failed.
    Io,
    /// Evaluation was interrupted from outside, such as by Ctrl-C.
    Interrupt,
}

impl FaultKind {
    /// Returns `true` if `self` is `base` or derives from it.
    ///
    /// ## Example
    /// ```
    /// use pyrite::error::FaultKind;
    ///
    /// assert!(FaultKind::ZeroDivision.is_a(FaultKind::Arithmetic));
    /// assert!(FaultKind::Name.is_a(FaultKind::Memory));
    /// assert!(!FaultKind::Type.is_a(FaultKind::Arithmetic));
    /// ```
    #[must_use]
    pub fn is_a(self, base: Self) -> bool {
        self == base
        || matches!((self, base),
                    (Self::Name, Self::Memory) | (Self::ZeroDivision, Self::Arithmetic))
    }
}

impl std::fmt::Display for FaultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Memory => "MemoryError",
            Self::Name => "NameError",
            Self::Type => "TypeError",
            Self::Arithmetic => "ArithmeticError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::Syntax => "SyntaxError",
            Self::Attribute => "AttributeError",
            Self::Key => "KeyError",
            Self::Index => "IndexError",
            Self::Value => "ValueError",
            Self::NotImplemented => "NotImplementedError",
            Self::Io => "OSError",
            Self::Interrupt => "KeyboardInterrupt",
        };
        write!(f, "{name}")
    }
}

/// Represents all faults raised while building or evaluating the AST.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Tried to read a name that is not bound anywhere on the scope chain.
    #[error("NameError on line {line}: name '{name}' is not defined")]
    UnknownName {
        /// The name that was looked up.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Function activations nested deeper than the configured limit.
    #[error("MemoryError on line {line}: maximum recursion depth of {limit} exceeded")]
    RecursionLimit {
        /// The configured depth limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A value would grow past the size the interpreter is willing to
    /// allocate.
    #[error("MemoryError on line {line}: {details}")]
    OutOfMemory {
        /// What was too large.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Evaluation was stopped by a keyboard interrupt.
    #[error("KeyboardInterrupt on line {line}")]
    Interrupted {
        /// The source line that was running.
        line: usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("TypeError on line {line}: {details}")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A user function was called with the wrong number of arguments.
    #[error("TypeError on line {line}: {name}() takes {expected} positional arguments but {found} were given")]
    ArgumentCountMismatch {
        /// Name of the called function.
        name:     String,
        /// Number of declared parameters.
        expected: usize,
        /// Number of supplied arguments.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A numeric operation could not be represented, such as integer overflow.
    #[error("ArithmeticError on line {line}: {details}")]
    ArithmeticError {
        /// Details about the failure.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Division or modulo by zero.
    #[error("ZeroDivisionError on line {line}: {details}")]
    DivisionByZero {
        /// Which operation divided by zero.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A statement or target that is not allowed where it appears.
    #[error("SyntaxError on line {line}: {details}")]
    SyntaxError {
        /// Details about the misplaced construct.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attribute lookup on a value that has no such attribute.
    #[error("AttributeError on line {line}: '{type_name}' object has no attribute '{attr}'")]
    AttributeError {
        /// Type name of the receiver.
        type_name: String,
        /// The attribute that was requested.
        attr:      String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// Mapping or set lookup of an absent key.
    #[error("KeyError on line {line}: {key}")]
    KeyError {
        /// `repr` of the missing key.
        key:  String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Sequence access outside the valid range.
    #[error("IndexError on line {line}: {details}")]
    IndexError {
        /// Details about the access.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A built-in received an argument it cannot use.
    #[error("ValueError on line {line}: {details}")]
    ValueError {
        /// Details about the rejected value.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// A construct the interpreter does not support.
    #[error("NotImplementedError on line {line}: {details}")]
    NotImplemented {
        /// What is unsupported.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Writing to the output sink failed.
    #[error("OSError on line {line}: {details}")]
    Io {
        /// The underlying I/O error message.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}

impl RuntimeError {
    /// Classifies the error within the fault taxonomy.
    #[must_use]
    pub const fn kind(&self) -> FaultKind {
        match self {
            Self::UnknownName { .. } => FaultKind::Name,
            Self::RecursionLimit { .. } | Self::OutOfMemory { .. } => FaultKind::Memory,
            Self::Interrupted { .. } => FaultKind::Interrupt,
            Self::TypeError { .. } | Self::ArgumentCountMismatch { .. } => FaultKind::Type,
            Self::ArithmeticError { .. } => FaultKind::Arithmetic,
            Self::DivisionByZero { .. } => FaultKind::ZeroDivision,
            Self::SyntaxError { .. } => FaultKind::Syntax,
            Self::AttributeError { .. } => FaultKind::Attribute,
            Self::KeyError { .. } => FaultKind::Key,
            Self::IndexError { .. } => FaultKind::Index,
            Self::ValueError { .. } => FaultKind::Value,
            Self::NotImplemented { .. } => FaultKind::NotImplemented,
            Self::Io { .. } => FaultKind::Io,
        }
    }

    /// The source line the error is bound to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownName { line, .. }
            | Self::RecursionLimit { line, .. }
            | Self::OutOfMemory { line, .. }
            | Self::Interrupted { line }
            | Self::TypeError { line, .. }
            | Self::ArgumentCountMismatch { line, .. }
            | Self::ArithmeticError { line, .. }
            | Self::DivisionByZero { line, .. }
            | Self::SyntaxError { line, .. }
            | Self::AttributeError { line, .. }
            | Self::KeyError { line, .. }
            | Self::IndexError { line, .. }
            | Self::ValueError { line, .. }
            | Self::NotImplemented { line, .. }
            | Self::Io { line, .. } => *line,
        }
    }

    /// Shorthand for a [`RuntimeError::TypeError`].
    pub fn type_error(details: impl Into<String>, line: usize) -> Self {
        Self::TypeError { details: details.into(),
                          line }
    }

    /// Shorthand for a [`RuntimeError::ValueError`].
    pub fn value_error(details: impl Into<String>, line: usize) -> Self {
        Self::ValueError { details: details.into(),
                           line }
    }
}
