/// Builder entry point and placement tracking.
pub mod core;

/// Statement productions, including `elif` folding and compound assignment
/// desugaring.
pub mod statement;

/// Expression productions and assignment targets.
pub mod expression;

/// Numeric and string literal decoding.
pub mod literal;

/// Token to operator tables.
pub mod operator;

pub use self::core::{BuildResult, build_ast};
