/// Parser entry point and the top-level productions.
///
/// Defines [`ParseResult`], the [`StartRule`] selector and the program,
/// interactive and expression start symbols.
pub mod core;

/// Parse tree representation.
///
/// Grammar productions are labelled by [`Rule`]; leaves keep the original
/// tokens.
pub mod tree;

/// Simple statements.
///
/// Assignments, expression statements and the `pass`, `break`,
/// `continue` and `return` keywords.
pub mod statement;

/// Compound statements and indented suites.
pub mod block;

/// Binary precedence levels, from logical `or` down to multiplication.
pub mod binary;

/// Unary operators, trailers and atoms.
pub mod unary;

/// Token stream helpers shared by all productions.
pub mod utils;

pub use self::core::{ParseResult, StartRule, parse};

pub use tree::{ParseTree, Rule};
