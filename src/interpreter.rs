/// The lexer module turns source text into tokens.
///
/// Besides numbers, strings, names, keywords and operators, the lexer
/// produces the layout tokens the grammar relies on: `NEWLINE` at the end of
/// every logical line and `INDENT`/`DEDENT` whenever the indentation of a
/// line changes.
///
/// # Responsibilities
/// - Tracks an indentation stack and bracket nesting.
/// - Suppresses line breaks inside brackets and on blank or comment lines.
/// - Reports unknown characters and inconsistent dedents as lexing errors.
pub mod lexer;
/// The parser module builds a parse tree from tokens.
///
/// It is a recursive descent parser with one function per grammar
/// production. Input that ends in the middle of a production is reported
/// separately so the interactive shell can ask for more lines.
pub mod parser;
/// A flattened view of the parse tree for diagnostics.
pub mod cst;
/// The builder module converts parse trees into the AST.
///
/// It resolves operator tokens, decodes literals, folds `elif` chains,
/// desugars compound assignments and rejects statements in places they are
/// not allowed, like `return` outside a function.
pub mod builder;
/// Lexically nested variable scopes.
pub mod scope;
/// The value module defines the runtime data types.
///
/// Numbers, strings, the built-in containers, user functions and bound
/// methods, together with their truthiness, equality and `str`/`repr`
/// formatting.
pub mod value;
/// The evaluator module executes AST units.
///
/// The evaluator walks statements and expressions, applies the operator
/// semantics, calls user and built-in functions and threads control-flow
/// signals through blocks and loops.
///
/// # Responsibilities
/// - Evaluates every expression and statement of the language.
/// - Manages scopes for function calls and closures.
/// - Reports runtime faults tagged with their kind and source line.
pub mod evaluator;
/// In-memory output sink for capturing `print`.
pub mod output;
/// The interactive shell.
///
/// Reads lines, decides whether they complete a statement, evaluates it and
/// echoes the results.
pub mod repl;
