use std::iter::Peekable;

use tracing::debug;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            binary::parse_or_test,
            block::parse_compound_stmt,
            statement::{parse_simple_stmt, parse_stmt},
            tree::{ParseTree, Rule},
            utils::{accept, check_nesting, expect, peek_kind},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Which grammar production a unit of source is parsed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StartRule {
    /// A whole program: any number of statements.
    #[default]
    Program,
    /// One interactive statement, as typed at the prompt.
    SingleStatement,
    /// A single expression, or several separated by commas.
    Expression,
}

impl std::fmt::Display for StartRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Program => "program",
            Self::SingleStatement => "single statement",
            Self::Expression => "expression",
        };
        write!(f, "{name}")
    }
}

/// Parses a complete token stream into a parse tree.
///
/// The stream must be terminated by an `EndMarker`, as produced by
/// [`tokenize`](crate::interpreter::lexer::tokenize).
///
/// # Parameters
/// - `tokens`: The full token stream.
/// - `start`: The production to parse the stream as.
///
/// # Returns
/// A [`ParseTree`] rooted at `FileInput`, `SingleInput` or `EvalInput`.
///
/// # Errors
/// Returns [`ParseError::UnexpectedEndOfInput`] when the stream ends before
/// the production is complete, [`ParseError::TooDeeplyNested`] for input
/// nested beyond the parser's limits, and another `ParseError` for invalid
/// input.
///
/// # Examples
/// ```
/// use pyrite::interpreter::{
///     lexer::tokenize,
///     parser::{Rule, StartRule, parse},
/// };
///
/// let tokens = tokenize("x = 1\n").unwrap();
/// let tree = parse(&tokens, StartRule::Program).unwrap();
/// assert_eq!(tree.rule(), Some(Rule::FileInput));
/// ```
pub fn parse(tokens: &[Token], start: StartRule) -> ParseResult<ParseTree> {
    check_nesting(tokens)?;
    let mut tokens = tokens.iter().peekable();
    let tree = match start {
        StartRule::Program => parse_file_input(&mut tokens)?,
        StartRule::SingleStatement => parse_single_input(&mut tokens)?,
        StartRule::Expression => parse_eval_input(&mut tokens)?,
    };
    debug!(%start, "parsed unit");
    Ok(tree)
}

/// Parses a program.
///
/// Grammar: `file_input := (NEWLINE | stmt)* ENDMARKER`
fn parse_file_input<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = Vec::new();
    loop {
        match peek_kind(tokens) {
            TokenKind::Newline => {
                if let Some(newline) = accept(tokens, TokenKind::Newline) {
                    children.push(newline);
                }
            },
            TokenKind::EndMarker => {
                children.push(expect(tokens, TokenKind::EndMarker, "end of input")?);
                break;
            },
            _ => children.push(parse_stmt(tokens)?),
        }
    }
    Ok(ParseTree::node(Rule::FileInput, children))
}

/// Parses one interactive statement.
///
/// A compound statement must be followed by a `NEWLINE`, which the lexer only
/// produces once the input ends with an empty line; until then the statement
/// is reported as incomplete.
///
/// Grammar: `single_input := NEWLINE | simple_stmt | compound_stmt NEWLINE |
/// ENDMARKER`
fn parse_single_input<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = Vec::new();
    match peek_kind(tokens) {
        TokenKind::Newline | TokenKind::EndMarker => {},
        TokenKind::If | TokenKind::While | TokenKind::For | TokenKind::Def => {
            children.push(parse_compound_stmt(tokens)?);
            children.push(expect(tokens, TokenKind::Newline, "NEWLINE")?);
        },
        _ => children.push(parse_simple_stmt(tokens)?),
    }
    while let Some(newline) = accept(tokens, TokenKind::Newline) {
        children.push(newline);
    }
    children.push(expect(tokens, TokenKind::EndMarker, "end of input")?);
    Ok(ParseTree::node(Rule::SingleInput, children))
}

/// Parses a standalone expression.
///
/// Grammar: `eval_input := testlist NEWLINE* ENDMARKER`
fn parse_eval_input<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![parse_test_list(tokens)?];
    while let Some(newline) = accept(tokens, TokenKind::Newline) {
        children.push(newline);
    }
    children.push(expect(tokens, TokenKind::EndMarker, "end of input")?);
    Ok(ParseTree::node(Rule::EvalInput, children))
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing. It begins at the
/// lowest-precedence level, logical `or`, and descends through the
/// precedence hierarchy.
///
/// Grammar: `test := or_test`
pub fn parse_test<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    Ok(ParseTree::node(Rule::Test, vec![parse_or_test(tokens)?]))
}

/// Parses one expression, or several separated by commas.
///
/// A single expression is returned as is; with at least one comma the
/// expressions are grouped under a `TestList` node, which evaluates to a
/// tuple. A trailing comma is allowed.
///
/// Grammar: `testlist := test ("," test)* [","]`
pub fn parse_test_list<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let first = parse_test(tokens)?;
    if peek_kind(tokens) != TokenKind::Comma {
        return Ok(first);
    }

    let mut children = vec![first];
    while let Some(comma) = accept(tokens, TokenKind::Comma) {
        children.push(comma);
        if !peek_kind(tokens).starts_expression() {
            break;
        }
        children.push(parse_test(tokens)?);
    }
    Ok(ParseTree::node(Rule::TestList, children))
}
