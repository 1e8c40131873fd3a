use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_compound_stmt,
            core::{ParseResult, parse_test_list},
            tree::{ParseTree, Rule},
            utils::{accept, expect, peek_kind, unexpected},
        },
    },
};

/// Parses a statement.
///
/// Grammar: `stmt := simple_stmt | compound_stmt`
pub fn parse_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let inner = match peek_kind(tokens) {
        TokenKind::If | TokenKind::While | TokenKind::For | TokenKind::Def => {
            parse_compound_stmt(tokens)?
        },
        _ => parse_simple_stmt(tokens)?,
    };
    Ok(ParseTree::node(Rule::Stmt, vec![inner]))
}

/// Parses a line of small statements separated by semicolons.
///
/// Grammar: `simple_stmt := small_stmt (";" small_stmt)* [";"] NEWLINE`
///
/// # Errors
/// Returns a `ParseError` if a statement is malformed or the line is not
/// terminated by `NEWLINE`.
pub fn parse_simple_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![parse_small_stmt(tokens)?];
    while let Some(semicolon) = accept(tokens, TokenKind::Semicolon) {
        children.push(semicolon);
        if peek_kind(tokens) == TokenKind::Newline {
            break;
        }
        children.push(parse_small_stmt(tokens)?);
    }
    children.push(expect(tokens, TokenKind::Newline, "NEWLINE")?);
    Ok(ParseTree::node(Rule::SimpleStmt, children))
}

/// Parses one small statement.
///
/// Grammar: `small_stmt := expr_stmt | "pass" | "break" | "continue" |
/// "return" [testlist]`
fn parse_small_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let keyword_rule = match peek_kind(tokens) {
        TokenKind::Pass => Some(Rule::PassStmt),
        TokenKind::Break => Some(Rule::BreakStmt),
        TokenKind::Continue => Some(Rule::ContinueStmt),
        _ => None,
    };

    let inner = if let Some(rule) = keyword_rule
                   && let Some(token) = tokens.next()
    {
        ParseTree::node(rule, vec![ParseTree::Leaf(token.clone())])
    } else if let Some(keyword) = accept(tokens, TokenKind::Return) {
        let mut children = vec![keyword];
        if peek_kind(tokens).starts_expression() {
            children.push(parse_test_list(tokens)?);
        }
        ParseTree::node(Rule::ReturnStmt, children)
    } else {
        parse_expr_stmt(tokens)?
    };

    Ok(ParseTree::node(Rule::SmallStmt, vec![inner]))
}

/// Parses an expression statement: a plain expression, an assignment or a
/// compound assignment.
///
/// The left-hand side is parsed as an ordinary expression first. When an
/// `=` or an augmented operator follows, the expression must reduce to a
/// name, subscription, attribute reference or call; any other shape is
/// rejected here. Calls are accepted by the grammar and rejected later when
/// the tree is built.
///
/// Grammar:
/// ```text
/// expr_stmt := testlist
///            | target "=" testlist
///            | target augassign testlist
/// ```
fn parse_expr_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let first = parse_test_list(tokens)?;
    let kind = peek_kind(tokens);

    let rule = if kind == TokenKind::Equals {
        Rule::ExprStmtAssign
    } else if kind.is_augmented_assign() {
        Rule::ExprStmtAugmented
    } else {
        return Ok(ParseTree::node(Rule::ExprStmtPlain, vec![first]));
    };

    check_target(&first)?;
    let operator = match tokens.next() {
        Some(token) => ParseTree::Leaf(token.clone()),
        None => return Err(unexpected(None, "assignment")),
    };
    let value = parse_test_list(tokens)?;
    Ok(ParseTree::node(rule, vec![first, operator, value]))
}

/// Verifies that an expression can appear on the left of an assignment.
///
/// # Errors
/// Returns [`ParseError::InvalidAssignmentTarget`] describing what the
/// expression is instead.
pub(in crate::interpreter::parser) fn check_target(tree: &ParseTree) -> ParseResult<()> {
    let target = tree.innermost();
    let what = match target.rule() {
        Some(Rule::Name | Rule::Subscription | Rule::AttributeRef | Rule::Call) => return Ok(()),
        Some(Rule::Number | Rule::StringLiteral) => "literal",
        Some(Rule::NameConstant) => "keyword",
        Some(Rule::TestList | Rule::TupleMaker) => "tuple",
        Some(Rule::ListMaker) => "list display",
        Some(Rule::DictMaker) => "dict display",
        Some(Rule::SetMaker) => "set display",
        Some(Rule::Comparison) => "comparison",
        Some(Rule::OrTest | Rule::AndTest | Rule::NotTest) => "boolean operation",
        Some(Rule::ParenExpr) => "parenthesized expression",
        Some(_) => "operator",
        None => "token",
    };
    Err(ParseError::InvalidAssignmentTarget { what: what.to_string(),
                                              line: tree.line(), })
}
