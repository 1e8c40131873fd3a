use std::iter::Peekable;

use crate::interpreter::{
    lexer::{Token, TokenKind},
    parser::{
        core::ParseResult,
        tree::{ParseTree, Rule},
        unary::parse_factor,
        utils::{accept, expect, peek_kind},
    },
};

/// Parses one left-associative precedence level.
///
/// The node keeps a flat list `operand (operator operand)*`; folding into a
/// left-leaning tree is the tree builder's job. A lone operand still gets
/// its own node.
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `rule`: The production this level represents.
/// - `operators`: Token kinds accepted as operators at this level.
/// - `operand`: Parser for the next tighter level.
fn parse_level<'a, I>(tokens: &mut Peekable<I>,
                      rule: Rule,
                      operators: &[TokenKind],
                      operand: impl Fn(&mut Peekable<I>) -> ParseResult<ParseTree>)
                      -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![operand(tokens)?];
    while let Some(op) = tokens.next_if(|t| operators.contains(&t.kind)) {
        children.push(ParseTree::Leaf(op.clone()));
        children.push(operand(tokens)?);
    }
    Ok(ParseTree::node(rule, children))
}

/// Parses logical OR expressions.
///
/// Grammar: `or_test := and_test ("or" and_test)*`
pub fn parse_or_test<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::OrTest, &[TokenKind::Or], parse_and_test)
}

/// Parses logical AND expressions.
///
/// Grammar: `and_test := not_test ("and" not_test)*`
pub fn parse_and_test<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::AndTest, &[TokenKind::And], parse_not_test)
}

/// Parses logical negation.
///
/// `not` binds looser than comparisons, so `not a == b` negates the whole
/// comparison.
///
/// Grammar: `not_test := "not" not_test | comparison`
pub fn parse_not_test<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let children = match accept(tokens, TokenKind::Not) {
        Some(keyword) => vec![keyword, parse_not_test(tokens)?],
        None => vec![parse_comparison(tokens)?],
    };
    Ok(ParseTree::node(Rule::NotTest, children))
}

/// Parses comparison chains.
///
/// Operators are kept in `CompOp` nodes because `not in` and `is not` span
/// two tokens. Chains such as `a < b < c` are folded left by the builder,
/// `(a < b) < c`, rather than expanded into a conjunction.
///
/// Grammar: `comparison := expr (comp_op expr)*`
///
/// # Errors
/// Returns a `ParseError` if an operand is malformed or `not` is not
/// followed by `in`.
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![parse_expr(tokens)?];
    while let Some(op) = parse_comp_op(tokens)? {
        children.push(op);
        children.push(parse_expr(tokens)?);
    }
    Ok(ParseTree::node(Rule::Comparison, children))
}

/// Grammar: `comp_op := "<" | ">" | "==" | ">=" | "<=" | "!=" | "in" | "not"
/// "in" | "is" ["not"]`
fn parse_comp_op<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<ParseTree>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let children = match peek_kind(tokens) {
        TokenKind::Less
        | TokenKind::Greater
        | TokenKind::EqualEqual
        | TokenKind::GreaterEqual
        | TokenKind::LessEqual
        | TokenKind::NotEqual
        | TokenKind::In => tokens.next().map(|t| ParseTree::Leaf(t.clone())).into_iter().collect(),
        TokenKind::Is => {
            let mut op = vec![expect(tokens, TokenKind::Is, "'is'")?];
            op.extend(accept(tokens, TokenKind::Not));
            op
        },
        TokenKind::Not => vec![expect(tokens, TokenKind::Not, "'not'")?,
                               expect(tokens, TokenKind::In, "'in' after 'not'")?],
        _ => return Ok(None),
    };
    Ok(Some(ParseTree::node(Rule::CompOp, children)))
}

/// Parses bitwise OR expressions.
///
/// Grammar: `expr := xor_expr ("|" xor_expr)*`
pub fn parse_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::Expr, &[TokenKind::Pipe], parse_xor_expr)
}

/// Grammar: `xor_expr := and_expr ("^" and_expr)*`
fn parse_xor_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::XorExpr, &[TokenKind::Caret], parse_and_expr)
}

/// Grammar: `and_expr := shift_expr ("&" shift_expr)*`
fn parse_and_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::AndExpr, &[TokenKind::Ampersand], parse_shift_expr)
}

/// Grammar: `shift_expr := arith_expr (("<<" | ">>") arith_expr)*`
fn parse_shift_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens,
                Rule::ShiftExpr,
                &[TokenKind::LeftShift, TokenKind::RightShift],
                parse_arith_expr)
}

/// Parses addition and subtraction expressions.
///
/// Grammar: `arith_expr := term (("+" | "-") term)*`
fn parse_arith_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens, Rule::ArithExpr, &[TokenKind::Plus, TokenKind::Minus], parse_term)
}

/// Parses multiplication-level expressions.
///
/// Grammar: `term := factor (("*" | "/" | "%") factor)*`
fn parse_term<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_level(tokens,
                Rule::Term,
                &[TokenKind::Star, TokenKind::Slash, TokenKind::Percent],
                parse_factor)
}
