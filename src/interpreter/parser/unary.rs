use std::iter::Peekable;

use crate::interpreter::{
    lexer::{Token, TokenKind},
    parser::{
        core::{ParseResult, parse_test},
        tree::{ParseTree, Rule},
        utils::{accept, expect, finish_item, parse_comma_separated, peek_kind, unexpected},
    },
};

/// Parses unary plus and minus.
///
/// Grammar: `factor := ("+" | "-") factor | atom_expr`
///
/// # Parameters
/// - `tokens`: Token stream.
///
/// # Returns
/// A `Factor` node with either an operator and a nested factor, or a single
/// primary expression.
pub fn parse_factor<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let children = match tokens.next_if(|t| matches!(t.kind, TokenKind::Plus | TokenKind::Minus)) {
        Some(op) => vec![ParseTree::Leaf(op.clone()), parse_factor(tokens)?],
        None => vec![parse_atom_expr(tokens)?],
    };
    Ok(ParseTree::node(Rule::Factor, children))
}

/// Parses an atom followed by any number of trailers.
///
/// Each trailer wraps the tree built so far, so `f(x)[0].y` nests as an
/// attribute reference around a subscription around a call.
///
/// Grammar:
/// ```text
/// atom_expr := atom trailer*
/// trailer   := "(" [arglist] ")" | "[" subscript "]" | "." NAME
/// ```
fn parse_atom_expr<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut tree = parse_atom(tokens)?;
    loop {
        tree = match peek_kind(tokens) {
            TokenKind::LParen => {
                let mut children = vec![tree, expect(tokens, TokenKind::LParen, "'('")?];
                if let Some(close) = accept(tokens, TokenKind::RParen) {
                    children.push(close);
                } else {
                    let mut args = Vec::new();
                    parse_comma_separated(tokens, parse_test, TokenKind::RParen, &mut args)?;
                    let close = args.pop();
                    children.push(ParseTree::node(Rule::ArgList, args));
                    children.extend(close);
                }
                ParseTree::node(Rule::Call, children)
            },
            TokenKind::LBracket => {
                let children = vec![tree,
                                    expect(tokens, TokenKind::LBracket, "'['")?,
                                    parse_subscript(tokens)?,
                                    expect(tokens, TokenKind::RBracket, "']'")?];
                ParseTree::node(Rule::Subscription, children)
            },
            TokenKind::Dot => {
                let dot = expect(tokens, TokenKind::Dot, "'.'")?;
                let name = expect(tokens, TokenKind::Name, "attribute name")?;
                ParseTree::node(Rule::AttributeRef,
                                vec![tree, dot, ParseTree::node(Rule::Name, vec![name])])
            },
            _ => return Ok(tree),
        };
    }
}

/// Parses the inside of a subscription.
///
/// A plain expression becomes a `SubscriptIndex`. Anything with a colon
/// becomes a `SubscriptSlice` holding up to three optional bounds separated
/// by colon leaves.
///
/// Grammar: `subscript := test | [test] ":" [test] [":" [test]]`
fn parse_subscript<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = Vec::new();
    if peek_kind(tokens) != TokenKind::Colon {
        let index = parse_test(tokens)?;
        if peek_kind(tokens) != TokenKind::Colon {
            return Ok(ParseTree::node(Rule::SubscriptIndex, vec![index]));
        }
        children.push(index);
    }

    for _ in 0..2 {
        let Some(colon) = accept(tokens, TokenKind::Colon) else {
            break;
        };
        children.push(colon);
        if peek_kind(tokens).starts_expression() {
            children.push(parse_test(tokens)?);
        }
    }
    Ok(ParseTree::node(Rule::SubscriptSlice, children))
}

/// Parses a primary expression: a literal, a name or a bracketed display.
///
/// Grammar:
/// ```text
/// atom := "(" [test | testlist] ")" | "[" [testlist] "]" | "{" [dict | set] "}"
///       | NUMBER | STRING+ | NAME | "None" | "True" | "False"
/// ```
///
/// # Errors
/// Returns a `ParseError` if no expression can start at the next token.
fn parse_atom<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    match peek_kind(tokens) {
        TokenKind::LParen => parse_parenthesized(tokens),
        TokenKind::LBracket => {
            let mut children = vec![expect(tokens, TokenKind::LBracket, "'['")?];
            parse_comma_separated(tokens, parse_test, TokenKind::RBracket, &mut children)?;
            Ok(ParseTree::node(Rule::ListMaker, children))
        },
        TokenKind::LBrace => parse_braced(tokens),
        TokenKind::Integer | TokenKind::Float => leaf_node(tokens, Rule::Number),
        TokenKind::Name => leaf_node(tokens, Rule::Name),
        TokenKind::NoneConst | TokenKind::TrueConst | TokenKind::FalseConst => {
            leaf_node(tokens, Rule::NameConstant)
        },
        TokenKind::String => {
            let mut parts = Vec::new();
            while let Some(part) = accept(tokens, TokenKind::String) {
                parts.push(part);
            }
            Ok(ParseTree::node(Rule::StringLiteral, parts))
        },
        _ => Err(unexpected(tokens.next(), "expression")),
    }
}

fn leaf_node<'a, I>(tokens: &mut Peekable<I>, rule: Rule) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) => Ok(ParseTree::node(rule, vec![ParseTree::Leaf(token.clone())])),
        None => Err(unexpected(None, "expression")),
    }
}

/// Parses `( )`, `(test)` or a tuple display `(a, b, ...)`.
fn parse_parenthesized<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![expect(tokens, TokenKind::LParen, "'('")?];
    if let Some(close) = accept(tokens, TokenKind::RParen) {
        children.push(close);
        return Ok(ParseTree::node(Rule::TupleMaker, children));
    }

    children.push(parse_test(tokens)?);
    if let Some(close) = accept(tokens, TokenKind::RParen) {
        children.push(close);
        return Ok(ParseTree::node(Rule::ParenExpr, children));
    }

    finish_item(tokens, TokenKind::RParen, &mut children)?;
    parse_comma_separated(tokens, parse_test, TokenKind::RParen, &mut children)?;
    Ok(ParseTree::node(Rule::TupleMaker, children))
}

/// Parses a dict display `{k: v, ...}` or a set display `{a, ...}`.
///
/// The first element decides which one it is. `{}` is an empty dict.
fn parse_braced<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![expect(tokens, TokenKind::LBrace, "'{'")?];
    if let Some(close) = accept(tokens, TokenKind::RBrace) {
        children.push(close);
        return Ok(ParseTree::node(Rule::DictMaker, children));
    }

    let first = parse_test(tokens)?;
    let rule = if let Some(colon) = accept(tokens, TokenKind::Colon) {
        let value = parse_test(tokens)?;
        children.push(ParseTree::node(Rule::DictEntry, vec![first, colon, value]));
        finish_item(tokens, TokenKind::RBrace, &mut children)?;
        if !children.last().is_some_and(|c| c.is_token(TokenKind::RBrace)) {
            parse_comma_separated(tokens, parse_dict_entry, TokenKind::RBrace, &mut children)?;
        }
        Rule::DictMaker
    } else {
        children.push(first);
        finish_item(tokens, TokenKind::RBrace, &mut children)?;
        if !children.last().is_some_and(|c| c.is_token(TokenKind::RBrace)) {
            parse_comma_separated(tokens, parse_test, TokenKind::RBrace, &mut children)?;
        }
        Rule::SetMaker
    };
    Ok(ParseTree::node(rule, children))
}

/// Grammar: `dict_entry := test ":" test`
fn parse_dict_entry<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let children = vec![parse_test(tokens)?,
                        expect(tokens, TokenKind::Colon, "':'")?,
                        parse_test(tokens)?];
    Ok(ParseTree::node(Rule::DictEntry, children))
}
