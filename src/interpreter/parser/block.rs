use std::iter::Peekable;

use crate::interpreter::{
    lexer::{Token, TokenKind},
    parser::{
        binary::parse_expr,
        core::{ParseResult, parse_test},
        statement::{parse_simple_stmt, parse_stmt},
        tree::{ParseTree, Rule},
        utils::{accept, expect, finish_item, peek_kind, unexpected},
    },
};

/// Parses a compound statement: `if`, `while`, `for` or `def`.
///
/// Grammar: `compound_stmt := if_stmt | while_stmt | for_stmt | funcdef`
///
/// # Errors
/// Returns a `ParseError` if the statement is malformed, or
/// `UnexpectedEndOfInput` if its body has not been supplied yet.
pub fn parse_compound_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let inner = match peek_kind(tokens) {
        TokenKind::If => parse_if_stmt(tokens)?,
        TokenKind::While => parse_while_stmt(tokens)?,
        TokenKind::For => parse_for_stmt(tokens)?,
        TokenKind::Def => parse_funcdef(tokens)?,
        _ => return Err(unexpected(tokens.next(), "compound statement")),
    };
    Ok(ParseTree::node(Rule::CompoundStmt, vec![inner]))
}

/// Parses a conditional with its `elif` and `else` arms.
///
/// Each arm becomes its own child node; the tree builder folds them into
/// nested conditionals.
///
/// Grammar: `if_stmt := "if" test ":" suite ("elif" test ":" suite)* ["else"
/// ":" suite]`
fn parse_if_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![expect(tokens, TokenKind::If, "'if'")?,
                            parse_test(tokens)?,
                            expect(tokens, TokenKind::Colon, "':'")?,
                            parse_suite(tokens)?];

    while let Some(keyword) = accept(tokens, TokenKind::Elif) {
        let arm = vec![keyword,
                       parse_test(tokens)?,
                       expect(tokens, TokenKind::Colon, "':'")?,
                       parse_suite(tokens)?];
        children.push(ParseTree::node(Rule::IfElif, arm));
    }

    if let Some(keyword) = accept(tokens, TokenKind::Else) {
        let arm = vec![keyword,
                       expect(tokens, TokenKind::Colon, "':'")?,
                       parse_suite(tokens)?];
        children.push(ParseTree::node(Rule::IfElse, arm));
    }

    Ok(ParseTree::node(Rule::IfStmt, children))
}

/// Grammar: `while_stmt := "while" test ":" suite [loop_else]`
fn parse_while_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![expect(tokens, TokenKind::While, "'while'")?,
                            parse_test(tokens)?,
                            expect(tokens, TokenKind::Colon, "':'")?,
                            parse_suite(tokens)?];
    if let Some(orelse) = parse_loop_else(tokens)? {
        children.push(orelse);
    }
    Ok(ParseTree::node(Rule::WhileStmt, children))
}

/// The loop target is parsed at bitwise-or precedence so the `in` keyword is
/// not taken for a membership test.
///
/// Grammar: `for_stmt := "for" expr "in" test ":" suite [loop_else]`
fn parse_for_stmt<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut children = vec![expect(tokens, TokenKind::For, "'for'")?,
                            parse_expr(tokens)?,
                            expect(tokens, TokenKind::In, "'in'")?,
                            parse_test(tokens)?,
                            expect(tokens, TokenKind::Colon, "':'")?,
                            parse_suite(tokens)?];
    if let Some(orelse) = parse_loop_else(tokens)? {
        children.push(orelse);
    }
    Ok(ParseTree::node(Rule::ForStmt, children))
}

fn parse_loop_else<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Option<ParseTree>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(keyword) = accept(tokens, TokenKind::Else) else {
        return Ok(None);
    };
    let children = vec![keyword,
                        expect(tokens, TokenKind::Colon, "':'")?,
                        parse_suite(tokens)?];
    Ok(Some(ParseTree::node(Rule::LoopElse, children)))
}

/// Parses a function definition.
///
/// Grammar: `funcdef := "def" NAME "(" [NAME ("," NAME)* [","]] ")" ":"
/// suite`
fn parse_funcdef<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let keyword = expect(tokens, TokenKind::Def, "'def'")?;
    let name = expect(tokens, TokenKind::Name, "function name")?;

    let mut params = vec![expect(tokens, TokenKind::LParen, "'('")?];
    loop {
        if let Some(close) = accept(tokens, TokenKind::RParen) {
            params.push(close);
            break;
        }
        let param = expect(tokens, TokenKind::Name, "parameter name")?;
        params.push(ParseTree::node(Rule::Name, vec![param]));
        finish_item(tokens, TokenKind::RParen, &mut params)?;
        if params.last().is_some_and(|p| p.is_token(TokenKind::RParen)) {
            break;
        }
    }

    let children = vec![keyword,
                        ParseTree::node(Rule::Name, vec![name]),
                        ParseTree::node(Rule::Parameters, params),
                        expect(tokens, TokenKind::Colon, "':'")?,
                        parse_suite(tokens)?];
    Ok(ParseTree::node(Rule::FuncDef, children))
}

/// Parses the body of a compound statement.
///
/// Either the rest of the current line, or an indented block of one or more
/// statements.
///
/// Grammar: `suite := simple_stmt | NEWLINE INDENT stmt+ DEDENT`
fn parse_suite<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(newline) = accept(tokens, TokenKind::Newline) else {
        return Ok(ParseTree::node(Rule::Suite, vec![parse_simple_stmt(tokens)?]));
    };

    let mut children = vec![newline, expect(tokens, TokenKind::Indent, "an indented block")?];
    loop {
        if let Some(dedent) = accept(tokens, TokenKind::Dedent) {
            children.push(dedent);
            break;
        }
        children.push(parse_stmt(tokens)?);
    }
    Ok(ParseTree::node(Rule::Suite, children))
}
