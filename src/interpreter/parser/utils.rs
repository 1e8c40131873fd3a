use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, tree::ParseTree},
    },
};

/// Kind of the next token without consuming it.
///
/// A drained iterator reads as `EndMarker`, which is what the lexer always
/// puts last anyway.
pub(in crate::interpreter::parser) fn peek_kind<'a, I>(tokens: &mut Peekable<I>) -> TokenKind
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(TokenKind::EndMarker, |t| t.kind)
}

/// Builds the error for a token the grammar did not expect.
///
/// Hitting the end marker produces [`ParseError::UnexpectedEndOfInput`] so
/// that callers can tell incomplete input from invalid input.
pub(in crate::interpreter::parser) fn unexpected(token: Option<&Token>,
                                                 expected: &str)
                                                 -> ParseError {
    match token {
        Some(token) if token.kind != TokenKind::EndMarker => {
            ParseError::UnexpectedToken { token:    token.describe(),
                                          expected: expected.to_string(),
                                          line:     token.line, }
        },
        Some(token) => ParseError::UnexpectedEndOfInput { line: token.line },
        None => ParseError::UnexpectedEndOfInput { line: 0 },
    }
}

/// Consumes a token of the given kind and returns it as a leaf.
///
/// # Errors
/// Returns a `ParseError` naming `expected` if the next token has any other
/// kind.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<ParseTree>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == kind => Ok(ParseTree::Leaf(token.clone())),
        other => Err(unexpected(other, expected)),
    }
}

/// Consumes the next token only if it has the given kind.
pub(in crate::interpreter::parser) fn accept<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: TokenKind)
                                                    -> Option<ParseTree>
    where I: Iterator<Item = &'a Token>
{
    tokens.next_if(|t| t.kind == kind)
          .map(|t| ParseTree::Leaf(t.clone()))
}

/// Parses the rest of a bracketed, comma-separated list whose opening bracket
/// has already been pushed onto `children`.
///
/// Items, commas and the closing bracket are all appended as children. A
/// trailing comma before the closing bracket is allowed, and an immediately
/// encountered closing bracket yields an empty list.
///
/// Grammar (simplified): `list := [item ("," item)* [","]] closing`
///
/// # Errors
/// Returns a `ParseError` if an item fails to parse or a token other than a
/// comma or `closing` follows an item.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<ParseTree>,
    closing: TokenKind,
    children: &mut Vec<ParseTree>)
    -> ParseResult<()>
    where I: Iterator<Item = &'a Token> + Clone
{
    loop {
        if let Some(close) = accept(tokens, closing) {
            children.push(close);
            return Ok(());
        }
        children.push(parse_item(tokens)?);
        finish_item(tokens, closing, children)?;
        if children.last().is_some_and(|c| c.is_token(closing)) {
            return Ok(());
        }
    }
}

/// Consumes the separator after a list item: either a comma or the closing
/// bracket.
///
/// # Errors
/// Returns a `ParseError` for any other token.
pub(in crate::interpreter::parser) fn finish_item<'a, I>(tokens: &mut Peekable<I>,
                                                         closing: TokenKind,
                                                         children: &mut Vec<ParseTree>)
                                                         -> ParseResult<()>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == TokenKind::Comma || token.kind == closing => {
            children.push(ParseTree::Leaf(token.clone()));
            Ok(())
        },
        other => {
            let expected = format!("',' or {}", closing_text(closing));
            Err(unexpected(other, &expected))
        },
    }
}

const fn closing_text(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::RParen => "')'",
        TokenKind::RBracket => "']'",
        TokenKind::RBrace => "'}'",
        _ => "closing bracket",
    }
}

/// Deepest combined block, bracket and prefix-operator nesting accepted.
pub const MAX_NESTING: usize = 100;

/// Most binary operators, attribute lookups, calls and subscripts one
/// logical line may chain together.
pub const MAX_CHAIN: usize = 500;

/// Rejects token streams whose trees would nest too deeply to parse, build
/// or evaluate on the native stack.
///
/// Runs over the flat token stream before any recursive descent starts.
///
/// # Errors
/// Returns [`ParseError::TooDeeplyNested`] on the first token that exceeds
/// [`MAX_NESTING`] or [`MAX_CHAIN`].
pub(in crate::interpreter::parser) fn check_nesting(tokens: &[Token]) -> ParseResult<()> {
    let (mut blocks, mut brackets, mut prefixes, mut chain) = (0_usize, 0_usize, 0_usize, 0_usize);
    let mut previous: Option<TokenKind> = None;

    for token in tokens {
        let after_operand = previous.is_some_and(ends_operand);
        let prefix = matches!(token.kind, TokenKind::Plus | TokenKind::Minus | TokenKind::Not) && !after_operand;
        prefixes = if prefix { prefixes + 1 } else { 0 };

        match token.kind {
            TokenKind::Indent => blocks += 1,
            TokenKind::Dedent => blocks = blocks.saturating_sub(1),
            TokenKind::Newline => chain = 0,
            TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => {
                brackets += 1;
                if after_operand {
                    chain += 1;
                }
            },
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                brackets = brackets.saturating_sub(1);
            },
            kind if !prefix && chains(kind) => chain += 1,
            _ => {},
        }

        if blocks + brackets + prefixes > MAX_NESTING {
            return Err(ParseError::TooDeeplyNested { limit: MAX_NESTING,
                                                     line:  token.line, });
        }
        if chain > MAX_CHAIN {
            return Err(ParseError::TooDeeplyNested { limit: MAX_CHAIN,
                                                     line:  token.line, });
        }
        previous = Some(token.kind);
    }
    Ok(())
}

const fn ends_operand(kind: TokenKind) -> bool {
    matches!(kind,
             TokenKind::Name
             | TokenKind::Integer
             | TokenKind::Float
             | TokenKind::String
             | TokenKind::NoneConst
             | TokenKind::TrueConst
             | TokenKind::FalseConst
             | TokenKind::RParen
             | TokenKind::RBracket
             | TokenKind::RBrace)
}

/// Tokens that add one level to the tree of the expression they appear in.
const fn chains(kind: TokenKind) -> bool {
    matches!(kind,
             TokenKind::Plus
             | TokenKind::Minus
             | TokenKind::Star
             | TokenKind::Slash
             | TokenKind::Percent
             | TokenKind::LeftShift
             | TokenKind::RightShift
             | TokenKind::Ampersand
             | TokenKind::Caret
             | TokenKind::Pipe
             | TokenKind::Less
             | TokenKind::Greater
             | TokenKind::EqualEqual
             | TokenKind::GreaterEqual
             | TokenKind::LessEqual
             | TokenKind::NotEqual
             | TokenKind::And
             | TokenKind::Or
             | TokenKind::Not
             | TokenKind::Is
             | TokenKind::In
             | TokenKind::Dot)
}
