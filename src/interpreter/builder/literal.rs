use crate::{
    ast::LiteralValue,
    error::RuntimeError,
    interpreter::lexer::{Token, TokenKind},
};

/// Converts a numeric token into its value.
///
/// Integers may be written in decimal or with a `0x`, `0o` or `0b` prefix.
///
/// # Errors
/// Returns an `ArithmeticError` if an integer does not fit into `i64`, and a
/// `SyntaxError` for a token that is not a valid number.
///
/// # Example
/// ```
/// use pyrite::{
///     ast::LiteralValue,
///     interpreter::{
///         builder::literal::number,
///         lexer::{Token, TokenKind},
///     },
/// };
///
/// let token = Token::new(TokenKind::Integer, "0x1F", 1, 0);
/// assert_eq!(number(&token), Ok(LiteralValue::Integer(31)));
/// ```
pub fn number(token: &Token) -> Result<LiteralValue, RuntimeError> {
    let text = token.text.as_str();
    if token.kind == TokenKind::Float {
        return text.parse::<f64>()
                   .map(LiteralValue::Real)
                   .map_err(|_| invalid(token));
    }

    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        Some("0o" | "0O") => (&text[2..], 8),
        Some("0b" | "0B") => (&text[2..], 2),
        _ => (text, 10),
    };
    i64::from_str_radix(digits, radix).map(LiteralValue::Integer)
                                      .map_err(|e| match e.kind() {
                                          std::num::IntErrorKind::PosOverflow
                                          | std::num::IntErrorKind::NegOverflow => {
                                              RuntimeError::ArithmeticError { details: format!("integer literal {text} is too large"),
                                                                              line:    token.line, }
                                          },
                                          _ => invalid(token),
                                      })
}

fn invalid(token: &Token) -> RuntimeError {
    RuntimeError::SyntaxError { details: format!("invalid numeric literal '{}'", token.text),
                                line:    token.line, }
}

/// Strips the quotes from a string token and resolves its escape
/// sequences.
///
/// Unknown escapes are kept verbatim, backslash included.
///
/// # Errors
/// Returns a `SyntaxError` for a malformed `\x` escape.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     builder::literal::string,
///     lexer::{Token, TokenKind},
/// };
///
/// let token = Token::new(TokenKind::String, r#"'a\tb\q'"#, 1, 0);
/// assert_eq!(string(&token).unwrap(), "a\tb\\q");
/// ```
pub fn string(token: &Token) -> Result<String, RuntimeError> {
    let text = token.text.as_str();
    let inner = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0C'),
            Some('v') => out.push('\x0B'),
            Some(quote @ ('\\' | '\'' | '"')) => out.push(quote),
            Some('x') => {
                let hex: String = chars.by_ref().take(2).collect();
                let code = Some(hex).filter(|h| h.len() == 2)
                                    .and_then(|h| u8::from_str_radix(&h, 16).ok())
                                    .ok_or_else(|| RuntimeError::SyntaxError { details: format!("truncated \\x escape in {text}"),
                                                                               line:    token.line, })?;
                out.push(char::from(code));
            },
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    Ok(out)
}
