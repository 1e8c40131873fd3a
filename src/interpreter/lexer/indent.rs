use std::{collections::VecDeque, iter::Peekable};

use tracing::{debug, trace};

use crate::{
    error::LexError,
    interpreter::lexer::{RawScanner, Token, TokenKind},
};

/// Tab stops are every eight columns.
const TAB_WIDTH: usize = 8;

/// Converts source text into a token stream with synthesized block structure.
///
/// Tokens are pulled from the raw scanner one at a time. Whenever a physical
/// line break ends a logical line, the indentation of the next line is
/// compared with the indentation stack:
///
/// - equal: only a `NEWLINE` is emitted,
/// - greater: the width is pushed and an `INDENT` follows the `NEWLINE`,
/// - smaller: one `DEDENT` per popped level; the width must then match the
///   new top of the stack or an indentation error is raised.
///
/// Blank and comment-only lines never touch the stack, and line breaks inside
/// brackets are invisible. At end of input a `NEWLINE` is added if the last
/// line was not terminated, every open block is closed with a `DEDENT` and
/// `EndMarker` is emitted. If the input ended with an empty line, an extra
/// `NEWLINE` precedes the `EndMarker` so interactive input can tell that a
/// compound statement was finished.
pub struct Lexer<'src> {
    raw:              Peekable<RawScanner<'src>>,
    indents:          Vec<usize>,
    pending:          VecDeque<Token>,
    opened:           usize,
    last:             Option<Token>,
    line_has_content: bool,
    newline_run:      usize,
    finished:         bool,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { raw:              RawScanner::new(source).peekable(),
               indents:          vec![0],
               pending:          VecDeque::new(),
               opened:           0,
               last:             None,
               line_has_content: false,
               newline_run:      0,
               finished:         false, }
    }

    /// Number of brackets opened and not yet closed.
    #[must_use]
    pub const fn open_brackets(&self) -> usize {
        self.opened
    }

    /// Returns the next token.
    ///
    /// Once the input is exhausted this keeps returning `EndMarker`.
    ///
    /// # Errors
    /// Returns a [`LexError`] for characters that start no token and for
    /// dedents that do not match an enclosing indentation level.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(self.emit(token));
            }
            if self.finished {
                let line = self.last.as_ref().map_or(1, |t| t.line);
                return Ok(Token::new(TokenKind::EndMarker, "", line, 0));
            }
            match self.raw.next() {
                None => self.finish(),
                Some(Err(e)) => return Err(e),
                Some(Ok(token)) => self.process(token)?,
            }
        }
    }

    fn emit(&mut self, token: Token) -> Token {
        match token.kind {
            TokenKind::Newline => self.line_has_content = false,
            TokenKind::Indent | TokenKind::Dedent | TokenKind::EndMarker => {},
            _ => self.line_has_content = true,
        }
        trace!(token = %token, "token");
        self.last = Some(token.clone());
        token
    }

    fn process(&mut self, token: Token) -> Result<(), LexError> {
        if token.kind != TokenKind::Newline {
            self.newline_run = 0;
            if token.kind.opens_bracket() {
                self.opened += 1;
            } else if token.kind.closes_bracket() {
                self.opened = self.opened.saturating_sub(1);
            }
            self.pending.push_back(token);
            return Ok(());
        }

        self.newline_run += 1;
        if self.opened > 0 || !self.line_has_content {
            return Ok(());
        }
        // A following line break means this line is blank or comment-only;
        // end of input is handled by `finish`.
        match self.raw.peek() {
            None | Some(Ok(Token { kind: TokenKind::Newline, .. })) => return Ok(()),
            Some(_) => {},
        }

        self.pending
            .push_back(Token::new(TokenKind::Newline, "\n", token.line, token.column));
        let spaces = token.text.trim_start_matches(['\r', '\n']);
        self.indent_to(indentation_width(spaces), spaces, token.line + 1)
    }

    fn indent_to(&mut self, width: usize, spaces: &str, line: usize) -> Result<(), LexError> {
        let current = self.indents.last().copied().unwrap_or(0);

        if width > current {
            self.indents.push(width);
            self.pending.push_back(Token::new(TokenKind::Indent, spaces, line, 0));
        } else if width < current {
            while self.indents.last().is_some_and(|&top| top > width) {
                self.indents.pop();
                self.pending.push_back(Token::new(TokenKind::Dedent, "", line, 0));
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(LexError::Indentation { line });
            }
        }
        Ok(())
    }

    fn finish(&mut self) {
        self.finished = true;
        let line = self.last.as_ref().map_or(1, |t| t.line);

        // With brackets still open the input is unfinished: no statement
        // terminator and no block closing, so the parser runs into the end.
        if self.opened == 0 {
            if self.line_has_content {
                self.pending.push_back(Token::new(TokenKind::Newline, "\n", line, 0));
            }
            while self.indents.len() > 1 {
                self.indents.pop();
                self.pending.push_back(Token::new(TokenKind::Dedent, "", line, 0));
            }
            if self.newline_run >= 2 && self.last.is_some() {
                self.pending.push_back(Token::new(TokenKind::Newline, "\n", line, 0));
            }
        }
        self.pending.push_back(Token::new(TokenKind::EndMarker, "", line, 0));
    }
}

/// Computes the width of leading whitespace, expanding each tab to the next
/// multiple of eight.
///
/// ## Example
/// ```
/// use pyrite::interpreter::lexer::indent::indentation_width;
///
/// assert_eq!(indentation_width("    "), 4);
/// assert_eq!(indentation_width("\t"), 8);
/// assert_eq!(indentation_width("  \t"), 8);
/// assert_eq!(indentation_width("\t  "), 10);
/// ```
#[must_use]
pub fn indentation_width(spaces: &str) -> usize {
    spaces.chars().fold(0, |count, ch| match ch {
                      '\t' => count + TAB_WIDTH - count % TAB_WIDTH,
                      _ => count + 1,
                  })
}

/// Tokenizes the whole source, up to and including the `EndMarker`.
///
/// # Errors
/// Returns the first [`LexError`] encountered.
///
/// # Examples
/// ```
/// use pyrite::interpreter::lexer::{TokenKind, tokenize};
///
/// let kinds: Vec<TokenKind> = tokenize("if x:\n    y\n").unwrap()
///                                                        .into_iter()
///                                                        .map(|t| t.kind)
///                                                        .collect();
/// assert_eq!(kinds,
///            vec![TokenKind::If,
///                 TokenKind::Name,
///                 TokenKind::Colon,
///                 TokenKind::Newline,
///                 TokenKind::Indent,
///                 TokenKind::Name,
///                 TokenKind::Newline,
///                 TokenKind::Dedent,
///                 TokenKind::EndMarker]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::EndMarker;
        tokens.push(token);
        if done {
            break;
        }
    }

    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
