use logos::Logos;

use crate::error::LexError;

/// Indentation tracking on top of the raw scanner.
///
/// Turns physical line breaks into `NEWLINE`, `INDENT` and `DEDENT` tokens and
/// appends the end-of-input sequence.
pub mod indent;

pub use indent::{Lexer, tokenize};

/// The kind of a lexical token.
///
/// Most variants are produced directly by the raw scanner. `Newline` is
/// scanned together with the indentation that follows it; `Indent`, `Dedent`
/// and `EndMarker` are only ever synthesized by [`Lexer`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Floating point literal such as `3.14`, `.5`, `2.` or `1e-3`.
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,
    /// Integer literal in decimal, hexadecimal, octal or binary notation.
    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    #[regex(r"0[oO][0-7]+")]
    #[regex(r"0[bB][01]+")]
    Integer,
    /// Single or double quoted string literal, quotes included.
    #[regex(r#""([^"\\\r\n]|\\.)*""#)]
    #[regex(r"'([^'\\\r\n]|\\.)*'")]
    String,
    /// `def`
    #[token("def")]
    Def,
    /// `return`
    #[token("return")]
    Return,
    /// `if`
    #[token("if")]
    If,
    /// `elif`
    #[token("elif")]
    Elif,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `in`
    #[token("in")]
    In,
    /// `not`
    #[token("not")]
    Not,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `is`
    #[token("is")]
    Is,
    /// `pass`
    #[token("pass")]
    Pass,
    /// `break`
    #[token("break")]
    Break,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `None`
    #[token("None")]
    NoneConst,
    /// `True`
    #[token("True")]
    TrueConst,
    /// `False`
    #[token("False")]
    FalseConst,
    /// Identifiers such as `x` or `square`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Name,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `&=`
    #[token("&=")]
    AmpersandAssign,
    /// `|=`
    #[token("|=")]
    PipeAssign,
    /// `^=`
    #[token("^=")]
    CaretAssign,
    /// `<<=`
    #[token("<<=")]
    LeftShiftAssign,
    /// `>>=`
    #[token(">>=")]
    RightShiftAssign,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `<<`
    #[token("<<")]
    LeftShift,
    /// `>>`
    #[token(">>")]
    RightShift,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `^`
    #[token("^")]
    Caret,
    /// `|`
    #[token("|")]
    Pipe,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `!=`
    #[token("!=")]
    NotEqual,
    /// `=`
    #[token("=")]
    Equals,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `,`
    #[token(",")]
    Comma,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `.`
    #[token(".")]
    Dot,
    /// A physical line break plus the indentation of the following line.
    #[regex(r"(\r\n|\r|\n)[ \t\x0C]*")]
    Newline,
    /// `# comments`
    #[regex(r"#[^\r\n]*", logos::skip)]
    Comment,
    /// Backslash line continuation.
    #[regex(r"\\(\r\n|\r|\n)", logos::skip)]
    Continuation,
    /// Blanks between tokens.
    #[regex(r"[ \t\x0C]+", logos::skip)]
    Ignored,
    /// Start of a more deeply indented block.
    Indent,
    /// End of an indented block.
    Dedent,
    /// End of input.
    EndMarker,
}

impl TokenKind {
    /// Human readable description used in diagnostics.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Float | Self::Integer => "number",
            Self::String => "string",
            Self::Name => "name",
            Self::Newline => "NEWLINE",
            Self::Indent => "INDENT",
            Self::Dedent => "DEDENT",
            Self::EndMarker => "end of input",
            Self::Comment | Self::Continuation | Self::Ignored => "whitespace",
            _ => "operator or keyword",
        }
    }

    /// Returns `true` for `(`, `[` and `{`.
    #[must_use]
    pub const fn opens_bracket(self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    /// Returns `true` for `)`, `]` and `}`.
    #[must_use]
    pub const fn closes_bracket(self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }

    /// Returns `true` for the compound assignment operators such as `+=`.
    #[must_use]
    pub const fn is_augmented_assign(self) -> bool {
        matches!(self,
                 Self::PlusAssign
                 | Self::MinusAssign
                 | Self::StarAssign
                 | Self::SlashAssign
                 | Self::PercentAssign
                 | Self::AmpersandAssign
                 | Self::PipeAssign
                 | Self::CaretAssign
                 | Self::LeftShiftAssign
                 | Self::RightShiftAssign)
    }

    /// Returns `true` if an expression may begin with this token.
    #[must_use]
    pub const fn starts_expression(self) -> bool {
        matches!(self,
                 Self::Name
                 | Self::Integer
                 | Self::Float
                 | Self::String
                 | Self::NoneConst
                 | Self::TrueConst
                 | Self::FalseConst
                 | Self::LParen
                 | Self::LBracket
                 | Self::LBrace
                 | Self::Plus
                 | Self::Minus
                 | Self::Not)
    }
}

/// A lexical token with its literal text and source position.
///
/// Lines are 1-based, columns are 0-based byte offsets into the line.
/// Tokens are never modified after they are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// What kind of token this is.
    pub kind:   TokenKind,
    /// The source text the token was scanned from (empty for synthesized
    /// `INDENT`/`DEDENT`/`EndMarker`).
    pub text:   String,
    /// Source line.
    pub line:   usize,
    /// Column on the source line.
    pub column: usize,
}

impl Token {
    /// Creates a token.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self { kind,
               text: text.into(),
               line,
               column }
    }

    /// Describes the token for error messages, e.g. `'('` or `NEWLINE`.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Newline
            | TokenKind::Indent
            | TokenKind::Dedent
            | TokenKind::EndMarker => self.kind.describe().to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f,
               "{:?} {} at ({}, {})",
               self.kind,
               self.text.escape_debug(),
               self.line,
               self.column)
    }
}

/// Maps byte offsets to `(line, column)` pairs.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    starts.push(i + 2);
                    i += 1;
                },
                b'\r' | b'\n' => starts.push(i + 1),
                _ => {},
            }
            i += 1;
        }
        Self { starts }
    }

    fn position(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset);
        (line, offset - self.starts[line - 1])
    }
}

/// The raw scanner: `logos` tokens with positions, before indentation
/// processing.
pub(crate) struct RawScanner<'src> {
    inner: logos::Lexer<'src, TokenKind>,
    lines: LineIndex,
}

impl<'src> RawScanner<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Self { inner: TokenKind::lexer(source),
               lines: LineIndex::new(source), }
    }
}

impl Iterator for RawScanner<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?;
        let (line, column) = self.lines.position(self.inner.span().start);
        let text = self.inner.slice().to_string();

        Some(match kind {
                 Ok(kind) => Ok(Token { kind,
                                        text,
                                        line,
                                        column }),
                 Err(()) => Err(LexError::UnexpectedCharacter { text,
                                                                line,
                                                                column }),
             })
    }
}
