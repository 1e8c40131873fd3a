use pretty_assertions::assert_eq;
use pyrite::{
    error::LexError,
    interpreter::lexer::{TokenKind, tokenize},
};

fn kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src).unwrap_or_else(|e| panic!("Failed to tokenize: {e}"))
                 .into_iter()
                 .map(|t| t.kind)
                 .collect()
}

fn count(kinds: &[TokenKind], kind: TokenKind) -> usize {
    kinds.iter().filter(|k| **k == kind).count()
}

#[test]
fn indents_and_dedents_balance() {
    let sources = ["if a:\n    b\n",
                   "if a:\n    if b:\n        c\n    d\ne\n",
                   "def f():\n    while x:\n        for y in z:\n            pass\n",
                   "if a:\n  b\n    \n  # comment\n  c\n",
                   "if a:\n\tb\n\tif c:\n\t\td"];
    for src in sources {
        let kinds = kinds(src);
        assert_eq!(count(&kinds, TokenKind::Indent),
                   count(&kinds, TokenKind::Dedent),
                   "unbalanced blocks in {src:?}");
        assert_eq!(kinds.last(), Some(&TokenKind::EndMarker));
    }
}

#[test]
fn nested_blocks_close_at_end_of_input() {
    assert_eq!(kinds("if a:\n    if b:\n        c"),
               vec![TokenKind::If,
                    TokenKind::Name,
                    TokenKind::Colon,
                    TokenKind::Newline,
                    TokenKind::Indent,
                    TokenKind::If,
                    TokenKind::Name,
                    TokenKind::Colon,
                    TokenKind::Newline,
                    TokenKind::Indent,
                    TokenKind::Name,
                    TokenKind::Newline,
                    TokenKind::Dedent,
                    TokenKind::Dedent,
                    TokenKind::EndMarker]);
}

#[test]
fn blank_and_comment_lines_are_invisible() {
    assert_eq!(kinds("x\n\n   \n# note\ny\n"), kinds("x\ny\n"));
}

#[test]
fn inconsistent_dedent_is_an_indentation_error() {
    let err = tokenize("if a:\n        b\n    c\n").unwrap_err();
    assert!(matches!(err, LexError::Indentation { line: 3 }), "got {err:?}");
}

#[test]
fn tabs_expand_to_multiples_of_eight() {
    // A tab and eight spaces are the same level.
    let kinds = kinds("if a:\n\tb\n        c\n");
    assert_eq!(count(&kinds, TokenKind::Indent), 1);
}

#[test]
fn line_breaks_inside_brackets_are_ignored() {
    let kinds = kinds("x = [1,\n      2,\n  3]\n");
    assert_eq!(count(&kinds, TokenKind::Newline), 1);
    assert_eq!(count(&kinds, TokenKind::Indent), 0);
}

#[test]
fn backslash_continues_a_line() {
    assert_eq!(kinds("x = 1 + \\\n    2\n"), kinds("x = 1 + 2\n"));
}

#[test]
fn unclosed_bracket_does_not_end_the_line() {
    let kinds = kinds("x = (1,\n");
    assert_eq!(count(&kinds, TokenKind::Newline), 0);
}

#[test]
fn trailing_blank_line_adds_a_newline() {
    let kinds = kinds("if a:\n    b\n\n");
    assert_eq!(&kinds[kinds.len() - 3..],
               &[TokenKind::Dedent, TokenKind::Newline, TokenKind::EndMarker]);
}

#[test]
fn literals() {
    assert_eq!(kinds("1 0x1f 0o17 0b101 2.5 .5 1e3 'a' \"b\""),
               vec![TokenKind::Integer,
                    TokenKind::Integer,
                    TokenKind::Integer,
                    TokenKind::Integer,
                    TokenKind::Float,
                    TokenKind::Float,
                    TokenKind::Float,
                    TokenKind::String,
                    TokenKind::String,
                    TokenKind::Newline,
                    TokenKind::EndMarker]);
}

#[test]
fn keywords_and_operators() {
    assert_eq!(kinds("not x is None <<= y"),
               vec![TokenKind::Not,
                    TokenKind::Name,
                    TokenKind::Is,
                    TokenKind::NoneConst,
                    TokenKind::LeftShiftAssign,
                    TokenKind::Name,
                    TokenKind::Newline,
                    TokenKind::EndMarker]);
}

#[test]
fn positions() {
    let tokens = tokenize("x = 1\n  \ny = 22\n").unwrap();
    let y = tokens.iter().find(|t| t.text == "y").unwrap();
    assert_eq!((y.line, y.column), (3, 0));
    let n = tokens.iter().find(|t| t.text == "22").unwrap();
    assert_eq!((n.line, n.column), (3, 4));
}

#[test]
fn unknown_character() {
    let err = tokenize("x = 1\ny = $\n").unwrap_err();
    assert!(matches!(err, LexError::UnexpectedCharacter { line: 2, .. }), "got {err:?}");
}
