use crate::{
    ast::{BinaryOperator, CompareOperator, UnaryOperator},
    interpreter::lexer::TokenKind,
};

/// Maps an operator token to its binary operation.
///
/// Returns `None` for tokens that are not binary arithmetic or bitwise
/// operators.
///
/// # Example
/// ```
/// use pyrite::{
///     ast::BinaryOperator,
///     interpreter::{builder::operator::binary_operator, lexer::TokenKind},
/// };
///
/// assert_eq!(binary_operator(TokenKind::LeftShift),
///            Some(BinaryOperator::ShiftLeft));
/// assert_eq!(binary_operator(TokenKind::Less), None);
/// ```
#[must_use]
pub const fn binary_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::LeftShift => Some(BinaryOperator::ShiftLeft),
        TokenKind::RightShift => Some(BinaryOperator::ShiftRight),
        TokenKind::Ampersand => Some(BinaryOperator::BitAnd),
        TokenKind::Caret => Some(BinaryOperator::BitXor),
        TokenKind::Pipe => Some(BinaryOperator::BitOr),
        _ => None,
    }
}

/// Maps a compound assignment token such as `+=` to the operation it
/// applies.
#[must_use]
pub const fn augmented_operator(kind: TokenKind) -> Option<BinaryOperator> {
    match kind {
        TokenKind::PlusAssign => Some(BinaryOperator::Add),
        TokenKind::MinusAssign => Some(BinaryOperator::Sub),
        TokenKind::StarAssign => Some(BinaryOperator::Mul),
        TokenKind::SlashAssign => Some(BinaryOperator::Div),
        TokenKind::PercentAssign => Some(BinaryOperator::Mod),
        TokenKind::AmpersandAssign => Some(BinaryOperator::BitAnd),
        TokenKind::PipeAssign => Some(BinaryOperator::BitOr),
        TokenKind::CaretAssign => Some(BinaryOperator::BitXor),
        TokenKind::LeftShiftAssign => Some(BinaryOperator::ShiftLeft),
        TokenKind::RightShiftAssign => Some(BinaryOperator::ShiftRight),
        _ => None,
    }
}

/// Maps the tokens of a comparison operator to the comparison.
///
/// `not in` and `is not` are two tokens long.
#[must_use]
pub fn compare_operator(kinds: &[TokenKind]) -> Option<CompareOperator> {
    match kinds {
        [TokenKind::Less] => Some(CompareOperator::Less),
        [TokenKind::Greater] => Some(CompareOperator::Greater),
        [TokenKind::EqualEqual] => Some(CompareOperator::Equal),
        [TokenKind::GreaterEqual] => Some(CompareOperator::GreaterEqual),
        [TokenKind::LessEqual] => Some(CompareOperator::LessEqual),
        [TokenKind::NotEqual] => Some(CompareOperator::NotEqual),
        [TokenKind::In] => Some(CompareOperator::In),
        [TokenKind::Not, TokenKind::In] => Some(CompareOperator::NotIn),
        [TokenKind::Is] => Some(CompareOperator::Is),
        [TokenKind::Is, TokenKind::Not] => Some(CompareOperator::IsNot),
        [TokenKind::And] => Some(CompareOperator::And),
        [TokenKind::Or] => Some(CompareOperator::Or),
        _ => None,
    }
}

/// Maps a prefix `+` or `-` to its unary operation.
#[must_use]
pub const fn unary_operator(kind: TokenKind) -> Option<UnaryOperator> {
    match kind {
        TokenKind::Plus => Some(UnaryOperator::Plus),
        TokenKind::Minus => Some(UnaryOperator::Negate),
        _ => None,
    }
}
