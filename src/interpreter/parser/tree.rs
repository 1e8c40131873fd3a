use crate::interpreter::lexer::{Token, TokenKind};

/// Grammar productions that can label an inner parse tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A whole program.
    FileInput,
    /// One interactive statement.
    SingleInput,
    /// A standalone expression (or comma separated expressions).
    EvalInput,
    /// A simple or compound statement.
    Stmt,
    /// One or more small statements on a single line.
    SimpleStmt,
    /// One small statement.
    SmallStmt,
    /// `target = value`
    ExprStmtAssign,
    /// `target op= value`
    ExprStmtAugmented,
    /// An expression evaluated for its value.
    ExprStmtPlain,
    /// `pass`
    PassStmt,
    /// `break`
    BreakStmt,
    /// `continue`
    ContinueStmt,
    /// `return [value]`
    ReturnStmt,
    /// An `if`, `while`, `for` or `def` statement.
    CompoundStmt,
    /// `if test: suite` plus its `elif`/`else` arms.
    IfStmt,
    /// `elif test: suite`
    IfElif,
    /// `else: suite` of a conditional.
    IfElse,
    /// `while test: suite`
    WhileStmt,
    /// `for target in iterable: suite`
    ForStmt,
    /// `else: suite` attached to a loop.
    LoopElse,
    /// `def name(params): suite`
    FuncDef,
    /// The parenthesized parameter list of a function definition.
    Parameters,
    /// An indented block or a same-line simple statement.
    Suite,
    /// Top of the expression grammar.
    Test,
    /// `a or b`
    OrTest,
    /// `a and b`
    AndTest,
    /// `not a`
    NotTest,
    /// `a < b`, `a in b`, ...
    Comparison,
    /// A comparison operator, possibly two tokens such as `not in`.
    CompOp,
    /// `a | b`
    Expr,
    /// `a ^ b`
    XorExpr,
    /// `a & b`
    AndExpr,
    /// `a << b`
    ShiftExpr,
    /// `a + b`
    ArithExpr,
    /// `a * b`
    Term,
    /// `-a`
    Factor,
    /// A bare identifier.
    Name,
    /// `callee(args)`
    Call,
    /// `value[subscript]`
    Subscription,
    /// `value.name`
    AttributeRef,
    /// Call arguments.
    ArgList,
    /// `[index]`
    SubscriptIndex,
    /// `[lower:upper:step]`
    SubscriptSlice,
    /// `(test)`
    ParenExpr,
    /// `(a, b)`
    TupleMaker,
    /// `[a, b]`
    ListMaker,
    /// `{k: v}`
    DictMaker,
    /// `k: v`
    DictEntry,
    /// `{a, b}`
    SetMaker,
    /// Comma separated expressions.
    TestList,
    /// Numeric literal.
    Number,
    /// One or more adjacent string literals.
    StringLiteral,
    /// `None`, `True` or `False`.
    NameConstant,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A concrete parse tree as produced by the grammar.
///
/// Inner nodes are labelled with the production that built them; leaves are
/// the tokens the production consumed, including punctuation. Every
/// precedence level creates a node, so most expressions sit at the bottom of
/// long single-child chains.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseTree {
    /// An inner node.
    Node {
        /// The production.
        rule:     Rule,
        /// Sub-trees in source order.
        children: Vec<Self>,
    },
    /// A token.
    Leaf(Token),
}

impl ParseTree {
    /// Creates an inner node.
    #[must_use]
    pub const fn node(rule: Rule, children: Vec<Self>) -> Self {
        Self::Node { rule, children }
    }

    /// The production of an inner node, `None` for leaves.
    #[must_use]
    pub const fn rule(&self) -> Option<Rule> {
        match self {
            Self::Node { rule, .. } => Some(*rule),
            Self::Leaf(_) => None,
        }
    }

    /// Children of an inner node; leaves have none.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Node { children, .. } => children,
            Self::Leaf(_) => &[],
        }
    }

    /// The token of a leaf.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Leaf(token) => Some(token),
            Self::Node { .. } => None,
        }
    }

    /// Returns `true` if this is a leaf of the given kind.
    #[must_use]
    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.token().is_some_and(|t| t.kind == kind)
    }

    /// Line of the first token under this tree.
    #[must_use]
    pub fn line(&self) -> usize {
        match self {
            Self::Leaf(token) => token.line,
            Self::Node { children, .. } => children.first().map_or(0, Self::line),
        }
    }

    /// Follows single-child chains down to the first node whose only child is
    /// not another node, or which has several children.
    ///
    /// This skips the precedence levels a lone operand passes through, so
    /// `x` parsed as a full expression yields its `Name` node.
    #[must_use]
    pub fn innermost(&self) -> &Self {
        let mut current = self;
        while let Self::Node { children, .. } = current
              && let [only @ Self::Node { .. }] = children.as_slice()
        {
            current = only;
        }
        current
    }
}
