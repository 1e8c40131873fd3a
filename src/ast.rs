use std::rc::Rc;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in
/// source code: numbers, strings and the three name constants.
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Real(f64),
    /// A string literal, escapes already resolved.
    Str(String),
    /// `True` or `False`.
    Bool(bool),
    /// `None`.
    None,
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for LiteralValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for LiteralValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// Whether a name, attribute or subscription is read or written.
///
/// Decided structurally when the tree is built: only the direct target of
/// an assignment is [`NameContext::Store`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NameContext {
    /// The value is read.
    Load,
    /// The location is written by the enclosing assignment.
    Store,
}

/// The inside of a subscription.
#[derive(Debug, Clone, PartialEq)]
pub enum Subscript {
    /// `value[index]`
    Index(Box<Expr>),
    /// `value[lower:upper]`, either bound may be missing.
    Slice {
        /// Start of the slice, inclusive.
        lower: Option<Box<Expr>>,
        /// End of the slice, exclusive.
        upper: Option<Box<Expr>>,
    },
}

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Every node owns its children; there are no back references. Each variant
/// carries the source line it started on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (number, string, boolean or `None`).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Name {
        /// Name of the variable.
        id:   String,
        /// Read or write.
        ctx:  NameContext,
        /// Line number in the source code.
        line: usize,
    },
    /// A unary arithmetic operation (`+x`, `-x`).
    UnaryOp {
        /// The unary operator to apply.
        op:   UnaryOperator,
        /// The operand expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// A binary arithmetic or bitwise operation.
    BinaryOp {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A comparison or logical connective.
    ///
    /// Both operands are always evaluated.
    Compare {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    CompareOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Logical negation (`not x`).
    Not {
        /// The negated expression.
        expr: Box<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// Function call expression (e.g. `f(x, y)`).
    Call {
        /// Expression producing the callable.
        callee:    Box<Self>,
        /// Positional arguments.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// List display `[a, b]`.
    List {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Tuple display `(a, b)` or `a, b`.
    Tuple {
        /// Elements of the tuple.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Set display `{a, b}`.
    Set {
        /// Elements of the set.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Dict display `{k: v}`.
    Dict {
        /// Key and value expressions in source order.
        entries: Vec<(Self, Self)>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Attribute reference `value.attr`.
    Attribute {
        /// The object whose attribute is referenced.
        value: Box<Self>,
        /// The attribute name.
        attr:  String,
        /// Read or write.
        ctx:   NameContext,
        /// Line number in the source code.
        line:  usize,
    },
    /// Subscription `value[index]` or `value[lower:upper]`.
    Subscript {
        /// The container.
        value: Box<Self>,
        /// Index or slice.
        slice: Subscript,
        /// Read or write.
        ctx:   NameContext,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use pyrite::ast::{Expr, NameContext};
    ///
    /// let expr = Expr::Name { id:   "x".to_string(),
    ///                         ctx:  NameContext::Load,
    ///                         line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Name { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::BinaryOp { line, .. }
            | Self::Compare { line, .. }
            | Self::Not { line, .. }
            | Self::Call { line, .. }
            | Self::List { line, .. }
            | Self::Tuple { line, .. }
            | Self::Set { line, .. }
            | Self::Dict { line, .. }
            | Self::Attribute { line, .. }
            | Self::Subscript { line, .. } => *line,
        }
    }
}

/// Represents a user-defined function definition.
///
/// Shared between the AST and every function value created from it, so the
/// body is never copied when the definition is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:   String,
    /// The positional parameter names.
    pub params: Vec<String>,
    /// The statements executed on each call.
    pub body:   Vec<Statement>,
    /// Line number in the source code.
    pub line:   usize,
}

/// Represents a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A standalone expression evaluated for its result.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Line number in the source code.
        line: usize,
    },
    /// `target = value`. Compound assignments are desugared into this form.
    Assign {
        /// A `Store` name, subscription or attribute.
        target: Expr,
        /// The value which is being assigned.
        value:  Expr,
        /// Line number in the source code.
        line:   usize,
    },
    /// Conditional. `elif` arms are nested into `orelse`.
    If {
        /// The condition.
        test:   Expr,
        /// Statements run when the condition is truthy.
        body:   Vec<Self>,
        /// Statements run otherwise.
        orelse: Vec<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// `while test: body`
    While {
        /// The loop condition, re-evaluated before each iteration.
        test: Expr,
        /// The loop body.
        body: Vec<Self>,
        /// Line number in the source code.
        line: usize,
    },
    /// `for target in iter: body`
    For {
        /// The loop variable.
        target: String,
        /// The iterated expression.
        iter:   Expr,
        /// The loop body.
        body:   Vec<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A user-defined function declaration.
    FunctionDef(Rc<FunctionDef>),
    /// `return [value]`
    Return {
        /// The returned expression, `None` for a bare `return`.
        value: Option<Expr>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `pass`
    Pass {
        /// Line number in the source code.
        line: usize,
    },
    /// `break`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Expression { line, .. }
            | Self::Assign { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::For { line, .. }
            | Self::Return { line, .. }
            | Self::Pass { line }
            | Self::Break { line }
            | Self::Continue { line } => *line,
            Self::FunctionDef(def) => def.line,
        }
    }
}

/// The root of a built unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    /// A program or an interactive statement.
    Statements(Vec<Statement>),
    /// A standalone expression.
    Expression(Expr),
}

/// Represents an arithmetic or bitwise binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// True division (`/`)
    Div,
    /// Modulo (`%`)
    Mod,
    /// Left shift (`<<`)
    ShiftLeft,
    /// Right shift (`>>`)
    ShiftRight,
    /// Bitwise and (`&`)
    BitAnd,
    /// Bitwise exclusive or (`^`)
    BitXor,
    /// Bitwise or (`|`)
    BitOr,
}

/// Represents a comparison operator or logical connective.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CompareOperator {
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Equal to (`==`)
    Equal,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Membership (`in`)
    In,
    /// Negated membership (`not in`)
    NotIn,
    /// Identity (`is`)
    Is,
    /// Negated identity (`is not`)
    IsNot,
}

/// Represents a unary arithmetic operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Identity (`+x`).
    Plus,
    /// Arithmetic negation (`-x`).
    Negate,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{Add, BitAnd, BitOr, BitXor, Div, Mod, Mul, ShiftLeft, ShiftRight, Sub};
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Mod => "%",
            ShiftLeft => "<<",
            ShiftRight => ">>",
            BitAnd => "&",
            BitXor => "^",
            BitOr => "|",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equal => "==",
            Self::GreaterEqual => ">=",
            Self::LessEqual => "<=",
            Self::NotEqual => "!=",
            Self::And => "and",
            Self::Or => "or",
            Self::In => "in",
            Self::NotIn => "not in",
            Self::Is => "is",
            Self::IsNot => "is not",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plus => write!(f, "+"),
            Self::Negate => write!(f, "-"),
        }
    }
}
