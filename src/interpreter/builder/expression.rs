use crate::{
    ast::{Expr, LiteralValue, NameContext, Subscript},
    error::RuntimeError,
    interpreter::{
        builder::{
            core::{BuildResult, malformed},
            literal,
            operator::{binary_operator, compare_operator, unary_operator},
        },
        lexer::{Token, TokenKind},
        parser::{ParseTree, Rule},
    },
};

/// Builds an expression that is read.
///
/// # Errors
/// Returns an `ArithmeticError` for integer literals out of range, a
/// `NotImplemented` error for slice steps and unknown operators, and a
/// `SyntaxError` for trees the grammar does not produce.
pub fn build_expr(tree: &ParseTree) -> BuildResult<Expr> {
    build_in_context(tree, NameContext::Load)
}

/// Builds the left-hand side of an assignment.
///
/// Only the outermost name, subscription or attribute reference is tagged
/// [`NameContext::Store`]; everything inside it is read as usual.
///
/// # Errors
/// Returns a `SyntaxError` when the target is a call or any other
/// expression that cannot be written to.
pub fn build_target(tree: &ParseTree) -> BuildResult<Expr> {
    let target = tree.innermost();
    match target.rule() {
        Some(Rule::Name | Rule::Subscription | Rule::AttributeRef) => {
            build_in_context(target, NameContext::Store)
        },
        Some(Rule::Call) => Err(RuntimeError::SyntaxError { details: "can't assign to function call".to_string(),
                                                             line:    target.line(), }),
        _ => Err(RuntimeError::SyntaxError { details: "can't assign to literal".to_string(),
                                             line:    target.line(), }),
    }
}

fn build_in_context(tree: &ParseTree, ctx: NameContext) -> BuildResult<Expr> {
    let ParseTree::Node { rule, children } = tree else {
        return Err(malformed(tree, "an expression"));
    };
    let line = tree.line();

    match (rule, children.as_slice()) {
        (Rule::Test
         | Rule::OrTest
         | Rule::AndTest
         | Rule::NotTest
         | Rule::Comparison
         | Rule::Expr
         | Rule::XorExpr
         | Rule::AndExpr
         | Rule::ShiftExpr
         | Rule::ArithExpr
         | Rule::Term
         | Rule::Factor,
         [only]) => build_in_context(only, ctx),

        (Rule::OrTest | Rule::AndTest | Rule::Comparison, _) => fold_comparison(children, line),
        (Rule::Expr
         | Rule::XorExpr
         | Rule::AndExpr
         | Rule::ShiftExpr
         | Rule::ArithExpr
         | Rule::Term,
         _) => fold_binary(children, line),

        (Rule::NotTest, [_, operand]) => Ok(Expr::Not { expr: Box::new(build_expr(operand)?),
                                                        line }),
        (Rule::Factor, [op, operand]) => {
            let token = leaf(op)?;
            let op = unary_operator(token.kind).ok_or_else(|| unknown_operator(token))?;
            Ok(Expr::UnaryOp { op,
                               expr: Box::new(build_expr(operand)?),
                               line })
        },

        (Rule::Name, [name]) => Ok(Expr::Name { id: leaf(name)?.text.clone(),
                                                ctx,
                                                line }),
        (Rule::Number, [number]) => Ok(Expr::Literal { value: literal::number(leaf(number)?)?,
                                                       line }),
        (Rule::StringLiteral, parts) => {
            let mut text = String::new();
            for part in parts {
                text.push_str(&literal::string(leaf(part)?)?);
            }
            Ok(Expr::Literal { value: LiteralValue::Str(text),
                               line })
        },
        (Rule::NameConstant, [constant]) => {
            let value = match leaf(constant)?.kind {
                TokenKind::TrueConst => LiteralValue::Bool(true),
                TokenKind::FalseConst => LiteralValue::Bool(false),
                _ => LiteralValue::None,
            };
            Ok(Expr::Literal { value, line })
        },

        (Rule::ParenExpr, [_, inner, _]) => build_expr(inner),
        (Rule::TupleMaker | Rule::TestList, _) => Ok(Expr::Tuple { elements: build_all(children)?,
                                                                   line }),
        (Rule::ListMaker, _) => Ok(Expr::List { elements: build_all(children)?,
                                                line }),
        (Rule::SetMaker, _) => Ok(Expr::Set { elements: build_all(children)?,
                                              line }),
        (Rule::DictMaker, _) => {
            let mut entries = Vec::new();
            for entry in children.iter().filter(|c| c.rule() == Some(Rule::DictEntry)) {
                let [key, _, value] = entry.children() else {
                    return Err(malformed(entry, "a dict entry"));
                };
                entries.push((build_expr(key)?, build_expr(value)?));
            }
            Ok(Expr::Dict { entries, line })
        },

        (Rule::Call, [callee, _, rest @ ..]) => {
            let arguments = match rest.first() {
                Some(args) if args.rule() == Some(Rule::ArgList) => build_all(args.children())?,
                _ => Vec::new(),
            };
            Ok(Expr::Call { callee: Box::new(build_expr(callee)?),
                            arguments,
                            line })
        },
        (Rule::Subscription, [value, _, subscript, _]) => {
            Ok(Expr::Subscript { value: Box::new(build_expr(value)?),
                                 slice: build_subscript(subscript)?,
                                 ctx,
                                 line })
        },
        (Rule::AttributeRef, [value, _, name]) => {
            let attr = match name.children() {
                [attr] => leaf(attr)?.text.clone(),
                _ => return Err(malformed(name, "an attribute name")),
            };
            Ok(Expr::Attribute { value: Box::new(build_expr(value)?),
                                 attr,
                                 ctx,
                                 line })
        },

        _ => Err(malformed(tree, "an expression")),
    }
}

/// Builds every inner node among `children`, skipping brackets and commas.
fn build_all(children: &[ParseTree]) -> BuildResult<Vec<Expr>> {
    children.iter()
            .filter(|c| c.rule().is_some())
            .map(build_expr)
            .collect()
}

/// Folds `operand (op operand)*` into a left-leaning chain of binary
/// operations.
fn fold_binary(children: &[ParseTree], line: usize) -> BuildResult<Expr> {
    let (first, rest) = children.split_first()
                                .ok_or_else(|| RuntimeError::SyntaxError { details: "empty expression".to_string(),
                                                                           line })?;
    let mut left = build_expr(first)?;
    for pair in rest.chunks(2) {
        let [op, right] = pair else {
            return Err(malformed(&pair[0], "an operand"));
        };
        let token = leaf(op)?;
        let op = binary_operator(token.kind).ok_or_else(|| unknown_operator(token))?;
        left = Expr::BinaryOp { left: Box::new(left),
                                op,
                                right: Box::new(build_expr(right)?),
                                line };
    }
    Ok(left)
}

/// Folds comparisons and logical connectives to the left.
///
/// `a < b < c` becomes `(a < b) < c`; there is no chaining. Comparison
/// operators arrive as `CompOp` nodes, `and`/`or` as bare tokens.
fn fold_comparison(children: &[ParseTree], line: usize) -> BuildResult<Expr> {
    let (first, rest) = children.split_first()
                                .ok_or_else(|| RuntimeError::SyntaxError { details: "empty comparison".to_string(),
                                                                           line })?;
    let mut left = build_expr(first)?;
    for pair in rest.chunks(2) {
        let [op, right] = pair else {
            return Err(malformed(&pair[0], "an operand"));
        };
        let kinds: Vec<TokenKind> = match op {
            ParseTree::Leaf(token) => vec![token.kind],
            ParseTree::Node { children, .. } => children.iter()
                                                         .filter_map(ParseTree::token)
                                                         .map(|t| t.kind)
                                                         .collect(),
        };
        let op = compare_operator(&kinds).ok_or_else(|| {
                     RuntimeError::NotImplemented { details: format!("unsupported comparison {kinds:?}"),
                                                    line:    op.line(), }
                 })?;
        left = Expr::Compare { left: Box::new(left),
                               op,
                               right: Box::new(build_expr(right)?),
                               line };
    }
    Ok(left)
}

/// Builds an index or a `lower:upper` slice.
///
/// A third slice component (the step) is rejected.
fn build_subscript(tree: &ParseTree) -> BuildResult<Subscript> {
    match (tree.rule(), tree.children()) {
        (Some(Rule::SubscriptIndex), [index]) => Ok(Subscript::Index(Box::new(build_expr(index)?))),
        (Some(Rule::SubscriptSlice), parts) => {
            let mut bounds: [Option<Box<Expr>>; 3] = [None, None, None];
            let mut position = 0;
            for part in parts {
                if part.is_token(TokenKind::Colon) {
                    position += 1;
                } else if let Some(slot) = bounds.get_mut(position) {
                    *slot = Some(Box::new(build_expr(part)?));
                }
            }
            let [lower, upper, step] = bounds;
            if step.is_some() {
                return Err(RuntimeError::NotImplemented { details: "slice steps are not supported".to_string(),
                                                          line:    tree.line(), });
            }
            Ok(Subscript::Slice { lower, upper })
        },
        _ => Err(malformed(tree, "a subscript")),
    }
}

fn leaf(tree: &ParseTree) -> BuildResult<&Token> {
    tree.token().ok_or_else(|| malformed(tree, "a token"))
}

fn unknown_operator(token: &Token) -> RuntimeError {
    RuntimeError::NotImplemented { details: format!("unsupported operator {}", token.describe()),
                                   line:    token.line, }
}
