use crate::{
    ast::{Expr, Subscript},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            arithmetic::{binary_op, unary_op},
            comparison::compare,
            core::{EvalResult, Interpreter},
            method, subscript,
        },
        scope::Scope,
        value::core::Value,
    },
};

/// A resolved assignment target.
///
/// Plain names are bound by the assignment itself; indexed targets carry the
/// already evaluated container and key so the store happens after the value
/// is known.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// Bind a name in the current scope.
    Name(String),
    /// Store into `container[key]`.
    Index {
        /// The list or dict written to.
        container: Value,
        /// The index or key.
        key:       Value,
    },
}

impl Interpreter {
    /// Evaluates an expression and returns the resulting value.
    ///
    /// Operands are evaluated left to right. `and` and `or` evaluate both
    /// sides before choosing one.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `scope`: The scope names are resolved in.
    ///
    /// # Example
    /// ```
    /// use pyrite::{
    ///     ast::{BinaryOperator, Expr},
    ///     interpreter::{evaluator::Interpreter, value::core::Value},
    /// };
    ///
    /// let mut interpreter = Interpreter::new();
    /// let globals = interpreter.globals().clone();
    ///
    /// let expr = Expr::BinaryOp { left:  Box::new(Expr::Literal { value: 3.into(),
    ///                                                             line:  1, }),
    ///                             op:    BinaryOperator::Mul,
    ///                             right: Box::new(Expr::Literal { value: 4.into(),
    ///                                                             line:  1, }),
    ///                             line:  1, };
    ///
    /// assert_eq!(interpreter.eval_expr(&expr, &globals).unwrap(), Value::Integer(12));
    /// ```
    pub fn eval_expr(&mut self, expr: &Expr, scope: &Scope) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(Value::from(value)),
            Expr::Name { id, line, .. } => {
                scope.lookup(id)
                     .ok_or_else(|| RuntimeError::UnknownName { name: id.clone(),
                                                                line: *line, })
            },
            Expr::UnaryOp { op, expr, line } => {
                let operand = self.eval_expr(expr, scope)?;
                unary_op(*op, &operand, *line)
            },
            Expr::BinaryOp { left, op, right, line } => {
                let left = self.eval_expr(left, scope)?;
                let right = self.eval_expr(right, scope)?;
                binary_op(*op, &left, &right, *line)
            },
            Expr::Compare { left, op, right, line } => {
                let left = self.eval_expr(left, scope)?;
                let right = self.eval_expr(right, scope)?;
                compare(*op, left, right, *line)
            },
            Expr::Not { expr, .. } => Ok(Value::Bool(!self.eval_expr(expr, scope)?.is_truthy())),
            Expr::Call { callee,
                         arguments,
                         line, } => {
                let callee = self.eval_expr(callee, scope)?;
                let arguments = self.eval_all(arguments, scope)?;
                self.call(&callee, &arguments, *line)
            },
            Expr::List { elements, .. } => Ok(Value::list(self.eval_all(elements, scope)?)),
            Expr::Tuple { elements, .. } => Ok(Value::tuple(self.eval_all(elements, scope)?)),
            Expr::Set { elements, line } => Value::set(self.eval_all(elements, scope)?, *line),
            Expr::Dict { entries, line } => {
                let mut pairs = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = self.eval_expr(key, scope)?;
                    pairs.push((key, self.eval_expr(value, scope)?));
                }
                Value::dict(pairs, *line)
            },
            Expr::Attribute { value, attr, line, .. } => {
                let receiver = self.eval_expr(value, scope)?;
                method::bind(receiver, attr, *line)
            },
            Expr::Subscript { value, slice, line, .. } => {
                let container = self.eval_expr(value, scope)?;
                match slice {
                    Subscript::Index(index) => {
                        let key = self.eval_expr(index, scope)?;
                        subscript::get_item(&container, &key, *line)
                    },
                    Subscript::Slice { lower, upper } => {
                        let lower = self.eval_optional(lower.as_deref(), scope)?;
                        let upper = self.eval_optional(upper.as_deref(), scope)?;
                        subscript::get_slice(&container, lower.as_ref(), upper.as_ref(), *line)
                    },
                }
            },
        }
    }

    /// Resolves the left-hand side of an assignment without storing
    /// anything.
    ///
    /// # Errors
    /// Attribute and slice targets are `NotImplemented`; any other
    /// expression is a `SyntaxError`.
    pub fn eval_target(&mut self, target: &Expr, scope: &Scope) -> EvalResult<AssignTarget> {
        match target {
            Expr::Name { id, .. } => Ok(AssignTarget::Name(id.clone())),
            Expr::Subscript { value,
                              slice: Subscript::Index(index),
                              .. } => {
                let container = self.eval_expr(value, scope)?;
                let key = self.eval_expr(index, scope)?;
                Ok(AssignTarget::Index { container, key })
            },
            Expr::Subscript { line, .. } => {
                Err(RuntimeError::NotImplemented { details: "writing to slices is not supported".to_string(),
                                                   line:    *line, })
            },
            Expr::Attribute { line, .. } => {
                Err(RuntimeError::NotImplemented { details: "assigning to attributes is not supported".to_string(),
                                                   line:    *line, })
            },
            other => Err(RuntimeError::SyntaxError { details: "can't assign to expression".to_string(),
                                                     line:    other.line_number(), }),
        }
    }

    /// Performs the store described by `target`.
    pub(crate) fn store(&self, target: AssignTarget, value: Value, scope: &Scope, line: usize) -> EvalResult<()> {
        match target {
            AssignTarget::Name(name) => {
                scope.assign(name, value);
                Ok(())
            },
            AssignTarget::Index { container, key } => subscript::set_item(&container, key, value, line),
        }
    }

    fn eval_all(&mut self, exprs: &[Expr], scope: &Scope) -> EvalResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval_expr(e, scope)).collect()
    }

    fn eval_optional(&mut self, expr: Option<&Expr>, scope: &Scope) -> EvalResult<Option<Value>> {
        expr.map(|e| self.eval_expr(e, scope)).transpose()
    }
}
