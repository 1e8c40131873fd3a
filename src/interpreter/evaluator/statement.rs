use std::rc::Rc;

use crate::{
    ast::{Expr, Statement},
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter, Signal},
        scope::Scope,
        value::core::{Function, Value},
    },
};

/// Where a loop stands after running its body once.
#[derive(Debug, Clone, PartialEq)]
enum LoopState {
    /// The body ran to its end.
    Running,
    /// `break`: leave the loop.
    Break,
    /// `continue`: skip to the next iteration.
    Continue,
    /// `return`: leave the loop and the enclosing function.
    Returning(Value),
}

impl Interpreter {
    /// Executes statements in order.
    ///
    /// Values produced along the way are collected. The first signal other
    /// than `pass` stops the block and is handed to the caller unchanged.
    ///
    /// # Errors
    /// Returns the first fault raised; later statements do not run.
    pub fn exec_block(&mut self, statements: &[Statement], scope: &Scope) -> EvalResult<Flow> {
        let mut values = Vec::new();
        for statement in statements {
            match self.exec_stmt(statement, scope)? {
                Flow::Values(produced) => values.extend(produced),
                Flow::Signal(Signal::Pass) => {},
                signal @ Flow::Signal(_) => return Ok(signal),
            }
        }
        Ok(Flow::Values(values))
    }

    /// Executes a single statement.
    ///
    /// Expression statements produce their value unless it is `None`;
    /// compound statements produce the values of the statements they ran.
    pub fn exec_stmt(&mut self, statement: &Statement, scope: &Scope) -> EvalResult<Flow> {
        match statement {
            Statement::Expression { expr, .. } => {
                let value = self.eval_expr(expr, scope)?;
                Ok(Flow::Values(if matches!(value, Value::None) { Vec::new() } else { vec![value] }))
            },
            Statement::Assign { target, value, line } => {
                let target = self.eval_target(target, scope)?;
                let value = self.eval_expr(value, scope)?;
                self.store(target, value, scope, *line)?;
                Ok(Flow::Values(Vec::new()))
            },
            Statement::If { test, body, orelse, .. } => {
                if self.eval_expr(test, scope)?.is_truthy() {
                    self.exec_block(body, scope)
                } else {
                    self.exec_block(orelse, scope)
                }
            },
            Statement::While { test, body, line } => self.exec_while(test, body, scope, *line),
            Statement::For { target,
                             iter,
                             body,
                             line, } => {
                let items = self.eval_expr(iter, scope)?.iterate(*line)?;
                self.exec_for(target, items, body, scope, *line)
            },
            Statement::FunctionDef(def) => {
                let function = Function { def:     Rc::clone(def),
                                          closure: scope.clone(), };
                scope.assign(def.name.clone(), Value::Function(Rc::new(function)));
                Ok(Flow::Values(Vec::new()))
            },
            Statement::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr, scope)?,
                    None => Value::None,
                };
                Ok(Flow::Signal(Signal::Return(value)))
            },
            Statement::Pass { .. } => Ok(Flow::Signal(Signal::Pass)),
            Statement::Break { .. } => Ok(Flow::Signal(Signal::Break)),
            Statement::Continue { .. } => Ok(Flow::Signal(Signal::Continue)),
        }
    }

    fn exec_while(&mut self, test: &Expr, body: &[Statement], scope: &Scope, line: usize) -> EvalResult<Flow> {
        let mut values = Vec::new();
        while self.eval_expr(test, scope)?.is_truthy() {
            self.check_interrupt(line)?;
            match self.run_iteration(body, scope, &mut values)? {
                LoopState::Running | LoopState::Continue => {},
                LoopState::Break => break,
                LoopState::Returning(value) => return Ok(Flow::Signal(Signal::Return(value))),
            }
        }
        Ok(Flow::Values(values))
    }

    /// Runs a `for` loop over the already materialized `items`.
    ///
    /// The loop variable is bound in `scope` and keeps its last value after
    /// the loop.
    fn exec_for(&mut self,
                target: &str,
                items: Vec<Value>,
                body: &[Statement],
                scope: &Scope,
                line: usize)
                -> EvalResult<Flow> {
        let mut values = Vec::new();
        for item in items {
            self.check_interrupt(line)?;
            scope.assign(target, item);
            match self.run_iteration(body, scope, &mut values)? {
                LoopState::Running | LoopState::Continue => {},
                LoopState::Break => break,
                LoopState::Returning(value) => return Ok(Flow::Signal(Signal::Return(value))),
            }
        }
        Ok(Flow::Values(values))
    }

    fn run_iteration(&mut self,
                     body: &[Statement],
                     scope: &Scope,
                     values: &mut Vec<Value>)
                     -> EvalResult<LoopState> {
        let state = match self.exec_block(body, scope)? {
            Flow::Values(produced) => {
                values.extend(produced);
                LoopState::Running
            },
            Flow::Signal(Signal::Break) => LoopState::Break,
            Flow::Signal(Signal::Continue) => LoopState::Continue,
            Flow::Signal(Signal::Return(value)) => LoopState::Returning(value),
            Flow::Signal(Signal::Pass) => LoopState::Running,
        };
        Ok(state)
    }
}
