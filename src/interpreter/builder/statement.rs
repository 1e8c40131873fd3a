use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDef, Statement},
    error::RuntimeError,
    interpreter::{
        builder::{
            core::{BuildResult, TreeBuilder, malformed},
            expression::{build_expr, build_target},
            operator::augmented_operator,
        },
        lexer::TokenKind,
        parser::{ParseTree, Rule},
    },
};

impl TreeBuilder {
    /// Builds a `SimpleStmt` or `CompoundStmt` node.
    ///
    /// A simple statement line may hold several small statements, so the
    /// result is a list that the caller splices into the enclosing body.
    pub(in crate::interpreter::builder) fn build_stmt(&mut self,
                                                      tree: &ParseTree)
                                                      -> BuildResult<Vec<Statement>> {
        match tree.rule() {
            Some(Rule::SimpleStmt) => tree.children()
                                          .iter()
                                          .filter(|c| c.rule() == Some(Rule::SmallStmt))
                                          .map(|c| self.build_small_stmt(c))
                                          .collect(),
            Some(Rule::CompoundStmt) => {
                let inner = first_child(tree, "a compound statement")?;
                Ok(vec![self.build_compound_stmt(inner)?])
            },
            _ => Err(malformed(tree, "a statement")),
        }
    }

    fn build_small_stmt(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let inner = first_child(tree, "a small statement")?;
        let line = inner.line();
        let children = inner.children();

        match inner.rule() {
            Some(Rule::PassStmt) => Ok(Statement::Pass { line }),
            Some(Rule::BreakStmt) => {
                self.require_loop("break", line)?;
                Ok(Statement::Break { line })
            },
            Some(Rule::ContinueStmt) => {
                self.require_loop("continue", line)?;
                Ok(Statement::Continue { line })
            },
            Some(Rule::ReturnStmt) => {
                if !self.in_function {
                    return Err(RuntimeError::SyntaxError { details: "'return' outside function".to_string(),
                                                           line });
                }
                let value = children.get(1).map(build_expr).transpose()?;
                Ok(Statement::Return { value, line })
            },
            Some(Rule::ExprStmtPlain) => {
                let expr = build_expr(first_child(inner, "an expression")?)?;
                Ok(Statement::Expression { expr, line })
            },
            Some(Rule::ExprStmtAssign) => {
                let [target, _, value] = children else {
                    return Err(malformed(inner, "an assignment"));
                };
                Ok(Statement::Assign { target: build_target(target)?,
                                       value: build_expr(value)?,
                                       line })
            },
            Some(Rule::ExprStmtAugmented) => self.build_augmented(inner),
            _ => Err(malformed(inner, "a small statement")),
        }
    }

    /// Desugars `target op= value` into `target = target op value`.
    ///
    /// The target is built twice from the same parse tree: once as a store
    /// and once as a load. The two nodes share nothing.
    fn build_augmented(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let [target, operator, value] = tree.children() else {
            return Err(malformed(tree, "a compound assignment"));
        };
        let line = tree.line();

        let token = operator.token().ok_or_else(|| malformed(operator, "an operator"))?;
        let op = augmented_operator(token.kind).ok_or_else(|| {
                     RuntimeError::NotImplemented { details: format!("unsupported operator {}",
                                                                     token.describe()),
                                                    line:    token.line, }
                 })?;

        let store = build_target(target)?;
        let load = build_expr(target)?;
        Ok(Statement::Assign { target: store,
                               value: Expr::BinaryOp { left: Box::new(load),
                                                       op,
                                                       right: Box::new(build_expr(value)?),
                                                       line },
                               line })
    }

    fn require_loop(&self, keyword: &str, line: usize) -> BuildResult<()> {
        if self.loop_depth == 0 {
            return Err(RuntimeError::SyntaxError { details: format!("'{keyword}' outside loop"),
                                                   line });
        }
        Ok(())
    }

    fn build_compound_stmt(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        match tree.rule() {
            Some(Rule::IfStmt) => self.build_if(tree),
            Some(Rule::WhileStmt) => self.build_while(tree),
            Some(Rule::ForStmt) => self.build_for(tree),
            Some(Rule::FuncDef) => self.build_funcdef(tree),
            _ => Err(malformed(tree, "a compound statement")),
        }
    }

    /// Builds a conditional, folding `elif` arms to the right.
    ///
    /// `if a: x elif b: y else: z` becomes `If(a, [x], [If(b, [y], [z])])`;
    /// the last `elif` ends up innermost and owns the `else` body.
    fn build_if(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let children = tree.children();
        let [_, head_test, _, head_suite, arms @ ..] = children else {
            return Err(malformed(tree, "an if statement"));
        };
        let head_test = build_expr(head_test)?;
        let head_body = self.build_suite(head_suite)?;

        let mut elifs = Vec::new();
        let mut orelse = Vec::new();
        for arm in arms {
            match (arm.rule(), arm.children()) {
                (Some(Rule::IfElif), [keyword, test, _, suite]) => {
                    elifs.push((build_expr(test)?, self.build_suite(suite)?, keyword.line()));
                },
                (Some(Rule::IfElse), [_, _, suite]) => orelse = self.build_suite(suite)?,
                _ => return Err(malformed(arm, "an elif or else arm")),
            }
        }

        for (test, body, line) in elifs.into_iter().rev() {
            orelse = vec![Statement::If { test,
                                          body,
                                          orelse,
                                          line }];
        }

        Ok(Statement::If { test: head_test,
                           body: head_body,
                           orelse,
                           line: tree.line() })
    }

    fn build_while(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let [_, test, _, suite, rest @ ..] = tree.children() else {
            return Err(malformed(tree, "a while statement"));
        };
        reject_loop_else(rest)?;

        Ok(Statement::While { test: build_expr(test)?,
                              body: self.within_loop(|b| b.build_suite(suite))?,
                              line: tree.line() })
    }

    fn build_for(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let [_, target, _, iter, _, suite, rest @ ..] = tree.children() else {
            return Err(malformed(tree, "a for statement"));
        };
        reject_loop_else(rest)?;

        let Expr::Name { id, .. } = build_target(target)? else {
            return Err(RuntimeError::SyntaxError { details: "for-loop target must be a name".to_string(),
                                                   line:    target.line(), });
        };

        Ok(Statement::For { target: id,
                            iter:   build_expr(iter)?,
                            body:   self.within_loop(|b| b.build_suite(suite))?,
                            line:   tree.line(), })
    }

    fn build_funcdef(&mut self, tree: &ParseTree) -> BuildResult<Statement> {
        let [_, name, params, _, suite] = tree.children() else {
            return Err(malformed(tree, "a function definition"));
        };
        let name = leaf_text(name)?;

        let mut names: Vec<String> = Vec::new();
        for param in params.children().iter().filter(|p| p.rule() == Some(Rule::Name)) {
            let param_name = leaf_text(param)?;
            if names.contains(&param_name) {
                return Err(RuntimeError::SyntaxError { details: format!("duplicate argument '{param_name}' in function definition"),
                                                       line:    param.line(), });
            }
            names.push(param_name);
        }

        let body = self.within_function(|b| b.build_suite(suite))?;
        Ok(Statement::FunctionDef(Rc::new(FunctionDef { name,
                                                        params: names,
                                                        body,
                                                        line: tree.line() })))
    }

    /// Builds either form of suite: a same-line simple statement, or an
    /// indented block of statements.
    fn build_suite(&mut self, tree: &ParseTree) -> BuildResult<Vec<Statement>> {
        if tree.rule() != Some(Rule::Suite) {
            return Err(malformed(tree, "a suite"));
        }
        self.build_statements(tree.children())
    }
}

fn reject_loop_else(rest: &[ParseTree]) -> BuildResult<()> {
    match rest.first() {
        Some(orelse) if orelse.rule() == Some(Rule::LoopElse) => {
            Err(RuntimeError::NotImplemented { details: "'else' clauses on loops are not supported".to_string(),
                                               line:    orelse.line(), })
        },
        Some(other) => Err(malformed(other, "the end of the loop")),
        None => Ok(()),
    }
}

fn first_child<'t>(tree: &'t ParseTree, expected: &str) -> BuildResult<&'t ParseTree> {
    tree.children().first().ok_or_else(|| malformed(tree, expected))
}

/// Text of a `Name` node's token.
fn leaf_text(tree: &ParseTree) -> BuildResult<String> {
    match tree.children() {
        [ParseTree::Leaf(token)] if token.kind == TokenKind::Name => Ok(token.text.clone()),
        _ => Err(malformed(tree, "a name")),
    }
}
