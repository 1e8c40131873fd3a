use pretty_assertions::assert_eq;
use pyrite::{
    Error, StartRule,
    ast::{BinaryOperator, CompareOperator, Expr, LiteralValue, NameContext, Statement, Subscript, Unit},
    compile,
    error::{FaultKind, ParseError},
};

fn statements(src: &str) -> Vec<Statement> {
    match compile(src, StartRule::Program) {
        Ok(Unit::Statements(statements)) => statements,
        Ok(other) => panic!("Expected statements, got {other:?}"),
        Err(e) => panic!("Failed to build: {e}\n{src}"),
    }
}

fn build_error(src: &str) -> Error {
    match compile(src, StartRule::Program) {
        Ok(unit) => panic!("Expected a build error, got {unit:?}"),
        Err(e) => e,
    }
}

fn name(id: &str, ctx: NameContext, line: usize) -> Expr {
    Expr::Name { id: id.to_string(),
                 ctx,
                 line }
}

fn int(value: i64, line: usize) -> Expr {
    Expr::Literal { value: LiteralValue::Integer(value),
                    line }
}

#[test]
fn names_are_tagged_by_context() {
    let statements = statements("x = y\n");
    assert_eq!(statements,
               vec![Statement::Assign { target: name("x", NameContext::Store, 1),
                                        value:  name("y", NameContext::Load, 1),
                                        line:   1, }]);
}

#[test]
fn augmented_assignment_desugars_into_independent_nodes() {
    let statements = statements("x += 1\n");
    let Statement::Assign { target, value, .. } = &statements[0] else {
        panic!("expected an assignment, got {statements:?}");
    };
    assert_eq!(target, &name("x", NameContext::Store, 1));
    assert_eq!(value,
               &Expr::BinaryOp { left:  Box::new(name("x", NameContext::Load, 1)),
                                 op:    BinaryOperator::Add,
                                 right: Box::new(int(1, 1)),
                                 line:  1, });
}

#[test]
fn augmented_subscript_assignment() {
    let statements = statements("xs[0] -= 2\n");
    let Statement::Assign { target: Expr::Subscript { ctx: NameContext::Store, .. },
                            value: Expr::BinaryOp { left, op: BinaryOperator::Sub, .. },
                            .. } = &statements[0]
    else {
        panic!("unexpected {statements:?}");
    };
    assert!(matches!(**left, Expr::Subscript { ctx: NameContext::Load, .. }));
}

#[test]
fn elif_arms_fold_to_the_right() {
    let src = "\
if a:
    x = 1
elif b:
    x = 2
elif c:
    x = 3
else:
    x = 4
";
    let statements = statements(src);
    assert_eq!(statements.len(), 1);

    let Statement::If { test, orelse, .. } = &statements[0] else {
        panic!("expected if");
    };
    assert_eq!(test, &name("a", NameContext::Load, 1));

    let [Statement::If { test, orelse, .. }] = orelse.as_slice() else {
        panic!("expected a nested if for the first elif, got {orelse:?}");
    };
    assert_eq!(test, &name("b", NameContext::Load, 3));

    let [Statement::If { test, body, orelse, .. }] = orelse.as_slice() else {
        panic!("expected a nested if for the second elif, got {orelse:?}");
    };
    assert_eq!(test, &name("c", NameContext::Load, 5));
    assert_eq!(body.len(), 1);
    assert!(matches!(orelse.as_slice(), [Statement::Assign { line: 8, .. }]));
}

#[test]
fn semicolons_split_statements() {
    let statements = statements("a = 1; b = 2; pass;\n");
    assert_eq!(statements.len(), 3);
    assert!(matches!(statements[2], Statement::Pass { line: 1 }));
}

#[test]
fn comparisons_fold_left() {
    let statements = statements("a < b == c\n");
    let Statement::Expression { expr: Expr::Compare { left, op: CompareOperator::Equal, .. }, .. } =
        &statements[0]
    else {
        panic!("unexpected {statements:?}");
    };
    assert!(matches!(**left, Expr::Compare { op: CompareOperator::Less, .. }));
}

#[test]
fn slices_without_step() {
    let statements = statements("s[1:]\n");
    let Statement::Expression { expr: Expr::Subscript { slice, .. }, .. } = &statements[0] else {
        panic!("unexpected {statements:?}");
    };
    assert_eq!(slice,
               &Subscript::Slice { lower: Some(Box::new(int(1, 1))),
                                   upper: None, });
}

#[test]
fn slice_step_is_not_implemented() {
    assert_eq!(build_error("s[1:2:3]\n").kind(), FaultKind::NotImplemented);
    assert_eq!(build_error("s[::2]\n").kind(), FaultKind::NotImplemented);
}

#[test]
fn loop_else_is_not_implemented() {
    assert_eq!(build_error("while x:\n    pass\nelse:\n    pass\n").kind(),
               FaultKind::NotImplemented);
    assert_eq!(build_error("for i in x:\n    pass\nelse:\n    pass\n").kind(),
               FaultKind::NotImplemented);
}

#[test]
fn misplaced_control_flow_is_a_syntax_error() {
    for src in ["return 1\n",
                "break\n",
                "continue\n",
                "if x:\n    break\n",
                "while x:\n    def f():\n        break\n"]
    {
        let err = build_error(src);
        assert_eq!(err.kind(), FaultKind::Syntax, "{src:?}");
        assert!(matches!(err, Error::Runtime(_)), "{src:?} should fail while building");
    }
}

#[test]
fn control_flow_in_the_right_place() {
    statements("def f():\n    while True:\n        if x:\n            break\n        continue\n    return 1\n");
    statements("for i in x:\n    def g():\n        return i\n");
}

#[test]
fn call_targets_are_rejected_while_building() {
    let err = build_error("f() = 1\n");
    assert!(matches!(err, Error::Runtime(_)));
    assert_eq!(err.kind(), FaultKind::Syntax);
}

#[test]
fn literal_targets_are_rejected_while_parsing() {
    let err = build_error("1 = x\n");
    assert!(matches!(err, Error::Parse(ParseError::InvalidAssignmentTarget { line: 1, .. })),
            "got {err:?}");
}

#[test]
fn integer_literal_out_of_range() {
    assert_eq!(build_error("x = 99999999999999999999\n").kind(), FaultKind::Arithmetic);
}

#[test]
fn literals_are_decoded() {
    let statements = statements("0x10; 0o10; 0b10; 1.5e1; 'a\\tb' \"c\"; None; True\n");
    let values: Vec<&LiteralValue> = statements.iter()
                                               .map(|s| match s {
                                                   Statement::Expression { expr: Expr::Literal { value, .. }, .. } => value,
                                                   other => panic!("unexpected {other:?}"),
                                               })
                                               .collect();
    assert_eq!(values,
               vec![&LiteralValue::Integer(16),
                    &LiteralValue::Integer(8),
                    &LiteralValue::Integer(2),
                    &LiteralValue::Real(15.0),
                    &LiteralValue::Str("a\tbc".to_string()),
                    &LiteralValue::None,
                    &LiteralValue::Bool(true)]);
}

#[test]
fn function_definitions() {
    let statements = statements("def add(a, b):\n    return a + b\n");
    let Statement::FunctionDef(def) = &statements[0] else {
        panic!("unexpected {statements:?}");
    };
    assert_eq!(def.name, "add");
    assert_eq!(def.params, vec!["a".to_string(), "b".to_string()]);
    assert!(matches!(def.body.as_slice(), [Statement::Return { value: Some(_), line: 2 }]));
}

#[test]
fn expression_units() {
    let unit = compile("1 + 2", StartRule::Expression).unwrap();
    assert!(matches!(unit, Unit::Expression(Expr::BinaryOp { op: BinaryOperator::Add, .. })));
}

#[test]
fn for_target_must_be_a_name() {
    let err = build_error("for xs[0] in y:\n    pass\n");
    assert_eq!(err.kind(), FaultKind::Syntax);
    assert!(err.to_string().contains("for-loop target must be a name"), "{err}");
    assert_eq!(err.line(), 1);
}
