use pretty_assertions::assert_eq;
use pyrite::{
    Interpreter, StartRule, evaluate_in,
    interpreter::{
        evaluator::builtin::BUILTIN_FUNCTIONS, output::OutputBuffer, scope::Scope, value::core::Value,
    },
};

#[test]
fn root_holds_the_builtins() {
    let root = Scope::root();
    assert_eq!(root.depth(), 0);
    for name in BUILTIN_FUNCTIONS {
        assert!(matches!(root.get_local(name), Some(Value::Builtin(_))), "{name} missing");
    }
    assert_eq!(root.names().len(), BUILTIN_FUNCTIONS.len());
}

#[test]
fn child_scopes_shadow_without_touching_the_outer_binding() {
    let root = Scope::root();
    root.assign("x", Value::Integer(1));

    let inner = root.child();
    assert_eq!(inner.depth(), 1);
    assert_eq!(inner.get_local("x"), None);
    assert_eq!(inner.lookup("x"), Some(Value::Integer(1)));

    inner.assign("x", Value::Integer(2));
    assert_eq!(inner.lookup("x"), Some(Value::Integer(2)));
    assert_eq!(root.lookup("x"), Some(Value::Integer(1)));
    assert_eq!(inner.names(), vec!["x".to_string()]);
}

#[test]
fn functions_capture_the_scope_they_were_defined_in() {
    let mut interpreter = Interpreter::new().with_output(OutputBuffer::default());
    let src = "\
def outer():
    def inner():
        return 1
    return inner
f = outer()
";
    evaluate_in(&mut interpreter, src, StartRule::Program).unwrap();
    let globals = interpreter.globals();

    let Some(Value::Function(outer)) = globals.lookup("outer") else {
        panic!("outer is not a function");
    };
    assert!(outer.closure.ptr_eq(globals));

    let Some(Value::Function(inner)) = globals.lookup("f") else {
        panic!("f is not a function");
    };
    assert!(!inner.closure.ptr_eq(globals));
    assert_eq!(inner.closure.depth(), 1);
    assert_eq!(globals.get_local("inner"), None);
}

#[test]
fn reset_forgets_bindings() {
    let printed = OutputBuffer::default();
    let mut interpreter = Interpreter::new().with_output(printed.clone());
    evaluate_in(&mut interpreter, "x = 1\nprint(x)", StartRule::Program).unwrap();
    assert_eq!(printed.take(), "1\n");

    interpreter.reset();
    assert_eq!(interpreter.globals().lookup("x"), None);
    assert!(interpreter.globals().lookup("print").is_some());

    evaluate_in(&mut interpreter, "print(2)", StartRule::Program).unwrap();
    assert_eq!(printed.contents(), "2\n");
}
