use std::sync::atomic::Ordering;

use pretty_assertions::assert_eq;
use pyrite::{
    Completion, Error, Interpreter, InterpreterConfig, StartRule,
    error::{FaultKind, ParseError},
    evaluate_in, evaluate_unit,
    interpreter::{output::OutputBuffer, value::core::Value},
};

fn run_with(interpreter: Interpreter, src: &str) -> (Interpreter, String) {
    let buffer = OutputBuffer::default();
    let mut interpreter = interpreter.with_output(buffer.clone());
    if let Err(e) = evaluate_in(&mut interpreter, src, StartRule::Program) {
        panic!("Script failed: {e}\n{src}");
    }
    (interpreter, buffer.contents())
}

fn output(src: &str) -> String {
    run_with(Interpreter::new(), src).1
}

fn value(src: &str) -> Value {
    match evaluate_unit(src, StartRule::Expression) {
        Ok(Completion::Value(v)) => v,
        Ok(other) => panic!("Expected a value, got {other:?}"),
        Err(e) => panic!("Expression failed: {e}\n{src}"),
    }
}

fn fault(src: &str) -> FaultKind {
    let mut interpreter = Interpreter::new().with_output(OutputBuffer::default());
    match evaluate_in(&mut interpreter, src, StartRule::Program) {
        Ok(_) => panic!("Script succeeded but was expected to fail:\n{src}"),
        Err(e) => e.kind(),
    }
}

#[test]
fn expression_precedence() {
    assert_eq!(value("3 + 4 * 2"), Value::Integer(11));
    assert_eq!(value("(3 + 4) * 2"), Value::Integer(14));
    assert_eq!(value("-2 * 3 + 1"), Value::Integer(-5));
    assert_eq!(value("1 + 2 << 3"), Value::Integer(24));
    assert_eq!(value("6 & 3 | 8 ^ 1"), Value::Integer(11));
    assert_eq!(value("not 1 == 2"), Value::Bool(true));
}

#[test]
fn division_and_modulo() {
    assert_eq!(value("7 / 2"), Value::Real(3.5));
    assert_eq!(value("-7 % 3"), Value::Integer(2));
    assert_eq!(value("7 % -3"), Value::Integer(-2));
    assert_eq!(value("7.5 % 2"), Value::Real(1.5));
    assert_eq!(fault("1/0"), FaultKind::ZeroDivision);
    assert_eq!(fault("x = 5 % 0"), FaultKind::ZeroDivision);
    assert!(fault("1.0 / 0").is_a(FaultKind::Arithmetic));
}

#[test]
fn integer_overflow_is_an_arithmetic_fault() {
    assert_eq!(fault("x = 9223372036854775807\nx = x + 1"), FaultKind::Arithmetic);
    assert_eq!(fault("x = 1 << 64"), FaultKind::Arithmetic);
}

#[test]
fn assignment_round_trip() {
    let (interpreter, _) = run_with(Interpreter::new(), "x = 1\ny = x + 1\n");
    assert_eq!(interpreter.globals().lookup("y"), Some(Value::Integer(2)));
}

#[test]
fn compound_assignments() {
    assert_eq!(output("x = 2\nx += 3\nprint(x)"), "5\n");
    assert_eq!(output("x = 7\nx -= 2\nx *= 4\nprint(x)"), "20\n");
    assert_eq!(output("x = 9\nx /= 3\nprint(x)"), "3.0\n");
    assert_eq!(output("x = 1\nx <<= 4\nx |= 1\nprint(x)"), "17\n");
    assert_eq!(output("xs = [1, 2]\nxs[0] += 10\nprint(xs)"), "[11, 2]\n");
}

#[test]
fn function_call_leaves_no_parameters_behind() {
    let src = "def f(a,b): return a+b\nr = f(1,2)";
    let (interpreter, _) = run_with(Interpreter::new(), src);
    assert_eq!(interpreter.globals().lookup("r"), Some(Value::Integer(3)));
    assert_eq!(interpreter.globals().lookup("a"), None);
    assert_eq!(interpreter.globals().lookup("b"), None);
}

#[test]
fn arity_mismatch_is_a_type_fault() {
    assert_eq!(fault("def f(a): return a\nf(1, 2)"), FaultKind::Type);
    assert_eq!(fault("len()"), FaultKind::Type);
    assert_eq!(fault("range(1, 2, 3, 4)"), FaultKind::Type);
}

#[test]
fn unknown_names() {
    assert_eq!(fault("print(missing)"), FaultKind::Name);
    assert!(fault("y = x").is_a(FaultKind::Memory));
}

#[test]
fn function_without_return_yields_none() {
    assert_eq!(output("def f():\n    x = 1\nprint(f())"), "None\n");
}

#[test]
fn assignment_binds_in_the_innermost_scope() {
    let src = "\
x = 1
def f():
    x = 2
    return x
print(f(), x)
";
    assert_eq!(output(src), "2 1\n");
}

#[test]
fn closures_capture_their_defining_scope() {
    let src = "\
def make_adder(n):
    def add(x):
        return x + n
    return add
add5 = make_adder(5)
print(add5(10))
print(make_adder(1)(1))
";
    assert_eq!(output(src), "15\n2\n");
}

#[test]
fn recursion() {
    let src = "\
def fib(n):
    if n < 2:
        return n
    return fib(n - 1) + fib(n - 2)
print(fib(15))
";
    assert_eq!(output(src), "610\n");
}

#[test]
fn recursion_limit_is_a_memory_fault() {
    let src = "def f(n): return f(n + 1)\nf(0)";
    let mut interpreter =
        Interpreter::with_config(InterpreterConfig { max_call_depth: 25 }).with_output(OutputBuffer::default());
    let err = evaluate_in(&mut interpreter, src, StartRule::Program).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Memory);

    // The interpreter stays usable afterwards.
    let result = evaluate_in(&mut interpreter, "f", StartRule::Expression).unwrap();
    assert!(matches!(result, Completion::Value(Value::Function(_))));
}

#[test]
fn break_only_leaves_the_innermost_loop() {
    let src = "\
for i in range(3):
    for j in range(3):
        if j == 1:
            break
        print(i, j)
";
    assert_eq!(output(src), "0 0\n1 0\n2 0\n");
}

#[test]
fn continue_skips_the_rest_of_the_body() {
    let src = "\
i = 0
while i < 5:
    i += 1
    if i % 2 == 0:
        continue
    print(i)
";
    assert_eq!(output(src), "1\n3\n5\n");
}

#[test]
fn return_passes_through_loops() {
    let src = "\
def first_even(xs):
    for x in xs:
        while True:
            if x % 2 == 0:
                return x
            break
    return None
print(first_even([1, 3, 4, 5]))
";
    assert_eq!(output(src), "4\n");
}

#[test]
fn elif_chains() {
    let src = "\
def grade(n):
    if n > 90:
        return 'a'
    elif n > 80:
        return 'b'
    elif n > 70:
        return 'c'
    else:
        return 'f'
print(grade(95), grade(85), grade(75), grade(10))
";
    assert_eq!(output(src), "a b c f\n");
}

#[test]
fn logical_operators_evaluate_both_operands() {
    let src = "\
def noisy(v):
    print('called', v)
    return v
r = noisy(False) and noisy(True)
print(r)
";
    assert_eq!(output(src), "called False\ncalled True\nFalse\n");
    assert_eq!(value("0 or 'x'"), Value::from("x"));
    assert_eq!(value("1 and 2"), Value::Integer(2));
}

#[test]
fn membership_and_identity() {
    assert_eq!(value("2 in [1, 2, 3]"), Value::Bool(true));
    assert_eq!(value("'b' not in 'abc'"), Value::Bool(false));
    assert_eq!(value("'k' in {'k': 1}"), Value::Bool(true));
    assert_eq!(value("None is None"), Value::Bool(true));
    assert_eq!(value("[] is not []"), Value::Bool(true));
    assert_eq!(fault("1 in 2"), FaultKind::Type);
}

#[test]
fn ordering_comparisons() {
    assert_eq!(value("1 < 2.5"), Value::Bool(true));
    assert_eq!(value("'abc' < 'abd'"), Value::Bool(true));
    assert_eq!(value("[1, 2] < [1, 3]"), Value::Bool(true));
    assert_eq!(value("(1, 2) >= (1, 2)"), Value::Bool(true));
    assert_eq!(value("1 == 1.0"), Value::Bool(true));
    assert_eq!(fault("x = 1 < 'a'"), FaultKind::Type);
}

#[test]
fn string_operations() {
    assert_eq!(value("'ab' + 'cd'"), Value::from("abcd"));
    assert_eq!(value("'ab' * 3"), Value::from("ababab"));
    assert_eq!(value("'hello'[1]"), Value::from("e"));
    assert_eq!(value("'hello'[-1]"), Value::from("o"));
    assert_eq!(value("'hello'[1:3]"), Value::from("el"));
    assert_eq!(value("'a,b'.split(',')"), Value::list(vec![Value::from("a"), Value::from("b")]));
    assert_eq!(value("'-'.join(['x', 'y'])"), Value::from("x-y"));
    assert_eq!(value("'  pad '.strip().upper()"), Value::from("PAD"));
    assert_eq!(fault("x = 'a' + 1"), FaultKind::Type);
}

#[test]
fn list_operations() {
    let src = "\
xs = [3, 1, 2]
xs.append(5)
xs.sort()
print(xs, len(xs))
xs[0] = 10
print(xs[0], xs[-1], xs[1:3])
print(xs.pop(), xs)
ys = xs
ys.append(7)
print(xs)
";
    assert_eq!(output(src), "[1, 2, 3, 5] 4\n10 5 [2, 3]\n5 [10, 2, 3]\n[10, 2, 3, 7]\n");
    assert_eq!(fault("xs = [1]\nxs[3]"), FaultKind::Index);
    assert_eq!(fault("xs = [1]\nxs[3] = 0"), FaultKind::Index);
}

#[test]
fn dict_operations() {
    let src = "\
d = {'a': 1, 'b': 2, 'a': 3}
print(d)
d['c'] = 4
print(d['a'], d.get('z', 0), len(d))
for k in d:
    print(k, d[k])
print(d.items())
";
    assert_eq!(output(src),
               "{'a': 3, 'b': 2}\n3 0 3\na 3\nb 2\nc 4\n[('a', 3), ('b', 2), ('c', 4)]\n");
    assert_eq!(fault("d = {}\nd['missing']"), FaultKind::Key);
    assert_eq!(fault("d = {[1]: 2}"), FaultKind::Type);
}

#[test]
fn numeric_keys_collapse() {
    assert_eq!(output("d = {1: 'int'}\nd[1.0] = 'float'\nd[True] = 'bool'\nprint(d)"),
               "{1: 'bool'}\n");
}

#[test]
fn set_operations() {
    let src = "\
s = {1, 2, 3}
t = {2, 3, 4}
print(s | t, s & t, s - t, s ^ t)
s.add(9)
s.discard(1)
print(len(s), 9 in s)
";
    assert_eq!(output(src), "{1, 2, 3, 4} {2, 3} {1} {1, 4}\n3 True\n");
    assert_eq!(fault("s = {1}\ns.remove(2)"), FaultKind::Key);
}

#[test]
fn tuples() {
    assert_eq!(output("t = (1, 'a', 2.5)\nprint(t, t[1], len(t))"), "(1, 'a', 2.5) a 3\n");
    assert_eq!(output("print((1,))"), "(1,)\n");
    assert_eq!(fault("t = (1, 2)\nt[0] = 3"), FaultKind::Type);
}

#[test]
fn builtin_functions() {
    assert_eq!(value("abs(-5)"), Value::Integer(5));
    assert_eq!(value("int('42') + int(3.9)"), Value::Integer(45));
    assert_eq!(value("float('1.5')"), Value::Real(1.5));
    assert_eq!(value("str(12) + repr('x')"), Value::from("12'x'"));
    assert_eq!(value("max([3, 9, 2])"), Value::Integer(9));
    assert_eq!(value("min(4, 1, 7)"), Value::Integer(1));
    assert_eq!(value("sum(range(5))"), Value::Integer(10));
    assert_eq!(value("sorted([3, 1, 2])").repr(), "[1, 2, 3]");
    assert_eq!(value("list(reversed('abc'))").repr(), "['c', 'b', 'a']");
    assert_eq!(value("list(zip([1, 2], 'ab'))").repr(), "[(1, 'a'), (2, 'b')]");
    assert_eq!(value("list(enumerate('ab'))").repr(), "[(0, 'a'), (1, 'b')]");
    assert_eq!(value("range(10, 0, -3)").repr(), "[10, 7, 4, 1]");
    assert_eq!(value("round(2.5)"), Value::Integer(2));
    assert_eq!(value("round(3.14159, 2)"), Value::Real(3.14));
    assert_eq!(value("chr(ord('a') + 1)"), Value::from("b"));
    assert_eq!(value("type(1.0)"), Value::from("float"));
    assert_eq!(value("bool([])"), Value::Bool(false));
    assert_eq!(fault("int('x')"), FaultKind::Value);
    assert_eq!(fault("max([])"), FaultKind::Value);
}

#[test]
fn attributes() {
    assert_eq!(fault("x = [1].missing"), FaultKind::Attribute);
    assert_eq!(fault("x = [1]\nx.attr = 2"), FaultKind::NotImplemented);
    assert_eq!(output("f = [].append\nprint(f)"), "<built-in method append of list object>\n");
}

#[test]
fn calling_a_non_callable() {
    assert_eq!(fault("x = 1\nx()"), FaultKind::Type);
}

#[test]
fn print_formats_values() {
    assert_eq!(output("print(1, 2.0, 'three', None, True)"), "1 2.0 three None True\n");
    assert_eq!(output("print(0.1 + 0.2)"), "0.30000000000000004\n");
    assert_eq!(output("print(1e20, 1e-5)"), "1e+20 1e-05\n");
    assert_eq!(output("print(['a', 1.5, (2,)])"), "['a', 1.5, (2,)]\n");
    assert_eq!(output("print()"), "\n");
}

#[test]
fn reruns_are_independent() {
    let src = "x = 1\nx += 1\nprint(x)";
    assert_eq!(output(src), "2\n");
    assert_eq!(output(src), "2\n");
}

#[test]
fn syntax_errors() {
    assert_eq!(fault("x = = 1"), FaultKind::Syntax);
    assert_eq!(fault("return 1"), FaultKind::Syntax);
    assert_eq!(fault("if True:\nx = 1"), FaultKind::Syntax);
    assert_eq!(fault("x = 1 $ 2"), FaultKind::Syntax);
}

#[test]
fn expression_mode() {
    assert_eq!(value("1, 2"), Value::tuple(vec![Value::Integer(1), Value::Integer(2)]));
    assert_eq!(evaluate_unit("x = 1\n", StartRule::Program).unwrap(), Completion::Status(0));
    assert_eq!(evaluate_unit("x = 1\n", StartRule::SingleStatement).unwrap(),
               Completion::Status(0));
}

#[test]
fn oversized_repetition_is_a_memory_error() {
    assert_eq!(fault("x = 'ab' * 1000000000000"), FaultKind::Memory);
    assert_eq!(fault("x = [0, 1] * 9223372036854775807"), FaultKind::Memory);
    assert_eq!(fault("x = range(100000000000)"), FaultKind::Memory);
    assert_eq!(value("len([0] * 10)"), Value::Integer(10));
    assert_eq!(value("len('ab' * 3 + 'c')"), Value::Integer(7));
    assert_eq!(value("[1, 2] * -1"), value("[]"));
}

#[test]
fn repeated_lists_hold_the_same_elements() {
    let src = "\
inner = [1]
outer = [inner] * 2
outer[0].append(2)
print(outer)
";
    assert_eq!(output(src), "[[1, 2], [1, 2]]\n");
}

#[test]
fn self_containing_containers() {
    let src = "\
a = [1]
a.append(a)
print(a)
print(a == a)
b = [1]
b.append(b)
print(a == b)
print(a < b)
d = {}
d['k'] = d
print(d)
";
    assert_eq!(output(src), "[1, [...]]\nTrue\nTrue\nFalse\n{'k': {...}}\n");
}

#[test]
fn deep_nesting_is_a_syntax_error() {
    let src = format!("x = {}1{}", "(".repeat(50_000), ")".repeat(50_000));
    let mut interpreter = Interpreter::new().with_output(OutputBuffer::default());
    let err = evaluate_in(&mut interpreter, &src, StartRule::Program).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::TooDeeplyNested { .. })), "{err}");
    assert_eq!(err.kind(), FaultKind::Syntax);

    assert_eq!(fault(&format!("x = {}1", "-".repeat(50_000))), FaultKind::Syntax);
    assert_eq!(fault(&format!("x = 1{}", " + 1".repeat(50_000))), FaultKind::Syntax);

    let nested = format!("{}1{}", "(".repeat(40), ")".repeat(40));
    assert_eq!(value(&nested), Value::Integer(1));
    assert_eq!(value(&format!("0{}", " + 1".repeat(300))), Value::Integer(300));
}

#[test]
fn large_integers_mix_with_floats() {
    assert_eq!(value("9007199254740993 / 1"), Value::Real(9_007_199_254_740_992.0));
    assert!(matches!(value("9007199254740993 + 0.5"), Value::Real(_)));
    assert_eq!(value("9223372036854775807 * 1.0"), Value::Real(9_223_372_036_854_775_807.0));
    assert_eq!(value("9007199254740993 > 9007199254740992.0"), Value::Bool(true));
    assert_eq!(value("9007199254740992.0 < 9007199254740993"), Value::Bool(true));
    assert_eq!(value("9223372036854775807 < 1e300"), Value::Bool(true));
    assert_eq!(value("-1e300 < -9223372036854775807"), Value::Bool(true));
    assert_eq!(value("3 < 3.5"), Value::Bool(true));
    assert_eq!(value("-3 > -3.5"), Value::Bool(true));
}

#[test]
fn smallest_integer_modulo_minus_one() {
    assert_eq!(value("(-9223372036854775807 - 1) % -1"), Value::Integer(0));
    assert_eq!(value("(-9223372036854775807 - 1) % 7"), Value::Integer(6));
    assert_eq!(value("7 % -1"), Value::Integer(0));
}

#[test]
fn interrupt_stops_loops_and_calls() {
    let mut interpreter = Interpreter::new().with_output(OutputBuffer::default());
    let flag = interpreter.interrupt_flag();

    flag.store(true, Ordering::SeqCst);
    let err = evaluate_in(&mut interpreter, "while True:\n    pass\n", StartRule::Program).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Interrupt);
    assert_eq!(err.to_string(), "KeyboardInterrupt on line 1");
    assert!(!err.kind().is_a(FaultKind::Memory));

    flag.store(true, Ordering::SeqCst);
    let err = evaluate_in(&mut interpreter, "for i in range(3):\n    x = i\n", StartRule::Program).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Interrupt);

    evaluate_in(&mut interpreter, "def f():\n    return 1\n", StartRule::Program).unwrap();
    flag.store(true, Ordering::SeqCst);
    let err = evaluate_in(&mut interpreter, "f()", StartRule::Expression).unwrap_err();
    assert_eq!(err.kind(), FaultKind::Interrupt);

    assert_eq!(evaluate_in(&mut interpreter, "f()", StartRule::Expression).unwrap(),
               Completion::Value(Value::Integer(1)));
}
