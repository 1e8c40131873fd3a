use std::{io::Cursor, sync::atomic::Ordering};

use pretty_assertions::assert_eq;
use pyrite::{
    Interpreter, StartRule,
    error::FaultKind,
    interpreter::{
        cst::Cst,
        output::OutputBuffer,
        repl::{Repl, ReplState, Step},
        value::core::Value,
    },
    parse, tokenize,
};

fn repl() -> (Repl<Cursor<&'static str>, Vec<u8>>, OutputBuffer) {
    let printed = OutputBuffer::default();
    let repl = Repl::new(Cursor::new(""), Vec::new())
        .with_interpreter(Interpreter::new().with_output(printed.clone()));
    (repl, printed)
}

fn session(input: &'static str) -> (String, String) {
    let printed = OutputBuffer::default();
    let mut output = Vec::new();
    let mut repl = Repl::new(Cursor::new(input), &mut output)
        .with_interpreter(Interpreter::new().with_output(printed.clone()));
    repl.run().unwrap();
    drop(repl);
    (String::from_utf8(output).unwrap(), printed.contents())
}

#[test]
fn open_block_awaits_continuation() {
    let (mut repl, _) = repl();
    assert!(matches!(repl.feed_line("if True:\n"), Step::NeedMore));
    assert_eq!(repl.state(), ReplState::AwaitingContinuation);
}

#[test]
fn open_bracket_awaits_continuation() {
    let (mut repl, _) = repl();
    assert!(matches!(repl.feed_line("xs = [1,"), Step::NeedMore));
    assert!(matches!(repl.feed_line("      2]"), Step::Evaluated(_)));
    assert_eq!(repl.state(), ReplState::AwaitingStatement);
    assert_eq!(repl.interpreter().globals().lookup("xs").map(|v| v.repr()),
               Some("[1, 2]".to_string()));
}

#[test]
fn blank_line_finishes_a_block() {
    let (mut repl, printed) = repl();
    assert!(matches!(repl.feed_line("for i in range(2):"), Step::NeedMore));
    assert!(matches!(repl.feed_line("    print(i)"), Step::NeedMore));
    assert!(matches!(repl.feed_line(""), Step::Evaluated(_)));
    assert_eq!(printed.contents(), "0\n1\n");
}

#[test]
fn blank_and_comment_lines_are_empty_steps() {
    let (mut repl, _) = repl();
    assert!(matches!(repl.feed_line(""), Step::Empty));
    assert!(matches!(repl.feed_line("   # just a comment"), Step::Empty));
    assert_eq!(repl.state(), ReplState::AwaitingStatement);
}

#[test]
fn expression_values_are_returned() {
    let (mut repl, _) = repl();
    let Step::Evaluated(values) = repl.feed_line("1 + 2") else {
        panic!("expected a value");
    };
    assert_eq!(values, vec![Value::Integer(3)]);

    let Step::Evaluated(values) = repl.feed_line("x = 5") else {
        panic!("expected an assignment to run");
    };
    assert!(values.is_empty());
}

#[test]
fn definitions_persist_between_statements() {
    let (mut repl, _) = repl();
    assert!(matches!(repl.feed_line("def double(x):"), Step::NeedMore));
    assert!(matches!(repl.feed_line("    return x * 2"), Step::NeedMore));
    assert!(matches!(repl.feed_line(""), Step::Evaluated(_)));
    let Step::Evaluated(values) = repl.feed_line("double(21)") else {
        panic!("expected a value");
    };
    assert_eq!(values, vec![Value::Integer(42)]);
}

#[test]
fn faults_do_not_end_the_session() {
    let (mut repl, _) = repl();
    let Step::Failed(error) = repl.feed_line("1 / 0") else {
        panic!("expected a fault");
    };
    assert_eq!(error.kind(), FaultKind::ZeroDivision);
    assert_eq!(repl.state(), ReplState::AwaitingStatement);
    assert!(matches!(repl.feed_line("2"), Step::Evaluated(_)));
}

#[test]
fn syntax_errors_discard_the_buffer() {
    let (mut repl, _) = repl();
    assert!(matches!(repl.feed_line("if True:"), Step::NeedMore));
    let Step::Failed(error) = repl.feed_line("x = = 1") else {
        panic!("expected a syntax error");
    };
    assert_eq!(error.kind(), FaultKind::Syntax);
    assert_eq!(repl.state(), ReplState::AwaitingStatement);
    assert!(matches!(repl.feed_line("3"), Step::Evaluated(_)));
}

#[test]
fn session_echoes_reprs_and_faults() {
    let (output, printed) = session("'a' + 'b'\nprint('hi')\nundefined\n[1, 2]\n");
    assert_eq!(output,
               ">>> 'ab'\n>>> >>> NameError on line 1: name 'undefined' is not defined\n>>> [1, 2]\n>>> \n");
    assert_eq!(printed, "hi\n");
}

#[test]
fn session_prompts_for_continuation() {
    let (output, printed) = session("if True:\n    print(1)\n\n");
    assert_eq!(output, ">>> ... ... >>> \n");
    assert_eq!(printed, "1\n");
}

#[test]
fn statement_after_a_block_needs_a_blank_line() {
    let (output, printed) = session("while False:\n    pass\nx = 1\n");
    assert!(output.starts_with(">>> ... ... SyntaxError on line 3"), "got {output:?}");
    assert_eq!(printed, "");
}

#[test]
fn end_of_input_completes_a_pending_block() {
    let (output, printed) = session("for c in 'ab':\n    print(c)\n");
    assert_eq!(output, ">>> ... ... \n");
    assert_eq!(printed, "a\nb\n");
}

#[test]
fn interrupt_fails_the_running_statement() {
    let (mut repl, _) = repl();
    let flag = repl.interpreter().interrupt_flag();
    assert!(matches!(repl.feed_line("while True:"), Step::NeedMore));
    assert!(matches!(repl.feed_line("    pass"), Step::NeedMore));

    flag.store(true, Ordering::SeqCst);
    let Step::Failed(error) = repl.feed_line("") else {
        panic!("expected the loop to be interrupted");
    };
    assert_eq!(error.kind(), FaultKind::Interrupt);
    assert_eq!(repl.state(), ReplState::AwaitingStatement);
    assert!(!flag.load(Ordering::SeqCst));

    let Step::Evaluated(values) = repl.feed_line("2") else {
        panic!("expected the session to continue");
    };
    assert_eq!(values, vec![Value::Integer(2)]);
}

#[test]
fn interrupt_while_reading_discards_the_line() {
    let interpreter = Interpreter::new().with_output(OutputBuffer::default());
    interpreter.interrupt_flag().store(true, Ordering::SeqCst);
    let mut output = Vec::new();
    let mut repl = Repl::new(Cursor::new("1\n2\n"), &mut output).with_interpreter(interpreter);
    repl.run().unwrap();
    drop(repl);
    assert_eq!(String::from_utf8(output).unwrap(), ">>> \nKeyboardInterrupt\n>>> 2\n>>> \n");
}

#[test]
fn session_shows_the_syntax_tree() {
    let tokens = tokenize("1 + 2\n").unwrap();
    let tree = parse(&tokens, StartRule::SingleStatement).unwrap();
    let expected = format!(">>> {}3\n>>> \n", Cst::flatten(&tree));

    let mut output = Vec::new();
    let mut repl = Repl::new(Cursor::new("1 + 2\n"), &mut output)
        .with_interpreter(Interpreter::new().with_output(OutputBuffer::default()))
        .show_cst(true);
    repl.run().unwrap();
    drop(repl);
    assert_eq!(String::from_utf8(output).unwrap(), expected);
}
