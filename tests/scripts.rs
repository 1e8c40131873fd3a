use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use pyrite::{Interpreter, StartRule, evaluate_in, interpreter::output::OutputBuffer};
use walkdir::WalkDir;

/// Runs every `tests/scripts/*.py` and compares what it prints with the
/// `.out` file next to it. Scripts that are expected to fail have a `.err`
/// file holding the error message.
#[test]
fn scripts_produce_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").sort_by_file_name()
                                     .into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "py"))
    {
        count += 1;
        check_script(entry.path());
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn check_script(path: &Path) {
    let source = read(path);
    let expected = read(&path.with_extension("out"));
    let expected_error = fs::read_to_string(path.with_extension("err")).ok();

    let buffer = OutputBuffer::default();
    let mut interpreter = Interpreter::new().with_output(buffer.clone());
    let result = evaluate_in(&mut interpreter, &source, StartRule::Program);

    match (result, expected_error) {
        (Ok(_), None) => {},
        (Ok(_), Some(error)) => {
            panic!("{path:?} succeeded but was expected to fail with: {}", error.trim())
        },
        (Err(e), None) => panic!("{path:?} failed: {e}"),
        (Err(e), Some(error)) => assert_eq!(e.to_string(), error.trim(), "error of {path:?}"),
    }
    assert_eq!(buffer.contents(), expected, "output of {path:?}");
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"))
}
