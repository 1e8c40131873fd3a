use crate::interpreter::{
    evaluator::core::{EvalResult, Interpreter},
    value::core::Value,
};

/// Writes the `str` form of each argument, separated by spaces and followed
/// by a newline, to the interpreter's output sink.
///
/// # Returns
/// `None`, so the interactive shell does not echo anything after printing.
///
/// # Example
/// ```
/// use pyrite::interpreter::{
///     evaluator::{Interpreter, builtin::output::print},
///     output::OutputBuffer,
///     value::core::Value,
/// };
///
/// let buffer = OutputBuffer::default();
/// let mut interpreter = Interpreter::new().with_output(buffer.clone());
///
/// let result = print(&mut interpreter, &[Value::from("x"), Value::Integer(1)], 1).unwrap();
///
/// assert_eq!(result, Value::None);
/// assert_eq!(buffer.contents(), "x 1\n");
/// ```
pub fn print(interpreter: &mut Interpreter, args: &[Value], line: usize) -> EvalResult<Value> {
    let text: Vec<String> = args.iter().map(ToString::to_string).collect();
    interpreter.write_output(&format!("{}\n", text.join(" ")), line)?;
    Ok(Value::None)
}
