use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter, Signal},
        value::core::{Function, Value},
    },
};

impl Interpreter {
    /// Calls `callee` with positional `arguments`.
    ///
    /// # Errors
    /// - `TypeError` if `callee` is not callable or the argument count does
    ///   not match.
    /// - `MemoryError` once the call depth exceeds the configured limit.
    /// - `KeyboardInterrupt` if the interrupt flag was set.
    /// - Any fault raised by the function body.
    ///
    /// # Example
    /// ```
    /// use pyrite::interpreter::{evaluator::Interpreter, value::core::Value};
    ///
    /// let mut interpreter = Interpreter::new();
    /// let len = interpreter.globals().lookup("len").unwrap();
    ///
    /// let result = interpreter.call(&len, &[Value::from("abc")], 1).unwrap();
    /// assert_eq!(result, Value::Integer(3));
    /// ```
    pub fn call(&mut self, callee: &Value, arguments: &[Value], line: usize) -> EvalResult<Value> {
        match callee {
            Value::Function(function) => self.call_function(function, arguments, line),
            Value::Builtin(builtin) => builtin.invoke(self, arguments, line),
            Value::BoundMethod(bound) => bound.method.invoke(&bound.receiver, arguments, line),
            other => Err(RuntimeError::type_error(format!("'{}' object is not callable",
                                                          other.type_name()),
                                                  line)),
        }
    }

    /// Runs a user function in a fresh child of its defining scope.
    ///
    /// The activation scope is dropped when the call returns unless a
    /// function defined inside the body captured it.
    fn call_function(&mut self, function: &Function, arguments: &[Value], line: usize) -> EvalResult<Value> {
        let def = &function.def;
        if arguments.len() != def.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch { name: def.name.clone(),
                                                             expected: def.params.len(),
                                                             found: arguments.len(),
                                                             line });
        }

        self.check_interrupt(line)?;
        let limit = self.config().max_call_depth;
        if self.call_depth >= limit {
            return Err(RuntimeError::RecursionLimit { limit, line });
        }

        let activation = function.closure.child();
        for (param, argument) in def.params.iter().zip(arguments) {
            activation.assign(param.clone(), argument.clone());
        }

        trace!(function = %def.name, depth = self.call_depth + 1, "call");
        self.call_depth += 1;
        let flow = self.exec_block(&def.body, &activation);
        self.call_depth -= 1;

        match flow? {
            Flow::Signal(Signal::Return(value)) => Ok(value),
            Flow::Values(_) | Flow::Signal(_) => Ok(Value::None),
        }
    }
}
