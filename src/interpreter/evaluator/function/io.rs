use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, host::Host, value::core::Value},
};

/// `print(a, b, ...)`: writes the arguments back to back, then a newline.
///
/// Strings are written without quotes, lists as `[a, b]`.
pub fn print(host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    let text = args.iter().map(ToString::to_string).collect::<String>();
    host.write_line(&text, line)?;
    Ok(Value::Null)
}

/// `input([prompt])`: reads one line from the host, `null` at end of input.
pub fn input(host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    if let Some(prompt) = args.first() {
        host.write(&prompt.to_string(), line)?;
    }
    Ok(host.read_line(line)?.map_or(Value::Null, Value::from))
}

/// `throw(message)`: fails evaluation with a user message.
pub fn throw(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    Err(RuntimeError::Thrown { message: args[0].to_string(),
                               line })
}

/// `assert(condition)`: fails unless the condition is truthy.
pub fn assert(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    if args[0].is_truthy() {
        Ok(Value::Null)
    } else {
        Err(RuntimeError::AssertionFailed { line })
    }
}
