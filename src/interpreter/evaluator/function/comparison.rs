use std::cmp::Ordering;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, host::Host, value::core::Value},
    util::num::int_to_float,
};

pub fn less(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    test(&args[0], &args[1], line, Ordering::is_lt)
}

pub fn less_equal(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    test(&args[0], &args[1], line, Ordering::is_le)
}

pub fn greater(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    test(&args[0], &args[1], line, Ordering::is_gt)
}

pub fn greater_equal(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    test(&args[0], &args[1], line, Ordering::is_ge)
}

/// Orders two numbers, or two strings lexicographically.
///
/// `None` when a NaN is involved; every ordering test is then false.
fn compare(a: &Value, b: &Value, line: usize) -> EvalResult<Option<Ordering>> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok(Some(x.cmp(y))),
        (Value::Integer(x), Value::Float(y)) => Ok(int_to_float(*x).partial_cmp(y)),
        (Value::Float(x), Value::Integer(y)) => Ok(x.partial_cmp(&int_to_float(*y))),
        (Value::Float(x), Value::Float(y)) => Ok(x.partial_cmp(y)),
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        _ => Err(RuntimeError::TypeError { details: format!("cannot compare {} with {}",
                                                            a.type_name(),
                                                            b.type_name()),
                                           line }),
    }
}

fn test(a: &Value, b: &Value, line: usize, accept: fn(Ordering) -> bool) -> EvalResult<Value> {
    Ok(Value::Bool(compare(a, b, line)?.is_some_and(accept)))
}

/// Orders two numbers; used by the numeric `for` loop.
///
/// # Errors
/// `TypeError` for non-numbers or NaN.
pub fn compare_numbers(a: &Value, b: &Value, line: usize) -> EvalResult<Ordering> {
    if !a.is_number() || !b.is_number() {
        return Err(RuntimeError::TypeError { details: format!("expected numbers, found {} and {}",
                                                              a.type_name(),
                                                              b.type_name()),
                                             line });
    }
    compare(a, b, line)?.ok_or_else(|| RuntimeError::TypeError { details: "cannot order NaN".to_string(),
                                                                 line })
}
