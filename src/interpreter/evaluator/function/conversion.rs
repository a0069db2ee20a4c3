use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, host::Host, value::core::Value},
    util::num::{f64_to_i64_checked, round_to_places},
};

/// `$char_code(c)`: the code point of a one-character string.
pub fn char_code(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    let s = args[0].as_str(line)?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Integer(i64::from(u32::from(c)))),
        _ => Err(RuntimeError::TypeError { details: format!("expected a single character, found {s:?}"),
                                           line }),
    }
}

/// `int(x)`: truncates floats, parses strings, maps booleans to `0`/`1`.
pub fn int(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        Value::Float(x) => f64_to_i64_checked(*x, line).map(Value::Integer),
        Value::Bool(b) => Ok(Value::Integer(i64::from(*b))),
        Value::Str(s) => {
            let trimmed = s.trim();
            if let Ok(i) = trimmed.parse::<i64>() {
                return Ok(Value::Integer(i));
            }
            trimmed.parse::<f64>()
                   .map_err(|_| RuntimeError::TypeError { details: format!("cannot convert {s:?} to an integer"),
                                                          line })
                   .and_then(|x| f64_to_i64_checked(x, line))
                   .map(Value::Integer)
        },
        other => Err(RuntimeError::TypeError { details: format!("cannot convert {} to an integer",
                                                                other.type_name()),
                                               line }),
    }
}

/// `round(x)` rounds half to even and returns an integer; `round(x, n)`
/// rounds to `n` decimal places and returns a float.
pub fn round(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    if let [value, places] = args {
        let places = i32::try_from(places.as_integer(line)?).map_err(|_| RuntimeError::Overflow { line })?;
        return Ok(Value::Float(round_to_places(value.as_float(line)?, places)));
    }
    match &args[0] {
        Value::Integer(i) => Ok(Value::Integer(*i)),
        other => f64_to_i64_checked(other.as_float(line)?.round_ties_even(), line).map(Value::Integer),
    }
}
