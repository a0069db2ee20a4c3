use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, host::Host, value::core::Value},
    util::num::{floor_div, floor_mod, floor_mod_f64, int_to_float},
};

/// `+`: string concatenation when either operand is a string, numeric
/// addition otherwise.
///
/// # Example
/// ```
/// use quill::{interpreter::value::core::Value, run};
///
/// assert_eq!(run("\"n=\" + 3").unwrap(), Value::from("n=3"));
/// assert_eq!(run("1 + 2.5").unwrap(), Value::Float(3.5));
/// ```
pub fn add(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    add_values(&args[0], &args[1], line)
}

/// Shared by `+` and the numeric `for` loop.
pub fn add_values(a: &Value, b: &Value, line: usize) -> EvalResult<Value> {
    if matches!(a, Value::Str(_)) || matches!(b, Value::Str(_)) {
        return Ok(Value::from(format!("{a}{b}")));
    }
    numeric("+", a, b, line, i64::checked_add, |x, y| x + y)
}

pub fn subtract(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    numeric("-", &args[0], &args[1], line, i64::checked_sub, |x, y| x - y)
}

pub fn multiply(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    numeric("*", &args[0], &args[1], line, i64::checked_mul, |x, y| x * y)
}

/// `/`: division rounding toward negative infinity. Integer operands give an
/// integer, otherwise the floored float.
pub fn floor_divide(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Integer(_), Value::Integer(0)) => Err(RuntimeError::DivisionByZero { line }),
        (Value::Integer(a), Value::Integer(b)) => {
            floor_div(*a, *b).map(Value::Integer)
                             .ok_or(RuntimeError::Overflow { line })
        },
        (a, b) => {
            let (x, y) = floats("/", a, b, line)?;
            if y == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Float((x / y).floor()))
        },
    }
}

/// `/.`: true division, always a float.
pub fn true_divide(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    let (x, y) = floats("/.", &args[0], &args[1], line)?;
    if y == 0.0 {
        return Err(RuntimeError::DivisionByZero { line });
    }
    Ok(Value::Float(x / y))
}

/// `%`: remainder whose sign follows the divisor.
pub fn modulo(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Integer(_), Value::Integer(0)) => Err(RuntimeError::DivisionByZero { line }),
        (Value::Integer(a), Value::Integer(b)) => {
            floor_mod(*a, *b).map(Value::Integer)
                             .ok_or(RuntimeError::Overflow { line })
        },
        (a, b) => {
            let (x, y) = floats("%", a, b, line)?;
            if y == 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Float(floor_mod_f64(x, y)))
        },
    }
}

/// `**`: exponentiation.
///
/// An integer raised to a non-negative integer stays an integer and fails on
/// overflow; a negative integer exponent gives a float.
pub fn power(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    match (&args[0], &args[1]) {
        (Value::Integer(base), Value::Integer(exponent)) if *exponent >= 0 => {
            let exponent = u32::try_from(*exponent).map_err(|_| RuntimeError::Overflow { line })?;
            base.checked_pow(exponent)
                .map(Value::Integer)
                .ok_or(RuntimeError::Overflow { line })
        },
        (a, b) => {
            let (x, y) = floats("**", a, b, line)?;
            if x == 0.0 && y < 0.0 {
                return Err(RuntimeError::DivisionByZero { line });
            }
            Ok(Value::Float(x.powf(y)))
        },
    }
}

/// Unary `-`.
pub fn negate(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    match &args[0] {
        Value::Integer(i) => i.checked_neg()
                              .map(Value::Integer)
                              .ok_or(RuntimeError::Overflow { line }),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(RuntimeError::TypeError { details: format!("cannot negate {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// Applies a binary arithmetic operator.
///
/// Two integers use the checked integer operation; any float operand
/// promotes both sides to `f64`.
fn numeric(op: &str,
           a: &Value,
           b: &Value,
           line: usize,
           int_op: fn(i64, i64) -> Option<i64>,
           float_op: fn(f64, f64) -> f64)
           -> EvalResult<Value> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => {
            int_op(*x, *y).map(Value::Integer)
                          .ok_or(RuntimeError::Overflow { line })
        },
        _ => {
            let (x, y) = floats(op, a, b, line)?;
            Ok(Value::Float(float_op(x, y)))
        },
    }
}

fn floats(op: &str, a: &Value, b: &Value, line: usize) -> EvalResult<(f64, f64)> {
    match (a, b) {
        (Value::Integer(x), Value::Integer(y)) => Ok((int_to_float(*x), int_to_float(*y))),
        (Value::Integer(_) | Value::Float(_), Value::Integer(_) | Value::Float(_)) => {
            Ok((a.as_float(line)?, b.as_float(line)?))
        },
        _ => Err(RuntimeError::TypeError { details: format!("cannot apply '{op}' to {} and {}",
                                                            a.type_name(),
                                                            b.type_name()),
                                           line }),
    }
}
