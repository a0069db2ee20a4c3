use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, host::Host, value::core::Value},
};

/// `&&` on two already evaluated operands: the left one when it is falsy,
/// otherwise the right one.
///
/// Through an application node the right operand is `null` whenever the left
/// one was falsy, so the result is the same as with short-circuiting.
pub fn and(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    let deciding = if args[0].is_truthy() { &args[1] } else { &args[0] };
    Ok(deciding.clone())
}

/// `||` on two already evaluated operands: the left one when it is truthy,
/// otherwise the right one.
pub fn or(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    let deciding = if args[0].is_truthy() { &args[0] } else { &args[1] };
    Ok(deciding.clone())
}

/// Bitwise `&`, `|` and `^` on integers.
pub fn bitwise(op: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    let (a, b) = (args[0].as_integer(line)?, args[1].as_integer(line)?);
    let result = match op {
        "&" => a & b,
        "|" => a | b,
        _ => a ^ b,
    };
    Ok(Value::Integer(result))
}

/// `<<`, arithmetic `>>` and logical `>>>`.
///
/// The shift amount must lie in `0..64`.
pub fn shift(op: &str, args: &[Value], line: usize) -> EvalResult<Value> {
    let value = args[0].as_integer(line)?;
    let amount = args[1].as_integer(line)?;
    let amount = u32::try_from(amount).ok()
                                      .filter(|n| *n < i64::BITS)
                                      .ok_or_else(|| RuntimeError::TypeError {
                                          details: format!("shift amount {amount} out of range"),
                                          line,
                                      })?;
    let result = match op {
        "<<" => value << amount,
        ">>" => value >> amount,
        _ => i64::from_ne_bytes((u64::from_ne_bytes(value.to_ne_bytes()) >> amount).to_ne_bytes()),
    };
    Ok(Value::Integer(result))
}

/// Unary `~`.
pub fn complement(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    Ok(Value::Integer(!args[0].as_integer(line)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_or_return_operands() {
        let mut host = Host::buffered(crate::interpreter::host::OutputBuffer::default());
        let falsy = [Value::from(""), Value::Integer(7)];
        let truthy = [Value::Integer(3), Value::Integer(7)];
        assert_eq!(and(&mut host, &falsy, 1), Ok(Value::from("")));
        assert_eq!(and(&mut host, &truthy, 1), Ok(Value::Integer(7)));
        assert_eq!(or(&mut host, &falsy, 1), Ok(Value::Integer(7)));
        assert_eq!(or(&mut host, &truthy, 1), Ok(Value::Integer(3)));
    }

    #[test]
    fn shifts() {
        let args = [Value::Integer(-8), Value::Integer(1)];
        assert_eq!(shift("<<", &args, 1), Ok(Value::Integer(-16)));
        assert_eq!(shift(">>", &args, 1), Ok(Value::Integer(-4)));
        assert_eq!(shift(">>>", &args, 1), Ok(Value::Integer(i64::MAX - 3)));
        assert!(shift("<<", &[Value::Integer(1), Value::Integer(64)], 1).is_err());
    }

    #[test]
    fn bitwise_needs_integers() {
        assert_eq!(bitwise("^", &[Value::Integer(6), Value::Integer(3)], 1),
                   Ok(Value::Integer(5)));
        assert!(bitwise("&", &[Value::Float(1.0), Value::Integer(1)], 1).is_err());
    }
}
