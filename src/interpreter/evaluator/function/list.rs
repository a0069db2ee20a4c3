use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        host::Host,
        value::{core::Value, list::List},
    },
};

/// `pair(x, xs)` and `,`: conses `x` onto `xs`. Any tail is accepted, so
/// improper pairs can be built.
pub fn pair(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::List(List::pair(args[0].clone(), args[1].clone())))
}

/// `$list`: the list literal `[a, b, c]`.
pub fn make_list(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::List(args.iter().cloned().collect()))
}

/// `xs[i]` on lists and strings, zero based.
pub fn index(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    let position = args[1].as_integer(line)?;
    match &args[0] {
        Value::List(list) => {
            let items = list.to_vec()
                            .ok_or_else(|| RuntimeError::TypeError { details: "cannot index an improper list".to_string(),
                                                                     line })?;
            usize::try_from(position).ok()
                                     .and_then(|i| items.get(i).cloned())
                                     .ok_or(RuntimeError::IndexOutOfBounds { index: position,
                                                                             length: items.len(),
                                                                             line })
        },
        Value::Str(s) => {
            usize::try_from(position).ok()
                                     .and_then(|i| s.chars().nth(i))
                                     .map(|c| Value::from(c.to_string()))
                                     .ok_or_else(|| RuntimeError::IndexOutOfBounds { index: position,
                                                                                     length: s.chars().count(),
                                                                                     line })
        },
        other => Err(RuntimeError::TypeError { details: format!("cannot index {}",
                                                                other.type_name()),
                                               line }),
    }
}

/// `$string_to_char_list`: one single-character string per character.
pub fn string_to_char_list(_host: &mut Host, args: &[Value], line: usize) -> EvalResult<Value> {
    let s = args[0].as_str(line)?;
    Ok(Value::List(s.chars().map(|c| Value::from(c.to_string())).collect()))
}

/// `is_list(x)`: true for well-formed lists, including the empty list.
pub fn is_list(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(&args[0], Value::List(list) if list.is_well_formed())))
}

/// `is_pair(x)`: true for any cons cell.
pub fn is_pair(_host: &mut Host, args: &[Value], _line: usize) -> EvalResult<Value> {
    Ok(Value::Bool(matches!(&args[0], Value::List(List::Pair(_)))))
}
