use std::cmp::Ordering;

use crate::{
    ast::{ForRange, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            control::LoopStep,
            core::{Context, EvalResult},
            environment::Env,
            function::{arithmetic::add_values, comparison::compare_numbers},
        },
        value::{core::Value, signal::Outcome},
    },
};

impl Context {
    /// Evaluates a `for` statement.
    ///
    /// Two forms are supported:
    ///
    /// 1. **Numeric range:** `for i in from..to { body }`, or `from..=to` to
    ///    include the bound, optionally followed by `step increment`. `to` and
    ///    the increment are evaluated once. The loop variable lives in a frame
    ///    of its own, so the body may reassign it; the value read back after
    ///    each pass is the one that gets advanced. A positive increment runs
    ///    while `i < to` (`<=` when closed), a negative one while `i > to`
    ///    (`>=`).
    ///
    /// 2. **Collection range:** `for x in xs { body }`. `xs` must evaluate to
    ///    a well-formed list; each element is bound in a fresh frame.
    ///
    /// `break` ends the loop with `null`; `continue` ends the current pass;
    /// `return` and `fallthrough` propagate.
    ///
    /// # Parameters
    /// - `variable`: Name of the loop variable.
    /// - `range`: Numeric bounds or collection expression.
    /// - `consequent`: The loop body.
    /// - `env`: Environment of the `for` statement.
    /// - `line`: Line number for error reporting.
    ///
    /// # Errors
    /// - `TypeError` for non-numeric bounds or a zero increment.
    /// - `UnsupportedForRange` when a collection range is not a list.
    ///
    /// # Example
    /// ```
    /// use quill::{run_with, Config, Context, interpreter::host::{Host, OutputBuffer}};
    ///
    /// let output = OutputBuffer::default();
    /// let mut context = Context::new(Host::buffered(output.clone()), Config::default());
    /// run_with("for i in 3..=1 step -1 { print(i) }", &mut context).unwrap();
    /// assert_eq!(output.contents(), "3\n2\n1\n");
    /// ```
    pub(in crate::interpreter::evaluator) fn eval_for(&mut self,
                                                      variable: &str,
                                                      range: &ForRange,
                                                      consequent: &[Node],
                                                      env: &Env,
                                                      line: usize)
                                                      -> EvalResult<Outcome> {
        match range {
            ForRange::Numeric { from,
                                to,
                                closed,
                                increment, } => {
                let start = self.evaluate_value(from, env)?;
                let bound = self.evaluate_value(to, env)?;
                let step = match increment {
                    Some(increment) => self.evaluate_value(increment, env)?,
                    None => Value::Integer(1),
                };
                self.numeric_for(variable,
                                 NumericRange { start, bound, step, closed: *closed },
                                 consequent,
                                 env,
                                 line)
            },
            ForRange::Collection(collection) => {
                let collection = self.evaluate_value(collection, env)?;
                self.collection_for(variable, &collection, consequent, env, line)
            },
        }
    }

    fn numeric_for(&mut self,
                   variable: &str,
                   range: NumericRange,
                   consequent: &[Node],
                   env: &Env,
                   line: usize)
                   -> EvalResult<Outcome> {
        let direction = range.direction(line)?;
        for value in [&range.start, &range.bound] {
            if !value.is_number() {
                return Err(RuntimeError::TypeError { details: format!("for range bounds must be numbers, found {}",
                                                                      value.type_name()),
                                                     line });
            }
        }

        let frame = env.child();
        frame.define(variable, range.start.clone());

        loop {
            let current = frame.lookup(variable)
                               .ok_or_else(|| RuntimeError::UnknownVariable { name: variable.to_string(),
                                                                              line })?;
            let ordering = compare_numbers(&current, &range.bound, line)?;
            let keep_going = match (direction, range.closed) {
                (Ordering::Greater, false) => ordering == Ordering::Less,
                (Ordering::Greater, true) => ordering != Ordering::Greater,
                (_, false) => ordering == Ordering::Greater,
                (_, true) => ordering != Ordering::Less,
            };
            if !keep_going {
                break;
            }

            match LoopStep::from(self.evaluate_sequence(consequent, &frame.child())?) {
                LoopStep::Next => {},
                LoopStep::Exit => break,
                LoopStep::Propagate(signal) => return Ok(signal.into()),
            }

            let current = frame.lookup(variable).unwrap_or(current);
            frame.define(variable, add_values(&current, &range.step, line)?);
        }

        Ok(Value::Null.into())
    }

    fn collection_for(&mut self,
                      variable: &str,
                      collection: &Value,
                      consequent: &[Node],
                      env: &Env,
                      line: usize)
                      -> EvalResult<Outcome> {
        let list = match collection {
            Value::List(list) if list.is_well_formed() => list,
            Value::List(_) => {
                return Err(RuntimeError::UnsupportedForRange { found: "improper list".to_string(),
                                                               line })
            },
            other => {
                return Err(RuntimeError::UnsupportedForRange { found: other.type_name().to_string(),
                                                               line })
            },
        };

        for element in list.iter() {
            let frame = env.child();
            frame.define(variable, element);
            match LoopStep::from(self.evaluate_sequence(consequent, &frame)?) {
                LoopStep::Next => {},
                LoopStep::Exit => break,
                LoopStep::Propagate(signal) => return Ok(signal.into()),
            }
        }

        Ok(Value::Null.into())
    }
}

/// Evaluated header of a numeric `for`.
struct NumericRange {
    start:  Value,
    bound:  Value,
    step:   Value,
    closed: bool,
}

impl NumericRange {
    /// `Greater` for a positive increment, `Less` for a negative one.
    fn direction(&self, line: usize) -> EvalResult<Ordering> {
        match compare_numbers(&self.step, &Value::Integer(0), line)? {
            Ordering::Equal => {
                Err(RuntimeError::TypeError { details: "for step must not be zero".to_string(),
                                              line })
            },
            ordering => Ok(ordering),
        }
    }
}
