use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{Callee, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{escaped, Context, EvalResult},
            environment::Env,
        },
        value::{
            core::{Function, UserFunction, Value},
            signal::{Outcome, Signal},
        },
    },
};

impl Context {
    /// Evaluates an application node.
    ///
    /// `&&` and `||` evaluate their right operand only when the left one does
    /// not decide the result, substituting `null` otherwise, and then apply
    /// the primitive bound to the operator. `.` is member access. Every other
    /// operator or callee expression is evaluated to a function value, its
    /// operands left to right, and the function applied.
    ///
    /// # Errors
    /// - `UnknownVariable` if a symbolic operator is unbound.
    /// - `NotCallable` if the callee is not a function.
    /// - Anything the applied function raises.
    pub(in crate::interpreter::evaluator) fn eval_application(&mut self,
                                                              callee: &Callee,
                                                              operands: &[Node],
                                                              env: &Env,
                                                              line: usize)
                                                              -> EvalResult<Value> {
        let function = match callee {
            Callee::Operator(op) if op == "&&" || op == "||" => {
                return self.eval_logical(op, operands, env, line);
            },
            Callee::Operator(op) if op == "." => return self.eval_member(operands, env, line),
            Callee::Operator(op) => lookup_operator(op, env, line)?,
            Callee::Expression(expression) => self.evaluate_value(expression, env)?,
        };
        let arguments = self.evaluate_operands(operands, env)?;
        self.apply(&function, arguments, line)
    }

    fn eval_logical(&mut self,
                    op: &str,
                    operands: &[Node],
                    env: &Env,
                    line: usize)
                    -> EvalResult<Value> {
        let [left, right] = operands else {
            return Err(RuntimeError::ArgumentCountMismatch { name: op.to_string(),
                                                             found: operands.len(),
                                                             line });
        };
        let left = self.evaluate_value(left, env)?;
        let needs_right = if op == "&&" { left.is_truthy() } else { !left.is_truthy() };
        let right = if needs_right {
            self.evaluate_value(right, env)?
        } else {
            Value::Null
        };
        let function = lookup_operator(op, env, line)?;
        self.apply(&function, vec![left, right], line)
    }

    /// Applies a function value to already evaluated arguments.
    ///
    /// # Errors
    /// `NotCallable` when `callee` is not a function.
    pub fn apply(&mut self, callee: &Value, arguments: Vec<Value>, line: usize) -> EvalResult<Value> {
        match callee {
            Value::Function(Function::Primitive(primitive)) => {
                if !primitive.arity.check(arguments.len()) {
                    return Err(RuntimeError::ArgumentCountMismatch { name: primitive.name
                                                                                    .to_string(),
                                                                     found: arguments.len(),
                                                                     line });
                }
                (primitive.func)(&mut self.host, &arguments, line)
            },
            Value::Function(Function::User(function)) => self.call_user(function, arguments, line),
            other => Err(RuntimeError::NotCallable { found: other.type_name().to_string(),
                                                     line }),
        }
    }

    /// Calls a closure: binds parameters in a fresh frame chained from the
    /// captured environment and runs the body there.
    ///
    /// A `return` signal is unwrapped; finishing the body without one yields
    /// `null`.
    fn call_user(&mut self,
                 function: &Rc<UserFunction>,
                 arguments: Vec<Value>,
                 line: usize)
                 -> EvalResult<Value> {
        let frame = function.env.with_bindings(&function.parameters, arguments, line)?;
        self.enter_call(line)?;
        trace!(function = function.name.as_deref().unwrap_or("<anonymous>"),
               depth = self.depth,
               "call");
        let outcome = self.evaluate_sequence(&function.body, &frame);
        self.leave_call();

        match outcome? {
            Outcome::Value(_) => Ok(Value::Null),
            Outcome::Signal(Signal::Return(value)) => Ok(value),
            Outcome::Signal(signal) => Err(escaped(&signal, line)),
        }
    }
}

fn lookup_operator(op: &str, env: &Env, line: usize) -> EvalResult<Value> {
    env.lookup(op)
       .ok_or_else(|| RuntimeError::UnknownVariable { name: op.to_string(),
                                                      line })
}
