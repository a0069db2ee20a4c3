//! Member access through `.`.
//!
//! A parameterless user function doubles as a namespace: the first member
//! access runs its body once in a fresh frame chained from the captured
//! environment, and that frame is kept on the function value. Later reads,
//! member calls and member assignments all go through the same frame, so
//!
//! ```text
//! func counter() { var count = 0 }
//! counter.count = 5
//! print(counter.count)   // 5
//! ```
//!
//! Lists answer `head`, `tail` and `isEmpty`.

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
            list::List,
            signal::{Outcome, Signal},
        },
    },
};

impl Context {
    /// Evaluates `target.name` or `target.name(arguments)`.
    pub(in crate::interpreter::evaluator) fn eval_member(&mut self,
                                                         operands: &[Node],
                                                         env: &Env,
                                                         line: usize)
                                                         -> EvalResult<Value> {
        let [target, member] = operands else {
            return Err(RuntimeError::UnknownReference { member: ".".to_string(),
                                                        line });
        };
        let target = self.evaluate_value(target, env)?;

        match member {
            Node::Variable { name, .. } => self.member_value(&target, name, line),
            Node::Application { operator: Callee::Expression(callee),
                                operands: arguments,
                                .. } => {
                let Node::Variable { name, .. } = callee.as_ref() else {
                    return Err(RuntimeError::UnknownReference { member: ".".to_string(),
                                                                line });
                };
                self.call_member(&target, name, arguments, env, line)
            },
            _ => Err(RuntimeError::UnknownReference { member: ".".to_string(),
                                                      line }),
        }
    }

    /// Assigns into the namespace of a user function, walking outward from
    /// its namespace frame. Never creates a binding.
    pub(in crate::interpreter::evaluator) fn assign_member(&mut self,
                                                           target: &Value,
                                                           name: &str,
                                                           value: Value,
                                                           line: usize)
                                                           -> EvalResult<()> {
        let Value::Function(Function::User(function)) = target else {
            return Err(RuntimeError::UnknownReference { member: name.to_string(),
                                                        line });
        };
        let namespace = self.namespace(function, line)?;
        if namespace.assign(name, value) {
            Ok(())
        } else {
            Err(RuntimeError::UnknownVariable { name: name.to_string(),
                                                line })
        }
    }

    fn member_value(&mut self, target: &Value, name: &str, line: usize) -> EvalResult<Value> {
        match target {
            Value::Function(Function::User(function)) => {
                self.namespace(function, line)?
                    .lookup(name)
                    .ok_or_else(|| RuntimeError::UnknownVariable { name: name.to_string(),
                                                                   line })
            },
            Value::List(list) => list_member(list, name, line),
            _ => Err(RuntimeError::UnknownReference { member: name.to_string(),
                                                      line }),
        }
    }

    /// Resolves the member first, so a namespace body runs before any
    /// argument is evaluated.
    fn call_member(&mut self,
                   target: &Value,
                   name: &str,
                   arguments: &[Node],
                   env: &Env,
                   line: usize)
                   -> EvalResult<Value> {
        let member = self.member_value(target, name, line)?;
        let arguments = self.evaluate_operands(arguments, env)?;
        match target {
            Value::List(_) if !arguments.is_empty() => {
                Err(RuntimeError::ArgumentCountMismatch { name: name.to_string(),
                                                          found: arguments.len(),
                                                          line })
            },
            Value::List(_) => Ok(member),
            _ => self.apply(&member, arguments, line),
        }
    }

    /// Returns the namespace frame of `function`, running its body the first
    /// time.
    fn namespace(&mut self, function: &Rc<UserFunction>, line: usize) -> EvalResult<Env> {
        if let Some(namespace) = function.namespace.borrow().as_ref() {
            return Ok(namespace.clone());
        }

        let frame = function.env.with_bindings(&function.parameters, Vec::new(), line)?;
        trace!(function = function.name.as_deref().unwrap_or("<anonymous>"),
               "instantiating namespace");
        self.enter_call(line)?;
        let outcome = self.evaluate_sequence(&function.body, &frame);
        self.leave_call();
        match outcome? {
            Outcome::Value(_) | Outcome::Signal(Signal::Return(_)) => {},
            Outcome::Signal(signal) => return Err(escaped(&signal, line)),
        }

        *function.namespace.borrow_mut() = Some(frame.clone());
        Ok(frame)
    }
}

fn list_member(list: &List, name: &str, line: usize) -> EvalResult<Value> {
    let empty = || RuntimeError::EmptyList { method: name.to_string(),
                                            line };
    match name {
        "head" => list.head().cloned().ok_or_else(empty),
        "tail" => list.tail().cloned().ok_or_else(empty),
        "isEmpty" => Ok(Value::Bool(list.is_empty())),
        _ => Err(RuntimeError::UnknownListMethod { method: name.to_string(),
                                                   line }),
    }
}
