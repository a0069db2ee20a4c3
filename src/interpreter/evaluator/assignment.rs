use crate::{
    ast::{Callee, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Env,
        },
        value::core::Value,
    },
};

impl Context {
    /// Evaluates an assignment.
    ///
    /// The right side is evaluated first. With `return_left` the left side is
    /// read next, before the store, and its old value is the result;
    /// otherwise the assigned value is. A variable target overwrites the
    /// innermost frame that binds the name. A `target.name` target writes
    /// into the namespace of the user function `target` evaluates to.
    ///
    /// # Errors
    /// - `UnknownVariable` if no frame binds the name; assignment never
    ///   creates a binding.
    /// - `UnknownReference` for a member target that is not a user function.
    pub(in crate::interpreter::evaluator) fn eval_assignment(&mut self,
                                                             left: &Node,
                                                             right: &Node,
                                                             return_left: bool,
                                                             env: &Env,
                                                             line: usize)
                                                             -> EvalResult<Value> {
        let value = self.evaluate_value(right, env)?;
        let previous = if return_left {
            Some(self.evaluate_value(left, env)?)
        } else {
            None
        };

        match left {
            Node::Variable { name, .. } => {
                if !env.assign(name, value.clone()) {
                    return Err(RuntimeError::UnknownVariable { name: name.clone(),
                                                               line });
                }
            },
            Node::Application { operator: Callee::Operator(op),
                                operands,
                                .. } if op == "." => {
                let [target, Node::Variable { name, .. }] = operands.as_slice() else {
                    return Err(RuntimeError::UnknownReference { member: ".".to_string(),
                                                                line });
                };
                let target = self.evaluate_value(target, env)?;
                self.assign_member(&target, name, value.clone(), line)?;
            },
            _ => {
                return Err(RuntimeError::TypeError { details: "invalid assignment target".to_string(),
                                                     line })
            },
        }

        Ok(previous.unwrap_or(value))
    }
}
