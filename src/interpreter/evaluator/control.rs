use crate::{
    ast::{Node, SwitchCase},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            environment::Env,
        },
        value::{
            core::Value,
            signal::{Outcome, Signal},
        },
    },
};

/// What a loop does with the outcome of one pass over its body.
pub(in crate::interpreter::evaluator) enum LoopStep {
    /// Run the next iteration.
    Next,
    /// Leave the loop with `null`.
    Exit,
    /// Leave the loop and hand the signal to the enclosing construct.
    Propagate(Signal),
}

impl From<Outcome> for LoopStep {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Value(_) | Outcome::Signal(Signal::Continue) => Self::Next,
            Outcome::Signal(Signal::Break) => Self::Exit,
            Outcome::Signal(signal) => Self::Propagate(signal),
        }
    }
}

impl Context {
    /// Evaluates `if`, running the taken branch in a fresh child frame.
    ///
    /// Yields `null` when the predicate is falsy and there is no `else`.
    pub(in crate::interpreter::evaluator) fn eval_if(&mut self,
                                                     predicate: &Node,
                                                     consequent: &[Node],
                                                     alternative: Option<&[Node]>,
                                                     env: &Env)
                                                     -> EvalResult<Outcome> {
        if self.evaluate_value(predicate, env)?.is_truthy() {
            self.evaluate_sequence(consequent, &env.child())
        } else if let Some(alternative) = alternative {
            self.evaluate_sequence(alternative, &env.child())
        } else {
            Ok(Value::Null.into())
        }
    }

    /// Evaluates `while` as an explicit loop.
    ///
    /// Every pass gets a fresh child frame. `break` ends the loop with
    /// `null`, `continue` ends the pass, and `return` or `fallthrough` leave
    /// the loop unchanged.
    pub(in crate::interpreter::evaluator) fn eval_while(&mut self,
                                                        predicate: &Node,
                                                        consequent: &[Node],
                                                        env: &Env)
                                                        -> EvalResult<Outcome> {
        while self.evaluate_value(predicate, env)?.is_truthy() {
            match LoopStep::from(self.evaluate_sequence(consequent, &env.child())?) {
                LoopStep::Next => {},
                LoopStep::Exit => break,
                LoopStep::Propagate(signal) => return Ok(signal.into()),
            }
        }
        Ok(Value::Null.into())
    }

    /// Evaluates `switch`.
    ///
    /// The subject is evaluated once and compared with `==` against each
    /// case value in order. The first matching arm runs in a fresh child
    /// frame; `fallthrough` enters the following arm without testing it, and
    /// falling out of the last arm enters `default`. `default` also runs when
    /// nothing matched. `break` and normal completion yield `null`; other
    /// signals propagate.
    pub(in crate::interpreter::evaluator) fn eval_switch(&mut self,
                                                         variable: &Node,
                                                         cases: &[SwitchCase],
                                                         default: Option<&[Node]>,
                                                         env: &Env)
                                                         -> EvalResult<Outcome> {
        let subject = self.evaluate_value(variable, env)?;
        let mut entered = false;

        for case in cases {
            if !entered {
                entered = self.case_matches(&subject, &case.values, env)?;
                if !entered {
                    continue;
                }
            }
            match self.evaluate_sequence(&case.body, &env.child())? {
                Outcome::Signal(Signal::Fallthrough) => {},
                outcome => return Ok(finish_switch(outcome)),
            }
        }

        match default {
            Some(default) => {
                let outcome = self.evaluate_sequence(default, &env.child())?;
                Ok(finish_switch(outcome))
            },
            None => Ok(Value::Null.into()),
        }
    }

    /// Case values are evaluated lazily; the first equal one wins.
    fn case_matches(&mut self, subject: &Value, values: &[Node], env: &Env) -> EvalResult<bool> {
        for value in values {
            if self.evaluate_value(value, env)? == *subject {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

fn finish_switch(outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Value(_) | Outcome::Signal(Signal::Break | Signal::Fallthrough) => {
            Value::Null.into()
        },
        signal => signal,
    }
}
