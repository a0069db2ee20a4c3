use std::{cell::RefCell, rc::Rc};

use tracing::debug;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::environment::Env,
        host::Host,
        value::{
            core::{Function, UserFunction, Value},
            signal::{Outcome, Signal},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Default limit on nested user-function calls.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

/// Evaluator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of nested user-function calls before evaluation fails
    /// with `CallDepthExceeded`.
    pub max_call_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self { max_call_depth: DEFAULT_MAX_CALL_DEPTH, }
    }
}

/// Stores the runtime evaluation context.
///
/// Variables live in [`Env`] chains passed alongside each node; the context
/// holds only what is global to a run: the host channels used by `print` and
/// `input`, the configuration, and the current call depth.
///
/// ## Usage
///
/// A `Context` is created once per host and can evaluate any number of
/// programs, each against an environment from
/// [`init_environment`](crate::interpreter::evaluator::environment::init_environment).
pub struct Context {
    /// Output and input channels.
    pub host:   Host,
    /// Evaluator settings.
    pub config: Config,
    pub(in crate::interpreter::evaluator) depth: usize,
}

impl Context {
    /// Creates a context over the given host and configuration.
    #[must_use]
    pub fn new(host: Host, config: Config) -> Self {
        Self { host,
               config,
               depth: 0 }
    }

    /// Number of user-function calls currently in progress.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Evaluates a whole program and returns the value of its last statement.
    ///
    /// A top-level `return` ends the program with its value. Any other
    /// signal reaching this level is an error.
    ///
    /// # Errors
    /// The first `RuntimeError` raised; evaluation does not continue past it.
    ///
    /// # Example
    /// ```
    /// use quill::{Config, Context, interpreter::{host::{Host, OutputBuffer}, value::core::Value}};
    /// use quill::{init_environment, parse, tokenize};
    ///
    /// let program = parse(&tokenize("var x = 2\nx * 21").unwrap()).unwrap();
    /// let mut context = Context::new(Host::buffered(OutputBuffer::default()), Config::default());
    /// assert_eq!(context.run(&program, &init_environment()).unwrap(), Value::Integer(42));
    /// ```
    pub fn run(&mut self, program: &[Node], env: &Env) -> EvalResult<Value> {
        let mut last = Value::Null;
        for node in program {
            match self.evaluate(node, env)? {
                Outcome::Value(value) => last = value,
                Outcome::Signal(Signal::Return(value)) => return Ok(value),
                Outcome::Signal(signal) => return Err(escaped(&signal, node.line())),
            }
        }
        Ok(last)
    }

    /// Evaluates a single node.
    ///
    /// This is the main entry point for evaluation; every recursive step goes
    /// through it, so deep nesting grows the stack on demand instead of
    /// overflowing it.
    ///
    /// # Returns
    /// The node's value, or a signal for the enclosing construct to consume.
    pub fn evaluate(&mut self, node: &Node, env: &Env) -> EvalResult<Outcome> {
        ensure_sufficient_stack(|| self.dispatch(node, env))
    }

    fn dispatch(&mut self, node: &Node, env: &Env) -> EvalResult<Outcome> {
        match node {
            Node::Constant { value, .. } => Ok(Value::from(value).into()),
            Node::Variable { name, line } => {
                env.lookup(name)
                   .map(Outcome::Value)
                   .ok_or_else(|| RuntimeError::UnknownVariable { name: name.clone(),
                                                                  line: *line })
            },
            Node::VarDefinition { left, right, .. } => {
                let value = self.evaluate_value(right, env)?;
                env.define(left, value.clone());
                Ok(value.into())
            },
            Node::FunctionDefinition { name,
                                       parameters,
                                       body,
                                       .. } => {
                let function = UserFunction { name:       name.clone(),
                                              parameters: parameters.clone(),
                                              body:       Rc::clone(body),
                                              env:        env.clone(),
                                              namespace:  RefCell::new(None), };
                Ok(Value::Function(Function::User(Rc::new(function))).into())
            },
            Node::Assignment { left,
                               right,
                               return_left,
                               line, } => {
                self.eval_assignment(left, right, *return_left, env, *line)
                    .map(Outcome::Value)
            },
            Node::Application { operator,
                                operands,
                                line, } => {
                self.eval_application(operator, operands, env, *line)
                    .map(Outcome::Value)
            },
            Node::If { predicate,
                       consequent,
                       alternative,
                       .. } => self.eval_if(predicate, consequent, alternative.as_deref(), env),
            Node::While { predicate,
                          consequent,
                          .. } => self.eval_while(predicate, consequent, env),
            Node::Switch { variable,
                           cases,
                           default,
                           .. } => self.eval_switch(variable, cases, default.as_deref(), env),
            Node::For { variable,
                        range,
                        consequent,
                        line, } => self.eval_for(variable, range, consequent, env, *line),
            Node::Break { .. } => Ok(Signal::Break.into()),
            Node::Continue { .. } => Ok(Signal::Continue.into()),
            Node::Fallthrough { .. } => Ok(Signal::Fallthrough.into()),
            Node::Return { expression, .. } => {
                let value = match expression {
                    Some(expression) => self.evaluate_value(expression, env)?,
                    None => Value::Null,
                };
                Ok(Signal::Return(value).into())
            },
        }
    }

    /// Evaluates a node that must produce a value.
    ///
    /// # Errors
    /// `SignalEscaped` if the node completes with a signal.
    pub fn evaluate_value(&mut self, node: &Node, env: &Env) -> EvalResult<Value> {
        match self.evaluate(node, env)? {
            Outcome::Value(value) => Ok(value),
            Outcome::Signal(signal) => Err(escaped(&signal, node.line())),
        }
    }

    /// Evaluates operands left to right.
    pub fn evaluate_operands(&mut self, operands: &[Node], env: &Env) -> EvalResult<Vec<Value>> {
        operands.iter()
                .map(|operand| self.evaluate_value(operand, env))
                .collect()
    }

    /// Evaluates statements in order, stopping at the first signal.
    ///
    /// # Returns
    /// The signal that stopped the sequence, or `null` after the last
    /// statement.
    pub fn evaluate_sequence(&mut self, nodes: &[Node], env: &Env) -> EvalResult<Outcome> {
        for node in nodes {
            if let Outcome::Signal(signal) = self.evaluate(node, env)? {
                return Ok(Outcome::Signal(signal));
            }
        }
        Ok(Value::Null.into())
    }

    /// Enters a user-function call, failing past the configured depth.
    pub(in crate::interpreter::evaluator) fn enter_call(&mut self, line: usize) -> EvalResult<()> {
        if self.depth >= self.config.max_call_depth {
            return Err(RuntimeError::CallDepthExceeded { limit: self.config.max_call_depth,
                                                         line });
        }
        self.depth += 1;
        Ok(())
    }

    pub(in crate::interpreter::evaluator) fn leave_call(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

/// Converts a signal that left its construct into an error.
pub(in crate::interpreter::evaluator) fn escaped(signal: &Signal, line: usize) -> RuntimeError {
    debug!(signal = signal.name(), line, "signal escaped its construct");
    RuntimeError::SignalEscaped { signal: signal.name(),
                                  line }
}
