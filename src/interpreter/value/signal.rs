use crate::interpreter::value::core::Value;

/// A control-flow signal raised by `return`, `break`, `continue` or
/// `fallthrough`.
///
/// Signals travel upward as the result of evaluation until a loop, a switch
/// or a function call consumes them. They are never stored in a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// `return`, carrying the returned value.
    Return(Value),
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `fallthrough`
    Fallthrough,
}

impl Signal {
    /// The keyword that raised the signal.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Return(_) => "return",
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Fallthrough => "fallthrough",
        }
    }
}

/// The result of evaluating a node: an ordinary value, or a signal on its
/// way to the construct that consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Normal completion.
    Value(Value),
    /// Abrupt completion.
    Signal(Signal),
}

impl From<Value> for Outcome {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<Signal> for Outcome {
    fn from(signal: Signal) -> Self {
        Self::Signal(signal)
    }
}
