#[derive(Debug, Clone, PartialEq, thiserror::Error)]
/// Represents all errors that can occur during evaluation.
pub enum RuntimeError {
    /// Lookup or assignment of a name that no frame in the chain binds.
    #[error("Error on line {line}: Cannot find variable '{name}'.")]
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A user function was called with the wrong number of arguments.
    #[error("Error on line {line}: error, make frames: expected {expected} arguments, found {found}.")]
    FrameArityMismatch {
        /// Number of formal parameters.
        expected: usize,
        /// Number of arguments supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A primitive was called with an argument count it does not accept.
    #[error("Error on line {line}: Primitive '{name}' does not accept {found} arguments.")]
    ArgumentCountMismatch {
        /// The primitive's name.
        name:  String,
        /// Number of arguments supplied.
        found: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Member access on a value that has no members.
    #[error("Error on line {line}: Unknown reference '{member}'.")]
    UnknownReference {
        /// The member that was requested.
        member: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// A list member other than `head`, `tail` or `isEmpty`.
    #[error("Error on line {line}: Unknown list method '{method}'.")]
    UnknownListMethod {
        /// The requested method.
        method: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// `head` or `tail` of the empty list.
    #[error("Error on line {line}: Cannot take '{method}' of the empty list.")]
    EmptyList {
        /// The requested method.
        method: String,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// The operator position of an application is not a function.
    #[error("Error on line {line}: Unknown application of {found}.")]
    NotCallable {
        /// Description of the value found in call position.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A collection `for` over something that is not a well-formed list.
    #[error("Error on line {line}: Unsupported for range: {found}.")]
    UnsupportedForRange {
        /// Description of the value found.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A value had an unexpected or incompatible type.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Arithmetic operation overflowed.
    #[error("Error on line {line}: Integer overflow while trying to compute result.")]
    Overflow {
        /// The source line where the error occurred.
        line: usize,
    },
    /// List indexing outside the list.
    #[error("Error on line {line}: Index {index} out of bounds for list of length {length}.")]
    IndexOutOfBounds {
        /// The index that was requested.
        index:  i64,
        /// The list length.
        length: usize,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// `assert` received a falsy value.
    #[error("Error on line {line}: Assertion failed.")]
    AssertionFailed {
        /// The source line where the error occurred.
        line: usize,
    },
    /// Raised by the `throw` primitive.
    #[error("Error on line {line}: {message}")]
    Thrown {
        /// The user-supplied message.
        message: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// `break`, `continue` or `fallthrough` left every construct that could
    /// consume it.
    #[error("Error on line {line}: '{signal}' signal escaped its construct.")]
    SignalEscaped {
        /// Which signal escaped.
        signal: &'static str,
        /// The source line where the error occurred.
        line:   usize,
    },
    /// User function nesting went past the configured limit.
    #[error("Error on line {line}: Maximum call depth of {limit} exceeded.")]
    CallDepthExceeded {
        /// The configured limit.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reading from or writing to the host failed.
    #[error("Error on line {line}: Host I/O failed: {details}.")]
    Io {
        /// The underlying failure.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}
