#[derive(Debug, Clone, PartialEq, thiserror::Error)]
/// Represents all errors that can occur during tokenizing or parsing.
pub enum ParseError {
    /// A string literal hit end of input, or a raw control character inside
    /// a `'` or `"` string.
    #[error("Error on line {line}: Unterminated string.")]
    UnterminatedString {
        /// The source line where the string started.
        line: usize,
    },
    /// A numeric literal could not be represented.
    #[error("Error on line {line}: Invalid number literal '{literal}'.")]
    InvalidNumber {
        /// The literal text as written in the source.
        literal: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token {found}, expected {expected}.")]
    UnexpectedToken {
        /// The token encountered.
        found:    String,
        /// What the parser was looking for.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A token that cannot start or continue an expression.
    #[error("Error on line {line}: Unsupported expression token {token}.")]
    UnsupportedExpressionToken {
        /// The offending token.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Operators and operands did not reduce to exactly one tree.
    #[error("Error on line {line}: Malformed expression.")]
    MalformedExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An expression was required but none was written.
    #[error("Error on line {line}: Expected an expression.")]
    ExpectedExpression {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The left side of an assignment is not a variable or a member.
    #[error("Error on line {line}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// The right side of `.` is neither a name nor a call on a name.
    #[error("Error on line {line}: Invalid member access.")]
    InvalidMember {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// The source line the error points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line }
            | Self::InvalidNumber { line, .. }
            | Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line }
            | Self::UnsupportedExpressionToken { line, .. }
            | Self::MalformedExpression { line }
            | Self::ExpectedExpression { line }
            | Self::InvalidAssignmentTarget { line }
            | Self::InvalidMember { line } => *line,
        }
    }
}
