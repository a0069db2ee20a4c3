/// Tokenizer and parser errors.
///
/// Everything that can go wrong before a program starts running: malformed
/// literals, unexpected tokens, expressions that do not reduce to a single
/// tree. A `ParseError` means "bad program".
pub mod parse_error;
/// Evaluation errors.
///
/// Everything that can go wrong while a program runs: unresolved names,
/// arity mismatches, unsupported references, user `throw`, escaped control
/// signals. A `RuntimeError` means "bad runtime behaviour".
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Either stage's failure, as returned by the whole-pipeline helpers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed while being evaluated.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
