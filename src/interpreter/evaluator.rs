/// Core evaluation logic and context management.
///
/// Contains the evaluation context, the configuration, node dispatch,
/// sequence evaluation and signal handling at the program level.
pub mod core;

/// Lexical environments.
///
/// Chained, shared frames used for name resolution, plus the construction of
/// the root environment.
pub mod environment;

/// Evaluation of `if`, `while` and `switch`.
pub mod control;

/// Evaluation of `for` loops over numeric ranges and lists.
pub mod for_loop;

/// Function application.
///
/// Short-circuiting logic, primitive calls and closure calls.
pub mod application;

/// Member access on namespaces and lists.
pub mod member;

/// Assignment to variables and namespace members.
pub mod assignment;

/// Primitive functions.
///
/// The table of primitives bound in the root environment and their
/// implementations.
pub mod function;
