/// Numeric helpers.
///
/// Floor division and modulo on `i64`, the checked float-to-integer
/// conversion used by `int` and `round`, and the single place where integers
/// are widened to `f64` for mixed arithmetic.
pub mod num;
/// Stack growth for deeply recursive parsing, evaluation and teardown.
pub mod stack;
