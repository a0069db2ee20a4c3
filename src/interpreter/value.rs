/// Runtime values: the `Value` enum, function values and closures.
///
/// # Responsibilities
/// - Defines every data value a program can store in a variable.
/// - Implements truthiness, numeric equality and display formatting.
/// - Pairs user functions with their captured environment.
pub mod core;
/// The cons-cell list: the empty marker, pairs and traversal helpers.
pub mod list;
/// Control-flow signals and the evaluation outcome that carries them.
pub mod signal;
