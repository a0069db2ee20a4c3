/// The primitive table.
///
/// Declares every primitive with its name and arity and generates the table
/// bound into the root environment.
pub mod core;

/// Arithmetic primitives: `+ - * / /. % **` and unary `-`.
pub mod arithmetic;

/// Ordering primitives `< <= > >=` on numbers and strings.
pub mod comparison;

/// Boolean and bitwise primitives.
pub mod logic;

/// Pair-list primitives: construction, literals, indexing and predicates.
pub mod list;

/// Conversions: `int`, `round`, `$char_code`.
pub mod conversion;

/// Host-facing primitives `print` and `input`, plus `throw` and `assert`.
pub mod io;
