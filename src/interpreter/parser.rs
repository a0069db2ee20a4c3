/// Parser entry points.
///
/// Contains the `ParseResult` alias, the whole-program `parse` function and
/// the statement-level expression entry used by the other parser modules.
pub mod core;

/// Statement parsing.
///
/// Recognizes the keyword constructs (`var`, `func`, `if`, `while`, `for`,
/// `switch` and the signal keywords) and falls back to expression statements.
pub mod statement;

/// Block parsing.
///
/// Statement lists and brace-delimited blocks, including the terminators
/// that end a `switch` arm.
pub mod block;

/// Expression runs.
///
/// Collects the flat operand/operator sequence of one expression, including
/// calls, grouping, list literals and function literals.
pub mod expression;

/// Precedence resolution.
///
/// Infix-to-postfix conversion and postfix-to-tree reduction, where
/// assignment forms and member access are turned into their own nodes.
pub mod precedence;

/// Utility functions for the parser.
///
/// Token lookahead, expectation helpers, keyword handling and the shared
/// comma-separated list parser.
pub mod utils;
