/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the tree produced by the parser against a chain of
/// environments, consuming control-flow signals in the constructs that own
/// them and applying primitive and user-defined functions.
///
/// # Responsibilities
/// - Evaluates every node kind, including closures and namespace members.
/// - Handles `return`, `break`, `continue` and `fallthrough` signals.
/// - Reports runtime errors such as unknown variables or arity mismatches.
pub mod evaluator;
/// Host channels for program input and output.
///
/// `print` and `input` go through a [`host::Host`], so embedders and tests can
/// capture output or script input.
pub mod host;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens:
/// names, numbers, strings, operators built by maximal munch, and folded
/// newlines. This is the first stage of interpretation.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with line numbers.
/// - Skips comments and whitespace.
/// - Reports lexical errors for malformed literals.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// Statements are recognized by keyword; expressions are collected as flat
/// operand/operator runs and resolved by precedence.
///
/// # Responsibilities
/// - Converts tokens into [`Node`](crate::ast::Node) trees.
/// - Validates the grammar, reporting errors with line information.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values a program can hold (numbers, strings,
/// booleans, pair-lists and functions) and, separately, the control-flow
/// signals that are never stored in variables.
pub mod value;
