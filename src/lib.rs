//! # quill
//!
//! quill is a small dynamically-typed scripting language written in Rust.
//! Source text is tokenized, parsed with an operator-precedence parser and
//! evaluated by a tree-walking interpreter with lexical closures, pair-lists
//! and explicit control-flow signals.
//!
//! ```
//! let value = quill::run("func square(x) { return x * x }\nsquare(7)").unwrap();
//! assert_eq!(value, quill::Value::Integer(49));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::sync::Once;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use crate::{
    error::{Error, ParseError, RuntimeError},
    interpreter::{
        evaluator::{
            core::{Config, Context},
            environment::{init_environment, Env},
        },
        lexer::tokenize,
        parser::core::parse,
        value::core::Value,
    },
};
use crate::{ast::Node, interpreter::host::Host};

/// Defines the structure of parsed code.
///
/// This module declares the `Node` enum and related types that represent the
/// syntactic structure of source code as a tree. The AST is built by the
/// parser and walked by the evaluator.
///
/// # Responsibilities
/// - Defines node types for all language constructs.
/// - Attaches source lines to every node for error reporting.
pub mod ast;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised during tokenizing,
/// parsing, or evaluating code. Parse errors and runtime errors are separate
/// types so a host can tell a bad program from bad runtime behaviour.
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Attaches line numbers and readable messages.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, value
/// representations and host I/O.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
pub mod interpreter;
/// General utilities for numeric conversion, arithmetic helpers and stack
/// growth.
///
/// # Responsibilities
/// - Convert between `i64` and `f64` without silent data loss.
/// - Floor division and modulo shared by the arithmetic primitives.
/// - Keep deeply recursive parsing and evaluation off the guard page.
pub mod util;

/// Evaluates a parsed program against `env`, printing through standard
/// output.
///
/// # Errors
/// The first `RuntimeError` raised by the program.
pub fn evaluate(program: &[Node], env: &Env) -> Result<Value, RuntimeError> {
    Context::new(Host::stdio(), Config::default()).run(program, env)
}

/// Tokenizes, parses and evaluates `source` in a fresh root environment.
///
/// Returns the value of the last statement, or the value of a top-level
/// `return`.
///
/// # Errors
/// `Error::Parse` for malformed programs, `Error::Runtime` for evaluation
/// failures.
///
/// # Examples
/// ```
/// use quill::{run, Error, Value};
///
/// assert_eq!(run("1 - 2 - 3").unwrap(), Value::Integer(-4));
/// assert!(matches!(run("y + 1"), Err(Error::Runtime(_))));
/// assert!(matches!(run("\"open"), Err(Error::Parse(_))));
/// ```
pub fn run(source: &str) -> Result<Value, Error> {
    run_with(source, &mut Context::new(Host::stdio(), Config::default()))
}

/// Like [`run`], but with a caller supplied context.
pub fn run_with(source: &str, context: &mut Context) -> Result<Value, Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    Ok(context.run(&program, &init_environment())?)
}

static INIT: Once = Once::new();

/// Installs a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and only the first call has an
/// effect.
pub fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    INIT.call_once(|| {
            tracing_subscriber::registry().with(fmt::layer().with_target(true).with_level(true))
                                          .with(EnvFilter::from_default_env())
                                          .init();
        });
}
