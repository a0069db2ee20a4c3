use std::fmt;

use crate::interpreter::{
    evaluator::{
        core::EvalResult,
        function::{arithmetic, comparison, conversion, io, list, logic},
    },
    host::Host,
    value::core::Value,
};

/// Type alias for primitive function handlers.
///
/// A primitive receives the host channels, a slice of evaluated argument
/// values and the line number of the application.
pub type PrimitiveFn = fn(&mut Host, &[Value], usize) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a primitive.
///
/// - `Exact(n)` means the primitive must receive exactly `n` arguments.
/// - `OneOf(slice)` means the primitive accepts any arity listed in `slice`.
/// - `Variadic` accepts any number of arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    Variadic,
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::Variadic => true,
        }
    }
}

/// One entry of the primitive table.
pub struct PrimitiveDef {
    /// Name the primitive is bound under in the root environment.
    pub name:  &'static str,
    /// Accepted argument counts.
    pub arity: Arity,
    /// The implementation.
    pub func:  PrimitiveFn,
}

impl fmt::Debug for PrimitiveDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrimitiveDef")
         .field("name", &self.name)
         .field("arity", &self.arity)
         .finish_non_exhaustive()
    }
}

/// Defines primitive functions by generating their lookup table.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the primitive.
///
/// The macro produces `PRIMITIVE_TABLE`, the static table bound into the root
/// environment.
macro_rules! primitive_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every primitive, in binding order.
        pub static PRIMITIVE_TABLE: &[PrimitiveDef] = &[
            $(
                PrimitiveDef { name: $name, arity: $arity, func: $func },
            )*
        ];
    };
}

primitive_functions! {
    "+"                    => { arity: Arity::Exact(2), func: arithmetic::add },
    "-"                    => { arity: Arity::Exact(2), func: arithmetic::subtract },
    "*"                    => { arity: Arity::Exact(2), func: arithmetic::multiply },
    "/"                    => { arity: Arity::Exact(2), func: arithmetic::floor_divide },
    "/."                   => { arity: Arity::Exact(2), func: arithmetic::true_divide },
    "%"                    => { arity: Arity::Exact(2), func: arithmetic::modulo },
    "**"                   => { arity: Arity::Exact(2), func: arithmetic::power },
    "_-"                   => { arity: Arity::Exact(1), func: arithmetic::negate },
    "=="                   => { arity: Arity::Exact(2), func: |_, args, _| Ok(Value::Bool(args[0] == args[1])) },
    "!="                   => { arity: Arity::Exact(2), func: |_, args, _| Ok(Value::Bool(args[0] != args[1])) },
    "<"                    => { arity: Arity::Exact(2), func: comparison::less },
    "<="                   => { arity: Arity::Exact(2), func: comparison::less_equal },
    ">"                    => { arity: Arity::Exact(2), func: comparison::greater },
    ">="                   => { arity: Arity::Exact(2), func: comparison::greater_equal },
    "_!"                   => { arity: Arity::Exact(1), func: |_, args, _| Ok(Value::Bool(!args[0].is_truthy())) },
    "&&"                   => { arity: Arity::Exact(2), func: logic::and },
    "||"                   => { arity: Arity::Exact(2), func: logic::or },
    "&"                    => { arity: Arity::Exact(2), func: |_, args, line| logic::bitwise("&", args, line) },
    "|"                    => { arity: Arity::Exact(2), func: |_, args, line| logic::bitwise("|", args, line) },
    "^"                    => { arity: Arity::Exact(2), func: |_, args, line| logic::bitwise("^", args, line) },
    "<<"                   => { arity: Arity::Exact(2), func: |_, args, line| logic::shift("<<", args, line) },
    ">>"                   => { arity: Arity::Exact(2), func: |_, args, line| logic::shift(">>", args, line) },
    ">>>"                  => { arity: Arity::Exact(2), func: |_, args, line| logic::shift(">>>", args, line) },
    "_~"                   => { arity: Arity::Exact(1), func: logic::complement },
    ","                    => { arity: Arity::Exact(2), func: list::pair },
    "pair"                 => { arity: Arity::Exact(2), func: list::pair },
    "["                    => { arity: Arity::Exact(2), func: list::index },
    "$list"                => { arity: Arity::Variadic, func: list::make_list },
    "$string_to_char_list" => { arity: Arity::Exact(1), func: list::string_to_char_list },
    "is_list"              => { arity: Arity::Exact(1), func: list::is_list },
    "is_pair"              => { arity: Arity::Exact(1), func: list::is_pair },
    "$char_code"           => { arity: Arity::Exact(1), func: conversion::char_code },
    "int"                  => { arity: Arity::Exact(1), func: conversion::int },
    "round"                => { arity: Arity::OneOf(&[1, 2]), func: conversion::round },
    "print"                => { arity: Arity::Variadic, func: io::print },
    "input"                => { arity: Arity::OneOf(&[0, 1]), func: io::input },
    "throw"                => { arity: Arity::Exact(1), func: io::throw },
    "assert"               => { arity: Arity::Exact(1), func: io::assert },
}
