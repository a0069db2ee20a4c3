use std::{cell::RefCell, fmt, rc::Rc};

use crate::{
    ast::{Constant, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, environment::Env, function::core::PrimitiveDef},
        value::list::List,
    },
    util::num::int_to_float,
};

/// Represents a runtime value in the interpreter.
///
/// Control-flow signals are deliberately not part of this enum; see
/// [`Signal`](crate::interpreter::value::signal::Signal). A `Value` is
/// always something that can be stored in a variable.
#[derive(Debug, Clone)]
pub enum Value {
    /// `null` (also bound as `undefined`).
    Null,
    /// A boolean value (`true` or `false`).
    Bool(bool),
    /// A 64-bit signed integer.
    Integer(i64),
    /// A double precision floating-point number.
    Float(f64),
    /// An immutable string.
    Str(Rc<str>),
    /// A pair-list, possibly improper.
    List(List),
    /// A primitive or a user-defined closure.
    Function(Function),
}

/// A callable value.
#[derive(Debug, Clone)]
pub enum Function {
    /// An entry of the primitive table.
    Primitive(&'static PrimitiveDef),
    /// A closure created by evaluating a function definition.
    User(Rc<UserFunction>),
}

/// A user-defined function together with the environment it closes over.
pub struct UserFunction {
    /// Name given at definition, if any.
    pub name:       Option<String>,
    /// Formal parameter names.
    pub parameters: Vec<String>,
    /// The function body, shared with the AST.
    pub body:       Rc<[Node]>,
    /// The environment captured at definition time.
    pub env:        Env,
    /// Frame produced by the first member access through `.`, reused by
    /// later member reads and assignments.
    pub namespace:  RefCell<Option<Env>>,
}

impl fmt::Debug for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserFunction")
         .field("name", &self.name)
         .field("parameters", &self.parameters)
         .finish_non_exhaustive()
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<List> for Value {
    fn from(v: List) -> Self {
        Self::List(v)
    }
}

impl From<&Constant> for Value {
    fn from(constant: &Constant) -> Self {
        match constant {
            Constant::Integer(i) => Self::Integer(*i),
            Constant::Float(x) => Self::Float(*x),
            Constant::Str(s) => Self::from(s.as_str()),
            Constant::Empty => Self::List(List::Empty),
        }
    }
}

impl Value {
    /// Truthiness used by conditions and the logical operators.
    ///
    /// `null`, `false`, `0`, `0.0`, `""` and the empty list are falsy;
    /// everything else is truthy.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::value::core::Value;
    ///
    /// assert!(!Value::Integer(0).is_truthy());
    /// assert!(Value::from("0").is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Integer(i) => *i != 0,
            Self::Float(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::List(list) => !list.is_empty(),
            Self::Function(_) => true,
        }
    }

    /// Short type name for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::List(List::Empty) => "empty list",
            Self::List(List::Pair(_)) => "pair",
            Self::Function(_) => "function",
        }
    }

    /// Converts the value to an `f64`, or returns an error if not numeric.
    ///
    /// # Parameters
    /// - `line`: Source code line number for error reporting.
    ///
    /// # Returns
    /// - `Ok(f64)`: For integers and floats.
    /// - `Err(RuntimeError::TypeError)`: For anything else.
    pub fn as_float(&self, line: usize) -> EvalResult<f64> {
        match self {
            Self::Float(x) => Ok(*x),
            Self::Integer(i) => Ok(int_to_float(*i)),
            other => Err(RuntimeError::TypeError { details: format!("expected a number, found {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Converts the value to `i64`, or returns an error if not an integer.
    pub fn as_integer(&self, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(i) => Ok(*i),
            other => Err(RuntimeError::TypeError { details: format!("expected an integer, found {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Borrows the contents of a string value.
    pub fn as_str(&self, line: usize) -> EvalResult<&str> {
        match self {
            Self::Str(s) => Ok(s),
            other => Err(RuntimeError::TypeError { details: format!("expected a string, found {}",
                                                                    other.type_name()),
                                                   line }),
        }
    }

    /// Whether the value is an integer or a float.
    #[must_use]
    pub const fn is_number(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }
}

impl PartialEq for Value {
    /// Structural equality. Integers and floats compare numerically, lists
    /// element by element, functions by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Integer(a), Self::Float(b)) | (Self::Float(b), Self::Integer(a)) => {
                int_to_float(*a) == *b
            },
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => lists_equal(a, b),
            (Self::Function(a), Self::Function(b)) => a == b,
            _ => false,
        }
    }
}

fn lists_equal(a: &List, b: &List) -> bool {
    let (mut a, mut b) = (a.clone(), b.clone());
    loop {
        let (x, y) = match (&a, &b) {
            (List::Empty, List::Empty) => return true,
            (List::Pair(x), List::Pair(y)) => (Rc::clone(x), Rc::clone(y)),
            _ => return false,
        };
        if Rc::ptr_eq(&x, &y) {
            return true;
        }
        if x.head != y.head {
            return false;
        }
        match (&x.tail, &y.tail) {
            (Value::List(next_a), Value::List(next_b)) => {
                a = next_a.clone();
                b = next_b.clone();
            },
            (tail_a, tail_b) => return tail_a == tail_b,
        }
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Primitive(a), Self::Primitive(b)) => std::ptr::eq(*a, *b),
            (Self::User(a), Self::User(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s}"),
            Self::List(list) => write_list(f, list),
            Self::Function(function) => write!(f, "{function}"),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(def) => write!(f, "<primitive {}>", def.name),
            Self::User(user) => match &user.name {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<function>"),
            },
        }
    }
}

/// Proper lists print as `[a, b, c]`; an improper tail is shown after a dot,
/// `[a, b . c]`, and a lone pair as `(a . b)`.
fn write_list(f: &mut fmt::Formatter<'_>, list: &List) -> fmt::Result {
    let List::Pair(first) = list else {
        return write!(f, "[]");
    };
    if !matches!(first.tail, Value::List(_)) {
        return write!(f, "({} . {})", first.head, first.tail);
    }
    write!(f, "[")?;
    let mut cell = Rc::clone(first);
    let mut separator = "";
    loop {
        write!(f, "{separator}{}", cell.head)?;
        separator = ", ";
        let next = match &cell.tail {
            Value::List(List::Empty) => break,
            Value::List(List::Pair(next)) => Rc::clone(next),
            improper => {
                write!(f, " . {improper}")?;
                break;
            },
        };
        cell = next;
    }
    write!(f, "]")
}
