use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::core::PRIMITIVE_TABLE},
        value::core::{Function, Value},
    },
};

/// One lexical scope level.
struct Frame {
    bindings: HashMap<String, Value>,
    parent:   Option<Env>,
}

/// A shared handle to a frame and, through it, the whole chain of enclosing
/// frames.
///
/// Cloning an `Env` clones the handle, not the frame: closures, loop bodies
/// and namespace lookups that hold the same `Env` see each other's writes.
#[derive(Clone)]
pub struct Env(Rc<RefCell<Frame>>);

impl Env {
    /// Creates a frame with no parent.
    #[must_use]
    pub fn root() -> Self {
        Self(Rc::new(RefCell::new(Frame { bindings: HashMap::new(),
                                          parent:   None, })))
    }

    /// Pushes an empty frame whose parent is `self`.
    #[must_use]
    pub fn child(&self) -> Self {
        Self(Rc::new(RefCell::new(Frame { bindings: HashMap::new(),
                                          parent:   Some(self.clone()), })))
    }

    /// Pushes a frame binding `names` to `values` one to one.
    ///
    /// # Errors
    /// `FrameArityMismatch` when the two lengths differ.
    pub fn with_bindings(&self,
                         names: &[String],
                         values: Vec<Value>,
                         line: usize)
                         -> EvalResult<Self> {
        if names.len() != values.len() {
            return Err(RuntimeError::FrameArityMismatch { expected: names.len(),
                                                          found: values.len(),
                                                          line });
        }
        let frame = self.child();
        frame.0
             .borrow_mut()
             .bindings
             .extend(names.iter().cloned().zip(values));
        Ok(frame)
    }

    /// Looks `name` up from this frame outward; the innermost binding wins.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        let mut current = self.clone();
        loop {
            let parent = {
                let frame = current.0.borrow();
                if let Some(value) = frame.bindings.get(name) {
                    return Some(value.clone());
                }
                frame.parent.clone()
            };
            current = parent?;
        }
    }

    /// Creates or overwrites `name` in this frame only.
    pub fn define(&self, name: &str, value: Value) {
        self.0.borrow_mut().bindings.insert(name.to_string(), value);
    }

    /// Overwrites the innermost existing binding of `name`.
    ///
    /// Returns `false`, leaving every frame untouched, when no frame in the
    /// chain binds the name.
    pub fn assign(&self, name: &str, value: Value) -> bool {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut frame = current.0.borrow_mut();
                if let Some(slot) = frame.bindings.get_mut(name) {
                    *slot = value;
                    return true;
                }
                frame.parent.clone()
            };
            match parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Whether two handles point at the same frame.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.0.borrow();
        let mut names = frame.bindings.keys().collect::<Vec<_>>();
        names.sort();
        f.debug_struct("Env")
         .field("bindings", &names)
         .field("has_parent", &frame.parent.is_some())
         .finish()
    }
}

/// Builds the root environment: `null`, `undefined`, `true`, `false` and
/// every primitive function.
///
/// # Example
/// ```
/// use quill::interpreter::{evaluator::environment::init_environment, value::core::Value};
///
/// let env = init_environment();
/// assert_eq!(env.lookup("true"), Some(Value::Bool(true)));
/// assert!(env.lookup("print").is_some());
/// ```
#[must_use]
pub fn init_environment() -> Env {
    let env = Env::root();
    env.define("null", Value::Null);
    env.define("undefined", Value::Null);
    env.define("true", Value::Bool(true));
    env.define("false", Value::Bool(false));
    for primitive in PRIMITIVE_TABLE {
        env.define(primitive.name, Value::Function(Function::Primitive(primitive)));
    }
    env
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn lookup_walks_outward() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let inner = root.child().child();
        assert_eq!(inner.lookup("x"), Some(Value::Integer(1)));
        assert_eq!(inner.lookup("y"), None);
    }

    #[test]
    fn define_shadows_without_touching_parent() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let inner = root.child();
        inner.define("x", Value::Integer(2));
        assert_eq!(inner.lookup("x"), Some(Value::Integer(2)));
        assert_eq!(root.lookup("x"), Some(Value::Integer(1)));
    }

    #[test]
    fn assign_mutates_the_owning_frame() {
        let root = Env::root();
        root.define("x", Value::Integer(1));
        let inner = root.child();
        assert!(inner.assign("x", Value::Integer(5)));
        assert_eq!(root.lookup("x"), Some(Value::Integer(5)));
        assert!(!inner.assign("missing", Value::Null));
        assert_eq!(inner.lookup("missing"), None);
    }

    #[test]
    fn with_bindings_checks_arity() {
        let root = Env::root();
        let names = vec!["a".to_string(), "b".to_string()];
        let err = root.with_bindings(&names, vec![Value::Integer(1)], 7).unwrap_err();
        assert_eq!(err,
                   RuntimeError::FrameArityMismatch { expected: 2,
                                                      found:    1,
                                                      line:     7, });

        let frame = root.with_bindings(&names, vec![Value::Integer(1), Value::Integer(2)], 7)
                        .unwrap();
        assert_eq!(frame.lookup("b"), Some(Value::Integer(2)));
        assert_eq!(root.lookup("a"), None);
    }

    #[test]
    fn shared_handles_see_the_same_frame() {
        let root = Env::root();
        let alias = root.clone();
        alias.define("x", Value::from("shared"));
        assert!(alias.ptr_eq(&root));
        assert_eq!(root.lookup("x"), Some(Value::from("shared")));
    }

    #[test]
    fn root_environment_has_constants_and_primitives() {
        let env = init_environment();
        assert_eq!(env.lookup("null"), Some(Value::Null));
        assert_eq!(env.lookup("false"), Some(Value::Bool(false)));
        assert!(matches!(env.lookup("+"), Some(Value::Function(Function::Primitive(_)))));
    }
}
