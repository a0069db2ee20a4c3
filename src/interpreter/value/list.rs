use std::rc::Rc;

use crate::interpreter::value::core::Value;

/// A cons cell. `tail` is usually another list, but improper pairs whose tail
/// is any other value are allowed for raw cons access.
#[derive(Debug)]
pub struct Pair {
    /// First slot.
    pub head: Value,
    /// Second slot.
    pub tail: Value,
}

/// The language's singly-linked list: the empty marker or a shared cell.
///
/// Cells are immutable and reference counted, so taking the tail of a list
/// or consing onto it never copies the rest of the chain.
#[derive(Debug, Clone)]
pub enum List {
    /// The distinguished empty list.
    Empty,
    /// A cell holding a head and a tail.
    Pair(Rc<Pair>),
}

impl List {
    /// Conses `head` onto `tail`.
    #[must_use]
    pub fn pair(head: Value, tail: Value) -> Self {
        Self::Pair(Rc::new(Pair { head, tail }))
    }

    /// Whether this is the empty list.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// True if the list is empty, or a pair whose tail is recursively
    /// well-formed. Walks the chain iteratively.
    ///
    /// # Example
    /// ```
    /// use quill::interpreter::value::{core::Value, list::List};
    ///
    /// let proper: List = [Value::Integer(1), Value::Integer(2)].into_iter().collect();
    /// assert!(proper.is_well_formed());
    ///
    /// let improper = List::pair(Value::Integer(1), Value::Integer(2));
    /// assert!(!improper.is_well_formed());
    /// ```
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let mut cell = match self {
            Self::Empty => return true,
            Self::Pair(pair) => pair,
        };
        loop {
            match &cell.tail {
                Value::List(Self::Empty) => return true,
                Value::List(Self::Pair(next)) => cell = next,
                _ => return false,
            }
        }
    }

    /// Collects the elements of a well-formed list, or `None` for an
    /// improper one.
    #[must_use]
    pub fn to_vec(&self) -> Option<Vec<Value>> {
        if !self.is_well_formed() {
            return None;
        }
        Some(self.iter().collect())
    }

    /// First slot of a pair.
    #[must_use]
    pub fn head(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Pair(pair) => Some(&pair.head),
        }
    }

    /// Second slot of a pair.
    #[must_use]
    pub fn tail(&self) -> Option<&Value> {
        match self {
            Self::Empty => None,
            Self::Pair(pair) => Some(&pair.tail),
        }
    }

    /// Iterates over successive heads, stopping at the empty list or at the
    /// first tail that is not a list.
    #[must_use]
    pub fn iter(&self) -> Iter {
        Iter { current: Value::List(self.clone()) }
    }
}

/// Iterator over the heads of a [`List`].
pub struct Iter {
    current: Value,
}

impl Iterator for Iter {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        let Value::List(List::Pair(pair)) = &self.current else {
            return None;
        };
        let pair = Rc::clone(pair);
        self.current = pair.tail.clone();
        Some(pair.head.clone())
    }
}

impl FromIterator<Value> for List {
    /// Conses from the right so the list keeps the iterator's order.
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let items = iter.into_iter().collect::<Vec<_>>();
        items.into_iter()
             .rev()
             .fold(Self::Empty, |tail, head| Self::pair(head, Value::List(tail)))
    }
}

impl Drop for Pair {
    // Unlink the chain one cell at a time so long lists do not recurse.
    fn drop(&mut self) {
        let mut tail = std::mem::replace(&mut self.tail, Value::Null);
        while let Value::List(List::Pair(cell)) = tail {
            match Rc::try_unwrap(cell) {
                Ok(mut pair) => tail = std::mem::replace(&mut pair.tail, Value::Null),
                Err(_) => break,
            }
        }
    }
}
