use std::{fmt, mem, rc::Rc};

/// A self-evaluating literal as written in the source.
///
/// `Constant` covers the raw values that can appear directly in source code:
/// numbers, strings and the empty-list marker. Booleans and `null` are not
/// constants; they are ordinary names bound in the root environment.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A 64-bit floating-point literal.
    Float(f64),
    /// A string literal with escapes already resolved.
    Str(String),
    /// The empty list.
    Empty,
}

impl From<i64> for Constant {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for Constant {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Constant {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

/// What sits in the operator position of an [`Node::Application`].
///
/// Operators written with symbols (`+`, `.`, `&&`, the unary `_-`, the list
/// constructor `$list`, ...) are kept apart from ordinary callee expressions so
/// the evaluator can special-case member access and short-circuiting without
/// inspecting variable names.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    /// A primitive operator, resolved by name in the environment.
    Operator(String),
    /// Any expression producing a function value, usually a variable.
    Expression(Box<Node>),
}

/// The range clause of a `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForRange {
    /// `from..to` or `from..=to`, optionally with `step increment`.
    Numeric {
        /// Initial value of the loop variable.
        from:      Box<Node>,
        /// Bound the loop variable is tested against.
        to:        Box<Node>,
        /// Whether `to` itself is included (`..=`).
        closed:    bool,
        /// Step added after every iteration, `1` when absent.
        increment: Option<Box<Node>>,
    },
    /// Any expression evaluating to a well-formed list.
    Collection(Box<Node>),
}

/// One `case` arm of a `switch` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Values compared against the switch subject with `==`.
    pub values: Vec<Node>,
    /// Statements executed when the arm is entered.
    pub body:   Vec<Node>,
    /// Line number in the source code.
    pub line:   usize,
}

/// An abstract syntax tree node.
///
/// Every node carries the 1-based source line it was parsed from. Statement
/// blocks are plain `Vec<Node>`; function bodies are shared `Rc<[Node]>` so a
/// closure value can hold its body without copying the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A literal value.
    Constant {
        /// The constant value.
        value: Constant,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Creates or overwrites a binding in the innermost frame.
    VarDefinition {
        /// The bound name.
        left:  String,
        /// The initializer.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A function literal. Evaluates to a closure over the current frame.
    FunctionDefinition {
        /// Name given at definition, if any.
        name:       Option<String>,
        /// Formal parameter names.
        parameters: Vec<String>,
        /// The function body.
        body:       Rc<[Self]>,
        /// Line number in the source code.
        line:       usize,
    },
    /// Mutates an existing binding, or a member of a function's namespace.
    Assignment {
        /// A [`Node::Variable`] or a `.` member application.
        left:        Box<Self>,
        /// The new value.
        right:       Box<Self>,
        /// Yield the value held before the assignment (postfix `++`/`--`).
        return_left: bool,
        /// Line number in the source code.
        line:        usize,
    },
    /// Applies an operator or a function value to operands.
    Application {
        /// The operator or callee expression.
        operator: Callee,
        /// Operand expressions, in source order.
        operands: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `if predicate { consequent } else { alternative }`.
    If {
        /// The condition.
        predicate:   Box<Self>,
        /// Taken when the condition is truthy.
        consequent:  Vec<Self>,
        /// Taken otherwise; `else if` nests another `If` here.
        alternative: Option<Vec<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while predicate { consequent }`.
    While {
        /// The loop condition.
        predicate:  Box<Self>,
        /// The loop body.
        consequent: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `switch variable { case ...: ... default: ... }`.
    Switch {
        /// The switch subject, evaluated once.
        variable: Box<Self>,
        /// Arms in source order.
        cases:    Vec<SwitchCase>,
        /// The `default` arm.
        default:  Option<Vec<Self>>,
        /// Line number in the source code.
        line:     usize,
    },
    /// `for variable in range { consequent }`.
    For {
        /// The loop variable.
        variable:   String,
        /// Numeric or collection range.
        range:      ForRange,
        /// The loop body.
        consequent: Vec<Self>,
        /// Line number in the source code.
        line:       usize,
    },
    /// `break`
    Break {
        /// Line number in the source code.
        line: usize,
    },
    /// `continue`
    Continue {
        /// Line number in the source code.
        line: usize,
    },
    /// `fallthrough`
    Fallthrough {
        /// Line number in the source code.
        line: usize,
    },
    /// `return` with an optional value.
    Return {
        /// The returned expression; `null` when absent.
        expression: Option<Box<Self>>,
        /// Line number in the source code.
        line:       usize,
    },
}

impl Node {
    /// Returns the source line of the node.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Constant { line, .. }
            | Self::Variable { line, .. }
            | Self::VarDefinition { line, .. }
            | Self::FunctionDefinition { line, .. }
            | Self::Assignment { line, .. }
            | Self::Application { line, .. }
            | Self::If { line, .. }
            | Self::While { line, .. }
            | Self::Switch { line, .. }
            | Self::For { line, .. }
            | Self::Break { line }
            | Self::Continue { line }
            | Self::Fallthrough { line }
            | Self::Return { line, .. } => *line,
        }
    }

    /// Builds an application of a symbolic operator.
    #[must_use]
    pub fn operator(symbol: &str, operands: Vec<Self>, line: usize) -> Self {
        Self::Application { operator: Callee::Operator(symbol.to_string()),
                            operands,
                            line }
    }

    /// Whether the node can appear on the left of `=`: a variable, or a
    /// `target.name` member access.
    #[must_use]
    pub fn is_assignable(&self) -> bool {
        match self {
            Self::Variable { .. } => true,
            Self::Application { operator: Callee::Operator(op),
                                operands,
                                .. } => {
                op == "." && matches!(operands.as_slice(), [_, Self::Variable { .. }])
            },
            _ => false,
        }
    }
}

impl Node {
    /// Moves every direct child node into `out`, leaving leaves behind.
    fn detach_children(&mut self, out: &mut Vec<Self>) {
        match self {
            Self::Constant { .. }
            | Self::Variable { .. }
            | Self::Break { .. }
            | Self::Continue { .. }
            | Self::Fallthrough { .. }
            | Self::Return { expression: None,
                             .. } => {},
            Self::VarDefinition { right, .. } => out.push(detach(right)),
            Self::FunctionDefinition { body, .. } => {
                // A body still shared with a closure is released by its last owner.
                if let Some(body) = Rc::get_mut(body) {
                    out.extend(body.iter_mut().map(detach));
                }
            },
            Self::Assignment { left, right, .. } => {
                out.push(detach(left));
                out.push(detach(right));
            },
            Self::Application { operator, operands, .. } => {
                if let Callee::Expression(callee) = operator {
                    out.push(detach(callee));
                }
                out.append(operands);
            },
            Self::If { predicate,
                       consequent,
                       alternative,
                       .. } => {
                out.push(detach(predicate));
                out.append(consequent);
                if let Some(alternative) = alternative {
                    out.append(alternative);
                }
            },
            Self::While { predicate,
                          consequent,
                          .. } => {
                out.push(detach(predicate));
                out.append(consequent);
            },
            Self::Switch { variable,
                           cases,
                           default,
                           .. } => {
                out.push(detach(variable));
                for case in cases {
                    out.append(&mut case.values);
                    out.append(&mut case.body);
                }
                if let Some(default) = default {
                    out.append(default);
                }
            },
            Self::For { range, consequent, .. } => {
                match range {
                    ForRange::Numeric { from,
                                        to,
                                        increment,
                                        .. } => {
                        out.push(detach(from));
                        out.push(detach(to));
                        if let Some(increment) = increment {
                            out.push(detach(increment));
                        }
                    },
                    ForRange::Collection(collection) => out.push(detach(collection)),
                }
                out.append(consequent);
            },
            Self::Return { expression: Some(expression),
                           .. } => out.push(detach(expression)),
        }
    }
}

/// Swaps a leaf in for `node` and returns the original.
fn detach(node: &mut Node) -> Node {
    mem::replace(node, Node::Break { line: 0 })
}

impl Drop for Node {
    /// Tears the tree down with an explicit work list, so a long operator
    /// chain does not recurse once per level.
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Empty => write!(f, "[]"),
        }
    }
}
