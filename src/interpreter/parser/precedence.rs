use crate::{
    ast::{Callee, Constant, Node},
    error::ParseError,
    interpreter::parser::core::ParseResult,
};

/// Precedence of the prefix operators `_-`, `_!`, `_~`, `++` and `--`.
const UNARY: u8 = 12;
/// Precedence of `[` and `.`, the tightest binding infix operators.
const POSTFIX_BOUND: u8 = 14;

/// How an operator combines with the operands around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixity {
    /// Applies to the operand that follows, e.g. `-x`.
    Prefix,
    /// Applies to the operand that precedes, e.g. `x++`.
    Postfix,
    /// Combines the operands on both sides.
    Infix,
}

/// One element of a flat expression run, before precedence is resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// A finished subtree: constant, variable, call, grouping, literal.
    Operand(Node),
    /// An operator waiting for its operands.
    Operator {
        /// Operator text; unary forms use their `_`-prefixed names.
        symbol: String,
        /// Position relative to its operands.
        fixity: Fixity,
        /// Line the operator appeared on.
        line:   usize,
    },
}

/// Binding strength of an infix operator, higher binds tighter.
///
/// Returns `None` for text that is not an infix operator.
pub fn binary_precedence(symbol: &str) -> Option<u8> {
    let level = match symbol {
        "=" | ":=" | "+=" | "-=" | "*=" | "/=" | "%=" => 0,
        "," => 1,
        "||" => 2,
        "&&" => 3,
        "|" => 4,
        "^" => 5,
        "&" => 6,
        "==" | "!=" => 7,
        "<" | "<=" | ">" | ">=" => 8,
        "<<" | ">>" | ">>>" => 9,
        "+" | "-" => 10,
        "*" | "/" | "/." | "%" => 11,
        "**" => 13,
        "[" | "." => POSTFIX_BOUND,
        _ => return None,
    };
    Some(level)
}

fn is_right_associative(symbol: &str) -> bool {
    symbol == "**" || binary_precedence(symbol) == Some(0)
}

fn stacked_precedence(item: &Item) -> u8 {
    match item {
        Item::Operator { fixity: Fixity::Prefix,
                         .. } => UNARY,
        Item::Operator { symbol, .. } => binary_precedence(symbol).unwrap_or(UNARY),
        Item::Operand(_) => 0,
    }
}

/// Reorders an infix run into postfix order.
///
/// An incoming infix operator pops every stacked operator that binds tighter,
/// and those that bind equally unless it is right-associative (`**` and the
/// assignment level). Prefix operators wait on the stack for their operand;
/// postfix operators only pop member and index accesses.
pub fn to_postfix(items: Vec<Item>) -> Vec<Item> {
    let mut output = Vec::with_capacity(items.len());
    let mut stack: Vec<Item> = Vec::new();

    for item in items {
        match item {
            Item::Operand(_) => output.push(item),
            Item::Operator { fixity: Fixity::Prefix,
                             .. } => stack.push(item),
            Item::Operator { fixity: Fixity::Postfix,
                             .. } => {
                while stack.last().is_some_and(|top| {
                                       matches!(top, Item::Operator { fixity: Fixity::Infix, .. })
                                       && stacked_precedence(top) >= POSTFIX_BOUND
                                   })
                {
                    output.extend(stack.pop());
                }
                output.push(item);
            },
            Item::Operator { ref symbol,
                             fixity: Fixity::Infix,
                             .. } => {
                let precedence = binary_precedence(symbol).unwrap_or(0);
                let right = is_right_associative(symbol);
                while let Some(top) = stack.last() {
                    let top_precedence = stacked_precedence(top);
                    if precedence < top_precedence || (precedence == top_precedence && !right) {
                        output.extend(stack.pop());
                    } else {
                        break;
                    }
                }
                stack.push(item);
            },
        }
    }

    output.extend(stack.into_iter().rev());
    output
}

/// Reduces a postfix sequence to a single tree.
///
/// # Errors
/// `MalformedExpression` when an operator lacks operands or operands are left
/// over; assignment and member errors from [`reduce_binary`].
pub fn build_tree(postfix: Vec<Item>, line: usize) -> ParseResult<Node> {
    let mut operands: Vec<Node> = Vec::new();

    for item in postfix {
        match item {
            Item::Operand(node) => operands.push(node),
            Item::Operator { symbol,
                             fixity: Fixity::Infix,
                             line, } => {
                let right = operands.pop().ok_or(ParseError::MalformedExpression { line })?;
                let left = operands.pop().ok_or(ParseError::MalformedExpression { line })?;
                operands.push(reduce_binary(&symbol, left, right, line)?);
            },
            Item::Operator { symbol, fixity, line } => {
                let operand = operands.pop().ok_or(ParseError::MalformedExpression { line })?;
                operands.push(reduce_unary(&symbol, fixity, operand, line)?);
            },
        }
    }

    let tree = operands.pop().ok_or(ParseError::ExpectedExpression { line })?;
    if !operands.is_empty() {
        return Err(ParseError::MalformedExpression { line });
    }
    Ok(tree)
}

fn increment(target: Node, symbol: &str, return_left: bool, line: usize) -> ParseResult<Node> {
    if !target.is_assignable() {
        return Err(ParseError::InvalidAssignmentTarget { line });
    }
    let step = Node::Constant { value: Constant::Integer(1),
                                line };
    let base = if symbol == "++" { "+" } else { "-" };
    let right = Node::operator(base, vec![target.clone(), step], line);
    Ok(Node::Assignment { left: Box::new(target),
                          right: Box::new(right),
                          return_left,
                          line })
}

fn reduce_unary(symbol: &str, fixity: Fixity, operand: Node, line: usize) -> ParseResult<Node> {
    match symbol {
        "++" | "--" => increment(operand, symbol, fixity == Fixity::Postfix, line),
        _ => Ok(Node::operator(symbol, vec![operand], line)),
    }
}

/// Builds the node for one infix operator.
///
/// Assignment forms become [`Node::Assignment`] or [`Node::VarDefinition`];
/// `.` checks that its right side names a member; everything else becomes an
/// application of the operator.
fn reduce_binary(symbol: &str, left: Node, right: Node, line: usize) -> ParseResult<Node> {
    match symbol {
        "=" => {
            if !left.is_assignable() {
                return Err(ParseError::InvalidAssignmentTarget { line });
            }
            Ok(Node::Assignment { left: Box::new(left),
                                  right: Box::new(right),
                                  return_left: false,
                                  line })
        },
        "+=" | "-=" | "*=" | "/=" | "%=" => {
            if !left.is_assignable() {
                return Err(ParseError::InvalidAssignmentTarget { line });
            }
            let base = &symbol[..symbol.len() - 1];
            let value = Node::operator(base, vec![left.clone(), right], line);
            Ok(Node::Assignment { left: Box::new(left),
                                  right: Box::new(value),
                                  return_left: false,
                                  line })
        },
        ":=" => match &left {
            Node::Variable { name, .. } => Ok(Node::VarDefinition { left: name.clone(),
                                                                    right: Box::new(right),
                                                                    line }),
            _ => Err(ParseError::InvalidAssignmentTarget { line }),
        },
        "." => match right {
            Node::Variable { .. } => Ok(Node::operator(".", vec![left, right], line)),
            Node::Application { operator: Callee::Expression(ref callee),
                                .. } if matches!(**callee, Node::Variable { .. }) => {
                Ok(Node::operator(".", vec![left, right], line))
            },
            _ => Err(ParseError::InvalidMember { line }),
        },
        _ => Ok(Node::operator(symbol, vec![left, right], line)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn num(i: i64) -> Item {
        Item::Operand(Node::Constant { value: Constant::Integer(i),
                                       line:  1, })
    }

    fn var(name: &str) -> Item {
        Item::Operand(Node::Variable { name: name.to_string(),
                                       line: 1, })
    }

    fn infix(symbol: &str) -> Item {
        Item::Operator { symbol: symbol.to_string(),
                         fixity: Fixity::Infix,
                         line:   1, }
    }

    fn symbols(items: &[Item]) -> Vec<String> {
        items.iter()
             .map(|item| match item {
                 Item::Operand(Node::Constant { value, .. }) => value.to_string(),
                 Item::Operand(Node::Variable { name, .. }) => name.clone(),
                 Item::Operand(_) => "?".to_string(),
                 Item::Operator { symbol, .. } => symbol.clone(),
             })
             .collect()
    }

    #[test]
    fn equal_precedence_is_left_associative() {
        let postfix = to_postfix(vec![num(1), infix("-"), num(2), infix("-"), num(3)]);
        assert_eq!(symbols(&postfix), ["1", "2", "-", "3", "-"]);
    }

    #[test]
    fn power_is_right_associative() {
        let postfix = to_postfix(vec![num(2), infix("**"), num(3), infix("**"), num(2)]);
        assert_eq!(symbols(&postfix), ["2", "3", "2", "**", "**"]);
    }

    #[test]
    fn multiplication_binds_tighter() {
        let postfix = to_postfix(vec![num(9), infix("+"), num(2), infix("*"), num(2)]);
        assert_eq!(symbols(&postfix), ["9", "2", "2", "*", "+"]);
    }

    #[test]
    fn prefix_waits_for_its_operand() {
        let minus = Item::Operator { symbol: "_-".to_string(),
                                     fixity: Fixity::Prefix,
                                     line:   1, };
        let postfix = to_postfix(vec![minus, var("a"), infix("+"), var("b")]);
        assert_eq!(symbols(&postfix), ["a", "_-", "b", "+"]);
    }

    #[test]
    fn dangling_operator_is_malformed() {
        let result = build_tree(vec![num(1), infix("+")], 3);
        assert_eq!(result, Err(ParseError::MalformedExpression { line: 1 }));
    }

    #[test]
    fn leftover_operands_are_malformed() {
        let result = build_tree(vec![num(1), num(2)], 3);
        assert_eq!(result, Err(ParseError::MalformedExpression { line: 3 }));
    }

    #[test]
    fn assignment_needs_a_target() {
        let postfix = to_postfix(vec![num(1), infix("="), num(2)]);
        assert_eq!(build_tree(postfix, 1), Err(ParseError::InvalidAssignmentTarget { line: 1 }));
    }
}
