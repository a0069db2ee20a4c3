use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Callee, Constant, Node},
    error::ParseError,
    interpreter::{
        lexer::{Number, Token, TokenKind},
        parser::{
            block::parse_block,
            core::ParseResult,
            precedence::{Fixity, Item, binary_precedence, build_tree, to_postfix},
            utils::{
                check_operator, current_line, expect_operator, is_keyword, parse_comma_separated,
                parse_identifier, skip_newlines, unexpected,
            },
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Where an expression run appears, which decides where it stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Statement level: a newline ends the run unless it follows an operator.
    Statement,
    /// Inside `(...)` or `[...]`: newlines are insignificant.
    Nested,
    /// A call argument, list element or case value: a top-level `,` ends the
    /// run instead of building a pair.
    Element,
}

/// Operators that end a run when an operator is expected.
const STOPPERS: &[&str] = &[")", "]", "}", "{", ":", ";", "..", "..="];

/// Parses one expression run and reduces it to a tree.
///
/// The run is collected as a flat list of operands and operators, reordered
/// by precedence into postfix form and then folded into nodes.
///
/// # Errors
/// `UnsupportedExpressionToken` for keywords or stray punctuation in operand
/// position, `ExpectedExpression` when nothing was written, plus any error
/// from reducing the run.
pub fn parse_run<'a, I>(tokens: &mut Peekable<I>, mode: Mode) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| collect_run(tokens, mode))
}

fn collect_run<'a, I>(tokens: &mut Peekable<I>, mode: Mode) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let line = current_line(tokens);
    let mut items = Vec::new();
    let mut expect_operand = true;

    loop {
        let Some(&token) = tokens.peek() else {
            break;
        };

        if expect_operand {
            if token.kind == TokenKind::Newline && (mode != Mode::Statement || !items.is_empty()) {
                tokens.next();
                continue;
            }
            match prefix_operator(token) {
                Some("+") => {
                    tokens.next();
                },
                Some(symbol) => {
                    tokens.next();
                    items.push(Item::Operator { symbol: symbol.to_string(),
                                                fixity: Fixity::Prefix,
                                                line:   token.line, });
                },
                None => {
                    items.push(Item::Operand(parse_operand(tokens, items.is_empty())?));
                    expect_operand = false;
                },
            }
            continue;
        }

        match &token.kind {
            TokenKind::Newline if mode == Mode::Statement => break,
            TokenKind::Newline => {
                tokens.next();
            },
            TokenKind::Operator(op) if STOPPERS.contains(&op.as_str()) => break,
            TokenKind::Operator(op) if op == "," && mode == Mode::Element => break,
            TokenKind::Operator(op) if op == "++" || op == "--" => {
                tokens.next();
                items.push(Item::Operator { symbol: op.clone(),
                                            fixity: Fixity::Postfix,
                                            line:   token.line, });
            },
            TokenKind::Operator(op) if op == "[" => {
                tokens.next();
                items.push(Item::Operator { symbol: op.clone(),
                                            fixity: Fixity::Infix,
                                            line:   token.line, });
                let index = parse_run(tokens, Mode::Nested)?;
                expect_operator(tokens, "]")?;
                items.push(Item::Operand(index));
            },
            TokenKind::Operator(op) if binary_precedence(op).is_some() => {
                tokens.next();
                items.push(Item::Operator { symbol: op.clone(),
                                            fixity: Fixity::Infix,
                                            line:   token.line, });
                expect_operand = true;
            },
            TokenKind::Operator(op) => {
                return Err(ParseError::UnsupportedExpressionToken { token: format!("'{op}'"),
                                                                    line:  token.line, });
            },
            _ => break,
        }
    }

    if expect_operand {
        return Err(match (items.is_empty(), tokens.peek()) {
                       (true, Some(token)) if token.kind != TokenKind::EndOfInput => {
                           ParseError::ExpectedExpression { line: token.line }
                       },
                       (_, Some(token)) => unexpected(token, "an operand"),
                       (_, None) => ParseError::UnexpectedEndOfInput { line },
                   });
    }

    build_tree(to_postfix(items), line)
}

/// Maps an operator in operand position to its prefix form.
fn prefix_operator(token: &Token) -> Option<&'static str> {
    match &token.kind {
        TokenKind::Operator(op) => match op.as_str() {
            "-" => Some("_-"),
            "!" => Some("_!"),
            "~" => Some("_~"),
            "+" => Some("+"),
            "++" => Some("++"),
            "--" => Some("--"),
            _ => None,
        },
        _ => None,
    }
}

/// Parses a single operand: a literal, a name, a call, a parenthesized
/// expression, a list literal or a function literal.
fn parse_operand<'a, I>(tokens: &mut Peekable<I>, first: bool) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(token) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = token.line;

    match &token.kind {
        TokenKind::Number(Number::Integer(i)) => Ok(Node::Constant { value: Constant::Integer(*i),
                                                                     line }),
        TokenKind::Number(Number::Float(x)) => Ok(Node::Constant { value: Constant::Float(*x),
                                                                   line }),
        TokenKind::Str(s) => Ok(Node::Constant { value: Constant::Str(s.clone()),
                                                 line }),
        TokenKind::Name(name) if name == "func" => parse_function_literal(tokens, line),
        TokenKind::Name(name) if is_keyword(name) => {
            Err(ParseError::UnsupportedExpressionToken { token: format!("'{name}'"),
                                                         line })
        },
        TokenKind::Name(name) => {
            let variable = Node::Variable { name: name.clone(),
                                            line };
            if check_operator(tokens, "(") {
                tokens.next();
                return parse_call(tokens, variable, line);
            }
            Ok(variable)
        },
        TokenKind::Operator(op) if op == "(" => {
            let inner = parse_run(tokens, Mode::Nested)?;
            skip_newlines(tokens);
            expect_operator(tokens, ")")?;
            Ok(inner)
        },
        TokenKind::Operator(op) if op == "[" => {
            let elements = parse_comma_separated(tokens, |t| parse_run(t, Mode::Element), "]")?;
            if elements.is_empty() {
                return Ok(Node::Constant { value: Constant::Empty,
                                           line });
            }
            Ok(Node::operator("$list", elements, line))
        },
        TokenKind::EndOfInput => Err(ParseError::UnexpectedEndOfInput { line }),
        TokenKind::Newline if first => Err(ParseError::ExpectedExpression { line }),
        other => Err(ParseError::UnsupportedExpressionToken { token: other.to_string(),
                                                              line }),
    }
}

/// Parses the argument list of a call whose `(` was just consumed.
fn parse_call<'a, I>(tokens: &mut Peekable<I>, callee: Node, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let operands = parse_comma_separated(tokens, |t| parse_run(t, Mode::Element), ")")?;
    Ok(Node::Application { operator: Callee::Expression(Box::new(callee)),
                           operands,
                           line })
}

/// Parses `func [name] (params) { body }` after the `func` keyword.
pub(in crate::interpreter::parser) fn parse_function_literal<'a, I>(tokens: &mut Peekable<I>,
                                                                    line: usize)
                                                                    -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = if check_operator(tokens, "(") {
        None
    } else {
        Some(parse_identifier(tokens)?)
    };
    expect_operator(tokens, "(")?;
    let parameters = parse_comma_separated(tokens, parse_identifier, ")")?;
    let body = parse_block(tokens)?;

    Ok(Node::FunctionDefinition { name,
                                  parameters,
                                  body: Rc::from(body),
                                  line })
}
