use std::iter::Peekable;

use crate::{
    ast::{ForRange, Node, SwitchCase},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::{ends_statement_list, parse_block, parse_statements},
            core::{ParseResult, parse_expression},
            expression::{Mode, parse_function_literal, parse_run},
            utils::{
                check_operator, expect_keyword, expect_operator, parse_identifier,
                peek_past_newlines, skip_newlines, unexpected,
            },
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Parses a single statement.
///
/// A statement is one of the keyword constructs (`var`, `func NAME`, `if`,
/// `while`, `for`, `switch`, `break`, `continue`, `fallthrough`, `return`) or
/// an expression. It must be followed by a newline, `;`, or a token that
/// closes the surrounding statement list, unless it ends in a block.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// The parsed node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| keyword_or_expression(tokens))
}

fn keyword_or_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let Some(&token) = tokens.peek() else {
        return Err(ParseError::UnexpectedEndOfInput { line: 0 });
    };
    let line = token.line;

    let keyword = match &token.kind {
        TokenKind::Name(name) => name.as_str(),
        _ => "",
    };

    // A statement ending in `}` needs no terminator.
    let ends_in_block = match keyword {
        "if" | "while" | "for" | "switch" => true,
        "func" => !is_anonymous_function(tokens),
        _ => false,
    };

    let statement = match keyword {
        "var" => {
            tokens.next();
            parse_var(tokens, line)?
        },
        "func" if !is_anonymous_function(tokens) => {
            tokens.next();
            let literal = parse_function_literal(tokens, line)?;
            let Node::FunctionDefinition { name: Some(name), .. } = &literal else {
                return Err(ParseError::MalformedExpression { line });
            };
            Node::VarDefinition { left: name.clone(),
                                  right: Box::new(literal),
                                  line }
        },
        "if" => {
            tokens.next();
            parse_if(tokens, line)?
        },
        "while" => {
            tokens.next();
            let predicate = parse_expression(tokens)?;
            let consequent = parse_block(tokens)?;
            Node::While { predicate: Box::new(predicate),
                          consequent,
                          line }
        },
        "for" => {
            tokens.next();
            parse_for(tokens, line)?
        },
        "switch" => {
            tokens.next();
            parse_switch(tokens, line)?
        },
        "break" => {
            tokens.next();
            Node::Break { line }
        },
        "continue" => {
            tokens.next();
            Node::Continue { line }
        },
        "fallthrough" => {
            tokens.next();
            Node::Fallthrough { line }
        },
        "return" => {
            tokens.next();
            let expression = if at_statement_end(tokens) {
                None
            } else {
                Some(Box::new(parse_expression(tokens)?))
            };
            Node::Return { expression, line }
        },
        _ => parse_expression(tokens)?,
    };

    if ends_in_block {
        tokens.next_if(|t| t.kind == TokenKind::Newline || t.is_operator(";"));
    } else {
        expect_statement_end(tokens)?;
    }
    Ok(statement)
}

/// `func` directly followed by `(` starts an anonymous function expression.
fn is_anonymous_function<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token> + Clone
{
    tokens.clone().nth(1).is_some_and(|t| t.is_operator("("))
}

fn at_statement_end<'a, I>(tokens: &mut Peekable<I>) -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(true, |t| {
                     t.kind == TokenKind::Newline || t.is_operator(";") || ends_statement_list(t)
                 })
}

/// Consumes a trailing `;` or newline; anything else must close the list.
fn expect_statement_end<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<()>
    where I: Iterator<Item = &'a Token>
{
    if tokens.next_if(|t| t.kind == TokenKind::Newline || t.is_operator(";")).is_some() {
        return Ok(());
    }
    match tokens.peek() {
        Some(token) if !ends_statement_list(token) => Err(unexpected(token, "end of statement")),
        _ => Ok(()),
    }
}

/// Parses `var NAME [= expression]` after the `var` keyword.
///
/// A missing initializer binds `null`.
fn parse_var<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let name = parse_identifier(tokens)?;
    let right = if tokens.next_if(|t| t.is_operator("=")).is_some() {
        parse_expression(tokens)?
    } else {
        Node::Variable { name: "null".to_string(),
                         line }
    };
    Ok(Node::VarDefinition { left: name,
                             right: Box::new(right),
                             line })
}

/// Parses `if` with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> { ... }
///     else if <condition> { ... }
///     else { ... }
/// ```
/// `else` may start on a later line than the closing brace.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let predicate = parse_expression(tokens)?;
    let consequent = parse_block(tokens)?;

    let alternative = if peek_past_newlines(tokens).is_some_and(|t| t.is_name("else")) {
        skip_newlines(tokens);
        expect_keyword(tokens, "else")?;
        match tokens.peek() {
            Some(token) if token.is_name("if") => {
                let else_line = token.line;
                tokens.next();
                Some(vec![ensure_sufficient_stack(|| parse_if(tokens, else_line))?])
            },
            _ => Some(parse_block(tokens)?),
        }
    } else {
        None
    };

    Ok(Node::If { predicate: Box::new(predicate),
                  consequent,
                  alternative,
                  line })
}

/// Parses `for NAME in range { ... }`.
///
/// `from..to` and `from..=to` build a numeric range, optionally followed by
/// `step increment`; any other expression is iterated as a list.
fn parse_for<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let variable = parse_identifier(tokens)?;
    expect_keyword(tokens, "in")?;
    let start = parse_run(tokens, Mode::Statement)?;

    let closed = check_operator(tokens, "..=");
    let range = if closed || check_operator(tokens, "..") {
        tokens.next();
        let to = parse_run(tokens, Mode::Statement)?;
        let increment = if tokens.next_if(|t| t.is_name("step")).is_some() {
            Some(Box::new(parse_run(tokens, Mode::Statement)?))
        } else {
            None
        };
        ForRange::Numeric { from: Box::new(start),
                            to: Box::new(to),
                            closed,
                            increment }
    } else {
        ForRange::Collection(Box::new(start))
    };

    let consequent = parse_block(tokens)?;
    Ok(Node::For { variable,
                   range,
                   consequent,
                   line })
}

/// Parses `switch subject { case v, w: ... default: ... }`.
fn parse_switch<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    let variable = parse_expression(tokens)?;
    skip_newlines(tokens);
    expect_operator(tokens, "{")?;

    let mut cases = Vec::new();
    let mut default = None;

    loop {
        while tokens.next_if(|t| t.kind == TokenKind::Newline || t.is_operator(";"))
                    .is_some()
        {}
        let Some(&token) = tokens.peek() else {
            return Err(ParseError::UnexpectedEndOfInput { line });
        };

        if token.is_operator("}") {
            tokens.next();
            break;
        }
        if token.is_name("case") {
            tokens.next();
            let mut values = vec![parse_run(tokens, Mode::Element)?];
            while tokens.next_if(|t| t.is_operator(",")).is_some() {
                values.push(parse_run(tokens, Mode::Element)?);
            }
            expect_operator(tokens, ":")?;
            let body = parse_statements(tokens)?;
            cases.push(SwitchCase { values,
                                    body,
                                    line: token.line });
        } else if token.is_name("default") {
            tokens.next();
            expect_operator(tokens, ":")?;
            default = Some(parse_statements(tokens)?);
        } else {
            return Err(unexpected(token, "'case', 'default' or '}'"));
        }
    }

    Ok(Node::Switch { variable: Box::new(variable),
                      cases,
                      default,
                      line })
}
