use std::iter::Peekable;

use crate::{
    ast::Node,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{expect_operator, skip_newlines},
        },
    },
    util::stack::ensure_sufficient_stack,
};

/// Whether the token closes the statement list it appears in.
pub(in crate::interpreter::parser) fn ends_statement_list(token: &Token) -> bool {
    token.kind == TokenKind::EndOfInput
    || token.is_operator("}")
    || token.is_name("case")
    || token.is_name("default")
}

/// Parses statements until `}`, `case`, `default` or end of input.
///
/// Blank lines and bare `;` between statements are skipped. The terminating
/// token is left in the stream for the caller.
///
/// Grammar: `statements := (statement | ";" | newline)*`
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut statements = Vec::new();

    loop {
        while tokens.next_if(|t| t.kind == TokenKind::Newline || t.is_operator(";"))
                    .is_some()
        {}

        match tokens.peek() {
            Some(token) if !ends_statement_list(token) => statements.push(parse_statement(tokens)?),
            _ => break,
        }
    }

    Ok(statements)
}

/// Parses a block delimited by braces.
///
/// Newlines before the opening brace are allowed, so a block may start on
/// the line after its header.
///
/// Grammar: `block := "{" statements "}"`
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Vec<Node>>
    where I: Iterator<Item = &'a Token> + Clone
{
    ensure_sufficient_stack(|| -> ParseResult<Vec<Node>> {
        skip_newlines(tokens);
        expect_operator(tokens, "{")?;
        let statements = parse_statements(tokens)?;
        expect_operator(tokens, "}")?;
        Ok(statements)
    })
}
