use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::ParseResult,
    },
};

/// Words with a fixed meaning at statement level.
pub const KEYWORDS: &[&str] = &["var",
                                "func",
                                "if",
                                "else",
                                "while",
                                "for",
                                "in",
                                "step",
                                "switch",
                                "case",
                                "default",
                                "break",
                                "continue",
                                "fallthrough",
                                "return"];

/// Whether `name` is reserved.
pub fn is_keyword(name: &str) -> bool {
    KEYWORDS.contains(&name)
}

/// Builds an `UnexpectedToken` error for `token`.
pub(in crate::interpreter::parser) fn unexpected(token: &Token, expected: &str) -> ParseError {
    match token.kind {
        TokenKind::EndOfInput => ParseError::UnexpectedEndOfInput { line: token.line },
        _ => ParseError::UnexpectedToken { found:    token.kind.to_string(),
                                           expected: expected.to_string(),
                                           line:     token.line, },
    }
}

/// Line of the next token, or `0` if the stream is exhausted.
pub(in crate::interpreter::parser) fn current_line<'a, I>(tokens: &mut Peekable<I>) -> usize
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().map_or(0, |t| t.line)
}

/// Consumes any newline tokens at the front of the stream.
pub(in crate::interpreter::parser) fn skip_newlines<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a Token>
{
    while tokens.next_if(|t| t.kind == TokenKind::Newline).is_some() {}
}

/// Looks at the first token after any newlines without consuming anything.
pub(in crate::interpreter::parser) fn peek_past_newlines<'a, I>(tokens: &Peekable<I>)
                                                               -> Option<&'a Token>
    where I: Iterator<Item = &'a Token> + Clone
{
    tokens.clone().find(|t| t.kind != TokenKind::Newline)
}

/// Whether the next token is the operator `symbol`.
pub(in crate::interpreter::parser) fn check_operator<'a, I>(tokens: &mut Peekable<I>,
                                                            symbol: &str)
                                                            -> bool
    where I: Iterator<Item = &'a Token>
{
    tokens.peek().is_some_and(|t| t.is_operator(symbol))
}

/// Consumes the operator `symbol`, or fails naming what was found instead.
///
/// # Returns
/// The line the operator was found on.
pub(in crate::interpreter::parser) fn expect_operator<'a, I>(tokens: &mut Peekable<I>,
                                                             symbol: &str)
                                                             -> ParseResult<usize>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.is_operator(symbol) => Ok(token.line),
        Some(token) => Err(unexpected(token, &format!("'{symbol}'"))),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Consumes the keyword `word`, or fails naming what was found instead.
pub(in crate::interpreter::parser) fn expect_keyword<'a, I>(tokens: &mut Peekable<I>,
                                                            word: &str)
                                                            -> ParseResult<usize>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.is_name(word) => Ok(token.line),
        Some(token) => Err(unexpected(token, &format!("'{word}'"))),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a plain identifier and returns its name.
///
/// Keywords are rejected.
///
/// # Errors
/// Returns a `ParseError` if the next token is not a non-keyword name.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(Token { kind: TokenKind::Name(name),
                     .. }) if !is_keyword(name) => Ok(name.clone()),
        Some(token) => Err(unexpected(token, "identifier")),
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses a comma-separated list of items up to a closing operator.
///
/// Shared by call arguments, list literals and parameter lists. Newlines are
/// allowed around items and separators, and an immediately closing operator
/// yields an empty list.
///
/// Grammar: `list := (item ("," item)*)? closing`
///
/// # Parameters
/// - `tokens`: Token iterator positioned after the opening delimiter.
/// - `parse_item`: Function used to parse each element.
/// - `closing`: The operator that terminates the list, such as `)` or `]`.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &str)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a Token> + Clone
{
    let mut items = Vec::new();
    skip_newlines(tokens);
    if tokens.next_if(|t| t.is_operator(closing)).is_some() {
        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        skip_newlines(tokens);
        match tokens.next() {
            Some(token) if token.is_operator(",") => skip_newlines(tokens),
            Some(token) if token.is_operator(closing) => break,
            Some(token) => return Err(unexpected(token, &format!("',' or '{closing}'"))),
            None => return Err(ParseError::UnexpectedEndOfInput { line: 0 }),
        }
    }
    Ok(items)
}
