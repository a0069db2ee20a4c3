use std::fmt;

use logos::{Lexer, Logos};
use tracing::debug;

use crate::{error::ParseError, interpreter::parser::core::ParseResult};

/// Multi-character operators: a leading character and the suffixes that may
/// follow it. Extension is maximal munch over the accumulated suffix.
const OPERATOR_SUFFIXES: &[(&str, &[&str])] = &[("+", &["+", "="]),
                                                ("-", &["-", "="]),
                                                ("*", &["*", "="]),
                                                ("/", &["=", "."]),
                                                ("%", &["="]),
                                                ("=", &["="]),
                                                ("!", &["="]),
                                                ("<", &["<", "="]),
                                                (">", &[">", ">>", "="]),
                                                ("&", &["&"]),
                                                ("|", &["|"]),
                                                (":", &["="]),
                                                (".", &[".", ".="])];

/// A numeric literal, already converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Literal without a fractional part.
    Integer(i64),
    /// Literal with a `.` followed by a digit.
    Float(f64),
}

/// What a token is.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// One or more line breaks, folded into a single marker.
    Newline,
    /// Always the last token of a stream.
    EndOfInput,
    /// Identifier or keyword, such as `x`, `$list` or `while`.
    Name(String),
    /// Numeric literal.
    Number(Number),
    /// String literal with escapes resolved.
    Str(String),
    /// Operator or punctuation, such as `+=`, `..=` or `{`.
    Operator(String),
}

/// A token and the 1-based line it was found on.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's kind and literal value.
    pub kind: TokenKind,
    /// Source line, for diagnostics.
    pub line: usize,
}

impl Token {
    /// Whether the token is the operator `symbol`.
    #[must_use]
    pub fn is_operator(&self, symbol: &str) -> bool {
        matches!(&self.kind, TokenKind::Operator(op) if op == symbol)
    }

    /// Whether the token is the name `word`.
    #[must_use]
    pub fn is_name(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Name(name) if name == word)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Newline => write!(f, "newline"),
            Self::EndOfInput => write!(f, "end of input"),
            Self::Name(name) => write!(f, "'{name}'"),
            Self::Number(Number::Integer(i)) => write!(f, "{i}"),
            Self::Number(Number::Float(x)) => write!(f, "{x:?}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Operator(op) => write!(f, "'{op}'"),
        }
    }
}

/// Failure raised from inside a logos callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LexError {
    /// No rule matched.
    #[default]
    UnexpectedCharacter,
    /// End of input or a raw control character inside a string.
    UnterminatedString,
    /// A numeric literal that does not fit its type.
    InvalidNumber,
}

/// Additional state carried by the lexer.
///
/// `line` is the line the current token starts on. Callbacks that consume
/// line breaks inside a token record them in `pending`, which is folded into
/// `line` once the token has been emitted.
pub struct LexerExtras {
    /// The current line number.
    pub line:    usize,
    /// Line breaks consumed by the token just produced.
    pub pending: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:    1,
               pending: 0, }
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
#[logos(skip r"[\x00-\x09\x0B-\x20]+")]
enum RawToken {
    #[token("\n", |lex| lex.extras.pending += 1)]
    Newline,
    #[regex(r"[A-Za-z_$@][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),
    #[regex(r"[0-9][0-9_]*", lex_number)]
    Number(Number),
    #[token("'", lex_string)]
    #[token("\"", lex_string)]
    #[token("`", lex_string)]
    Str(String),
    #[token("//", line_comment)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,
    #[regex(r#"[^\x00-\x20A-Za-z0-9_$@'"`]"#, lex_operator)]
    Operator(String),
}

/// Parses a numeric literal, dropping `_` separators.
///
/// The fractional part is taken only when a digit follows the dot, so
/// `0..5` lexes as `0`, `..`, `5`.
fn lex_number(lex: &mut Lexer<RawToken>) -> Result<Number, LexError> {
    let remainder = lex.remainder().as_bytes();
    if remainder.first() == Some(&b'.') && remainder.get(1).is_some_and(u8::is_ascii_digit) {
        let fraction = 1 + remainder[1..].iter()
                                         .take_while(|&&b| b.is_ascii_digit() || b == b'_')
                                         .count();
        lex.bump(fraction);
    }

    let digits = lex.slice().chars().filter(|&c| c != '_').collect::<String>();
    if digits.contains('.') {
        digits.parse().map(Number::Float).map_err(|_| LexError::InvalidNumber)
    } else {
        digits.parse().map(Number::Integer).map_err(|_| LexError::InvalidNumber)
    }
}

/// Maps the character after a backslash to the character it stands for.
const fn unescape(c: char) -> char {
    match c {
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    }
}

/// Reads the body of a string literal up to the matching delimiter.
///
/// Backtick strings are raw with respect to control characters; the other
/// two kinds reject everything below space except tab.
fn lex_string(lex: &mut Lexer<RawToken>) -> Result<String, LexError> {
    let delimiter = lex.slice().chars().next().ok_or(LexError::UnterminatedString)?;
    let raw = delimiter == '`';
    let mut value = String::new();
    let mut newlines = 0;
    let mut chars = lex.remainder().char_indices();

    while let Some((offset, c)) = chars.next() {
        match c {
            c if c == delimiter => {
                lex.extras.pending += newlines;
                lex.bump(offset + c.len_utf8());
                return Ok(value);
            },
            '\\' => {
                let Some((_, escaped)) = chars.next() else {
                    break;
                };
                if escaped == '\n' {
                    newlines += 1;
                }
                value.push(unescape(escaped));
            },
            '\n' if raw => {
                newlines += 1;
                value.push(c);
            },
            c if !raw && c < ' ' && c != '\t' => return Err(LexError::UnterminatedString),
            c => value.push(c),
        }
    }
    Err(LexError::UnterminatedString)
}

fn line_comment(lex: &mut Lexer<RawToken>) -> logos::Skip {
    let rest = lex.remainder();
    let end = rest.find('\n').unwrap_or(rest.len());
    lex.bump(end);
    logos::Skip
}

fn block_comment(lex: &mut Lexer<RawToken>) -> logos::Skip {
    let rest = lex.remainder();
    let end = rest.find("*/").map_or(rest.len(), |i| i + 2);
    // No token is emitted, so the next one already starts past these lines.
    lex.extras.line += rest[..end].matches('\n').count();
    lex.bump(end);
    logos::Skip
}

/// Extends a single operator character with the longest allowed suffix.
fn lex_operator(lex: &mut Lexer<RawToken>) -> String {
    let Some((_, suffixes)) = OPERATOR_SUFFIXES.iter().find(|(prefix, _)| *prefix == lex.slice())
    else {
        return lex.slice().to_string();
    };
    let rest = lex.remainder();
    let mut length = 0;
    for (offset, c) in rest.char_indices() {
        let candidate = &rest[..offset + c.len_utf8()];
        if !suffixes.contains(&candidate) {
            break;
        }
        length = candidate.len();
    }
    lex.bump(length);
    lex.slice().to_string()
}

impl LexError {
    fn into_parse_error(self, slice: &str, line: usize) -> ParseError {
        match self {
            Self::UnterminatedString => ParseError::UnterminatedString { line },
            Self::InvalidNumber => ParseError::InvalidNumber { literal: slice.to_string(),
                                                               line },
            Self::UnexpectedCharacter => ParseError::UnexpectedToken { found:    slice.to_string(),
                                                                       expected: "a token".to_string(),
                                                                       line },
        }
    }
}

/// Converts source text into tokens.
///
/// Runs of line breaks fold into one [`TokenKind::Newline`], and line breaks
/// before the first token produce nothing. The result always ends with a
/// single [`TokenKind::EndOfInput`].
///
/// # Errors
/// Fails on an unterminated string or a numeric literal that does not fit.
///
/// # Example
/// ```
/// use quill::interpreter::lexer::{Number, TokenKind, tokenize};
///
/// let tokens = tokenize("\n\nx += 1_000").unwrap();
/// let kinds = tokens.into_iter().map(|t| t.kind).collect::<Vec<_>>();
/// assert_eq!(kinds,
///            vec![TokenKind::Name("x".into()),
///                 TokenKind::Operator("+=".into()),
///                 TokenKind::Number(Number::Integer(1000)),
///                 TokenKind::EndOfInput]);
/// ```
pub fn tokenize(source: &str) -> ParseResult<Vec<Token>> {
    let mut lexer = RawToken::lexer_with_extras(source, LexerExtras::default());
    let mut tokens: Vec<Token> = Vec::new();

    while let Some(raw) = lexer.next() {
        let line = lexer.extras.line;
        lexer.extras.line += std::mem::take(&mut lexer.extras.pending);

        let kind = match raw {
            Ok(RawToken::Newline) => {
                if tokens.last().map_or(true, |t| t.kind == TokenKind::Newline) {
                    continue;
                }
                TokenKind::Newline
            },
            Ok(RawToken::Name(name)) => TokenKind::Name(name),
            Ok(RawToken::Number(number)) => TokenKind::Number(number),
            Ok(RawToken::Str(s)) => TokenKind::Str(s),
            Ok(RawToken::Operator(op)) => TokenKind::Operator(op),
            Ok(RawToken::LineComment | RawToken::BlockComment) => continue,
            Err(e) => return Err(e.into_parse_error(lexer.slice(), line)),
        };
        tokens.push(Token { kind, line });
    }

    tokens.push(Token { kind: TokenKind::EndOfInput,
                        line: lexer.extras.line, });
    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    fn op(s: &str) -> TokenKind {
        TokenKind::Operator(s.to_string())
    }

    fn int(i: i64) -> TokenKind {
        TokenKind::Number(Number::Integer(i))
    }

    #[test]
    fn round_trip_with_line_comment() {
        assert_eq!(kinds("17/\n2213-3+\"ab\\ncd\"//123"),
                   vec![int(17),
                        op("/"),
                        TokenKind::Newline,
                        int(2213),
                        op("-"),
                        int(3),
                        op("+"),
                        TokenKind::Str("ab\ncd".to_string()),
                        TokenKind::EndOfInput]);
    }

    #[test]
    fn maximal_munch_operators() {
        assert_eq!(kinds("a >>>= b"), vec![TokenKind::Name("a".into()),
                                          op(">>>"),
                                          op("="),
                                          TokenKind::Name("b".into()),
                                          TokenKind::EndOfInput]);
        assert_eq!(kinds("0..=9"), vec![int(0), op("..="), int(9), TokenKind::EndOfInput]);
        assert_eq!(kinds("x/.y"), vec![TokenKind::Name("x".into()),
                                      op("/."),
                                      TokenKind::Name("y".into()),
                                      TokenKind::EndOfInput]);
        assert_eq!(kinds("#{"), vec![op("#"), op("{"), TokenKind::EndOfInput]);
    }

    #[test]
    fn floats_need_a_digit_after_the_dot() {
        assert_eq!(kinds("2.5"), vec![TokenKind::Number(Number::Float(2.5)), TokenKind::EndOfInput]);
        assert_eq!(kinds("1..3"), vec![int(1), op(".."), int(3), TokenKind::EndOfInput]);
        assert_eq!(kinds("1_000.000_5"),
                   vec![TokenKind::Number(Number::Float(1000.0005)), TokenKind::EndOfInput]);
    }

    #[test]
    fn blank_runs_fold_into_one_newline() {
        assert_eq!(kinds("\n\n  \na\n\n\n\nb\n"),
                   vec![TokenKind::Name("a".into()),
                        TokenKind::Newline,
                        TokenKind::Name("b".into()),
                        TokenKind::Newline,
                        TokenKind::EndOfInput]);
    }

    #[test]
    fn string_escapes_and_raw_strings() {
        assert_eq!(kinds(r#"'a\tb\qc'"#),
                   vec![TokenKind::Str("a\tbqc".to_string()), TokenKind::EndOfInput]);
        assert_eq!(kinds("`line\nbreak`"),
                   vec![TokenKind::Str("line\nbreak".to_string()), TokenKind::EndOfInput]);
    }

    #[test]
    fn unterminated_strings_fail() {
        assert_eq!(tokenize("x = \"abc"), Err(ParseError::UnterminatedString { line: 1 }));
        assert_eq!(tokenize("\n'abc\ndef'"), Err(ParseError::UnterminatedString { line: 2 }));
    }

    #[test]
    fn integer_overflow_is_reported() {
        assert!(matches!(tokenize("99999999999999999999"),
                         Err(ParseError::InvalidNumber { line: 1, .. })));
    }

    #[test]
    fn line_numbers_follow_comments_and_strings() {
        let tokens = tokenize("a /* one\ntwo */ b\n`x\ny` c").unwrap();
        let lines = tokens.iter().map(|t| (t.kind.clone(), t.line)).collect::<Vec<_>>();
        assert_eq!(lines,
                   vec![(TokenKind::Name("a".into()), 1),
                        (TokenKind::Name("b".into()), 2),
                        (TokenKind::Newline, 2),
                        (TokenKind::Str("x\ny".into()), 3),
                        (TokenKind::Name("c".into()), 4),
                        (TokenKind::EndOfInput, 4)]);
    }
}
