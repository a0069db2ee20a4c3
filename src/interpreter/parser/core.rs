use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::Node,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            block::parse_statements,
            expression::{Mode, parse_run},
            utils::unexpected,
        },
    },
};

/// Result type used by the tokenizer and parser.
pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete program.
///
/// Statements are read until the end-of-input token; a stray `}`, `case` or
/// `default` at the top level is an error. An empty program parses to an
/// empty list.
///
/// # Errors
/// Returns the first `ParseError` encountered; there is no recovery.
///
/// # Example
/// ```
/// use quill::interpreter::{lexer::tokenize, parser::core::parse};
///
/// let tokens = tokenize("var x = 1\nx += 2").unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(program.len(), 2);
/// ```
pub fn parse(tokens: &[Token]) -> ParseResult<Vec<Node>> {
    let mut iter = tokens.iter().peekable();
    let program = parse_statements(&mut iter)?;

    match iter.peek() {
        Some(token) if token.kind != TokenKind::EndOfInput => {
            Err(unexpected(token, "a statement"))
        },
        _ => {
            debug!(statements = program.len(), "parsed program");
            Ok(program)
        },
    }
}

/// Parses a full statement-level expression.
///
/// This is the entry point for expression parsing inside statements: the
/// run stops at a newline unless the line ends with an operator.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Node>
    where I: Iterator<Item = &'a Token> + Clone
{
    parse_run(tokens, Mode::Statement)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        ast::{Callee, Constant, ForRange},
        interpreter::lexer::tokenize,
    };

    fn program(source: &str) -> ParseResult<Vec<Node>> {
        parse(&tokenize(source)?)
    }

    fn int(i: i64, line: usize) -> Node {
        Node::Constant { value: Constant::Integer(i),
                         line }
    }

    fn var(name: &str, line: usize) -> Node {
        Node::Variable { name: name.to_string(),
                         line }
    }

    #[test]
    fn empty_program() {
        assert_eq!(program("\n\n// nothing\n"), Ok(Vec::new()));
    }

    #[test]
    fn var_and_compound_assignment() {
        let parsed = program("var x = 1\nx += 2;").unwrap();
        assert_eq!(parsed,
                   vec![Node::VarDefinition { left:  "x".to_string(),
                                              right: Box::new(int(1, 1)),
                                              line:  1, },
                        Node::Assignment { left:        Box::new(var("x", 2)),
                                           right:       Box::new(Node::operator("+",
                                                                                vec![var("x", 2),
                                                                                     int(2, 2)],
                                                                                2)),
                                           return_left: false,
                                           line:        2, }]);
    }

    #[test]
    fn named_function_statement_binds_its_name() {
        let parsed = program("func add(a, b) { return a + b }").unwrap();
        let [Node::VarDefinition { left, right, .. }] = parsed.as_slice() else {
            panic!("expected a single definition, got {parsed:?}");
        };
        assert_eq!(left, "add");
        let Node::FunctionDefinition { name, parameters, body, .. } = right.as_ref() else {
            panic!("expected a function literal");
        };
        assert_eq!(name.as_deref(), Some("add"));
        assert_eq!(parameters, &["a".to_string(), "b".to_string()]);
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn else_if_chains_nest() {
        let parsed = program("if a { 1 }\nelse if b { 2 } else { 3 }").unwrap();
        let [Node::If { alternative: Some(alternative), .. }] = parsed.as_slice() else {
            panic!("expected an if statement");
        };
        assert!(matches!(alternative.as_slice(), [Node::If { alternative: Some(_), line: 2, .. }]));
    }

    #[test]
    fn numeric_for_with_step() {
        let parsed = program("for i in 0..=10 step 2 { print(i) }").unwrap();
        let [Node::For { variable, range, consequent, .. }] = parsed.as_slice() else {
            panic!("expected a for statement");
        };
        assert_eq!(variable, "i");
        assert_eq!(range,
                   &ForRange::Numeric { from:      Box::new(int(0, 1)),
                                        to:        Box::new(int(10, 1)),
                                        closed:    true,
                                        increment: Some(Box::new(int(2, 1))), });
        assert_eq!(consequent.len(), 1);
    }

    #[test]
    fn collection_for() {
        let parsed = program("for x in xs {\n}").unwrap();
        assert!(matches!(parsed.as_slice(),
                         [Node::For { range: ForRange::Collection(_), .. }]));
    }

    #[test]
    fn switch_with_cases_and_default() {
        let source = "switch x {\ncase 1, 2:\n  a()\n  fallthrough\ncase 3:\n  break\ndefault:\n  b()\n}";
        let parsed = program(source).unwrap();
        let [Node::Switch { cases, default, .. }] = parsed.as_slice() else {
            panic!("expected a switch");
        };
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].values, vec![int(1, 2), int(2, 2)]);
        assert_eq!(cases[0].body.len(), 2);
        assert_eq!(cases[1].body, vec![Node::Break { line: 6 }]);
        assert_eq!(default.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn member_assignment_target() {
        let parsed = program("ns.x = 5").unwrap();
        let member = Node::operator(".", vec![var("ns", 1), var("x", 1)], 1);
        assert_eq!(parsed,
                   vec![Node::Assignment { left:        Box::new(member),
                                           right:       Box::new(int(5, 1)),
                                           return_left: false,
                                           line:        1, }]);
    }

    #[test]
    fn walrus_defines() {
        let parsed = program("y := 3").unwrap();
        assert_eq!(parsed,
                   vec![Node::VarDefinition { left:  "y".to_string(),
                                              right: Box::new(int(3, 1)),
                                              line:  1, }]);
    }

    #[test]
    fn anonymous_function_expression() {
        let parsed = program("var f = func (x) { return x }").unwrap();
        let [Node::VarDefinition { right, .. }] = parsed.as_slice() else {
            panic!("expected a definition");
        };
        assert!(matches!(right.as_ref(), Node::FunctionDefinition { name: None, .. }));
    }

    #[test]
    fn two_expressions_on_one_line_fail() {
        assert_eq!(program("a b"),
                   Err(ParseError::UnexpectedToken { found:    "'b'".to_string(),
                                                     expected: "end of statement".to_string(),
                                                     line:     1, }));
    }

    #[test]
    fn block_statements_need_no_terminator() {
        assert_eq!(program("if a { b() } c()").map(|p| p.len()), Ok(2));
        assert_eq!(program("while x < 3 { x += 1 } print(x)").map(|p| p.len()), Ok(2));

        let parsed = program("func f(n) { if n == 0 { return 0 } return 1 + f(n-1) }").unwrap();
        let [Node::VarDefinition { right, .. }] = parsed.as_slice() else {
            panic!("expected a single definition, got {parsed:?}");
        };
        assert!(matches!(right.as_ref(), Node::FunctionDefinition { body, .. } if body.len() == 2));
    }

    #[test]
    fn deep_nesting_is_an_error_not_a_crash() {
        let source = "(".repeat(10_000) + "1";
        assert!(matches!(program(&source), Err(ParseError::UnexpectedEndOfInput { .. })));
    }

    #[test]
    fn stray_closing_brace_fails() {
        assert!(matches!(program("}"), Err(ParseError::UnexpectedToken { line: 1, .. })));
    }

    #[test]
    fn unterminated_block_fails() {
        assert!(matches!(program("while x {\n a()"),
                         Err(ParseError::UnexpectedEndOfInput { .. })));
    }

    #[test]
    fn call_callee_is_an_expression() {
        let parsed = program("print(1)").unwrap();
        assert_eq!(parsed,
                   vec![Node::Application { operator: Callee::Expression(Box::new(var("print", 1))),
                                            operands: vec![int(1, 1)],
                                            line:     1, }]);
    }
}
