use pretty_assertions::assert_eq;
use proptest::prelude::*;
use quill::{
    interpreter::lexer::{Number, TokenKind},
    run, tokenize, Value,
};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
}

#[test]
fn tokenizes_mixed_lines_and_comments() {
    let tokens = kinds("17/\n2213-3+\"ab\\ncd\" // trailing comment");
    assert_eq!(tokens,
               vec![TokenKind::Number(Number::Integer(17)),
                    TokenKind::Operator("/".to_string()),
                    TokenKind::Newline,
                    TokenKind::Number(Number::Integer(2213)),
                    TokenKind::Operator("-".to_string()),
                    TokenKind::Number(Number::Integer(3)),
                    TokenKind::Operator("+".to_string()),
                    TokenKind::Str("ab\ncd".to_string()),
                    TokenKind::EndOfInput]);
}

/// A blank or comment-only line, a statement line, or stray whitespace.
fn source_line() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()),
                Just("   ".to_string()),
                Just("// note".to_string()),
                "[a-z]{1,6} [-+<>=!&|.,:;]{1,2} [0-9]{1,4}",
                "[a-z]{1,4}\\([0-9]{0,3}\\)",
                "\"[a-z ]{0,8}\"",]
}

proptest! {
    #[test]
    fn exactly_one_end_marker_at_the_end(source in "[ -~\n]{0,64}") {
        if let Ok(tokens) = tokenize(&source) {
            let ends = tokens.iter().filter(|t| t.kind == TokenKind::EndOfInput).count();
            prop_assert_eq!(ends, 1);
            prop_assert_eq!(&tokens.last().unwrap().kind, &TokenKind::EndOfInput);
        }
    }

    #[test]
    fn newlines_are_folded(lines in prop::collection::vec(source_line(), 0..12),
                           leading in 0usize..5) {
        let source = "\n".repeat(leading) + &lines.join("\n");
        let tokens = kinds(&source);
        prop_assert_ne!(tokens.first(), Some(&TokenKind::Newline));
        for window in tokens.windows(2) {
            prop_assert!(!(window[0] == TokenKind::Newline && window[1] == TokenKind::Newline));
        }
    }

    #[test]
    fn underscore_separators_are_ignored(value in 0u64..=(i64::MAX as u64),
                                         gaps in prop::collection::vec(any::<bool>(), 0..20)) {
        let digits = value.to_string();
        let mut literal = String::new();
        for (i, c) in digits.chars().enumerate() {
            literal.push(c);
            if i + 1 < digits.len() && gaps.get(i).copied().unwrap_or(false) {
                literal.push('_');
            }
        }
        let expected = i64::try_from(value).unwrap();
        prop_assert_eq!(kinds(&literal),
                        vec![TokenKind::Number(Number::Integer(expected)), TokenKind::EndOfInput]);
    }

    #[test]
    fn subtraction_is_left_associative(a in -1000i64..1000, b in -1000i64..1000, c in -1000i64..1000) {
        let source = format!("{a} - {b} - {c}");
        prop_assert_eq!(run(&source).unwrap(), Value::Integer(a - b - c));
    }

    #[test]
    fn floor_division_and_modulo_agree(a in -10_000i64..10_000, b in prop_oneof![-50i64..0, 1i64..50]) {
        let source = format!("({a}) / ({b}) * ({b}) + ({a}) % ({b}) == {a}");
        prop_assert_eq!(run(&source).unwrap(), Value::Bool(true));
    }
}
