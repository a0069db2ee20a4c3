use std::{fs, io::Cursor};

use pretty_assertions::assert_eq;
use quill::{
    init_environment,
    interpreter::host::{Host, OutputBuffer},
    parse, run_with, tokenize, Config, Context, Error, ParseError, RuntimeError, Value,
};
use walkdir::WalkDir;

fn context(output: &OutputBuffer) -> Context {
    Context::new(Host::buffered(output.clone()), Config::default())
}

fn eval(src: &str) -> Result<Value, Error> {
    run_with(src, &mut context(&OutputBuffer::default()))
}

fn output_of(src: &str) -> String {
    let output = OutputBuffer::default();
    if let Err(e) = run_with(src, &mut context(&output)) {
        panic!("Script failed: {e}\n{src}");
    }
    output.contents()
}

fn assert_success(src: &str) {
    if let Err(e) = eval(src) {
        panic!("Script failed: {e}\n{src}");
    }
}

fn assert_failure(src: &str) {
    assert!(eval(src).is_err(), "Script succeeded but was expected to fail:\n{src}");
}

fn runtime_error(src: &str) -> RuntimeError {
    match eval(src) {
        Err(Error::Runtime(e)) => e,
        other => panic!("expected a runtime error, got {other:?}"),
    }
}

#[test]
fn scripts_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "ql"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let output = OutputBuffer::default();
        if let Err(e) = run_with(&source, &mut context(&output)) {
            panic!("Script {path:?} failed:\n{e}");
        }

        let expected = path.with_extension("out");
        if expected.exists() {
            let expected = fs::read_to_string(&expected).unwrap();
            assert_eq!(output.contents(), expected, "output of {path:?}");
        }
        count += 1;
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

#[test]
fn precedence_and_mixed_arithmetic() {
    let Ok(Value::Float(x)) = eval("9+2.2*2") else {
        panic!("expected a float");
    };
    assert!((x - 13.4).abs() < 1e-9);
    assert_eq!(eval("1-2-3").unwrap(), Value::Integer(-4));
    assert_eq!(eval("2 ** 3 ** 2").unwrap(), Value::Integer(512));
    assert_eq!(eval("(1 + 2) * 3").unwrap(), Value::Integer(9));
    assert_eq!(eval("-2 ** 2").unwrap(), Value::Integer(-4));
    assert_eq!(eval("7 / 2").unwrap(), Value::Integer(3));
    assert_eq!(eval("7 /. 2").unwrap(), Value::Float(3.5));
    assert_eq!(eval("1 + 2 == 3 && 4 > 3").unwrap(), Value::Bool(true));
}

#[test]
fn variables_and_assignment_forms() {
    assert_success("var x = 1 + 2\nassert(x == 3)");
    assert_success("var x = 2\nx += 3\nassert(x == 5)");
    assert_success("var x = 7\nx -= 2\nassert(x == 5)");
    assert_success("var x = 4\nx *= 2\nassert(x == 8)");
    assert_success("var x = 9\nx /= 3\nassert(x == 3)");
    assert_success("var x = 9\nx %= 4\nassert(x == 1)");
    assert_success("y := 3\nassert(y == 3)");
    assert_success("var i = 1\nvar old = i++\nassert(old == 1)\nassert(i == 2)");
    assert_success("var i = 1\nassert(++i == 2)\nassert(i-- == 2)\nassert(i == 1)");
    assert_success("var a\nvar b\na = b = 4\nassert(a == 4 && b == 4)");
    assert_success("var nothing\nassert(nothing == null)");
}

#[test]
fn assignment_never_creates_bindings() {
    assert_eq!(runtime_error("z = 1"),
               RuntimeError::UnknownVariable { name: "z".to_string(),
                                               line: 1, });
}

#[test]
fn unknown_variable_leaves_environment_intact() {
    let output = OutputBuffer::default();
    let mut context = context(&output);
    let env = init_environment();
    let run = |context: &mut Context, src: &str| {
        let program = parse(&tokenize(src).unwrap()).unwrap();
        context.run(&program, &env)
    };

    run(&mut context, "var a = 1").unwrap();
    assert_eq!(run(&mut context, "a + missing"),
               Err(RuntimeError::UnknownVariable { name: "missing".to_string(),
                                                   line: 1, }));
    assert_eq!(run(&mut context, "a + 1"), Ok(Value::Integer(2)));
}

#[test]
fn logic_short_circuits() {
    let src = r#"
var hits = 0
func bump() {
    hits += 1
    return true
}
assert(!(false && bump()))
assert(true || bump())
assert(hits == 0)
assert(true && bump())
assert(false || bump())
assert(hits == 2)
"#;
    assert_success(src);
}

#[test]
fn logic_yields_the_deciding_operand() {
    assert_eq!(eval("\"\" || \"anon\"").unwrap(), Value::from("anon"));
    assert_eq!(eval("\"bob\" || \"anon\"").unwrap(), Value::from("bob"));
    assert_eq!(eval("0 && 5").unwrap(), Value::Integer(0));
    assert_eq!(eval("2 && 5").unwrap(), Value::Integer(5));
    assert_eq!(eval("null || 0").unwrap(), Value::Integer(0));

    let output = OutputBuffer::default();
    let mut context = Context::new(Host::new(output.clone(), Cursor::new("")), Config::default());
    assert_eq!(run_with("var name = input() || \"anon\"\nname", &mut context).unwrap(),
               Value::from("anon"));
}

#[test]
fn truthiness() {
    assert_success("assert(!0 && !0.0 && !\"\" && ![] && !null && !false)");
    assert_success("assert(1 && \"0\" && [0] && true)");
}

#[test]
fn if_else_chains() {
    let src = r#"
func classify(n) {
    if n < 0 {
        return "negative"
    } else if n == 0 {
        return "zero"
    }
    else {
        return "positive"
    }
}
print(classify(-3), " ", classify(0), " ", classify(8))
"#;
    assert_eq!(output_of(src), "negative zero positive\n");
}

#[test]
fn while_break_runs_once_and_yields_null() {
    assert_success("var n = 0\nwhile true {\n    n += 1\n    break\n}\nassert(n == 1)");
    assert_eq!(eval("while true { break }").unwrap(), Value::Null);
}

#[test]
fn continue_skips_the_rest_of_the_body() {
    let src = r#"
var odd = 0
var i = 0
while i < 10 {
    i += 1
    if i % 2 == 0 { continue }
    odd += 1
}
assert(odd == 5)
"#;
    assert_success(src);
}

#[test]
fn numeric_for_loops() {
    assert_eq!(output_of("for i in 0..3 { print(i) }"), "0\n1\n2\n");
    assert_eq!(output_of("for i in 0..=10 step 5 { print(i) }"), "0\n5\n10\n");
    assert_eq!(output_of("for i in 3..0 step -1 { print(i) }"), "3\n2\n1\n");
    assert_eq!(output_of("for i in 0..5 {\n    if i == 2 { break }\n    print(i)\n}"),
               "0\n1\n");
    assert_eq!(output_of("for i in 0..10 {\n    print(i)\n    i += 3\n}"), "0\n4\n8\n");
    assert_eq!(output_of("for x in 0.5..2 { print(x) }"), "0.5\n1.5\n");
}

#[test]
fn collection_for_loops() {
    assert_eq!(output_of("for x in [\"a\", \"b\"] { print(x) }"), "a\nb\n");
    assert_eq!(output_of("var xs = []\nfor x in xs { print(x) }"), "");
    assert!(matches!(runtime_error("for x in 5 { }"),
                     RuntimeError::UnsupportedForRange { line: 1, .. }));
    assert!(matches!(runtime_error("for x in pair(1, 2) { }"),
                     RuntimeError::UnsupportedForRange { .. }));
}

#[test]
fn zero_step_is_rejected() {
    assert!(matches!(runtime_error("for i in 0..3 step 0 { }"),
                     RuntimeError::TypeError { .. }));
}

#[test]
fn switch_fallthrough_enters_next_case_unconditionally() {
    let src = r#"
var log = ""
switch 1 {
case 1:
    log += "a"
    fallthrough
case 2:
    log += "b"
case 3:
    log += "c"
}
assert(log == "ab")
"#;
    assert_success(src);
}

#[test]
fn switch_default_and_break() {
    let src = r#"
func name(n) {
    var result = "?"
    switch n {
    case 1, 2:
        result = "small"
    case 3:
        result = "three"
        break
        result = "unreachable"
    default:
        result = "big"
    }
    return result
}
print(name(2), name(3), name(9))
"#;
    assert_eq!(output_of(src), "smallthreebig\n");
}

#[test]
fn switch_continue_reaches_enclosing_loop() {
    let src = r#"
for i in 0..4 {
    switch i % 2 {
    case 0:
        continue
    }
    print(i)
}
"#;
    assert_eq!(output_of(src), "1\n3\n");
}

#[test]
fn closures_share_their_frame() {
    let src = r#"
func make_counter() {
    var count = 0
    return func () {
        count += 1
        return count
    }
}
var c = make_counter()
var d = make_counter()
c()
c()
assert(c() == 3)
assert(d() == 1)
"#;
    assert_success(src);
}

#[test]
fn recursion() {
    let src = r#"
func fact(n) {
    if n <= 1 { return 1 }
    return n * fact(n - 1)
}
assert(fact(10) == 3628800)

func sum(n) {
    if n == 0 { return 0 }
    return n + sum(n - 1)
}
assert(sum(2000) == 2001000)
"#;
    assert_success(src);
}

#[test]
fn member_access_and_assignment() {
    let src = r#"
func settings() {
    var x = 1
    func twice(n) { return n * 2 }
}
assert(settings.x == 1)
settings.x = 5
assert(settings.x == 5)
assert(settings.twice(settings.x) == 10)
"#;
    assert_success(src);
    assert!(matches!(runtime_error("func ns() { }\nns.y = 1"),
                     RuntimeError::UnknownVariable { .. }));
    assert!(matches!(runtime_error("var n = 3\nn.x"),
                     RuntimeError::UnknownReference { .. }));
}

#[test]
fn member_call_resolves_before_arguments() {
    let src = r#"
func ns() {
    print("init")
    var f = func(a) { return a }
}
ns.f(print("arg"))
ns.f(print("again"))
"#;
    assert_eq!(output_of(src), "init\narg\nagain\n");

    let output = OutputBuffer::default();
    assert!(run_with("[1].missing(print(\"never\"))", &mut context(&output)).is_err());
    assert_eq!(output.contents(), "");
}

#[test]
fn list_members_and_primitives() {
    assert_success("var xs = [1, 2, 3]\nassert(xs.head == 1)\nassert(xs.tail.head == 2)");
    assert_success("assert([].isEmpty)\nassert(![1].isEmpty())");
    assert_success("var xs = [10, 20]\nassert(xs[1] == 20)\nassert(\"abc\"[2] == \"c\")");
    assert_success("assert(is_list(pair(1, [])))\nassert(!is_list(pair(1, 2)))");
    assert_success("assert(is_pair((1, 2)))\nassert((1, 2).tail == 2)");
    assert_success("assert([1, [2, 3]] == [1, [2, 3]])\nassert([1] != [1, 2])");
    assert_eq!(output_of("print([1, \"a\", [2.5, []]], (1, 2))"),
               "[1, a, [2.5, []]](1 . 2)\n");
    assert!(matches!(runtime_error("[].head"), RuntimeError::EmptyList { .. }));
    assert!(matches!(runtime_error("[1].size"), RuntimeError::UnknownListMethod { .. }));
    assert!(matches!(runtime_error("[1][3]"),
                     RuntimeError::IndexOutOfBounds { index:  3,
                                                      length: 1,
                                                      .. }));
}

#[test]
fn strings_and_conversions() {
    assert_success("assert(\"a\" + 1 + 2 == \"a12\")");
    assert_success("assert(1 + 2 + \"a\" == \"3a\")");
    assert_success("assert(int(\"42\") + 1 == 43)\nassert(int(3.9) == 3)");
    assert_success("assert(round(2.5) == 2)\nassert(round(3.14159, 2) == 3.14)");
    assert_success("assert($char_code(\"a\") == 97)");
    assert_success("var cs = $string_to_char_list(\"hey\")\nassert(cs.tail.head == \"e\")");
    assert_success("assert(\"abc\" < \"abd\")");
}

#[test]
fn bitwise_operators() {
    assert_success("assert((6 & 3) == 2)\nassert((6 | 3) == 7)\nassert((6 ^ 3) == 5)");
    assert_success("assert(1 << 4 == 16)\nassert(-16 >> 2 == -4)\nassert(~0 == -1)");
}

#[test]
fn input_reads_from_the_host() {
    let output = OutputBuffer::default();
    let host = Host::new(output.clone(), Cursor::new("Ada\n"));
    let mut context = Context::new(host, Config::default());
    let value = run_with("var name = input(\"name? \")\n\"hi \" + name", &mut context).unwrap();
    assert_eq!(value, Value::from("hi Ada"));
    assert_eq!(output.contents(), "name? ");
}

#[test]
fn top_level_return_ends_the_program() {
    assert_eq!(eval("return 5\n6").unwrap(), Value::Integer(5));
    assert_eq!(eval("var x = 2\nx * 21").unwrap(), Value::Integer(42));
}

#[test]
fn escaped_signals_fail() {
    assert_eq!(runtime_error("break"),
               RuntimeError::SignalEscaped { signal: "break",
                                             line:   1, });
    assert!(matches!(runtime_error("func f() { continue }\nf()"),
                     RuntimeError::SignalEscaped { signal: "continue", .. }));
    assert!(matches!(runtime_error("while true { fallthrough }"),
                     RuntimeError::SignalEscaped { signal: "fallthrough", .. }));
}

#[test]
fn runtime_failures() {
    assert!(matches!(runtime_error("func f(a) { return a }\nf(1, 2)"),
                     RuntimeError::FrameArityMismatch { expected: 1,
                                                        found:    2,
                                                        line:     2, }));
    assert!(matches!(runtime_error("var x = 1\nx()"), RuntimeError::NotCallable { .. }));
    assert!(matches!(runtime_error("print == 1 + [1]"), RuntimeError::TypeError { .. }));
    assert!(matches!(runtime_error("1 / 0"), RuntimeError::DivisionByZero { .. }));
    assert!(matches!(runtime_error("assert(1 == 2)"), RuntimeError::AssertionFailed { .. }));
    assert_eq!(runtime_error("\n\nthrow(\"bad \" + 1)").to_string(),
               "Error on line 3: bad 1");
    assert!(matches!(runtime_error("int(1, 2)"),
                     RuntimeError::ArgumentCountMismatch { found: 2, .. }));
}

#[test]
fn call_depth_is_bounded() {
    let output = OutputBuffer::default();
    let mut context = Context::new(Host::buffered(output), Config { max_call_depth: 50 });
    let result = run_with("func f(n) { return f(n + 1) }\nf(0)", &mut context);
    assert!(matches!(result,
                     Err(Error::Runtime(RuntimeError::CallDepthExceeded { limit: 50, .. }))));
    assert_eq!(context.depth(), 0);
}

#[test]
fn deep_nesting_parses_and_runs() {
    let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
    assert_eq!(eval(&parens).unwrap(), Value::Integer(1));

    let chain = vec!["1"; 100_000].join("+");
    assert_eq!(eval(&chain).unwrap(), Value::Integer(100_000));

    let program = parse(&tokenize(&chain).unwrap()).unwrap();
    assert_eq!(program.len(), 1);
    drop(program);
}

#[test]
fn statements_after_a_block_share_its_line() {
    assert_eq!(output_of("if true { print(1) } print(2)"), "1\n2\n");
    assert_eq!(output_of("var x = 0\nwhile x < 3 { x += 1 } print(x)"), "3\n");
    assert_eq!(eval("func f(n) { if n == 0 { return 0 } return 1 + f(n-1) }\nf(4)").unwrap(),
               Value::Integer(4));
    assert!(matches!(eval("var a = 1\na a"), Err(Error::Parse(ParseError::UnexpectedToken { .. }))));
}

#[test]
fn parse_failures() {
    assert_failure("1 +");
    assert_failure("var = 3");
    assert_failure("if x { 1");
    assert_failure("3 = 4");
    assert!(matches!(eval("\"open"), Err(Error::Parse(ParseError::UnterminatedString { .. }))));
    assert!(matches!(eval("var x = while"),
                     Err(Error::Parse(ParseError::UnsupportedExpressionToken { .. }))));
}
