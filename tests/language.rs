use bool_script::Interpreter;
use bool_script::lex::LexicalError;
use bool_script::parse::{NestingTooDeep, SyntaxError};

fn run(source: &str) -> Result<String, miette::Error> {
    let mut output = Vec::new();
    Interpreter::new(Some("test.bool"), source).run(&mut output)?;
    Ok(String::from_utf8(output).expect("utf-8 output"))
}

fn assert_prints(source: &str, expected: &str) {
    match run(source) {
        Ok(output) => assert_eq!(output, expected, "program:\n{source}"),
        Err(e) => panic!("program failed:\n{source}\nError: {e:?}"),
    }
}

fn symbols(source: &str) -> Vec<(String, bool)> {
    let mut interpreter = Interpreter::new(None, source);
    interpreter
        .run(Vec::new())
        .unwrap_or_else(|e| panic!("program failed:\n{source}\nError: {e:?}"));
    let mut symbols: Vec<(String, bool)> = interpreter
        .environment()
        .iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect();
    symbols.sort();
    symbols
}

#[test]
fn last_assignment_wins() {
    assert_eq!(
        symbols("a = t\nb = f\na = not a\nc = a or b\nb = 0"),
        vec![
            ("a".to_string(), false),
            ("b".to_string(), true),
            ("c".to_string(), false)
        ]
    );
}

#[test]
fn reads_assigned_values() {
    assert_eq!(symbols("x = true and false"), vec![("x".to_string(), false)]);
    assert_eq!(
        symbols("x = (true or false) and not false"),
        vec![("x".to_string(), true)]
    );
}

#[test]
fn numeral_literals_are_inverted() {
    assert_prints("print 1 and 0", "false\n");
    assert_prints("print 0", "true\n");
    assert_prints("print 1", "false\n");
    assert_prints("print not 1", "true\n");
}

#[test]
fn reassignment_then_print() {
    assert_prints("x = true\nx = false\nprint x", "false\n");
}

#[test]
fn or_chains_are_associative() {
    for (a, b, c) in [
        ("t", "f", "f"),
        ("f", "f", "t"),
        ("f", "f", "f"),
        ("f", "t", "f"),
    ] {
        let flat = run(&format!("print {a} or {b} or {c}")).expect("runs");
        let grouped = run(&format!("print ({a} or {b}) or {c}")).expect("runs");
        let right = run(&format!("print {a} or ({b} or {c})")).expect("runs");
        assert_eq!(flat, grouped);
        assert_eq!(flat, right);
    }
    assert_prints("print true or false or false", "true\n");
    assert_prints("print (true or false) or false", "true\n");
}

#[test]
fn and_chains_are_associative() {
    assert_prints("print t and t and f", "false\n");
    assert_prints("print (t and t) and t", "true\n");
    assert_prints("print t and (t and t)", "true\n");
}

#[test]
fn precedence_and_parentheses() {
    assert_prints("print t or f and f", "true\n");
    assert_prints("print (t or f) and f", "false\n");
    assert_prints("print not f and f", "false\n");
    assert_prints("print not (f and f)", "true\n");
}

#[test]
fn prints_follow_source_order() {
    assert_prints(
        "a = T\nprint a\nprint not a\nb = a and False\nprint b or TRUE\nprint b",
        "true\nfalse\ntrue\nfalse\n",
    );
}

#[test]
fn free_form_layout() {
    assert_prints("x=t print\n\tx   y=(x)print(not y)", "true\nfalse\n");
}

#[test]
fn empty_input_does_nothing() {
    assert_prints("", "");
    assert_prints(" \n \t\n", "");
}

#[test]
fn unmatched_parenthesis_expects_close() {
    let err = run("print (true and false").expect_err("unbalanced");
    let err = err.downcast_ref::<SyntaxError>().expect("syntax error");
    assert_eq!(err.expected, "`)`");
    assert_eq!(err.context, "factor");
    assert_eq!((err.line(), err.column()), (1, 22));
}

#[test]
fn unrecognized_character_position() {
    let err = run("x = t\nprint x\n  y = @").expect_err("bad character");
    let err = err.downcast_ref::<LexicalError>().expect("lexical error");
    assert_eq!(err.token, '@');
    assert_eq!((err.line(), err.column()), (3, 7));
}

#[test]
fn no_statement_runs_after_an_error() {
    let mut output = Vec::new();
    let result = Interpreter::new(None, "print t\nprint f )\nprint t").run(&mut output);
    assert!(result.is_err());
    assert_eq!(String::from_utf8(output).expect("utf-8 output"), "true\nfalse\n");
}

#[test]
fn lexical_error_right_after_statement_stops_it() {
    let mut output = Vec::new();
    let result = Interpreter::new(None, "print t\nprint f%").run(&mut output);
    assert!(result.is_err());
    assert_eq!(String::from_utf8(output).expect("utf-8 output"), "true\n");
}

#[test]
fn deep_nesting_is_reported_not_fatal() {
    let source = format!("print {}t{}", "(".repeat(10_000), ")".repeat(10_000));
    let err = run(&source).expect_err("too deep");
    assert!(err.downcast_ref::<NestingTooDeep>().is_some());
}
