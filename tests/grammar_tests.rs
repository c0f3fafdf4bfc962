// tests/grammar_tests.rs

use gthunk::ast::{BinOp, Expr, LetBinding, Module};
use gthunk::driver::{parse_complete, parse_module};
use gthunk::grammar;
use gthunk::{ErrorType, Span};

fn parse_ok(text: &str) -> Module {
    parse_module("test.thunk", text).unwrap_or_else(|e| panic!("{text:?} failed: {e}"))
}

fn render(text: &str) -> String {
    parse_ok(text).to_string()
}

// ---
// Modules
// ---

#[test]
fn test_parse_simple_module() {
    let expected = Module::new(vec![LetBinding::new(
        "main",
        Expr::function(
            "time",
            vec![],
            Expr::binary(BinOp::Multiply, Expr::reference("time"), Expr::real(2.0)),
        ),
    )]);
    assert_eq!(parse_ok("let main = (time) -> time * 2"), expected);
}

#[test]
fn test_parse_multiple_declarations() {
    let module = parse_ok("let a = 1\nlet b = a + 2\n");
    assert_eq!(module.declarations.len(), 2);
    assert_eq!(module.to_string(), "(let a 1)\n(let b (+ a 2))");
    assert_eq!(module.binding("b").map(|b| b.name.as_str()), Some("b"));
    assert!(module.binding("c").is_none());
}

#[test]
fn test_surrounding_whitespace_is_ignored() {
    assert_eq!(render("\n\t let   x=0.5  \n\n"), "(let x 0.5)");
}

#[test]
fn test_function_with_local_bindings() {
    assert_eq!(
        render("let f = (x) -> let y = x * 2 y + 1"),
        "(let f (fn x ((let y (* x 2))) (+ y 1)))"
    );
}

// ---
// Expressions
// ---

#[test]
fn test_calls_bind_tighter_than_operators() {
    assert_eq!(
        render("let main = sin(time * 440) * 0.5"),
        "(let main (* (sin (* time 440)) 0.5))"
    );
}

#[test]
fn test_chained_calls_apply_left_to_right() {
    assert_eq!(render("let y = mix(a)(b)"), "(let y ((mix a) b))");
}

#[test]
fn test_deeply_nested_calls_parse() {
    let depth = 200;
    let text = format!("let x = {}1{}", "f(".repeat(depth), ")".repeat(depth));
    let module = parse_ok(&text);

    let mut expr = &module.declarations[0].value;
    let mut calls = 0;
    while let Expr::Call { callee, argument } = expr {
        assert_eq!(**callee, Expr::reference("f"));
        expr = argument.as_ref();
        calls += 1;
    }
    assert_eq!(calls, depth);
    assert_eq!(*expr, Expr::real(1.0));
}

#[test]
fn test_operators_follow_precedence_and_associativity() {
    assert_eq!(
        render("let x = 1 - 2 - 3 * 4 / 2"),
        "(let x (- (- 1 2) (/ (* 3 4) 2)))"
    );
}

#[test]
fn test_groups_override_precedence() {
    assert_eq!(render("let x = (1 + 2) * 3"), "(let x (* (+ 1 2) 3))");
}

#[test]
fn test_expression_grammar_stands_alone() {
    let expr = parse_complete("expr", "(t) -> t", &grammar::expression()).unwrap();
    assert_eq!(expr, Expr::function("t", vec![], Expr::reference("t")));
}

// ---
// Diagnostics
// ---

#[test]
fn test_missing_name_is_a_syntax_error() {
    let err = parse_module("bad.thunk", "let = 5").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Syntax);
    assert_eq!(err.message(), "Expected a name after 'let'");
    assert_eq!(err.span(), Some(Span::new(4, 5)));
}

#[test]
fn test_missing_equals_is_a_syntax_error() {
    let err = parse_module("bad.thunk", "let x 5").unwrap_err();
    assert_eq!(err.message(), "Expected '=' after the binding name");
    assert_eq!(err.span(), Some(Span::new(6, 7)));
}

#[test]
fn test_missing_value_is_a_syntax_error() {
    let err = parse_module("bad.thunk", "let x = ").unwrap_err();
    assert_eq!(err.message(), "Expected an expression after '='");
}

#[test]
fn test_unclosed_group_is_reported_at_end_of_input() {
    let text = "let x = (1 + 2";
    let err = parse_module("bad.thunk", text).unwrap_err();
    assert_eq!(err.message(), "Expected ')' to close the group");
    assert_eq!(err.span(), Some(Span::new(text.len(), text.len())));
    assert_eq!(err.to_string(), "Syntax error: Expected ')' to close the group");
}

#[test]
fn test_missing_function_body_is_a_syntax_error() {
    let err = parse_module("bad.thunk", "let f = (x) -> ").unwrap_err();
    assert_eq!(err.message(), "Expected a function body after '->'");
}

#[test]
fn test_unrecognised_input_does_not_match() {
    let err = parse_module("bad.thunk", "main = 1").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::NoMatch);
    assert_eq!(err.message(), "input does not match the grammar");
}

#[test]
fn test_empty_input_has_no_declarations() {
    let err = parse_module("empty.thunk", "").unwrap_err();
    assert_eq!(err.error_type(), ErrorType::NoMatch);
    assert!(err.message().contains("no declarations"));
}

#[test]
fn test_trailing_input_is_incomplete() {
    let text = "let x = 1\n)";
    let err = parse_module("bad.thunk", text).unwrap_err();
    assert_eq!(err.error_type(), ErrorType::Incomplete);
    assert_eq!(err.span(), Some(Span::new(10, 11)));
}

// ---
// Serialization
// ---

#[test]
fn test_module_serializes_to_json() {
    let module = parse_ok("let main = (time) -> time * 2");
    let json = serde_json::to_value(&module).unwrap();
    let value = &json["declarations"][0]["value"]["FnDef"];
    assert_eq!(json["declarations"][0]["name"], "main");
    assert_eq!(value["param"], "time");
    assert_eq!(value["body"]["BinaryOp"]["op"], "Multiply");
    assert_eq!(value["body"]["BinaryOp"]["rhs"]["Real"], 2.0);
}
