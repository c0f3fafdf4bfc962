// tests/memo_proptest.rs
//
// Packrat caching must be invisible: the same grammar with and without
// memoized operands produces the same outcome on every input.

use gthunk::driver::parse_module;
use gthunk::parser::{
    digits, lassoc, parse, recursive, reducer, Grammar, ParserExt, Recursive, Reducer,
};
use proptest::prelude::*;

fn join(op: &'static str) -> Reducer<String> {
    reducer(move |lhs: String, rhs: String| format!("[{lhs}{op}{rhs}]"))
}

fn arithmetic(memoize: bool) -> Grammar<String> {
    let expr: Recursive<String> = recursive(move |expr: Recursive<String>| {
        let group = "("
            .ignore_then(expr)
            .then_ignore(")")
            .map(|inner: String| format!("({inner})"));
        digits()
            .or(group)
            .boxed()
            .climb(lassoc([("*", join("*")), ("/", join("/"))]).memoize_operand(memoize))
            .climb(lassoc([("+", join("+")), ("-", join("-"))]).memoize_operand(memoize))
    });
    expr.boxed()
}

type Outcome = Result<Option<(String, usize)>, String>;

fn outcome(grammar: &Grammar<String>, input: &str) -> Outcome {
    parse(input, grammar)
        .map(|m| m.map(|m| (m.value, m.next.offset())))
        .map_err(|e| e.message)
}

proptest! {
    #[test]
    fn memoized_operands_do_not_change_results(input in "[0-9()+*/ -]{0,24}") {
        let plain = outcome(&arithmetic(false), &input);
        let cached = outcome(&arithmetic(true), &input);
        prop_assert_eq!(plain, cached);
    }

    #[test]
    fn memoizing_the_whole_grammar_does_not_change_results(input in "[0-9]{1,2}([+*-][0-9]{1,2}){0,6}") {
        let plain = outcome(&arithmetic(true), &input);
        let shared = arithmetic(true).memoized().boxed();
        let first = outcome(&shared, &input);
        let second = outcome(&shared, &input);
        prop_assert_eq!(&plain, &first);
        prop_assert_eq!(&first, &second);
    }

    #[test]
    fn well_formed_arithmetic_is_consumed_entirely(input in "[0-9]{1,2}([+*-][0-9]{1,2}){0,6}") {
        let parsed = outcome(&arithmetic(true), &input);
        prop_assert_eq!(parsed.map(|m| m.map(|(_, end)| end)), Ok(Some(input.len())));
    }

    #[test]
    fn module_parsing_never_panics(input in "\\PC{0,40}") {
        let _ = parse_module("fuzz.thunk", &input);
    }
}
