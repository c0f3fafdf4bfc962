//! The gthunk language grammar.
//!
//! ```text
//! module      := binding+
//! binding     := "let " name "=" expression
//! expression  := sum
//! sum         := product (("+" | "-") product)*
//! product     := unary (("*" | "/") unary)*
//! unary       := literal ("(" expression ")")*
//! literal     := number | function | group | name
//! function    := "(" name ")" "->" binding* expression
//! group       := "(" expression ")"
//! ```
//!
//! Whitespace is allowed around names, literals, and bindings.

use crate::ast::{binary, BinOp, Expr, LetBinding, Module};
use crate::parser::{
    accept, alpha, digits, lassoc, recursive, whitespace, Grammar, Parser, ParserExt, Recursive,
};

/// The complete module grammar.
pub fn module() -> Grammar<Module> {
    let declaration = binding(expression()).padded_by(whitespace());
    declaration.repeated().map(Module::new).boxed()
}

/// The expression grammar on its own.
pub fn expression() -> Grammar<Expr> {
    recursive(|expression: Recursive<Expr>| {
        let binding = binding(expression.clone()).memoized();

        let number = digits()
            .then(".".ignore_then(digits()).or(accept(String::new())))
            .try_map(|(whole, fraction)| real(&whole, &fraction));
        let reference = alpha().map(Expr::Ref);

        let function = "("
            .ignore_then(name())
            .then_ignore(")")
            .then_ignore("->".padded_by(whitespace()))
            .then(binding.repeated().or(accept(Vec::new())))
            .then(
                expression
                    .clone()
                    .required("Expected a function body after '->'"),
            )
            .map(|((param, bindings), body)| Expr::function(param, bindings, body));

        let group = "(".ignore_then(expression.clone()).then_ignore(
            ")".padded_by(whitespace())
                .required("Expected ')' to close the group"),
        );

        let literal = number
            .or(function)
            .or(group)
            .or(reference)
            .padded_by(whitespace())
            .memoized();

        let argument = "(".padded_by(whitespace()).ignore_then(expression).then_ignore(
            ")".padded_by(whitespace())
                .required("Expected ')' after the call argument"),
        );

        let unary = literal
            .then(argument.repeated().or(accept(Vec::new())))
            .map(|(callee, arguments)| arguments.into_iter().fold(callee, Expr::call));

        unary
            .climb(lassoc([
                ("*", binary(BinOp::Multiply)),
                ("/", binary(BinOp::Divide)),
            ]))
            .climb(lassoc([
                ("+", binary(BinOp::Add)),
                ("-", binary(BinOp::Subtract)),
            ]))
    })
    .boxed()
}

/// `let name = value`. Everything after the keyword is required.
fn binding<P>(value: P) -> Grammar<LetBinding>
where
    P: Parser<Output = Expr> + 'static,
{
    "let "
        .ignore_then(name().required("Expected a name after 'let'"))
        .then_ignore("=".required("Expected '=' after the binding name"))
        .then(value.required("Expected an expression after '='"))
        .map(|(name, value)| LetBinding::new(name, value))
        .boxed()
}

fn name() -> impl Parser<Output = String> + Clone {
    alpha().padded_by(whitespace())
}

fn real(whole: &str, fraction: &str) -> Result<Expr, String> {
    let text = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };
    str::parse::<f64>(&text)
        .map(Expr::Real)
        .map_err(|_| format!("Invalid number literal '{text}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn real_joins_whole_and_fraction() {
        assert_eq!(real("12", ""), Ok(Expr::Real(12.0)));
        assert_eq!(real("0", "25"), Ok(Expr::Real(0.25)));
    }

    #[test]
    fn number_without_fraction_leaves_trailing_dot() {
        let matched = parse("2.", &expression()).unwrap().unwrap();
        assert_eq!(matched.value, Expr::Real(2.0));
        assert_eq!(matched.remaining(), ".");
    }

    #[test]
    fn applications_chain_left() {
        let matched = parse("f(a)(b)", &expression()).unwrap().unwrap();
        assert_eq!(
            matched.value,
            Expr::call(
                Expr::call(Expr::reference("f"), Expr::reference("a")),
                Expr::reference("b"),
            )
        );
        assert_eq!(matched.remaining(), "");
    }
}
