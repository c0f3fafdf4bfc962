//! Precedence climbing.
//!
//! A precedence level turns an operand parser into a parser for a chain of
//! binary operations at one binding strength. Levels are stacked with
//! [`ParserExt::climb`], tightest first:
//!
//! ```ignore
//! let expr = value
//!     .climb(lassoc([("*", reducer(mul)), ("/", reducer(div))]))
//!     .climb(lassoc([("+", reducer(add)), ("-", reducer(sub))]));
//! ```
//!
//! Operator tokens are tried longest first, so `=` and `==` may share a level.

use std::rc::Rc;

use super::combinator::{one_of, Grammar, ParserExt};

/// Combines the left and right operands of one operator.
pub type Reducer<T> = Rc<dyn Fn(T, T) -> T>;

/// Erases a reducer's type so that different functions can share a level.
pub fn reducer<T, F>(reduce: F) -> Reducer<T>
where
    F: Fn(T, T) -> T + 'static,
{
    Rc::new(reduce)
}

/// One level of an operator-precedence tower.
pub trait OperatorLevel<T> {
    fn apply(self, operand: Grammar<T>) -> Grammar<T>;
}

struct Operators<T> {
    tokens: Vec<String>,
    reducers: Vec<Reducer<T>>,
}

impl<T> Operators<T> {
    fn new<I, S>(operators: I) -> Self
    where
        I: IntoIterator<Item = (S, Reducer<T>)>,
        S: Into<String>,
    {
        let mut operators: Vec<(String, Reducer<T>)> = operators
            .into_iter()
            .map(|(token, reduce)| (token.into(), reduce))
            .collect();
        for (token, _) in &operators {
            assert!(!token.is_empty(), "operator tokens must not be empty");
        }
        // Stable, so equal-length tokens keep their given order.
        operators.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        let (tokens, reducers) = operators.into_iter().unzip();
        Self { tokens, reducers }
    }
}

fn prepare<T: Clone + 'static>(operand: Grammar<T>, memoize: bool) -> Grammar<T> {
    if memoize {
        operand.memoized().boxed()
    } else {
        operand
    }
}

/// A left-associative level: `operand (operator operand)*`.
pub struct LeftAssoc<T> {
    operators: Operators<T>,
    memoize: bool,
}

/// A right-associative level: `(operand operator)* operand`.
pub struct RightAssoc<T> {
    operators: Operators<T>,
    memoize: bool,
}

pub fn lassoc<T, I, S>(operators: I) -> LeftAssoc<T>
where
    I: IntoIterator<Item = (S, Reducer<T>)>,
    S: Into<String>,
{
    LeftAssoc {
        operators: Operators::new(operators),
        memoize: true,
    }
}

pub fn rassoc<T, I, S>(operators: I) -> RightAssoc<T>
where
    I: IntoIterator<Item = (S, Reducer<T>)>,
    S: Into<String>,
{
    RightAssoc {
        operators: Operators::new(operators),
        memoize: true,
    }
}

impl<T> LeftAssoc<T> {
    /// Whether the operand is wrapped in a packrat cache (the default).
    pub fn memoize_operand(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.operators.tokens
    }
}

impl<T> RightAssoc<T> {
    /// Whether the operand is wrapped in a packrat cache (the default).
    pub fn memoize_operand(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }

    pub fn tokens(&self) -> &[String] {
        &self.operators.tokens
    }
}

impl<T: Clone + 'static> OperatorLevel<T> for LeftAssoc<T> {
    fn apply(self, operand: Grammar<T>) -> Grammar<T> {
        let operand = prepare(operand, self.memoize);
        let Operators { tokens, reducers } = self.operators;

        let operations: Vec<Grammar<(usize, T)>> = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| {
                token
                    .ignore_then(Rc::clone(&operand))
                    .map(move |rhs| (index, rhs))
                    .boxed()
            })
            .collect();

        Rc::clone(&operand)
            .then(one_of(operations).repeated())
            .map(move |(first, rest)| {
                rest.into_iter()
                    .fold(first, |lhs, (index, rhs)| reducers[index](lhs, rhs))
            })
            .or(operand)
            .boxed()
    }
}

impl<T: Clone + 'static> OperatorLevel<T> for RightAssoc<T> {
    fn apply(self, operand: Grammar<T>) -> Grammar<T> {
        let operand = prepare(operand, self.memoize);
        let Operators { tokens, reducers } = self.operators;

        let operations: Vec<Grammar<(T, usize)>> = tokens
            .into_iter()
            .enumerate()
            .map(|(index, token)| {
                Rc::clone(&operand)
                    .then_ignore(token)
                    .map(move |lhs| (lhs, index))
                    .boxed()
            })
            .collect();

        one_of(operations)
            .repeated()
            .then(Rc::clone(&operand))
            .map(move |(pending, last)| {
                pending
                    .into_iter()
                    .rev()
                    .fold(last, |rhs, (lhs, index)| reducers[index](lhs, rhs))
            })
            .or(operand)
            .boxed()
    }
}
