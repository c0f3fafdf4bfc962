//! The combinator algebra.
//!
//! Every combinator implements [`Parser`]. Composition goes through the
//! [`ParserExt`] methods, which are available on any parser, including string
//! literals and [`Grammar`] handles:
//!
//! ```ignore
//! let call = ident.then_ignore("(").then(expr).then_ignore(")".required("Expected ')'"));
//! ```

use std::rc::Rc;

use log::debug;

use super::class::CharClass;
use super::cursor::{Cursor, Source};
use super::error::ParseError;
use super::memo::Memo;
use super::precedence::OperatorLevel;

// ============================================================================
// CORE TYPES
// ============================================================================

/// A successful match: the produced value and the cursor after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    pub value: T,
    pub next: Cursor,
}

impl<T> Match<T> {
    pub fn new(value: T, next: Cursor) -> Self {
        Self { value, next }
    }

    /// The input left unconsumed by this match.
    pub fn remaining(&self) -> &str {
        self.next.rest()
    }

    pub fn map<U>(self, transform: impl FnOnce(T) -> U) -> Match<U> {
        Match::new(transform(self.value), self.next)
    }
}

/// `Ok(Some(_))` is a match, `Ok(None)` a recoverable no-match, and `Err(_)`
/// a hard failure that aborts the parse.
pub type PResult<T> = Result<Option<Match<T>>, ParseError>;

/// A composable parsing unit.
pub trait Parser {
    type Output;

    /// Attempts a match at `input`. Must not depend on anything but `input`.
    fn parse(&self, input: &Cursor) -> PResult<Self::Output>;
}

/// A shared, type-erased parser.
pub type Grammar<T> = Rc<dyn Parser<Output = T>>;

impl<P: Parser + ?Sized> Parser for Rc<P> {
    type Output = P::Output;

    fn parse(&self, input: &Cursor) -> PResult<P::Output> {
        (**self).parse(input)
    }
}

/// Runs `grammar` from the start of `text`.
pub fn parse<P: Parser + ?Sized>(text: &str, grammar: &P) -> PResult<P::Output> {
    grammar.parse(&Source::new(text).start())
}

// ============================================================================
// PRIMITIVES
// ============================================================================

fn match_literal(literal: &str, input: &Cursor) -> PResult<String> {
    if !input.starts_with(literal) {
        return Ok(None);
    }
    Ok(Some(Match::new(
        literal.to_string(),
        input.advance(literal.len()),
    )))
}

/// String literals match themselves exactly.
impl Parser for &str {
    type Output = String;

    fn parse(&self, input: &Cursor) -> PResult<String> {
        match_literal(self, input)
    }
}

impl Parser for String {
    type Output = String;

    fn parse(&self, input: &Cursor) -> PResult<String> {
        match_literal(self, input)
    }
}

/// Always matches, consuming nothing.
#[derive(Debug, Clone)]
pub struct Accept<T> {
    value: T,
}

pub fn accept<T: Clone>(value: T) -> Accept<T> {
    Accept { value }
}

impl<T: Clone> Parser for Accept<T> {
    type Output = T;

    fn parse(&self, input: &Cursor) -> PResult<T> {
        Ok(Some(Match::new(self.value.clone(), input.clone())))
    }
}

// ============================================================================
// TRANSFORMS
// ============================================================================

#[derive(Clone)]
pub struct Map<P, F> {
    parser: P,
    transform: F,
}

impl<P, F, T> Parser for Map<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> T,
{
    type Output = T;

    fn parse(&self, input: &Cursor) -> PResult<T> {
        Ok(self.parser.parse(input)?.map(|m| m.map(&self.transform)))
    }
}

/// A map whose transform may reject the value. Rejection is a hard failure
/// reported at the start of the match.
#[derive(Clone)]
pub struct TryMap<P, F> {
    parser: P,
    transform: F,
}

impl<P, F, T> Parser for TryMap<P, F>
where
    P: Parser,
    F: Fn(P::Output) -> Result<T, String>,
{
    type Output = T;

    fn parse(&self, input: &Cursor) -> PResult<T> {
        let Some(matched) = self.parser.parse(input)? else {
            return Ok(None);
        };
        match (self.transform)(matched.value) {
            Ok(value) => Ok(Some(Match::new(value, matched.next))),
            Err(message) => Err(ParseError::at(message, input)),
        }
    }
}

// ============================================================================
// SEQUENCES
// ============================================================================

/// Both operands in order, keeping both values.
#[derive(Clone)]
pub struct Seq<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Parser for Seq<A, B> {
    type Output = (A::Output, B::Output);

    fn parse(&self, input: &Cursor) -> PResult<Self::Output> {
        let Some(first) = self.first.parse(input)? else {
            return Ok(None);
        };
        let Some(second) = self.second.parse(&first.next)? else {
            return Ok(None);
        };
        Ok(Some(Match::new((first.value, second.value), second.next)))
    }
}

/// Both operands in order, keeping the left value.
#[derive(Clone)]
pub struct Left<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Parser for Left<A, B> {
    type Output = A::Output;

    fn parse(&self, input: &Cursor) -> PResult<A::Output> {
        let Some(first) = self.first.parse(input)? else {
            return Ok(None);
        };
        let Some(second) = self.second.parse(&first.next)? else {
            return Ok(None);
        };
        Ok(Some(Match::new(first.value, second.next)))
    }
}

/// Both operands in order, keeping the right value.
#[derive(Clone)]
pub struct Right<A, B> {
    first: A,
    second: B,
}

impl<A: Parser, B: Parser> Parser for Right<A, B> {
    type Output = B::Output;

    fn parse(&self, input: &Cursor) -> PResult<B::Output> {
        let Some(first) = self.first.parse(input)? else {
            return Ok(None);
        };
        self.second.parse(&first.next)
    }
}

// ============================================================================
// CHOICE AND REPETITION
// ============================================================================

/// Ordered choice: the second operand is tried at the original cursor only if
/// the first does not match. Hard failures are not caught.
#[derive(Clone)]
pub struct Alt<A, B> {
    first: A,
    second: B,
}

impl<A, B> Parser for Alt<A, B>
where
    A: Parser,
    B: Parser<Output = A::Output>,
{
    type Output = A::Output;

    fn parse(&self, input: &Cursor) -> PResult<A::Output> {
        if let Some(matched) = self.first.parse(input)? {
            return Ok(Some(matched));
        }
        self.second.parse(input)
    }
}

/// Ordered choice over any number of parsers of one type. Each option is
/// memoized.
pub struct OneOf<P: Parser> {
    options: Vec<Memo<P>>,
}

pub fn one_of<P>(options: Vec<P>) -> OneOf<P>
where
    P: Parser,
    P::Output: Clone,
{
    OneOf {
        options: options.into_iter().map(Memo::new).collect(),
    }
}

impl<P: Parser> Clone for OneOf<P> {
    fn clone(&self) -> Self {
        Self {
            options: self.options.clone(),
        }
    }
}

impl<P> Parser for OneOf<P>
where
    P: Parser,
    P::Output: Clone,
{
    type Output = P::Output;

    fn parse(&self, input: &Cursor) -> PResult<P::Output> {
        for option in &self.options {
            if let Some(matched) = option.parse(input)? {
                return Ok(Some(matched));
            }
        }
        Ok(None)
    }
}

/// One or more matches of the operand, collected in order.
///
/// The operand must consume input whenever it matches; one that matches
/// empty input would repeat forever. Debug builds assert this.
#[derive(Clone)]
pub struct Repeat<P> {
    parser: P,
}

impl<P: Parser> Parser for Repeat<P> {
    type Output = Vec<P::Output>;

    fn parse(&self, input: &Cursor) -> PResult<Self::Output> {
        let mut values = Vec::new();
        let mut current = input.clone();

        while let Some(step) = self.parser.parse(&current)? {
            let stalled = step.next == current;
            debug_assert!(
                !stalled,
                "repeated parser matched empty input at offset {}",
                current.offset()
            );
            values.push(step.value);
            current = step.next;
            if stalled {
                break;
            }
        }

        if values.is_empty() {
            Ok(None)
        } else {
            Ok(Some(Match::new(values, current)))
        }
    }
}

// ============================================================================
// COMMITMENT AND TRIVIA
// ============================================================================

/// Promotes a no-match into a hard failure carrying `message`.
#[derive(Clone)]
pub struct Required<P> {
    parser: P,
    message: String,
}

impl<P: Parser> Parser for Required<P> {
    type Output = P::Output;

    fn parse(&self, input: &Cursor) -> PResult<P::Output> {
        match self.parser.parse(input)? {
            Some(matched) => Ok(Some(matched)),
            None => {
                debug!(
                    "required match failed at offset {}: {}",
                    input.offset(),
                    self.message
                );
                Err(ParseError::at(self.message.clone(), input))
            }
        }
    }
}

/// Skips an optional run of `class` on both sides of the operand.
#[derive(Clone)]
pub struct Padded<P> {
    parser: P,
    class: CharClass,
}

impl<P> Padded<P> {
    fn skip(&self, input: &Cursor) -> Result<Cursor, ParseError> {
        Ok(self
            .class
            .parse(input)?
            .map_or_else(|| input.clone(), |trivia| trivia.next))
    }
}

impl<P: Parser> Parser for Padded<P> {
    type Output = P::Output;

    fn parse(&self, input: &Cursor) -> PResult<P::Output> {
        let start = self.skip(input)?;
        let Some(matched) = self.parser.parse(&start)? else {
            return Ok(None);
        };
        let next = self.skip(&matched.next)?;
        Ok(Some(Match::new(matched.value, next)))
    }
}

// ============================================================================
// CHAINING
// ============================================================================

/// Composition methods available on every parser.
pub trait ParserExt: Parser + Sized {
    fn map<T, F>(self, transform: F) -> Map<Self, F>
    where
        F: Fn(Self::Output) -> T,
    {
        Map {
            parser: self,
            transform,
        }
    }

    fn try_map<T, F>(self, transform: F) -> TryMap<Self, F>
    where
        F: Fn(Self::Output) -> Result<T, String>,
    {
        TryMap {
            parser: self,
            transform,
        }
    }

    fn then<B: Parser>(self, next: B) -> Seq<Self, B> {
        Seq {
            first: self,
            second: next,
        }
    }

    fn then_ignore<B: Parser>(self, next: B) -> Left<Self, B> {
        Left {
            first: self,
            second: next,
        }
    }

    fn ignore_then<B: Parser>(self, next: B) -> Right<Self, B> {
        Right {
            first: self,
            second: next,
        }
    }

    fn or<B>(self, other: B) -> Alt<Self, B>
    where
        B: Parser<Output = Self::Output>,
    {
        Alt {
            first: self,
            second: other,
        }
    }

    fn repeated(self) -> Repeat<Self> {
        Repeat { parser: self }
    }

    fn required(self, message: impl Into<String>) -> Required<Self> {
        Required {
            parser: self,
            message: message.into(),
        }
    }

    fn padded_by(self, class: CharClass) -> Padded<Self> {
        Padded {
            parser: self,
            class,
        }
    }

    fn memoized(self) -> Memo<Self>
    where
        Self::Output: Clone,
    {
        Memo::new(self)
    }

    fn boxed(self) -> Grammar<Self::Output>
    where
        Self: 'static,
    {
        Rc::new(self)
    }

    /// Applies one precedence level with `self` as its operand.
    fn climb<L>(self, level: L) -> Grammar<Self::Output>
    where
        Self: 'static,
        L: OperatorLevel<Self::Output>,
    {
        level.apply(self.boxed())
    }
}

impl<P: Parser> ParserExt for P {}
