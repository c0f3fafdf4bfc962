//! Packrat parser-combinator engine.
//!
//! Grammars are built by composing small [`Parser`] values. Every parser
//! answers one question: does it match at a given [`Cursor`]? The answer is a
//! [`PResult`], which keeps recoverable no-match (`Ok(None)`) apart from hard
//! failure (`Err(ParseError)`), so ordered alternatives backtrack only on the
//! former.
//!
//! ```ignore
//! use gthunk::parser::*;
//!
//! let number = digits().map(|s: String| s.len());
//! let matched = parse("123z", &number)?.unwrap();
//! assert_eq!(matched.value, 3);
//! assert_eq!(matched.remaining(), "z");
//! ```

pub mod class;
pub mod combinator;
pub mod cursor;
pub mod error;
pub mod memo;
pub mod precedence;
pub mod recursive;

pub use class::{alpha, chars, digits, whitespace, CharClass};
pub use combinator::{
    accept, one_of, parse, Accept, Alt, Grammar, Left, Map, Match, OneOf, PResult, Padded, Parser,
    ParserExt, Repeat, Required, Right, Seq, TryMap,
};
pub use cursor::{Cursor, Source};
pub use error::ParseError;
pub use memo::Memo;
pub use precedence::{lassoc, rassoc, reducer, LeftAssoc, OperatorLevel, Reducer, RightAssoc};
pub use recursive::{recursive, Recursive};
