//! Character classes.

use std::collections::HashSet;

use super::combinator::{Match, PResult, Parser};
use super::cursor::Cursor;

/// An immutable set of characters.
///
/// As a parser, a class matches the longest run of member characters at the
/// cursor. A run of length zero is a no-match, including at end of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    members: HashSet<char>,
}

impl CharClass {
    pub fn new(members: &str) -> Self {
        Self {
            members: members.chars().collect(),
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.members.contains(&c)
    }

    /// Length in bytes of the run of member characters at the start of `text`.
    fn run_length(&self, text: &str) -> usize {
        text.char_indices()
            .find(|&(_, c)| !self.contains(c))
            .map_or(text.len(), |(index, _)| index)
    }
}

impl Parser for CharClass {
    type Output = String;

    fn parse(&self, input: &Cursor) -> PResult<String> {
        let rest = input.rest();
        let len = self.run_length(rest);
        if len == 0 {
            return Ok(None);
        }
        Ok(Some(Match::new(rest[..len].to_string(), input.advance(len))))
    }
}

pub fn chars(members: &str) -> CharClass {
    CharClass::new(members)
}

pub fn digits() -> CharClass {
    CharClass::new("0123456789")
}

pub fn alpha() -> CharClass {
    CharClass::new("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ")
}

pub fn whitespace() -> CharClass {
    CharClass::new(" \n\r\t")
}
