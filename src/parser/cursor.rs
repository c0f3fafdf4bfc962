//! Position-tracked input.
//!
//! A [`Source`] owns the text being parsed; a [`Cursor`] is an immutable
//! `(source identity, byte offset)` pair into it. Two cursors are equal only
//! when they point into the *same* source buffer at the same offset, which is
//! what makes cursors usable as packrat cache keys across unrelated parses.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Immutable backing text for one parse.
#[derive(Debug, Clone)]
pub struct Source {
    text: Rc<str>,
}

impl Source {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            text: Rc::from(text.as_ref()),
        }
    }

    /// Cursor at the beginning of the text.
    pub fn start(&self) -> Cursor {
        Cursor {
            text: Rc::clone(&self.text),
            offset: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// An immutable position in a [`Source`].
#[derive(Clone)]
pub struct Cursor {
    text: Rc<str>,
    offset: usize,
}

impl Cursor {
    /// Byte offset from the start of the source.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The unconsumed input from this position to the end.
    pub fn rest(&self) -> &str {
        &self.text[self.offset..]
    }

    pub fn is_at_end(&self) -> bool {
        self.offset == self.text.len()
    }

    pub fn starts_with(&self, literal: &str) -> bool {
        self.rest().starts_with(literal)
    }

    /// Returns a new cursor `bytes` further into the source.
    ///
    /// # Panics
    ///
    /// Panics if the new position is past the end of input or not on a
    /// character boundary. Callers must only advance over text they matched.
    pub fn advance(&self, bytes: usize) -> Cursor {
        let offset = self.offset + bytes;
        assert!(
            self.text.is_char_boundary(offset),
            "cursor advanced to invalid offset {} (input length {})",
            offset,
            self.text.len()
        );
        Cursor {
            text: Rc::clone(&self.text),
            offset,
        }
    }

    fn source_id(&self) -> *const u8 {
        Rc::as_ptr(&self.text) as *const u8
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.text, &other.text) && self.offset == other.offset
    }
}

impl Eq for Cursor {}

impl Hash for Cursor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source_id().hash(state);
        self.offset.hash(state);
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("rest", &self.rest())
            .finish()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn advancing_returns_a_new_cursor() {
        let source = Source::new("let x");
        let start = source.start();
        let next = start.advance(4);

        assert_eq!(start.offset(), 0);
        assert_eq!(start.rest(), "let x");
        assert_eq!(next.offset(), 4);
        assert_eq!(next.rest(), "x");
        assert!(next.advance(1).is_at_end());
    }

    #[test]
    fn equality_requires_the_same_buffer() {
        let a = Source::new("same text");
        let b = Source::new("same text");

        assert_eq!(a.start(), a.start());
        assert_eq!(a.start().advance(2), a.start().advance(2));
        assert_ne!(a.start(), b.start());
        assert_ne!(a.start(), a.start().advance(1));

        let keys: HashSet<Cursor> = [a.start(), a.start(), b.start()].into_iter().collect();
        assert_eq!(keys.len(), 2);
    }

    #[test]
    fn starts_with_checks_the_remaining_input() {
        let cursor = Source::new("->x").start();
        assert!(cursor.starts_with("->"));
        assert!(!cursor.advance(1).starts_with("->"));
        assert!(cursor.advance(3).starts_with(""));
    }

    #[test]
    #[should_panic(expected = "invalid offset")]
    fn advancing_past_the_end_panics() {
        Source::new("ab").start().advance(3);
    }
}
