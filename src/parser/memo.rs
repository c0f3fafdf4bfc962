//! Packrat memoization.
//!
//! [`Memo`] wraps one parser with its own cache from cursor to result. Hard
//! failures are never cached; they propagate immediately. Clones of a `Memo`
//! share the parser and the cache, so a memoized operand can appear in
//! several places of a grammar and still be evaluated at most once per
//! position.
//!
//! The cache is keyed by cursor, and cursors carry the identity of their
//! source buffer, so a grammar can be reused across inputs without stale
//! hits. Entries are never evicted while the wrapper lives.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::trace;

use super::combinator::{Match, PResult, Parser};
use super::cursor::Cursor;

type Cache<T> = HashMap<Cursor, Option<Match<T>>>;

pub struct Memo<P: Parser> {
    parser: Rc<P>,
    cache: Rc<RefCell<Cache<P::Output>>>,
}

impl<P: Parser> Memo<P> {
    pub fn new(parser: P) -> Self {
        Self {
            parser: Rc::new(parser),
            cache: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Number of positions with a recorded result.
    pub fn cached_positions(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl<P: Parser> Clone for Memo<P> {
    fn clone(&self) -> Self {
        Self {
            parser: Rc::clone(&self.parser),
            cache: Rc::clone(&self.cache),
        }
    }
}

impl<P> Parser for Memo<P>
where
    P: Parser,
    P::Output: Clone,
{
    type Output = P::Output;

    fn parse(&self, input: &Cursor) -> PResult<P::Output> {
        if let Some(hit) = self.cache.borrow().get(input) {
            trace!("packrat hit at offset {}", input.offset());
            return Ok(hit.clone());
        }

        // The borrow is released before parsing: the inner parser may re-enter
        // this cache at other positions.
        let result = self.parser.parse(input)?;
        trace!("packrat miss at offset {}", input.offset());
        self.cache
            .borrow_mut()
            .insert(input.clone(), result.clone());
        Ok(result)
    }
}
