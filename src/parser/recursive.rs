//! Self-referential grammar rules.
//!
//! [`recursive`] takes a function from "the rule being defined" to the rule's
//! definition. The function is not called until the first parse attempt; its
//! result is stored in a construct-once cell and reused afterwards.
//!
//! Each rule also remembers the cursor it is currently entered at. Entering
//! the rule again at that same cursor before the first entry returns means no
//! input was consumed in between, i.e. the grammar is left-recursive; this is
//! reported as a hard failure instead of recursing until the stack overflows.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, trace};
use once_cell::unsync::OnceCell;

use super::combinator::{Grammar, PResult, Parser, ParserExt};
use super::cursor::Cursor;
use super::error::ParseError;

pub const LEFT_RECURSION_MESSAGE: &str = "Left-recursive grammar detected";

type Define<T> = Box<dyn FnOnce(Recursive<T>) -> Grammar<T>>;

struct Rule<T> {
    define: RefCell<Option<Define<T>>>,
    definition: OnceCell<Grammar<T>>,
    entered_at: RefCell<Option<Cursor>>,
}

impl<T: 'static> Rule<T> {
    fn definition(self: &Rc<Self>, input: &Cursor) -> Result<Grammar<T>, ParseError> {
        if let Some(definition) = self.definition.get() {
            return Ok(Rc::clone(definition));
        }

        let define = self.define.borrow_mut().take().ok_or_else(|| {
            ParseError::at(
                "Recursive grammar was parsed while it was still being constructed",
                input,
            )
        })?;
        trace!("constructing recursive grammar");
        let definition = define(Recursive {
            rule: Handle::Unowned(Rc::downgrade(self)),
        });
        Ok(Rc::clone(self.definition.get_or_init(|| definition)))
    }
}

/// Marks a rule as entered at one cursor for as long as it is alive, and
/// restores the previous marker on every exit path.
struct Entry<'a> {
    marker: &'a RefCell<Option<Cursor>>,
    previous: Option<Cursor>,
}

impl<'a> Entry<'a> {
    fn enter(marker: &'a RefCell<Option<Cursor>>, input: &Cursor) -> Result<Self, ParseError> {
        if marker.borrow().as_ref() == Some(input) {
            debug!("left recursion detected at offset {}", input.offset());
            return Err(ParseError::at(LEFT_RECURSION_MESSAGE, input));
        }
        let previous = marker.replace(Some(input.clone()));
        Ok(Self { marker, previous })
    }
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        self.marker.replace(self.previous.take());
    }
}

enum Handle<T> {
    Owned(Rc<Rule<T>>),
    Unowned(Weak<Rule<T>>),
}

/// A grammar rule that may refer to itself.
///
/// The value returned by [`recursive`] owns the rule. The handle passed into
/// the defining function holds only a weak reference, so a rule's definition
/// never keeps the rule alive on its own.
pub struct Recursive<T> {
    rule: Handle<T>,
}

impl<T> Clone for Recursive<T> {
    fn clone(&self) -> Self {
        let rule = match &self.rule {
            Handle::Owned(rule) => Handle::Owned(Rc::clone(rule)),
            Handle::Unowned(rule) => Handle::Unowned(Weak::clone(rule)),
        };
        Self { rule }
    }
}

impl<T> Recursive<T> {
    fn rule(&self, input: &Cursor) -> Result<Rc<Rule<T>>, ParseError> {
        match &self.rule {
            Handle::Owned(rule) => Ok(Rc::clone(rule)),
            Handle::Unowned(rule) => rule.upgrade().ok_or_else(|| {
                ParseError::at("Recursive grammar was used after it was dropped", input)
            }),
        }
    }

    /// Whether the definition has been built yet.
    pub fn is_constructed(&self) -> bool {
        match &self.rule {
            Handle::Owned(rule) => rule.definition.get().is_some(),
            Handle::Unowned(rule) => rule
                .upgrade()
                .is_some_and(|rule| rule.definition.get().is_some()),
        }
    }
}

impl<T: 'static> Parser for Recursive<T> {
    type Output = T;

    fn parse(&self, input: &Cursor) -> PResult<T> {
        let rule = self.rule(input)?;
        let _entry = Entry::enter(&rule.entered_at, input)?;
        let definition = rule.definition(input)?;
        definition.parse(input)
    }
}

/// Defines a rule in terms of itself.
///
/// ```ignore
/// let nested = recursive(|nested| "f(".ignore_then(nested).then_ignore(")").or(digits()));
/// ```
pub fn recursive<T, P, F>(define: F) -> Recursive<T>
where
    T: 'static,
    P: Parser<Output = T> + 'static,
    F: FnOnce(Recursive<T>) -> P + 'static,
{
    let define: Define<T> = Box::new(move |rule| define(rule).boxed());
    Recursive {
        rule: Handle::Owned(Rc::new(Rule {
            define: RefCell::new(Some(define)),
            definition: OnceCell::new(),
            entered_at: RefCell::new(None),
        })),
    }
}
