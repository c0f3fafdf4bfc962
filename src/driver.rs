//! Whole-input parsing.
//!
//! The combinator engine answers "how far did this match?"; the driver
//! answers "is this a valid module?". It requires the grammar to consume the
//! entire input and converts every other outcome into a [`ThunkError`].

use log::debug;

use crate::ast::Module;
use crate::diagnostics::{to_error_source, Span, ThunkError};
use crate::grammar;
use crate::parser::{Parser, Source};
use crate::{err_ctx, err_msg};

/// Longest excerpt of unconsumed input quoted in a help message.
const EXCERPT_CHARS: usize = 40;

/// Parses a complete module. `name` labels the source in diagnostics.
///
/// A fresh grammar is built per call, so packrat caches never outlive one
/// parse.
pub fn parse_module(name: &str, text: &str) -> Result<Module, ThunkError> {
    let module = parse_complete(name, text, &grammar::module())?;
    debug!(
        "{}: parsed {} declaration(s)",
        name,
        module.declarations.len()
    );
    Ok(module)
}

/// Runs `grammar` over `text` and requires it to consume all of it.
pub fn parse_complete<P>(name: &str, text: &str, grammar: &P) -> Result<P::Output, ThunkError>
where
    P: Parser + ?Sized,
{
    let source = Source::new(text);
    let src = to_error_source(name, text);

    let outcome = match grammar.parse(&source.start()) {
        Ok(outcome) => outcome,
        Err(failure) => {
            debug!("{}: hard failure at offset {}", name, failure.offset);
            return Err(err_ctx!(
                Syntax,
                failure.message,
                &src,
                Span::point(text, failure.offset)
            ));
        }
    };

    let Some(matched) = outcome else {
        debug!("{}: no match", name);
        if text.trim().is_empty() {
            return Err(err_msg!(NoMatch, "{} contains no declarations", name));
        }
        return Err(err_ctx!(
            NoMatch,
            "input does not match the grammar",
            &src,
            Span::point(text, 0),
            format!("unconsumed input: {}", excerpt(text))
        ));
    };

    if !matched.next.is_at_end() {
        let offset = matched.next.offset();
        debug!("{}: input left over at offset {}", name, offset);
        return Err(err_ctx!(
            Incomplete,
            "unexpected input after the last complete declaration",
            &src,
            Span::new(offset, text.len()),
            format!("unconsumed input: {}", excerpt(matched.remaining()))
        ));
    }

    Ok(matched.value)
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head:?}...")
    } else {
        format!("{head:?}")
    }
}
