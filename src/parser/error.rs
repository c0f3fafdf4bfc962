use thiserror::Error;

use super::cursor::Cursor;

/// A hard parse failure.
///
/// Unlike a no-match, a `ParseError` is never caught by an ordered
/// alternative: it aborts the whole parse. The message is rendered verbatim;
/// the offset records where in the input the failure was raised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    pub message: String,
    pub offset: usize,
}

impl ParseError {
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }

    pub fn at(message: impl Into<String>, cursor: &Cursor) -> Self {
        Self::new(message, cursor.offset())
    }
}
