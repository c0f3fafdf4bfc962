//! gthunk: a front end for a small audio-synthesis language, built on a
//! packrat parser-combinator engine.

pub use crate::diagnostics::{ErrorContext, ErrorType, Span, ThunkError};

pub mod ast;
pub mod cli;
pub mod diagnostics;
pub mod driver;
pub mod grammar;
pub mod parser;
