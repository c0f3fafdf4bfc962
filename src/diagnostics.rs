//! User-facing diagnostics.
//!
//! Every error that leaves the crate is a [`ThunkError`], rendered through
//! `miette`. The parser engine itself only knows about
//! [`ParseError`](crate::parser::ParseError) and no-match; the driver turns
//! those into `ThunkError`s with a source and a span attached.
//!
//! # Error construction macros
//!
//! - `err_msg!(Syntax, "Unexpected {}", what)` for errors without context.
//! - `err_ctx!(Syntax, message, src, span)` for errors with a source and a
//!   span, optionally followed by a help message.
//!
//! Pass `src` as a `&SourceArc` and `span` as a [`Span`]; the macros handle
//! cloning and wrapping.

use std::path::Path;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::Serialize;
use thiserror::Error;

pub type SourceArc = Arc<NamedSource<String>>;

/// A byte range in a source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The span of the character at `offset`, or an empty span at end of
    /// input.
    pub fn point(text: &str, offset: usize) -> Self {
        let len = text[offset..].chars().next().map_or(0, char::len_utf8);
        Self::new(offset, offset + len)
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Type-safe error classification corresponding to [`ThunkError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// A committed construct was malformed (hard parse failure).
    Syntax,
    /// The input did not match the grammar at all.
    NoMatch,
    /// The grammar matched a prefix but input was left over.
    Incomplete,
    /// A source file could not be read.
    Io,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Syntax => "syntax",
            ErrorType::NoMatch => "no-match",
            ErrorType::Incomplete => "incomplete",
            ErrorType::Io => "io",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Source, span, and help attached to an error.
#[derive(Debug, Default)]
pub struct ErrorContext {
    pub source: Option<SourceArc>,
    pub span: Option<Span>,
    pub help: Option<String>,
}

impl ErrorContext {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_source_and_span(source: SourceArc, span: Span) -> Self {
        Self {
            source: Some(source),
            span: Some(span),
            help: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ThunkError {
    #[error("Syntax error: {message}")]
    Syntax { message: String, ctx: ErrorContext },
    #[error("Parse failed: {message}")]
    NoMatch { message: String, ctx: ErrorContext },
    #[error("Parse failed: {message}")]
    Incomplete { message: String, ctx: ErrorContext },
    #[error("I/O error: {message}")]
    Io {
        message: String,
        ctx: ErrorContext,
        #[source]
        source: Option<std::io::Error>,
    },
}

impl ThunkError {
    fn ctx(&self) -> &ErrorContext {
        match self {
            ThunkError::Syntax { ctx, .. }
            | ThunkError::NoMatch { ctx, .. }
            | ThunkError::Incomplete { ctx, .. }
            | ThunkError::Io { ctx, .. } => ctx,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ThunkError::Syntax { message, .. }
            | ThunkError::NoMatch { message, .. }
            | ThunkError::Incomplete { message, .. }
            | ThunkError::Io { message, .. } => message,
        }
    }

    pub fn span(&self) -> Option<Span> {
        self.ctx().span
    }

    pub fn error_type(&self) -> ErrorType {
        match self {
            ThunkError::Syntax { .. } => ErrorType::Syntax,
            ThunkError::NoMatch { .. } => ErrorType::NoMatch,
            ThunkError::Incomplete { .. } => ErrorType::Incomplete,
            ThunkError::Io { .. } => ErrorType::Io,
        }
    }

    /// Attaches (or replaces) the help message.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        let ctx = match &mut self {
            ThunkError::Syntax { ctx, .. }
            | ThunkError::NoMatch { ctx, .. }
            | ThunkError::Incomplete { ctx, .. }
            | ThunkError::Io { ctx, .. } => ctx,
        };
        ctx.help = Some(help.into());
        self
    }
}

impl Diagnostic for ThunkError {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("gthunk::{}", self.error_type())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.ctx()
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn std::fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.ctx()
            .source
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.ctx().span?;
        let label = LabeledSpan::new(Some(self.message().to_string()), span.start, span.len());
        Some(Box::new(std::iter::once(label)))
    }
}

/// Wraps a named source text for use in error contexts.
pub fn to_error_source(name: impl AsRef<str>, text: impl AsRef<str>) -> SourceArc {
    Arc::new(NamedSource::new(name.as_ref(), text.as_ref().to_string()))
}

pub fn io_error(path: &Path, source: std::io::Error) -> ThunkError {
    ThunkError::Io {
        message: format!("cannot read {}: {}", path.display(), source),
        ctx: ErrorContext::none(),
        source: Some(source),
    }
}

/// Constructs a context-free `ThunkError` variant with a formatted message.
#[macro_export]
macro_rules! err_msg {
    ($variant:ident, $($fmt:tt)+) => {
        $crate::ThunkError::$variant {
            message: format!($($fmt)+),
            ctx: $crate::ErrorContext::none(),
        }
    };
}

/// Constructs a `ThunkError` variant with a source, a span, and optional help.
#[macro_export]
macro_rules! err_ctx {
    ($variant:ident, $msg:expr, $src:expr, $span:expr, $help:expr) => {
        $crate::ThunkError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext {
                source: Some($crate::diagnostics::SourceArc::clone($src)),
                span: Some($span),
                help: Some(format!("{}", $help)),
            },
        }
    };
    ($variant:ident, $msg:expr, $src:expr, $span:expr) => {
        $crate::ThunkError::$variant {
            message: $msg.to_string(),
            ctx: $crate::ErrorContext::with_source_and_span(
                $crate::diagnostics::SourceArc::clone($src),
                $span,
            ),
        }
    };
}

#[cfg(test)]
mod diagnostics_tests {
    use miette::Report;

    use super::*;

    #[test]
    fn report_includes_code_label_and_help() {
        let src = to_error_source("main.thunk", "let x = (1");
        let err = err_ctx!(
            Syntax,
            "Expected ')' to close the group",
            &src,
            Span::point("let x = (1", 10),
            "close the parenthesis"
        );
        assert_eq!(err.error_type(), ErrorType::Syntax);

        let output = format!("{:?}", Report::new(err));
        assert!(output.contains("gthunk::syntax"));
        assert!(output.contains("Expected ')' to close the group"));
        assert!(output.contains("close the parenthesis"));
    }

    #[test]
    fn err_msg_formats_without_context() {
        let err = err_msg!(NoMatch, "nothing matched in {}", "main.thunk");
        assert_eq!(err.to_string(), "Parse failed: nothing matched in main.thunk");
        assert!(err.span().is_none());
        assert!(err.labels().is_none());
    }

    #[test]
    fn point_span_covers_one_character() {
        assert_eq!(Span::point("aé", 1), Span::new(1, 3));
        assert!(Span::point("ab", 2).is_empty());
    }

    #[test]
    fn io_errors_keep_their_cause() {
        let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = io_error(Path::new("song.thunk"), cause);
        assert_eq!(err.error_type(), ErrorType::Io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.message().contains("song.thunk"));
    }
}
