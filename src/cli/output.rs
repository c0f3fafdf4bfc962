//! Handles all user-facing output for the CLI.
//!
//! Syntax trees go to stdout; status lines and diagnostics go to stderr.
//! Colour is applied only when the stream supports it.

use std::io::Write;
use std::path::Path;

use miette::Report;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::Module;
use crate::ThunkError;

/// Prints a module as S-expressions, one top-level binding per line.
pub fn print_module(module: &Module) {
    println!("{module}");
}

/// Prints a module as pretty JSON.
pub fn print_module_json(module: &Module) -> Result<(), serde_json::Error> {
    let json = serde_json::to_string_pretty(module)?;
    println!("{json}");
    Ok(())
}

/// Renders an error with its source excerpt through miette.
pub fn print_error(error: ThunkError) {
    eprintln!("{:?}", Report::new(error));
}

/// Prints one `ok` / `FAILED` line for a checked file.
pub fn print_status(path: &Path, ok: bool) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let (tag, color) = if ok {
        ("ok", Color::Green)
    } else {
        ("FAILED", Color::Red)
    };
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = write!(stderr, "{tag:>6}");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " {}", path.display());
}

/// Prints the closing summary of a `check` run.
pub fn print_summary(checked: usize, failed: usize) {
    let mut stderr = StandardStream::stderr(ColorChoice::Auto);
    let color = if failed == 0 { Color::Green } else { Color::Red };
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
    let _ = writeln!(stderr, "{checked} file(s) checked, {failed} failed");
    let _ = stderr.reset();
}
