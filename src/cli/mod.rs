//! The gthunk command-line interface.
//!
//! This module is the entry point for all CLI commands and orchestrates the
//! library's parsing pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::info;
use walkdir::WalkDir;

use crate::ast::Module;
use crate::cli::args::{Command, ThunkArgs};
use crate::diagnostics::io_error;
use crate::{driver, ThunkError};

pub mod args;
pub mod logger;
pub mod output;

/// File extension of gthunk modules.
pub const MODULE_EXTENSION: &str = "thunk";

/// The main entry point for the CLI.
pub fn run() {
    let args = ThunkArgs::parse();
    logger::init(args.verbose);

    let ok = match args.command {
        Command::Ast { file, json } => handle_ast(&file, json),
        Command::Check { path } => handle_check(&path),
    };

    if !ok {
        process::exit(1);
    }
}

/// Reads and parses one module file.
pub fn load_module(path: &Path) -> Result<Module, ThunkError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
    driver::parse_module(&path.display().to_string(), &text)
}

/// Handles the `ast` subcommand.
fn handle_ast(file: &Path, json: bool) -> bool {
    let module = match load_module(file) {
        Ok(module) => module,
        Err(e) => {
            output::print_error(e);
            return false;
        }
    };

    if !json {
        output::print_module(&module);
        return true;
    }
    match output::print_module_json(&module) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: {e}");
            false
        }
    }
}

/// Handles the `check` subcommand.
fn handle_check(path: &Path) -> bool {
    let files = match module_files(path) {
        Ok(files) => files,
        Err(e) => {
            output::print_error(e);
            return false;
        }
    };
    info!("checking {} file(s) under {}", files.len(), path.display());

    let mut failed = 0;
    for file in &files {
        match load_module(file) {
            Ok(_) => output::print_status(file, true),
            Err(e) => {
                failed += 1;
                output::print_status(file, false);
                output::print_error(e);
            }
        }
    }

    output::print_summary(files.len(), failed);
    failed == 0
}

/// `path` itself if it is a file, otherwise every module file beneath it in
/// sorted order.
pub fn module_files(path: &Path) -> Result<Vec<PathBuf>, ThunkError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let io = e
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("directory walk failed"));
            io_error(path, io)
        })?;
        let is_module = entry
            .path()
            .extension()
            .is_some_and(|ext| ext == MODULE_EXTENSION);
        if entry.file_type().is_file() && is_module {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_files_finds_nested_modules_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("songs")).unwrap();
        fs::write(dir.path().join("b.thunk"), "let b = 1").unwrap();
        fs::write(dir.path().join("songs/a.thunk"), "let a = 1").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a module").unwrap();

        let files = module_files(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("b.thunk"), PathBuf::from("songs/a.thunk")]
        );
    }

    #[test]
    fn missing_files_are_io_errors() {
        let err = load_module(Path::new("does/not/exist.thunk")).unwrap_err();
        assert_eq!(err.error_type(), crate::ErrorType::Io);
    }
}
