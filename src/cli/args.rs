//! Defines the command-line arguments and subcommands for the gthunk CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "gthunk",
    version,
    about = "Parse gthunk audio-synthesis modules and inspect their syntax trees."
)]
pub struct ThunkArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a module and print its syntax tree.
    Ast {
        /// The path to the module to parse.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the tree as JSON instead of S-expressions.
        #[arg(long)]
        json: bool,
    },
    /// Parse a module, or every `.thunk` file under a directory, and report
    /// which ones fail.
    Check {
        /// A module file or a directory to search.
        #[arg(default_value = ".")]
        path: PathBuf,
    },
}
