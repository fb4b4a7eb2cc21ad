//! Campus navigation CLI library.
//!
//! Argument parsing helpers, subcommand handlers and output formatting for
//! the `campusnav` binary.

pub mod args;
pub mod commands;
pub mod output;
pub mod terminal;
