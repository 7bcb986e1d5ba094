//! CLI module for aitools-install - command-line interface and subcommands.
//!
//! With no subcommand every tool is installed; `list` and `check` inspect
//! without installing.

pub mod commands;

pub use commands::Cli;
