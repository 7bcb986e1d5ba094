//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - (none): install every selected tool
//! - list: show the tool table
//! - check: run the preflight check only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// aitools-install - Installs Amp, Atlassian Rovo Dev, Gemini and Qwen Code CLIs
#[derive(Parser, Debug)]
#[command(name = "aitools-install")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print the commands that would run without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Install only these tools (by id, repeatable or comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these tools (by id, repeatable or comma-separated)
    #[arg(long, global = true, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the tools this installer knows about
    List {
        /// Print the tool table as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check prerequisites without installing anything
    Check,
}
