//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `scan`: Report hard-coded text and whether a key already exists for it
//! - `extract`: Create keys, write dictionaries and rewrite sources (dry-run by default)
//! - `lookup`: Find the key for a piece of text
//! - `init`: Initialize the tolk configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Scan(cmd)) => cmd.common.verbose,
            Some(Command::Extract(cmd)) => cmd.common.verbose,
            Some(Command::Lookup(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Workspace root (defaults to the directory holding the config file)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Source language code (overrides config file)
    #[arg(long)]
    pub source_language: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct ScanCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Print candidates as JSON instead of a report
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExtractCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write dictionaries and rewrite sources (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Translator command line, run as `<cmd> <source> <target>` with the text on stdin
    /// (overrides config file)
    #[arg(long, env = "TOLK_TRANSLATOR")]
    pub translator_cmd: Option<String>,
}

#[derive(Debug, Args)]
pub struct LookupCommand {
    /// Text to look up
    pub text: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report hard-coded text in source files
    Scan(ScanCommand),
    /// Replace hard-coded text with translation calls and update dictionaries
    Extract(ExtractCommand),
    /// Find the key for a text in the configured dictionaries
    Lookup(LookupCommand),
    /// Initialize a new .tolkrc.json configuration file
    Init,
}
