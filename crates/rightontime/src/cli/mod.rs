//! Command-line interface for rightontime.
//!
//! This module provides the CLI structure for the `rotime` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::logging::Verbosity;

pub use commands::{ConfigCommand, DeriveCommand, ReplayCommand, StatsCommand};

/// rotime - Attendance reconciliation and punctuality metrics
///
/// Derives employee identities from credentials, replays check-in and
/// check-out events, and reports average arrival, departure and worked
/// time.
#[derive(Debug, Parser)]
#[command(name = "rotime")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the identity a credential resolves to
    Derive(DeriveCommand),

    /// Show dashboard statistics for a record set
    Stats(StatsCommand),

    /// Replay a script of actions and report the outcome
    Replay(ReplayCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
