//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Derive command arguments.
#[derive(Debug, Args)]
pub struct DeriveCommand {
    /// Email-like credential to derive an identity from
    pub credential: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Extra JSON records file merged over the configured records
    #[arg(short, long, value_name = "FILE")]
    pub records: Option<PathBuf>,

    /// Only count records of this employee id
    #[arg(short, long)]
    pub employee: Option<String>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Replay command arguments.
#[derive(Debug, Args)]
pub struct ReplayCommand {
    /// JSON script of actions to replay
    pub script: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_command_debug() {
        let cmd = StatsCommand {
            records: Some(PathBuf::from("records.json")),
            employee: None,
            json: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("records.json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        assert!(format!("{cmd:?}").contains("Show"));
    }
}
