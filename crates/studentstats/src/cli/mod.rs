//! Command-line interface for studentstats.
//!
//! This module provides the CLI structure and command handlers for the
//! `stustat` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, DeleteCommand, ImportCommand, ListCommand, OutputFormat, SearchCommand,
    ShowCommand, StatsCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// stustat - Student directory statistics
///
/// Keeps a local database of student directory records and computes the
/// cohort coverage, distributions and word clouds shown on the department
/// statistics dashboard.
#[derive(Debug, Parser)]
#[command(name = "stustat")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
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
    /// Import student records from a JSON file
    Import(ImportCommand),

    /// Compute dashboard statistics
    Stats(StatsCommand),

    /// List students
    List(ListCommand),

    /// Search students
    Search(SearchCommand),

    /// Show one student
    Show(ShowCommand),

    /// Delete a student record
    Delete(DeleteCommand),

    /// Show database status
    Status(StatusCommand),

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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "stustat");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(3, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Debug);
        assert_eq!(cli_with(5, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["stustat", "import", "students.json"]).unwrap();
        match cli.command {
            Command::Import(cmd) => assert_eq!(cmd.file, PathBuf::from("students.json")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stats_json() {
        let cli = Cli::try_parse_from(["stustat", "stats", "--format", "json"]).unwrap();
        match cli.command {
            Command::Stats(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_stats_default_format() {
        let cli = Cli::try_parse_from(["stustat", "stats"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Stats(StatsCommand {
                format: OutputFormat::Plain
            })
        ));
    }

    #[test]
    fn test_parse_search_filters() {
        let cli =
            Cli::try_parse_from(["stustat", "search", "野球", "--cohort", "B3", "-l", "5"]).unwrap();
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query.as_deref(), Some("野球"));
                assert_eq!(cmd.cohort.as_deref(), Some("B3"));
                assert_eq!(cmd.limit, 5);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_without_text() {
        let cli = Cli::try_parse_from(["stustat", "search", "--course", "KIKAI_SYSTEM"]).unwrap();
        assert!(matches!(cli.command, Command::Search(ref cmd) if cmd.query.is_none()));
    }

    #[test]
    fn test_parse_delete() {
        let cli = Cli::try_parse_from(["stustat", "delete", "7", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Delete(DeleteCommand { id: 7, yes: true })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["stustat", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["stustat", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["stustat", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
