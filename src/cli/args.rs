//! Command line argument parsing for the combo CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// combo - run text through a combination of analyzers
#[derive(Parser, Debug, Clone)]
#[command(name = "combo")]
#[command(about = "Merge the output of several text analyzers into one token stream")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct ComboArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl ComboArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Analyze text with a combo analyzer
    Analyze(AnalyzeArgs),

    /// List the analyzers that can be used as sub-analyzers
    List,
}

/// Arguments for analyzing text
#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Combo analyzer configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE", conflicts_with = "analyzers")]
    pub config: Option<PathBuf>,

    /// Comma separated sub-analyzer names, used instead of a config file
    #[arg(short, long, value_delimiter = ',', value_name = "NAMES")]
    pub analyzers: Vec<String>,

    /// Field name passed to the sub-analyzers
    #[arg(long, default_value = "")]
    pub field: String,

    /// Text to analyze (read from stdin when omitted)
    #[arg(short, long, env = "COMBO_TEXT")]
    pub text: Option<String>,

    /// Cache every sub-analyzer's output before merging
    #[arg(long)]
    pub caching: bool,

    /// Drop same-text tokens at the same position
    #[arg(long)]
    pub dedup: bool,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analyze() {
        let args = ComboArgs::parse_from([
            "combo",
            "-vv",
            "--format",
            "json",
            "analyze",
            "--analyzers",
            "whitespace,keyword",
            "--text",
            "just a test",
            "--dedup",
        ]);

        assert_eq!(args.verbosity(), 2);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Analyze(analyze) => {
                assert_eq!(analyze.analyzers, vec!["whitespace", "keyword"]);
                assert_eq!(analyze.text.as_deref(), Some("just a test"));
                assert!(analyze.dedup);
                assert!(!analyze.caching);
                assert!(analyze.config.is_none());
            }
            Command::List => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_quiet_overrides_verbose() {
        let args = ComboArgs::parse_from(["combo", "-q", "-vvv", "list"]);
        assert_eq!(args.verbosity(), 0);
    }

    #[test]
    fn test_config_conflicts_with_analyzers() {
        let result = ComboArgs::try_parse_from([
            "combo",
            "analyze",
            "--config",
            "combo.json",
            "--analyzers",
            "keyword",
        ]);
        assert!(result.is_err());
    }
}
