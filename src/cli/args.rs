//! CLI argument parsing using clap

use crate::types::RiskLevel;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for `confusion-scan scan`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Markdown vulnerability report
    Markdown,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Output format for `confusion-scan list`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable output
    Human,
    /// JSON Lines format (one JSON object per line)
    Jsonl,
}

/// Color output choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Automatically detect if terminal supports color
    Auto,
    /// Always use color
    Always,
    /// Never use color
    Never,
}

/// confusion-scan CLI main entry point
#[derive(Parser, Debug)]
#[command(name = "confusion-scan")]
#[command(about = "Detect Apache Confusion Attack patterns in configuration files")]
#[command(version)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,

    /// Output coloring
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available confusion-scan subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan Apache configuration files or stdin for Confusion Attack patterns
    Scan {
        /// Files or directories to scan; `-` reads from stdin
        #[arg(default_value = "-")]
        paths: Vec<String>,

        /// Output format (defaults to the configured format)
        #[arg(short, long)]
        format: Option<ReportFormat>,

        /// Lowest risk level that makes the scan fail
        #[arg(long, value_parser = parse_fail_on)]
        fail_on: Option<RiskLevel>,

        /// Configuration file (defaults to ./confusion-scan.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write a default confusion-scan.toml
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// List all enabled rules
    List {
        /// Output format
        #[arg(short, long, default_value = "human")]
        format: ListFormat,

        /// Configuration file (defaults to ./confusion-scan.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_fail_on(s: &str) -> Result<RiskLevel, String> {
    match s.parse::<RiskLevel>()? {
        RiskLevel::Safe => Err("fail-on must be one of: low, medium, high, critical".to_string()),
        risk => Ok(risk),
    }
}
