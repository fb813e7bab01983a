//! CLI definitions.

pub mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "screener")]
#[command(author, version, about = "Technical and fundamental screener for NSE equities")]
pub struct Cli {
    /// Configuration file path (defaults to config/default.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (overrides the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scan profile over a universe or a single ticker
    Scan(ScanArgs),
    /// List available scan profiles
    Profiles,
    /// List ticker universes
    Universes,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tui,
}

#[derive(clap::Args)]
pub struct ScanArgs {
    /// Scan profile (defaults to scan.default_profile)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Universe to scan (defaults to scan.default_universe)
    #[arg(short, long, conflicts_with = "ticker")]
    pub universe: Option<String>,

    /// Scan a single ticker; a bare symbol gets the .NS suffix
    #[arg(short, long)]
    pub ticker: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Sort by reward/risk, highest first
    #[arg(long)]
    pub sort_by_rr: bool,

    /// Also show tickers that did not pass
    #[arg(long)]
    pub show_all: bool,

    /// Read bars from CSV files in this directory instead of Yahoo
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Save the JSON report to a file
    #[arg(long)]
    pub save: Option<PathBuf>,
}
