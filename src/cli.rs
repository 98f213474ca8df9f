use std::path::PathBuf;

use clap::Parser;

use crate::module::fetch::{DEFAULT_JOBS, DEFAULT_TIMEOUT};

#[derive(Parser, Debug)]
#[command(
    name = "golicense-checkr",
    about = "Check the licenses of the modules linked into Go binaries",
    version
)]
pub struct Cli {
    /// Go binaries to scan
    #[arg(required = true, value_name = "BINARY")]
    pub binaries: Vec<PathBuf>,

    /// Policy config file [default: ./.golicense-checkr/config.toml, fallback ~/.config/golicense-checkr/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Permitted license identifier, replacing the configured allow-list (repeatable)
    #[arg(long, value_name = "LICENSE")]
    pub allow: Vec<String>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Maximum number of concurrent module downloads
    #[arg(long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Per-module download timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), value_name = "SECS")]
    pub timeout: u64,

    /// Show all modules (not just those that are not allowed)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}
