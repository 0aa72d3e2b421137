//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Search the National Diet proceedings from the command line
#[derive(Parser, Debug)]
#[command(name = "kokkai-search")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Cache directory for fetched pages (disabled when absent)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Seconds to wait between page fetches
    #[arg(long, global = true, default_value_t = 2.0)]
    pub sleep_seconds: f64,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands, one per endpoint
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search meeting summaries (meeting_list endpoint)
    MeetingList(QueryArgs),

    /// Search full meetings with speeches (meeting endpoint)
    Meeting(QueryArgs),

    /// Search individual speeches (speech endpoint)
    Speech(QueryArgs),
}

/// Search conditions shared by all subcommands
#[derive(Args, Debug)]
pub struct QueryArgs {
    /// Free-text search term
    #[arg(long)]
    pub any: Option<String>,

    /// Meeting name
    #[arg(long)]
    pub name_of_meeting: Option<String>,

    /// House name
    #[arg(long)]
    pub name_of_house: Option<String>,

    /// Speaker name
    #[arg(long)]
    pub speaker: Option<String>,

    /// Earliest meeting date (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub from: Option<String>,

    /// Latest meeting date (YYYY-MM-DD)
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub until: Option<String>,

    /// Shortcut for --from YYYY-01-01 (an explicit --from wins)
    #[arg(long, value_name = "YYYY")]
    pub since: Option<i32>,

    /// Records per HTTP call (endpoint-specific ceiling applies)
    #[arg(long)]
    pub maximum_records: Option<u32>,

    /// Diet session range start
    #[arg(long)]
    pub session_from: Option<u32>,

    /// Diet session range end
    #[arg(long)]
    pub session_to: Option<u32>,

    /// Cap on records aggregated across all pages
    #[arg(long)]
    pub limit_total: Option<usize>,

    /// Report only the total count, fetching no records
    #[arg(long)]
    pub dry_run: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Full JSON envelope
    Json,
    /// One record object per line
    Jsonl,
    /// Comma-separated values
    Csv,
}
