//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AdScout CLI - Turn scraped Ad Library pages into scored sales leads.
#[derive(Debug, Parser)]
#[command(name = "adscout")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path (default: ~/.adscout/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Lead database path
    #[arg(long, global = true, env = "ADSCOUT_DB")]
    pub db: Option<PathBuf>,

    /// Generative service endpoint
    #[arg(long, global = true, env = "ADSCOUT_LLM_ENDPOINT")]
    pub llm_endpoint: Option<String>,

    /// Generative service model
    #[arg(long, global = true, env = "ADSCOUT_LLM_MODEL")]
    pub llm_model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (library ids only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract ads from a scraped text file into the record file
    Extract(ExtractArgs),

    /// Summarize the record file
    Summary(SummaryArgs),

    /// Score records, store them as leads and export CSV
    Enrich(EnrichArgs),

    /// List the leads worth contacting first
    Top(TopArgs),

    /// Change a lead's review status
    Status(StatusArgs),

    /// Search leads by advertiser or contact
    Search(SearchArgs),

    /// Lead counts per status
    Stats,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Scraped text file
    pub input: PathBuf,

    /// Query label the ads were searched with
    #[arg(short, long)]
    pub query: String,

    /// Record file to merge into (overrides config)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum chunk size in bytes (overrides config)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Bytes of overlap between chunks (overrides config)
    #[arg(long)]
    pub overlap: Option<usize>,

    /// Start from a tuning preset instead of the configured chunking and pacing
    #[arg(long, value_enum)]
    pub preset: Option<ExtractPreset>,
}

/// Extraction tuning presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExtractPreset {
    /// Built-in defaults
    Balanced,
    /// Smaller chunks, shorter pauses and timeouts
    Aggressive,
    /// Larger chunks and longer timeouts for slow services
    Lenient,
}

/// Arguments for the summary command.
#[derive(Debug, Parser)]
pub struct SummaryArgs {
    /// Record file (overrides config)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Number of advertisers to list
    #[arg(short, long, default_value = "10")]
    pub top: usize,
}

/// Arguments for the enrich command.
#[derive(Debug, Parser)]
pub struct EnrichArgs {
    /// Record file (overrides config)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Ask the generative service to judge each ad
    #[arg(long)]
    pub analyze: bool,

    /// CSV export path (overrides config)
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Score and print without touching the database or CSV
    #[arg(long)]
    pub dry_run: bool,

    /// Require more evidence before a lead counts as busy
    #[arg(long)]
    pub conservative: bool,
}

/// Arguments for the top command.
#[derive(Debug, Parser)]
pub struct TopArgs {
    /// Minimum probability (0-100)
    #[arg(short, long, default_value = "65", value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min: u8,

    /// Maximum number of results
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// Arguments for the status command.
#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Library id of the lead
    pub library_id: String,

    /// New status: new, messaged, in-talk, rejected, client, archived
    pub status: String,

    /// Note to append
    #[arg(short, long)]
    pub note: Option<String>,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Text to look for in advertiser names and contacts
    pub query: String,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
