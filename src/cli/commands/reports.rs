use clap::{Args, Subcommand};

use super::SelectorArgs;
use crate::timeutil::ChunkInterval;

#[derive(Args)]
pub struct ReportCommands {
    #[command(subcommand)]
    pub command: ReportSubcommands,
}

#[derive(Subcommand)]
pub enum ReportSubcommands {
    /// Entry count and duration per time chunk
    Usage(UsageArgs),
    /// Entries whose media content was replaced after creation
    Replacements(ReplacementsArgs),
}

#[derive(Args)]
pub struct UsageArgs {
    /// Only count entries whose tags contain this string
    #[arg(long)]
    pub tag: Option<String>,

    /// Only count entries published in this category ID
    #[arg(long, value_name = "ID")]
    pub category: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: String,

    /// End date (YYYY-MM-DD), defaults to today
    #[arg(long, value_name = "DATE")]
    pub end: Option<String>,

    /// Chunk interval used to keep each query under the match cap
    #[arg(long, value_enum, default_value = "monthly")]
    pub interval: ChunkInterval,

    /// Skip the per-entry source filename lookup
    #[arg(long)]
    pub skip_filenames: bool,
}

#[derive(Args)]
pub struct ReplacementsArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,
}
