use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct RetentionCommands {
    #[command(subcommand)]
    pub command: RetentionSubcommands,
}

#[derive(Subcommand)]
pub enum RetentionSubcommands {
    /// Flag entries covered by the retention policy windows
    Report(ReportArgs),
}

#[derive(Args)]
pub struct ReportArgs {
    /// One or more platform export files (CSV or XLSX), merged by entry ID
    #[arg(value_name = "FILE", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Years since creation before an entry is in scope
    #[arg(long, default_value_t = 4)]
    pub created_years: i64,

    /// Years since last play before an entry is in scope
    #[arg(long, default_value_t = 2)]
    pub played_years: i64,

    /// Concurrent lookup workers
    #[arg(long, default_value_t = 8)]
    pub workers: usize,

    /// Also total each candidate's flavor storage
    #[arg(long)]
    pub include_storage: bool,

    /// Leave out rows whose export status is not 'ready'
    #[arg(long)]
    pub skip_nonready: bool,
}
