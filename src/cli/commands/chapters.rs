use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ChapterCommands {
    #[command(subcommand)]
    pub command: ChapterSubcommands,
}

#[derive(Subcommand)]
pub enum ChapterSubcommands {
    /// Create chapter markers from a CSV file
    Add(AddArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// CSV with headers entry_id,timecode,chapter_title,chapter_description,search_tags
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// User ID recorded on each chapter
    #[arg(long)]
    pub user_id: Option<String>,
}
