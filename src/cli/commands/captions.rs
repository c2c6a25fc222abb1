use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::SelectorArgs;

#[derive(Args)]
pub struct CaptionCommands {
    #[command(subcommand)]
    pub command: CaptionSubcommands,
}

#[derive(Subcommand)]
pub enum CaptionSubcommands {
    /// Download caption files, optionally with plain-text transcripts
    Download(DownloadArgs),
    /// Show or hide captions matching a label on the player
    SetVisibility(SetVisibilityArgs),
}

#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Destination folder
    #[arg(long, default_value = "captions_download")]
    pub folder: PathBuf,

    /// Also write a .txt transcript next to each caption file
    #[arg(long)]
    pub transcripts: bool,

    /// Leave the caption label out of filenames
    #[arg(long)]
    pub no_label_in_filenames: bool,

    /// Also process child (multi-stream) entries
    #[arg(long)]
    pub include_children: bool,
}

#[derive(Args)]
pub struct SetVisibilityArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Caption label to match (defaults to the configured auto-generated label)
    #[arg(long)]
    pub label: Option<String>,

    /// Make matching captions visible instead of hiding them
    #[arg(long)]
    pub show: bool,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
