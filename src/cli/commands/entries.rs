use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::SelectorArgs;

#[derive(Args)]
pub struct EntryCommands {
    #[command(subcommand)]
    pub command: EntrySubcommands,
}

#[derive(Subcommand)]
pub enum EntrySubcommands {
    /// Permanently delete or recycle entries, with preview/result reports
    Delete(DeleteArgs),
    /// Prefix or suffix entry titles in bulk
    Rename(RenameArgs),
    /// Download each entry's source file
    Download(DownloadArgs),
    /// Duplicate entries into another account
    Duplicate(DuplicateArgs),
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Recycle instead of permanent deletion, skipping the typed prompt
    #[arg(long, conflicts_with = "delete")]
    pub recycle: bool,

    /// Permanently delete, skipping the typed prompt
    #[arg(long)]
    pub delete: bool,
}

#[derive(Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Text to add before each title
    #[arg(long, conflicts_with = "suffix")]
    pub prefix: Option<String>,

    /// Text to add after each title
    #[arg(long)]
    pub suffix: Option<String>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Destination folder
    #[arg(long, default_value = "media_downloads")]
    pub folder: PathBuf,

    /// Also download child (multi-stream) entries
    #[arg(long)]
    pub include_children: bool,
}

#[derive(Args)]
pub struct DuplicateArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Destination account profile name
    #[arg(long, value_name = "PROFILE")]
    pub dest_profile: String,

    /// Owner user ID for the new entries
    #[arg(long)]
    pub dest_owner: Option<String>,

    /// Comma-delimited co-editor user IDs for the new entries
    #[arg(long)]
    pub dest_coeditors: Option<String>,

    /// Comma-delimited co-publisher user IDs for the new entries
    #[arg(long)]
    pub dest_copublishers: Option<String>,

    /// Extra tag added to every new entry
    #[arg(long)]
    pub dest_tag: Option<String>,

    /// Copy quiz answer cue points as well
    #[arg(long)]
    pub copy_quiz_answers: bool,

    /// Skip captions whose label marks them auto-generated
    #[arg(long)]
    pub skip_asr_captions: bool,

    /// Do not copy attachment assets
    #[arg(long)]
    pub skip_attachments: bool,
}
