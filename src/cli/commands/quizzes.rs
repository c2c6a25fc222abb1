use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct QuizCommands {
    #[command(subcommand)]
    pub command: QuizSubcommands,
}

#[derive(Subcommand)]
pub enum QuizSubcommands {
    /// Clone quiz entries together with their question cue points
    Clone(CloneArgs),
    /// Delete quiz attempts for given users and entries
    DeleteAttempts(DeleteAttemptsArgs),
}

#[derive(Args)]
pub struct CloneArgs {
    /// Comma-delimited list of quiz entry IDs
    #[arg(long, value_name = "IDS")]
    pub entry_ids: String,

    /// Tag added to each cloned entry
    #[arg(long)]
    pub add_tag: Option<String>,
}

#[derive(Args)]
pub struct DeleteAttemptsArgs {
    /// Comma-delimited user IDs
    #[arg(long, value_name = "USERS", conflicts_with = "user_file")]
    pub user_ids: Option<String>,

    /// File with one user ID per line
    #[arg(long, value_name = "FILE")]
    pub user_file: Option<PathBuf>,

    /// Comma-delimited entry IDs
    #[arg(long, value_name = "IDS", conflicts_with = "entry_file")]
    pub entry_ids: Option<String>,

    /// File with one entry ID per line
    #[arg(long, value_name = "FILE")]
    pub entry_file: Option<PathBuf>,

    /// Delete without confirmation
    #[arg(long)]
    pub yes: bool,
}
