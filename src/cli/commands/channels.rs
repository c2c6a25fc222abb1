use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Args)]
pub struct ChannelCommands {
    #[command(subcommand)]
    pub command: ChannelSubcommands,
}

#[derive(Subcommand)]
pub enum ChannelSubcommands {
    /// Create portal channels in bulk from a CSV or XLSX file
    Create(CreateArgs),
}

#[derive(Args)]
pub struct CreateArgs {
    /// Input file with columns channelName,owner,members,privacy
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Parent category ID (overrides the configured default)
    #[arg(long)]
    pub parent_id: Option<i64>,

    /// Column header for the channel name
    #[arg(long, default_value = "channelName")]
    pub name_header: String,

    /// Column header for the owner user ID
    #[arg(long, default_value = "owner")]
    pub owner_header: String,

    /// Column header for the comma-delimited member list
    #[arg(long, default_value = "members")]
    pub members_header: String,

    /// Column header for the privacy level (1-3)
    #[arg(long, default_value = "privacy")]
    pub privacy_header: String,
}
