use clap::{Args, Subcommand};

#[derive(Args)]
pub struct PlaylistCommands {
    #[command(subcommand)]
    pub command: PlaylistSubcommands,
}

#[derive(Subcommand)]
pub enum PlaylistSubcommands {
    /// Clone a channel's playlists into another channel
    Duplicate(DuplicateArgs),
}

#[derive(Args)]
pub struct DuplicateArgs {
    /// Category ID holding the original playlists
    #[arg(long, value_name = "ID")]
    pub source_category: i64,

    /// Category ID receiving the cloned playlists
    #[arg(long, value_name = "ID")]
    pub dest_category: i64,

    /// Metadata profile ID (overrides the configured default)
    #[arg(long)]
    pub metadata_profile_id: Option<i64>,
}
