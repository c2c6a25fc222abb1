use clap::{Args, Subcommand};

#[derive(Args)]
pub struct CategoryCommands {
    #[command(subcommand)]
    pub command: CategorySubcommands,
}

#[derive(Subcommand)]
pub enum CategorySubcommands {
    /// Report every category a user belongs to, with roles
    Affiliations(AffiliationsArgs),
    /// Unpublish and republish an entry in a category
    Republish(RepublishArgs),
}

#[derive(Args)]
pub struct AffiliationsArgs {
    /// Comma-delimited user IDs
    #[arg(long, value_name = "USERS")]
    pub user_ids: String,

    /// Write one CSV per user instead of a single aggregate CSV
    #[arg(long)]
    pub per_user: bool,
}

#[derive(Args)]
pub struct RepublishArgs {
    /// Entry to republish
    #[arg(long, value_name = "ID")]
    pub entry_id: String,

    /// Category ID to republish into
    #[arg(long, value_name = "ID", conflicts_with = "channel_name")]
    pub category_id: Option<i64>,

    /// Channel name resolved under the configured fullName prefix
    #[arg(long)]
    pub channel_name: Option<String>,
}
