use clap::{Args, Subcommand};

#[derive(Args)]
pub struct AuthCommands {
    #[command(subcommand)]
    pub command: AuthSubcommands,
}

#[derive(Subcommand)]
pub enum AuthSubcommands {
    /// Add or update a credentials profile
    Add(AddArgs),
    /// List configured profiles
    List,
    /// Choose the profile used by default
    Select {
        /// Profile name (prompted when omitted)
        name: Option<String>,
    },
    /// Remove a profile
    Remove {
        name: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show profiles and verify the current session secret
    Status,
}

#[derive(Args)]
pub struct AddArgs {
    /// Profile name, e.g. 'prod'
    pub name: Option<String>,

    /// API base URL
    #[arg(long)]
    pub service_url: Option<String>,

    /// Account (partner) ID
    #[arg(long)]
    pub partner_id: Option<i64>,

    /// Admin secret (prompted securely when omitted)
    #[arg(long)]
    pub admin_secret: Option<String>,

    /// User ID recorded on the session
    #[arg(long)]
    pub user_id: Option<String>,
}
