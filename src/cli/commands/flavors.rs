use clap::{Args, Subcommand};

use super::SelectorArgs;

#[derive(Args)]
pub struct FlavorCommands {
    #[command(subcommand)]
    pub command: FlavorSubcommands,
}

#[derive(Subcommand)]
pub enum FlavorSubcommands {
    /// Delete non-source flavors, keeping each entry's source rendition
    Delete(DeleteArgs),
}

#[derive(Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub selector: SelectorArgs,

    /// Comma-delimited flavor tags to keep besides the source
    #[arg(long, value_name = "TAGS")]
    pub keep_tags: Option<String>,

    /// Skip child entries of multi-stream parents
    #[arg(long)]
    pub skip_children: bool,

    /// Skip the typed DELETE confirmation
    #[arg(long)]
    pub yes: bool,
}
