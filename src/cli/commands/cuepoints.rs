use clap::{Args, Subcommand, ValueEnum};

#[derive(Args)]
pub struct CuePointCommands {
    #[command(subcommand)]
    pub command: CuePointSubcommands,
}

#[derive(Subcommand)]
pub enum CuePointSubcommands {
    /// Delete cue points of one kind from a set of entries
    Delete(DeleteArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CuePointKind {
    /// Chapter markers
    Chapters,
    /// Quiz questions
    QuizQuestions,
    /// Quiz answers (also removes the matching quiz attempts)
    QuizAnswers,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Comma-delimited list of entry IDs (prompted when omitted)
    #[arg(long, value_name = "IDS")]
    pub entry_ids: Option<String>,

    /// Kind of cue point to delete (prompted when omitted)
    #[arg(long, value_enum)]
    pub kind: Option<CuePointKind>,

    /// Delete without per-entry confirmation
    #[arg(long)]
    pub yes: bool,
}
