use clap::{Parser, Subcommand};

use super::commands::auth::AuthCommands;
use super::commands::captions::CaptionCommands;
use super::commands::categories::CategoryCommands;
use super::commands::channels::ChannelCommands;
use super::commands::chapters::ChapterCommands;
use super::commands::cuepoints::CuePointCommands;
use super::commands::entries::EntryCommands;
use super::commands::flavors::FlavorCommands;
use super::commands::playlists::PlaylistCommands;
use super::commands::quizzes::QuizCommands;
use super::commands::reports::ReportCommands;
use super::commands::retention::RetentionCommands;

#[derive(Parser)]
#[command(name = "mediactl")]
#[command(about = "Bulk admin tools for a hosted video platform")]
#[command(version)]
pub struct Cli {
    /// Named credentials profile (defaults to env vars, then the current profile)
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Credentials profile management
    Auth(AuthCommands),
    /// Bulk operations on media entries
    Entries(EntryCommands),
    /// Chapter markers
    Chapters(ChapterCommands),
    /// Cue point cleanup
    Cuepoints(CuePointCommands),
    /// Quiz entry tools
    Quizzes(QuizCommands),
    /// Caption asset tools
    Captions(CaptionCommands),
    /// Flavor asset cleanup
    Flavors(FlavorCommands),
    /// Bulk channel creation
    Channels(ChannelCommands),
    /// Category membership and publication tools
    Categories(CategoryCommands),
    /// Playlist duplication
    Playlists(PlaylistCommands),
    /// Usage and audit reports
    Reports(ReportCommands),
    /// Media retention auditing
    Retention(RetentionCommands),
}
