use anyhow::Result;
use clap::Parser;
use log::info;

mod api;
mod cli;
mod commands;
mod config;
mod report;
mod select;
mod tabular;
mod timeutil;
mod ui;

use cli::commands::auth::AuthSubcommands;
use cli::commands::captions::CaptionSubcommands;
use cli::commands::categories::CategorySubcommands;
use cli::commands::channels::ChannelSubcommands;
use cli::commands::chapters::ChapterSubcommands;
use cli::commands::cuepoints::CuePointSubcommands;
use cli::commands::entries::EntrySubcommands;
use cli::commands::flavors::FlavorSubcommands;
use cli::commands::playlists::PlaylistSubcommands;
use cli::commands::quizzes::QuizSubcommands;
use cli::commands::reports::ReportSubcommands;
use cli::commands::retention::RetentionSubcommands;
use cli::{Cli, Commands};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Log to a file, truncated on each run; the console stays for the
    // operator-facing output.
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("mediactl.log")?;
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    // Credentials may come from a .env next to the working directory
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    info!("Starting mediactl");

    let config = Config::load()?;
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Auth(auth) => match auth.command {
            AuthSubcommands::Add(args) => commands::auth::add_command(args).await,
            AuthSubcommands::List => commands::auth::list_command().await,
            AuthSubcommands::Select { name } => commands::auth::select_command(name).await,
            AuthSubcommands::Remove { name, force } => {
                commands::auth::remove_command(name, force).await
            }
            AuthSubcommands::Status => commands::auth::status_command().await,
        },
        Commands::Entries(entries) => match entries.command {
            EntrySubcommands::Delete(args) => {
                commands::entries::delete_command(&config, profile, args).await
            }
            EntrySubcommands::Rename(args) => {
                commands::entries::rename_command(&config, profile, args).await
            }
            EntrySubcommands::Download(args) => {
                commands::entries::download_command(&config, profile, args).await
            }
            EntrySubcommands::Duplicate(args) => {
                commands::entries::duplicate_command(&config, profile, args).await
            }
        },
        Commands::Chapters(chapters) => match chapters.command {
            ChapterSubcommands::Add(args) => {
                commands::chapters::add_command(&config, profile, args).await
            }
        },
        Commands::Cuepoints(cuepoints) => match cuepoints.command {
            CuePointSubcommands::Delete(args) => {
                commands::cuepoints::delete_command(&config, profile, args).await
            }
        },
        Commands::Quizzes(quizzes) => match quizzes.command {
            QuizSubcommands::Clone(args) => {
                commands::quizzes::clone_command(&config, profile, args).await
            }
            QuizSubcommands::DeleteAttempts(args) => {
                commands::quizzes::delete_attempts_command(&config, profile, args).await
            }
        },
        Commands::Captions(captions) => match captions.command {
            CaptionSubcommands::Download(args) => {
                commands::captions::download_command(&config, profile, args).await
            }
            CaptionSubcommands::SetVisibility(args) => {
                commands::captions::set_visibility_command(&config, profile, args).await
            }
        },
        Commands::Flavors(flavors) => match flavors.command {
            FlavorSubcommands::Delete(args) => {
                commands::flavors::delete_command(&config, profile, args).await
            }
        },
        Commands::Channels(channels) => match channels.command {
            ChannelSubcommands::Create(args) => {
                commands::channels::create_command(&config, profile, args).await
            }
        },
        Commands::Categories(categories) => match categories.command {
            CategorySubcommands::Affiliations(args) => {
                commands::categories::affiliations_command(&config, profile, args).await
            }
            CategorySubcommands::Republish(args) => {
                commands::categories::republish_command(&config, profile, args).await
            }
        },
        Commands::Playlists(playlists) => match playlists.command {
            PlaylistSubcommands::Duplicate(args) => {
                commands::playlists::duplicate_command(&config, profile, args).await
            }
        },
        Commands::Reports(reports) => match reports.command {
            ReportSubcommands::Usage(args) => {
                commands::reports::usage_command(&config, profile, args).await
            }
            ReportSubcommands::Replacements(args) => {
                commands::reports::replacements_command(&config, profile, args).await
            }
        },
        Commands::Retention(retention) => match retention.command {
            RetentionSubcommands::Report(args) => {
                commands::retention::report_command(&config, profile, args).await
            }
        },
    }
}
