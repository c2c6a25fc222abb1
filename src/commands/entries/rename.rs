use anyhow::{bail, Result};
use log::info;

use crate::api::services::media::EntryFields;
use crate::api::PlatformClient;
use crate::cli::commands::entries::RenameArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::ui::confirm;

pub async fn rename_command(
    config: &Config,
    profile: Option<&str>,
    args: RenameArgs,
) -> Result<()> {
    let (text, is_prefix) = match (&args.prefix, &args.suffix) {
        (Some(text), None) => (text.clone(), true),
        (None, Some(text)) => (text.clone(), false),
        _ => bail!("Provide exactly one of --prefix or --suffix"),
    };

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let entries = selector.resolve_entries(&client).await?;
    if entries.is_empty() {
        println!("No entries found. Exiting.");
        return Ok(());
    }

    let question = format!(
        "Add [{}] to the titles of {} ({} entries)?",
        text,
        selector.describe(),
        entries.len()
    );
    if !args.yes && !confirm(&question, false)? {
        println!("Operation cancelled.");
        return Ok(());
    }

    let mut rows = Vec::with_capacity(entries.len());
    for entry in &entries {
        let new_title = if is_prefix {
            format!("{}{}", text, entry.name)
        } else {
            format!("{}{}", entry.name, text)
        };

        let fields = EntryFields {
            name: Some(new_title.clone()),
            ..Default::default()
        };
        client.media().update(&entry.id, &fields).await?;

        info!("Renamed entry {}", entry.id);
        println!("Updated entry {}: '{}' -> '{}'", entry.id, entry.name, new_title);
        rows.push(vec![entry.id.clone(), entry.name.clone(), new_title]);
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "entries_renamed"),
        &["Entry ID", "Original Title", "New Title"],
        rows,
    )?;
    println!("Renaming complete. Results saved to {:?}.", path);
    Ok(())
}
