//! Show or hide captions matching a label on the player.

use anyhow::Result;
use log::info;

use crate::api::PlatformClient;
use crate::cli::commands::captions::SetVisibilityArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::ui::confirm;

pub async fn set_visibility_command(
    config: &Config,
    profile: Option<&str>,
    args: SetVisibilityArgs,
) -> Result<()> {
    let label = args
        .label
        .clone()
        .unwrap_or_else(|| config.settings.caption_label.clone());
    let target_visible = args.show;

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let entries = selector.resolve_entries(&client).await?;
    if entries.is_empty() {
        println!("No entries found. Exiting.");
        return Ok(());
    }

    // Collect matching captions first so the operator sees the blast
    // radius before anything changes.
    let mut planned: Vec<(String, String, String)> = Vec::new();
    for entry in &entries {
        for caption in client.captions().list(&entry.id).await? {
            if caption.label.as_deref() != Some(label.as_str()) {
                continue;
            }
            if caption.display_on_player == target_visible {
                continue; // already in the desired state
            }
            planned.push((entry.id.clone(), entry.name.clone(), caption.id));
        }
    }

    if planned.is_empty() {
        println!("No captions labeled '{}' need a change. Exiting.", label);
        return Ok(());
    }

    let verb = if target_visible { "show" } else { "hide" };
    println!("{} captions labeled '{}' will be set to {}.", planned.len(), label, verb);
    if !args.yes
        && !confirm(
            &format!("Apply the change to {} captions?", planned.len()),
            false,
        )?
    {
        println!("No changes made.");
        return Ok(());
    }

    let mut rows = Vec::new();
    for (entry_id, entry_name, caption_id) in &planned {
        match client
            .captions()
            .set_visibility(caption_id, target_visible)
            .await
        {
            Ok(_) => {
                info!("Set displayOnPlayer={} on {}", target_visible, caption_id);
                println!("Updated caption {} on entry {}", caption_id, entry_id);
                rows.push(vec![
                    entry_id.clone(),
                    entry_name.clone(),
                    caption_id.clone(),
                    label.clone(),
                    format!("displayOnPlayer={}", target_visible),
                ]);
            }
            Err(err) => {
                println!("✗ Error updating caption {}: {}", caption_id, err);
                rows.push(vec![
                    entry_id.clone(),
                    entry_name.clone(),
                    caption_id.clone(),
                    label.clone(),
                    format!("FAILED: {}", err),
                ]);
            }
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "caption_visibility"),
        &["entry_id", "entry_name", "caption_id", "label", "result"],
        rows,
    )?;
    println!("\nDone. Report saved to {:?}.", path);
    Ok(())
}
