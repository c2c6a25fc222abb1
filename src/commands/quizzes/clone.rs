//! Clone quiz entries together with their question cue points.

use anyhow::Result;
use log::info;

use crate::api::client::as_fault;
use crate::api::services::media::EntryFields;
use crate::api::{cue_point_type, PlatformClient};
use crate::cli::commands::quizzes::CloneArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;

/// Merge an extra tag into an existing comma-delimited tag string.
pub fn append_tag(current: Option<&str>, extra: &str) -> String {
    match current.map(str::trim).filter(|t| !t.is_empty()) {
        Some(tags) => format!("{},{}", tags, extra),
        None => extra.to_string(),
    }
}

pub async fn clone_command(config: &Config, profile: Option<&str>, args: CloneArgs) -> Result<()> {
    let entry_ids = split_ids(&args.entry_ids);
    if entry_ids.is_empty() {
        println!("No valid entry IDs provided. Exiting.");
        return Ok(());
    }

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let mut rows = Vec::new();
    for entry_id in &entry_ids {
        match clone_one(&client, entry_id, args.add_tag.as_deref()).await {
            Ok(row) => rows.push(row),
            Err(err) if as_fault(&err).is_some() => {
                println!("✗ Error processing entry {}: {}", entry_id, err);
            }
            Err(err) => return Err(err),
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "quizzes_cloned"),
        &["Title", "Original Entry ID", "New Entry ID", "Number of Questions"],
        rows,
    )?;
    println!("All done! Results saved to {:?}.", path);
    Ok(())
}

async fn clone_one(
    client: &PlatformClient,
    entry_id: &str,
    add_tag: Option<&str>,
) -> Result<Vec<String>> {
    let cue_points = client.cue_points().list_for_entry(entry_id).await?;
    for cue in &cue_points {
        println!("CuePoint ID: {}, Type: {}", cue.id, cue.cue_point_type);
    }

    let question_ids: Vec<&str> = cue_points
        .iter()
        .filter(|cp| cp.cue_point_type == cue_point_type::QUIZ_QUESTION)
        .map(|cp| cp.id.as_str())
        .collect();
    println!(
        "Found {} quiz questions in entry {}.",
        question_ids.len(),
        entry_id
    );

    let cloned = client.media().clone_entry(entry_id).await?;
    info!("Cloned entry {} to {}", entry_id, cloned.id);
    println!("Cloned entry {} to new entry {}.", entry_id, cloned.id);

    if let Some(tag) = add_tag {
        let current = client.media().get_base(&cloned.id).await?;
        let fields = EntryFields {
            tags: Some(append_tag(current.tags.as_deref(), tag)),
            ..Default::default()
        };
        client.media().update(&cloned.id, &fields).await?;
        println!("Tag '{}' added to {}", tag, cloned.id);
    }

    for question_id in &question_ids {
        let copy = client.cue_points().clone_to(question_id, &cloned.id).await?;
        println!(
            "Cloned quiz question cue point {} to {} as {}.",
            question_id, cloned.id, copy.id
        );
    }

    let final_entry = client.media().get_base(&cloned.id).await?;
    println!("------------------------------------------------------");
    println!("SUMMARY:");
    println!("Title: {}", final_entry.name);
    println!("Original Entry ID: {}", entry_id);
    println!("New Entry ID: {}", cloned.id);
    println!("Quiz Questions Cloned: {}", question_ids.len());
    if let Some(tag) = add_tag {
        println!("Tag Added: {}", tag);
    }
    println!("------------------------------------------------------\n");

    Ok(vec![
        final_entry.name,
        entry_id.to_string(),
        cloned.id,
        question_ids.len().to_string(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_tag() {
        assert_eq!(append_tag(None, "copy"), "copy");
        assert_eq!(append_tag(Some(""), "copy"), "copy");
        assert_eq!(append_tag(Some("  "), "copy"), "copy");
        assert_eq!(append_tag(Some("a,b"), "copy"), "a,b,copy");
    }
}
