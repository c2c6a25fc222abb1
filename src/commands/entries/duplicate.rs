//! Cross-account entry duplication.
//!
//! Copies entries (content, thumbnails, captions, attachments, cue points)
//! from the selected profile's account into another account, preserving
//! multi-stream parent/child hierarchies through a source-ID to dest-ID
//! map. Parents are always created before their children.

use anyhow::{Context, Result};
use log::{info, warn};
use std::collections::{HashMap, HashSet};

use crate::api::services::media::EntryFields;
use crate::api::{cue_point_type, MediaEntry, PlatformClient};
use crate::cli::commands::entries::DuplicateArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;

pub async fn duplicate_command(
    config: &Config,
    profile: Option<&str>,
    args: DuplicateArgs,
) -> Result<()> {
    let source_profile = config.resolve_profile(profile)?;
    let dest_profile = config.resolve_profile(Some(&args.dest_profile))?;

    let source = PlatformClient::connect(&source_profile).await?;
    let dest = PlatformClient::connect(&dest_profile).await?;
    println!(
        "Copying from partner {} to partner {}",
        source.partner_id(),
        dest.partner_id()
    );

    let selector = args.selector.to_selector()?;
    let selected = selector.resolve_entries(&source).await?;
    if selected.is_empty() {
        println!("No entries found matching the selection. Exiting.");
        return Ok(());
    }

    // Expand with children of multi-stream parents, then order parents
    // first so the hierarchy can be rebuilt on the destination side.
    let ordered = expand_and_order(&source, selected).await?;
    println!("{} entries to copy (children included).", ordered.len());

    let mut id_map: HashMap<String, String> = HashMap::new();
    let mut rows = Vec::new();

    for entry in &ordered {
        if id_map.contains_key(&entry.id) {
            continue;
        }
        match copy_entry(&source, &dest, entry, &args, config, &id_map).await {
            Ok(copied) => {
                println!(
                    "✓ {} -> {} (cue points: {}, captions: {}, attachments: {})",
                    entry.id, copied.dest_id, copied.cue_points, copied.captions, copied.attachments
                );
                id_map.insert(entry.id.clone(), copied.dest_id.clone());
                rows.push(vec![
                    entry.id.clone(),
                    copied.dest_id,
                    entry.name.clone(),
                    copied.cue_points.to_string(),
                    copied.captions.to_string(),
                    copied.attachments.to_string(),
                    "COPIED".to_string(),
                ]);
            }
            Err(err) => {
                warn!("Failed to copy {}: {:#}", entry.id, err);
                println!("✗ Failed to copy {}: {}", entry.id, err);
                rows.push(vec![
                    entry.id.clone(),
                    String::new(),
                    entry.name.clone(),
                    "0".into(),
                    "0".into(),
                    "0".into(),
                    format!("FAILED: {}", err),
                ]);
            }
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "cross_account_duplication"),
        &[
            "source_entry_id",
            "dest_entry_id",
            "title",
            "cue_points_copied",
            "captions_copied",
            "attachments_copied",
            "status",
        ],
        rows,
    )?;
    println!(
        "\n{} of {} entries copied. Report saved to {:?}.",
        id_map.len(),
        ordered.len(),
        path
    );
    Ok(())
}

/// Pull in children of every selected parent and order parents first.
async fn expand_and_order(
    source: &PlatformClient,
    selected: Vec<MediaEntry>,
) -> Result<Vec<MediaEntry>> {
    let mut seen: HashSet<String> = selected.iter().map(|e| e.id.clone()).collect();
    let mut parents = Vec::new();
    let mut children = Vec::new();

    for entry in selected {
        if entry.is_child() {
            children.push(entry);
        } else {
            let found = source.media().children(&entry.id).await?;
            parents.push(entry);
            for child in found {
                if seen.insert(child.id.clone()) {
                    children.push(child);
                }
            }
        }
    }

    parents.extend(children);
    Ok(parents)
}

struct Copied {
    dest_id: String,
    cue_points: usize,
    captions: usize,
    attachments: usize,
}

async fn copy_entry(
    source: &PlatformClient,
    dest: &PlatformClient,
    entry: &MediaEntry,
    args: &DuplicateArgs,
    config: &Config,
    id_map: &HashMap<String, String>,
) -> Result<Copied> {
    // Largest flavor wins; transcoding on the destination side rebuilds
    // the ladder from it.
    let flavors = source.flavors().list(&entry.id).await?;
    let best = flavors
        .iter()
        .max_by_key(|f| f.byte_size())
        .context("entry has no flavors to copy")?;
    let source_url = source.flavors().get_url(&best.id).await?;

    let tags = match (&entry.tags, &args.dest_tag) {
        (Some(tags), Some(extra)) if !tags.trim().is_empty() => {
            Some(format!("{},{}", tags.trim(), extra))
        }
        (_, Some(extra)) => Some(extra.clone()),
        (tags, None) => tags.clone(),
    };

    let fields = EntryFields {
        name: Some(entry.name.clone()),
        description: entry.description.clone(),
        tags,
        user_id: args
            .dest_owner
            .clone()
            .or_else(|| entry.user_id.clone()),
        entitled_users_edit: args
            .dest_coeditors
            .as_deref()
            .map(|raw| split_ids(raw).join(",")),
        entitled_users_publish: args
            .dest_copublishers
            .as_deref()
            .map(|raw| split_ids(raw).join(",")),
        media_type: entry.media_type,
        parent_entry_id: entry
            .parent_entry_id
            .as_ref()
            .and_then(|source_parent| id_map.get(source_parent))
            .cloned(),
    };

    let created = dest.media().add(&fields).await?;
    dest.media()
        .add_content_from_url(&created.id, &source_url)
        .await?;
    info!("Created destination entry {} for {}", created.id, entry.id);

    // Thumbnails
    for thumb in source.thumbs().list(&entry.id).await? {
        match source.thumbs().get_url(&thumb.id).await {
            Ok(url) => {
                if let Err(err) = dest.thumbs().add_from_url(&created.id, &url).await {
                    warn!("Thumbnail copy failed for {}: {}", entry.id, err);
                }
            }
            Err(err) => warn!("Thumbnail URL lookup failed for {}: {}", entry.id, err),
        }
    }

    // Captions
    let mut captions_copied = 0usize;
    for caption in source.captions().list(&entry.id).await? {
        if args.skip_asr_captions
            && caption.label.as_deref() == Some(config.settings.caption_label.as_str())
        {
            println!("⏭ Skipping auto-generated caption on {}", entry.id);
            continue;
        }
        let url = source.captions().get_url(&caption.id).await?;
        dest.captions()
            .add_from_url(&created.id, &caption, &url)
            .await?;
        captions_copied += 1;
    }

    // Attachments
    let mut attachments_copied = 0usize;
    if !args.skip_attachments {
        for attachment in source.attachments().list(&entry.id).await? {
            let url = source.attachments().get_url(&attachment.id).await?;
            dest.attachments()
                .add_from_url(&created.id, &attachment, &url)
                .await?;
            attachments_copied += 1;
        }
    }

    // Cue points; quiz answers only on request
    let mut cue_points_copied = 0usize;
    for cue in source.cue_points().list_for_entry(&entry.id).await? {
        if cue.cue_point_type == cue_point_type::QUIZ_ANSWER && !args.copy_quiz_answers {
            continue;
        }
        match dest.cue_points().add_copy(&cue, &created.id).await {
            Ok(_) => cue_points_copied += 1,
            Err(err) => {
                warn!("Cue point {} copy failed: {}", cue.id, err);
                println!("✗ Failed to copy {} {}: {}", cue.cue_point_type, cue.id, err);
            }
        }
    }

    Ok(Copied {
        dest_id: created.id,
        cue_points: cue_points_copied,
        captions: captions_copied,
        attachments: attachments_copied,
    })
}
