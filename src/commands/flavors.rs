//! Delete non-source flavors, preserving each entry's source rendition.

use anyhow::Result;
use colored::Colorize;
use log::info;
use std::collections::HashSet;

use crate::api::services::assets::pick_source_flavor;
use crate::api::{FlavorAsset, MediaEntry, PlatformClient};
use crate::cli::commands::flavors::DeleteArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;
use crate::ui::confirm_typed;

const HEADERS: &[&str] = &[
    "entry_id",
    "entry_name",
    "flavor_id",
    "flavor_tags",
    "size_bytes",
    "decision",
    "status",
];

struct PlannedFlavor {
    entry_id: String,
    entry_name: String,
    flavor_id: String,
    tags: String,
    size_bytes: i64,
    decision: String,
    delete: bool,
    status: String,
}

impl PlannedFlavor {
    fn to_record(&self) -> Vec<String> {
        vec![
            self.entry_id.clone(),
            self.entry_name.clone(),
            self.flavor_id.clone(),
            self.tags.clone(),
            self.size_bytes.to_string(),
            self.decision.clone(),
            self.status.clone(),
        ]
    }
}

/// Split an entry's flavors into keep/delete decisions. `keep_tags`
/// protects extra renditions (e.g. `mobile`) beyond the source flavor.
fn plan_entry(entry: &MediaEntry, flavors: &[FlavorAsset], keep_tags: &[String]) -> Vec<PlannedFlavor> {
    let mut planned = Vec::new();

    if flavors.len() <= 1 {
        // Never strip an entry down past its only rendition
        for flavor in flavors {
            planned.push(plan_row(entry, flavor, "keep (only flavor)", false));
        }
        return planned;
    }

    let source_id = pick_source_flavor(flavors).map(|(f, reason)| (f.id.clone(), reason));

    for flavor in flavors {
        if let Some((id, reason)) = &source_id {
            if &flavor.id == id {
                planned.push(plan_row(
                    entry,
                    flavor,
                    &format!("keep (source: {})", reason.as_str()),
                    false,
                ));
                continue;
            }
        }

        let tag_protected = keep_tags.iter().any(|keep| {
            flavor
                .tags
                .as_deref()
                .map(|tags| tags.split(',').any(|t| t.trim().eq_ignore_ascii_case(keep)))
                .unwrap_or(false)
        });
        if tag_protected {
            planned.push(plan_row(entry, flavor, "keep (tag match)", false));
        } else {
            planned.push(plan_row(entry, flavor, "delete", true));
        }
    }

    planned
}

fn plan_row(entry: &MediaEntry, flavor: &FlavorAsset, decision: &str, delete: bool) -> PlannedFlavor {
    PlannedFlavor {
        entry_id: entry.id.clone(),
        entry_name: entry.name.clone(),
        flavor_id: flavor.id.clone(),
        tags: flavor.tags.clone().unwrap_or_default(),
        size_bytes: flavor.byte_size(),
        decision: decision.to_string(),
        delete,
        status: "PLANNED".to_string(),
    }
}

pub async fn delete_command(
    config: &Config,
    profile: Option<&str>,
    args: DeleteArgs,
) -> Result<()> {
    let keep_tags: Vec<String> = args
        .keep_tags
        .as_deref()
        .map(split_ids)
        .unwrap_or_default();

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let mut entries = selector.resolve_entries(&client).await?;
    if entries.is_empty() {
        println!("No entries found. Exiting.");
        return Ok(());
    }

    // Multi-stream parents keep their media in child entries
    if !args.skip_children {
        let known: HashSet<String> = entries.iter().map(|e| e.id.clone()).collect();
        let mut children = Vec::new();
        for entry in &entries {
            if !entry.is_child() {
                for child in client.media().children(&entry.id).await? {
                    if !known.contains(&child.id) {
                        children.push(child);
                    }
                }
            }
        }
        if !children.is_empty() {
            println!("Including {} child entries.", children.len());
            entries.extend(children);
        }
    }

    let mut planned = Vec::new();
    for entry in &entries {
        let flavors = client.flavors().list(&entry.id).await?;
        if flavors.len() <= 1 {
            println!("⏭ Entry {} has {} flavor(s); skipping", entry.id, flavors.len());
        }
        planned.extend(plan_entry(entry, &flavors, &keep_tags));
    }

    let to_delete = planned.iter().filter(|p| p.delete).count();
    let reclaim: i64 = planned.iter().filter(|p| p.delete).map(|p| p.size_bytes).sum();

    let dir = reports_dir(&config.settings.reports_dir)?;
    let stamp = now_stamp();
    let preview = write_csv(
        csv_path(&dir, &stamp, "deleted_flavors_PREVIEW"),
        HEADERS,
        planned.iter().map(PlannedFlavor::to_record),
    )?;
    println!(
        "\n{} Preview: {:?}",
        format!(
            "{} flavors would be deleted ({:.2} GB).",
            to_delete,
            reclaim as f64 / 1e9
        )
        .red()
        .bold(),
        preview
    );

    if to_delete == 0 {
        println!("Nothing to delete. Exiting.");
        return Ok(());
    }

    if !confirm_typed(
        &format!("Type DELETE to remove {} flavors", to_delete),
        "DELETE",
        args.yes,
    )? {
        println!("Aborted. No flavors deleted.");
        return Ok(());
    }

    let mut deleted = 0usize;
    for plan in planned.iter_mut() {
        if !plan.delete {
            plan.status = "KEPT".to_string();
            continue;
        }
        match client.flavors().delete(&plan.flavor_id).await {
            Ok(()) => {
                info!("Deleted flavor {} of entry {}", plan.flavor_id, plan.entry_id);
                println!("Deleted flavor {} (entry {})", plan.flavor_id, plan.entry_id);
                plan.status = "DELETED".to_string();
                deleted += 1;
            }
            Err(err) => {
                println!("✗ Could not delete flavor {}: {}", plan.flavor_id, err);
                plan.status = format!("FAILED: {}", err);
            }
        }
    }

    let result = write_csv(
        csv_path(&dir, &stamp, "deleted_flavors_RESULT"),
        HEADERS,
        planned.iter().map(PlannedFlavor::to_record),
    )?;
    println!("\n{} flavors deleted. Results: {:?}", deleted, result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> MediaEntry {
        MediaEntry {
            id: "0_e".into(),
            name: "Lecture".into(),
            ..Default::default()
        }
    }

    fn flavor(id: &str, original: bool, tags: Option<&str>, bytes: i64) -> FlavorAsset {
        FlavorAsset {
            id: id.into(),
            entry_id: "0_e".into(),
            is_original: original,
            tags: tags.map(Into::into),
            size_in_bytes: Some(bytes),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_flavor_never_deleted() {
        let plans = plan_entry(&entry(), &[flavor("1_a", false, None, 10)], &[]);
        assert_eq!(plans.len(), 1);
        assert!(!plans[0].delete);
    }

    #[test]
    fn test_source_kept_rest_deleted() {
        let flavors = vec![
            flavor("1_src", true, Some("source"), 900),
            flavor("1_b", false, Some("web"), 100),
            flavor("1_c", false, Some("mobile"), 50),
        ];
        let plans = plan_entry(&entry(), &flavors, &[]);
        let deleted: Vec<&str> = plans
            .iter()
            .filter(|p| p.delete)
            .map(|p| p.flavor_id.as_str())
            .collect();
        assert_eq!(deleted, vec!["1_b", "1_c"]);
    }

    #[test]
    fn test_keep_tags_protect_flavors() {
        let flavors = vec![
            flavor("1_src", true, None, 900),
            flavor("1_b", false, Some("web, Mobile"), 100),
            flavor("1_c", false, Some("web"), 50),
        ];
        let plans = plan_entry(&entry(), &flavors, &["mobile".to_string()]);
        let deleted: Vec<&str> = plans
            .iter()
            .filter(|p| p.delete)
            .map(|p| p.flavor_id.as_str())
            .collect();
        assert_eq!(deleted, vec!["1_c"]);
    }
}
