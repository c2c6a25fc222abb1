//! Unpublish and republish an entry in a category.
//!
//! Works around a portal issue where a published entry starts returning
//! "Access Denied": removing and re-adding the category association
//! clears it.

use anyhow::{bail, Context, Result};
use log::info;

use crate::api::{
    CategoryEntryFilter, CategoryFilter, PlatformClient, CATEGORY_ENTRY_ACTIVE,
};
use crate::cli::commands::categories::RepublishArgs;
use crate::config::Config;

pub async fn republish_command(
    config: &Config,
    profile: Option<&str>,
    args: RepublishArgs,
) -> Result<()> {
    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let category_id = match (args.category_id, &args.channel_name) {
        (Some(id), None) => {
            println!("✓ Using category ID: {}", id);
            id
        }
        (None, Some(name)) => {
            let full_name = format!("{}{}", config.channels.full_name_prefix, name);
            let filter = CategoryFilter {
                full_name_equal: Some(full_name.clone()),
                ..Default::default()
            };
            let matches = client.categories().list(&filter).await?;
            let category = matches
                .first()
                .with_context(|| format!("No category found with full name '{}'", full_name))?;
            println!("✓ Found category ID {} for '{}'", category.id, full_name);
            category.id
        }
        _ => bail!("Provide exactly one of --category-id or --channel-name"),
    };

    let check_filter = CategoryEntryFilter {
        category_id_equal: Some(category_id),
        entry_id_equal: Some(args.entry_id.clone()),
    };

    let existing = client.category_entries().list(&check_filter).await?;
    if existing.total_count == 0 {
        println!(
            "Entry {} does not appear to be in category {}. Proceeding with re-adding.",
            args.entry_id, category_id
        );
    } else {
        let active = existing
            .objects
            .first()
            .and_then(|ce| ce.status)
            .map(|status| status == CATEGORY_ENTRY_ACTIVE)
            .unwrap_or(false);

        if active {
            println!("Removing entry from category...");
            client
                .category_entries()
                .delete(category_id, &args.entry_id)
                .await
                .context("Could not remove entry from category")?;
            println!("✓ Removal successful.");

            let removed_check = client.category_entries().list(&check_filter).await?;
            if removed_check.total_count == 0 {
                println!(
                    "✓ Confirmed that entry {} is no longer in category {}",
                    args.entry_id, category_id
                );
            } else {
                bail!("Failed to confirm removal; entry still appears in the category");
            }
        } else {
            println!(
                "⚠ Entry is not in an active state for category {}. Skipping removal and proceeding with re-add.",
                category_id
            );
        }
    }

    println!("Adding entry to category...");
    client
        .category_entries()
        .add(category_id, &args.entry_id)
        .await
        .context("Could not re-add entry to category")?;

    let added_check = client.category_entries().list(&check_filter).await?;
    if added_check.total_count > 0 {
        info!("Republished {} in category {}", args.entry_id, category_id);
        println!(
            "✓ Confirmed that entry {} is now in category {}",
            args.entry_id, category_id
        );
    } else {
        bail!("Failed to confirm addition; entry still not appearing in the category");
    }
    Ok(())
}
