//! Bulk entry deletion with preview/result reports.
//!
//! Nothing is mutated until the preview CSV is on disk and the operator
//! has typed DELETE or RECYCLE.

use anyhow::Result;
use colored::Colorize;
use log::info;

use crate::api::client::as_fault;
use crate::api::PlatformClient;
use crate::cli::commands::entries::DeleteArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::ui::confirm_typed_choice;

const HEADERS: &[&str] = &[
    "entry_id",
    "entry_name",
    "owner_user_id",
    "duration_seconds",
    "plays",
    "status",
];

struct Row {
    entry_id: String,
    entry_name: String,
    owner: String,
    duration: String,
    plays: String,
    status: String,
}

impl Row {
    fn found(entry: &crate::api::MediaEntry) -> Self {
        Self {
            entry_id: entry.id.clone(),
            entry_name: entry.name.clone(),
            owner: entry.user_id.clone().unwrap_or_default(),
            duration: entry.duration.map(|d| d.to_string()).unwrap_or_default(),
            plays: entry.plays.map(|p| p.to_string()).unwrap_or_default(),
            status: "FOUND".to_string(),
        }
    }

    fn not_found(entry_id: &str) -> Self {
        Self {
            entry_id: entry_id.to_string(),
            entry_name: String::new(),
            owner: String::new(),
            duration: String::new(),
            plays: String::new(),
            status: "NOT FOUND".to_string(),
        }
    }

    fn to_record(&self) -> Vec<String> {
        vec![
            self.entry_id.clone(),
            self.entry_name.clone(),
            self.owner.clone(),
            self.duration.clone(),
            self.plays.clone(),
            self.status.clone(),
        ]
    }
}

pub async fn delete_command(
    config: &Config,
    profile: Option<&str>,
    args: DeleteArgs,
) -> Result<()> {
    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let entry_ids = selector.resolve_ids(&client).await?;
    if entry_ids.is_empty() {
        println!("No entries selected. Exiting.");
        return Ok(());
    }

    // Collect entry info before touching anything
    let mut rows = Vec::with_capacity(entry_ids.len());
    for entry_id in &entry_ids {
        match client.media().get_base(entry_id).await {
            Ok(entry) => rows.push(Row::found(&entry)),
            Err(err) if as_fault(&err).is_some_and(|f| f.is_not_found()) => {
                println!("⚠ Could not retrieve info for entry {}; skipping", entry_id);
                rows.push(Row::not_found(entry_id));
            }
            Err(err) => return Err(err),
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let stamp = now_stamp();
    let preview = write_csv(
        csv_path(&dir, &stamp, "deleted_entries_PREVIEW"),
        HEADERS,
        rows.iter().map(Row::to_record),
    )?;
    println!("Wrote preview to {:?}", preview);

    if rows.iter().all(|r| r.status != "FOUND") {
        println!("No valid entries to delete. Exiting.");
        return Ok(());
    }

    let found = rows.iter().filter(|r| r.status == "FOUND").count();
    println!(
        "\n{}",
        format!("{} entries are about to be removed.", found).red().bold()
    );

    let action = if args.delete {
        "DELETE".to_string()
    } else if args.recycle {
        "RECYCLE".to_string()
    } else {
        match confirm_typed_choice(
            "Type DELETE to permanently delete these entries, or RECYCLE to move them to the owners' recycle bins",
            &["DELETE", "RECYCLE"],
        )? {
            Some(action) => action,
            None => {
                println!("Aborted. No entries deleted or recycled.");
                return Ok(());
            }
        }
    };
    let action_log = if action == "DELETE" { "DELETED" } else { "RECYCLED" };

    let mut processed = 0usize;
    for row in rows.iter_mut().filter(|r| r.status == "FOUND") {
        let result = if action == "DELETE" {
            client.media().delete(&row.entry_id).await
        } else {
            client.media().recycle(&row.entry_id).await
        };

        match result {
            Ok(entry) => {
                let display = entry.display_in_search.unwrap_or_default();
                let status = entry.status.unwrap_or_default();
                info!("{} entry {}", action_log, row.entry_id);
                println!(
                    "[{}] Entry {} — displayInSearch {} — status {}",
                    action_log, row.entry_id, display, status
                );
                row.status =
                    format!("{} - displayInSearch {} - status {}", action_log, display, status);
                processed += 1;
            }
            Err(err) if as_fault(&err).is_some() => {
                // Usually already gone
                println!(
                    "⚠ Entry {} could not be {}: {}",
                    row.entry_id,
                    action_log.to_lowercase(),
                    err
                );
                row.status = format!("ALREADY {}", action_log);
            }
            Err(err) => return Err(err),
        }
    }

    println!(
        "\n{} entries successfully {}.",
        processed,
        action_log.to_lowercase()
    );

    let result = write_csv(
        csv_path(&dir, &stamp, "deleted_entries_RESULT"),
        HEADERS,
        rows.iter().map(Row::to_record),
    )?;
    println!("Wrote results to {:?}", result);
    Ok(())
}
