//! Entries whose media content was replaced after creation, from the
//! audit trail. Exported as an XLSX workbook.

use anyhow::Result;

use crate::api::PlatformClient;
use crate::cli::commands::reports::ReplacementsArgs;
use crate::config::Config;
use crate::report::{now_stamp, reports_dir, write_xlsx};
use crate::timeutil::{format_epoch, parse_tz};

const HEADERS: &[&str] = &["entry_id", "title", "action", "user_id", "timestamp"];

pub async fn replacements_command(
    config: &Config,
    profile: Option<&str>,
    args: ReplacementsArgs,
) -> Result<()> {
    let tz = parse_tz(&config.settings.timezone)?;
    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let entries = selector.resolve_entries(&client).await?;
    if entries.is_empty() {
        println!("No entries found matching the criteria.");
        return Ok(());
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for entry in &entries {
        println!("Checking: {} ({})", entry.id, entry.name);
        let created_at = entry.created_at.unwrap_or(0);

        let replacements = client
            .audit_trail()
            .replacements_for(&entry.id, created_at)
            .await?;
        if replacements.is_empty() {
            continue;
        }

        rows.push(vec![
            entry.id.clone(),
            entry.name.clone(),
            "creation".to_string(),
            entry.creator_id.clone().unwrap_or_default(),
            format_epoch(created_at, tz),
        ]);
        for event in &replacements {
            rows.push(vec![
                entry.id.clone(),
                entry.name.clone(),
                "replacement".to_string(),
                event.user_id.clone().unwrap_or_default(),
                event
                    .created_at
                    .map(|ts| format_epoch(ts, tz))
                    .unwrap_or_default(),
            ]);
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = dir.join(format!("{}_ReplacementsAudit.xlsx", now_stamp()));
    write_xlsx(&path, HEADERS, &rows)?;
    println!(
        "\n✓ Exported replacements report ({} rows) to: {:?}",
        rows.len(),
        path
    );
    Ok(())
}
