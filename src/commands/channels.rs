//! Bulk portal channel creation from a CSV or XLSX file.
//!
//! Every row is validated and checked against existing channel names
//! before the first write; a half-created batch is worse than a rejected
//! file.

use anyhow::{bail, Context, Result};
use log::info;
use std::collections::HashSet;

use crate::api::services::category::{permission_level, NewCategory};
use crate::api::{CategoryFilter, PlatformClient};
use crate::cli::commands::channels::CreateArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::tabular::read_table;

#[derive(Debug, Clone)]
pub struct ChannelRow {
    pub name: String,
    pub owner: String,
    pub members: Vec<String>,
    pub privacy: i64,
}

/// Validate every row up front. Row numbers are 2-based to match the
/// operator's spreadsheet view.
pub fn parse_rows(
    headers: &[String],
    rows: &[Vec<String>],
    name_header: &str,
    owner_header: &str,
    members_header: &str,
    privacy_header: &str,
) -> Result<Vec<ChannelRow>> {
    let index_of = |header: &str| headers.iter().position(|h| h == header);

    let name_idx = index_of(name_header);
    let owner_idx = index_of(owner_header);
    let privacy_idx = index_of(privacy_header);
    let members_idx = index_of(members_header);

    let missing: Vec<&str> = [
        (name_header, name_idx),
        (owner_header, owner_idx),
        (privacy_header, privacy_idx),
    ]
    .iter()
    .filter(|(_, idx)| idx.is_none())
    .map(|(h, _)| *h)
    .collect();
    if !missing.is_empty() {
        bail!(
            "Missing expected column headers in input file: {}",
            missing.join(", ")
        );
    }
    let (name_idx, owner_idx, privacy_idx) =
        (name_idx.unwrap(), owner_idx.unwrap(), privacy_idx.unwrap());

    let mut parsed = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 2;
        let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");

        let name = cell(name_idx);
        let owner = cell(owner_idx);
        let privacy_raw = cell(privacy_idx);

        let mut missing_fields = Vec::new();
        if name.is_empty() {
            missing_fields.push(name_header);
        }
        if owner.is_empty() {
            missing_fields.push(owner_header);
        }
        if privacy_raw.is_empty() {
            missing_fields.push(privacy_header);
        }
        if !missing_fields.is_empty() {
            bail!(
                "Row {}: Missing field(s): {} (channel: '{}')",
                row_no,
                missing_fields.join(", "),
                if name.is_empty() { "<unnamed>" } else { name }
            );
        }

        let privacy: i64 = match privacy_raw {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            other => bail!(
                "Row {}: Invalid privacy value '{}'. Must be 1, 2, or 3.",
                row_no,
                other
            ),
        };

        let members: Vec<String> = members_idx
            .map(|idx| {
                cell(idx)
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if members.is_empty() {
            println!("⚠ Row {}: No members specified for channel '{}'.", row_no, name);
        }

        parsed.push(ChannelRow {
            name: name.to_string(),
            owner: owner.to_string(),
            members,
            privacy,
        });
    }

    Ok(parsed)
}

/// Channel names already in use, taken from the last path segment of
/// every category under the configured prefix.
async fn existing_channel_names(
    client: &PlatformClient,
    full_name_prefix: &str,
) -> Result<HashSet<String>> {
    let filter = CategoryFilter {
        full_name_starts_with: Some(full_name_prefix.to_string()),
        ..Default::default()
    };
    let mut names = HashSet::new();
    for category in client.categories().list(&filter).await? {
        if let Some(full_name) = &category.full_name {
            let full_name = full_name.trim();
            if full_name.starts_with(full_name_prefix) {
                if let Some(last) = full_name.split('>').next_back() {
                    names.insert(last.trim().to_string());
                }
            }
        }
    }
    Ok(names)
}

pub async fn create_command(
    config: &Config,
    profile: Option<&str>,
    args: CreateArgs,
) -> Result<()> {
    let parent_id = args
        .parent_id
        .or(config.channels.parent_id)
        .context("No parent category configured; pass --parent-id or set channels.parent_id")?;

    let (headers, raw_rows) = read_table(&args.input)?;
    let rows = parse_rows(
        &headers,
        &raw_rows,
        &args.name_header,
        &args.owner_header,
        &args.members_header,
        &args.privacy_header,
    )?;
    if rows.is_empty() {
        println!("No channel rows in {:?}. Exiting.", args.input);
        return Ok(());
    }
    println!("Using input file: {:?}", args.input);

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let existing = existing_channel_names(&client, &config.channels.full_name_prefix).await?;
    let duplicates: Vec<&str> = rows
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| existing.contains(*name))
        .collect();
    if !duplicates.is_empty() {
        println!("🚫 The following channel names already exist and cannot be reused:");
        for name in &duplicates {
            println!("  - {}", name);
        }
        bail!("No channels were created. Remove or rename the duplicates and try again.");
    }

    let mut results = Vec::new();
    for row in &rows {
        let category = NewCategory {
            name: row.name.clone(),
            parent_id,
            owner: row.owner.clone(),
            privacy: row.privacy,
            privacy_context: Some(config.channels.privacy_context.clone()),
            user_join_policy: Some(config.channels.user_join_policy),
            appear_in_list: Some(config.channels.appear_in_list),
            inheritance_type: Some(config.channels.inheritance_type),
            default_permission_level: Some(config.channels.default_permission_level),
            contribution_policy: Some(config.channels.contribution_policy),
            moderation: Some(config.channels.moderation),
        };
        let created = client.categories().add(&category).await?;
        info!("Created channel category {}", created.id);
        println!(
            "Created channel: {} ({}) [Owner: {}]",
            created.id, row.name, row.owner
        );

        for member in &row.members {
            client
                .category_users()
                .add(created.id, member, permission_level::MEMBER)
                .await?;
            println!("  Added member: {}", member);
        }

        let link = config
            .channels
            .base_url
            .as_deref()
            .map(|base| channel_link(base, &row.name, created.id))
            .unwrap_or_default();

        results.push(vec![
            row.name.clone(),
            created.id.to_string(),
            link,
            row.members.join(", "),
            row.owner.clone(),
        ]);
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "report_create-channels"),
        &["channelName", "categoryId", "channelLink", "membersAdded", "owner"],
        results,
    )?;
    println!("\nAll channels created. Results saved to {:?}.", path);
    Ok(())
}

/// Portal links double-encode the channel name segment.
fn channel_link(base_url: &str, name: &str, category_id: i64) -> String {
    let encoded = urlencoding::encode(name);
    let double_encoded = urlencoding::encode(&encoded);
    format!(
        "{}{}/{}",
        base_url,
        double_encoded.into_owned(),
        category_id
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["channelName", "owner", "members", "privacy"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    fn parse(rows: &[Vec<String>]) -> Result<Vec<ChannelRow>> {
        parse_rows(&headers(), rows, "channelName", "owner", "members", "privacy")
    }

    #[test]
    fn test_parse_valid_rows() {
        let rows = vec![vec![
            "Physics".into(),
            "prof".into(),
            "a, b,,c".into(),
            "3".into(),
        ]];
        let parsed = parse(&rows).unwrap();
        assert_eq!(parsed[0].members, vec!["a", "b", "c"]);
        assert_eq!(parsed[0].privacy, 3);
    }

    #[test]
    fn test_invalid_privacy_rejected() {
        let rows = vec![vec!["Physics".into(), "prof".into(), "".into(), "5".into()]];
        let err = parse(&rows).unwrap_err();
        assert!(err.to_string().contains("Invalid privacy value"));
        assert!(err.to_string().contains("Row 2"));
    }

    #[test]
    fn test_missing_fields_named() {
        let rows = vec![vec!["".into(), "prof".into(), "".into(), "1".into()]];
        let err = parse(&rows).unwrap_err();
        assert!(err.to_string().contains("channelName"));
        assert!(err.to_string().contains("<unnamed>"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let bad_headers: Vec<String> = vec!["name".into(), "owner".into()];
        let err = parse_rows(&bad_headers, &[], "channelName", "owner", "members", "privacy")
            .unwrap_err();
        assert!(err.to_string().contains("channelName"));
    }

    #[test]
    fn test_channel_link_double_encodes() {
        let link = channel_link("https://portal.example.edu/channel/", "Física 101", 42);
        // Space -> %20 -> %2520
        assert!(link.contains("%2520"));
        assert!(link.ends_with("/42"));
    }
}
