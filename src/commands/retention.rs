//! Retention audit over platform export files.
//!
//! Input rows come from KMC-style exports (CSV or XLSX). Zero-play
//! entries are classified offline; entries with plays get a `media.get`
//! lookup for `lastPlayedAt` through a bounded worker pool. Lookup
//! failures are logged to a CSV error log and classified as never
//! watched rather than dropped.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use futures::{stream, StreamExt};
use log::warn;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::api::PlatformClient;
use crate::cli::commands::retention::ReportArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv, ErrorLog};
use crate::tabular::read_table;
use crate::timeutil::{format_epoch, parse_tz};

const SEC_PER_YEAR: i64 = 365 * 24 * 3600;

/// One row of a platform export, with the fields the policy needs.
#[derive(Debug, Clone, Default)]
pub struct ExportRow {
    pub entry_id: String,
    pub title: String,
    pub media_type: String,
    pub created_epoch: i64,
    pub last_update_epoch: Option<i64>,
    pub duration_seconds: i64,
    pub plays: i64,
    pub status: String,
    pub owner: String,
}

/// Export column headers vary between portal versions; match any of the
/// known spellings (compared case-insensitively, separators stripped).
fn find_col(headers: &[String], candidates: &[&str]) -> Option<usize> {
    let norm = |s: &str| {
        s.chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase()
    };
    let wanted: HashSet<String> = candidates.iter().map(|c| norm(c)).collect();
    headers.iter().position(|h| wanted.contains(&norm(h)))
}

/// KMC duration cells are `MM:SS`, sometimes `H:MM:SS`, sometimes plain
/// seconds. Unparseable cells become 0.
pub fn parse_export_duration(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    if let Ok(seconds) = raw.parse::<f64>() {
        return seconds as i64;
    }
    let parts: Vec<&str> = raw.split(':').collect();
    let nums: Option<Vec<i64>> = parts.iter().map(|p| p.trim().parse().ok()).collect();
    match nums.as_deref() {
        Some([m, s]) => m * 60 + s,
        Some([h, m, s]) => h * 3600 + m * 60 + s,
        _ => 0,
    }
}

/// Export dates are either epoch seconds or `MM/DD/YYYY`-style strings.
pub fn parse_export_date(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        return (epoch > 0).then_some(epoch);
    }
    for format in ["%m/%d/%Y %H:%M", "%m/%d/%Y", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().timestamp());
        }
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp());
        }
    }
    None
}

fn read_export(path: &Path) -> Result<Vec<ExportRow>> {
    let (headers, rows) = read_table(path)?;

    let entry_idx = find_col(&headers, &["entry id", "entryid", "id"])
        .with_context(|| format!("{:?} has no entry ID column", path))?;
    let title_idx = find_col(&headers, &["title", "name"]);
    let created_idx = find_col(
        &headers,
        &["creation date", "created at", "created on", "created", "creation time"],
    )
    .with_context(|| format!("{:?} has no creation date column", path))?;
    let plays_idx = find_col(&headers, &["plays", "number of plays", "total plays"]);
    let media_type_idx = find_col(&headers, &["media type", "type", "media"]);
    let update_idx = find_col(&headers, &["last update date", "last updated", "last update"]);
    let status_idx = find_col(&headers, &["status", "entry status"]);
    let owner_idx = find_col(&headers, &["owner", "user id", "owner id", "uploader"]);
    let duration_idx = find_col(&headers, &["duration", "length", "entry duration"]);

    let mut parsed = Vec::with_capacity(rows.len());
    for row in rows {
        let cell = |idx: Option<usize>| -> String {
            idx.and_then(|i| row.get(i))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        let entry_id = cell(Some(entry_idx));
        if entry_id.is_empty() {
            continue;
        }
        let Some(created_epoch) = parse_export_date(&cell(Some(created_idx))) else {
            warn!("Row for {} has an unparseable creation date; skipped", entry_id);
            continue;
        };

        parsed.push(ExportRow {
            entry_id,
            title: cell(title_idx),
            media_type: cell(media_type_idx),
            created_epoch,
            last_update_epoch: parse_export_date(&cell(update_idx)),
            duration_seconds: parse_export_duration(&cell(duration_idx)),
            plays: cell(plays_idx).parse().unwrap_or(0),
            status: {
                let status = cell(status_idx).to_lowercase();
                if status.is_empty() {
                    "ready".to_string()
                } else {
                    status
                }
            },
            owner: cell(owner_idx),
        });
    }
    Ok(parsed)
}

/// Merge exports, first occurrence of an entry ID wins.
pub fn merge_exports(batches: Vec<Vec<ExportRow>>) -> Vec<ExportRow> {
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for batch in batches {
        for row in batch {
            if seen.insert(row.entry_id.clone()) {
                merged.push(row);
            }
        }
    }
    merged
}

/// Which policy window an entry falls under, if any.
///
/// The long window needs both age and playback gap past `long_secs`; the
/// short window covers entries older than `short_secs` (but not yet in
/// the long window) whose last playback is at least `short_secs` ago.
/// Never-watched entries count as "not called for playback".
pub fn classify_policy(
    created_at: i64,
    last_play: Option<i64>,
    asof: i64,
    short_secs: i64,
    long_secs: i64,
) -> Option<&'static str> {
    let age = asof - created_at;
    let last_gap = last_play.map(|lp| asof - lp);

    if age >= long_secs && last_gap.map_or(true, |gap| gap >= long_secs) {
        return Some("long");
    }
    if age >= short_secs && age < long_secs && last_gap.map_or(true, |gap| gap >= short_secs) {
        return Some("short");
    }
    None
}

struct Candidate {
    row: ExportRow,
    policy: String,
    last_play: Option<i64>,
    reason: &'static str,
    storage_bytes: Option<i64>,
}

pub async fn report_command(config: &Config, profile: Option<&str>, args: ReportArgs) -> Result<()> {
    if args.played_years >= args.created_years {
        bail!("--played-years must be smaller than --created-years");
    }
    let short_secs = args.played_years * SEC_PER_YEAR;
    let long_secs = args.created_years * SEC_PER_YEAR;
    let short_label = format!("{}year", args.played_years);
    let long_label = format!("{}year", args.created_years);
    let policy_label =
        |policy: &str| -> String {
            if policy == "long" { long_label.clone() } else { short_label.clone() }
        };

    let tz = parse_tz(&config.settings.timezone)?;
    let asof = Utc::now().timestamp();

    let mut batches = Vec::new();
    for input in &args.inputs {
        let rows = read_export(input)?;
        println!("Loaded {} rows from {:?}", rows.len(), input);
        batches.push(rows);
    }
    let rows = merge_exports(batches);
    println!("{} unique entries after merge.", rows.len());
    if rows.is_empty() {
        return Ok(());
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let stamp = now_stamp();
    let mut error_log = ErrorLog::create(csv_path(&dir, &stamp, "retention_errors"))?;

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut nonzero: Vec<ExportRow> = Vec::new();

    // Offline passes: non-ready rows and never-played rows need no API
    for row in rows {
        if row.status != "ready" {
            if !args.skip_nonready {
                candidates.push(Candidate {
                    row,
                    policy: "nonready".to_string(),
                    last_play: None,
                    reason: "non_ready_status",
                    storage_bytes: None,
                });
            }
        } else if row.plays == 0 {
            if let Some(policy) =
                classify_policy(row.created_epoch, None, asof, short_secs, long_secs)
            {
                candidates.push(Candidate {
                    policy: policy_label(policy),
                    row,
                    last_play: None,
                    reason: "0 plays",
                    storage_bytes: None,
                });
            }
        } else {
            nonzero.push(row);
        }
    }
    println!(
        "{} offline candidates; {} entries need a last-played lookup.",
        candidates.len(),
        nonzero.len()
    );

    // Played entries need the live lastPlayedAt
    let profile = config.resolve_profile(profile)?;
    let client = Arc::new(
        PlatformClient::connect_with_retry(&profile, crate::api::RetryConfig::aggressive())
            .await?,
    );

    let total = nonzero.len();
    let lookups = stream::iter(nonzero.into_iter().map(|row| {
        let client = Arc::clone(&client);
        async move {
            let result = client.media().get(&row.entry_id).await;
            (row, result)
        }
    }))
    .buffer_unordered(args.workers.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut processed = 0usize;
    for (row, result) in lookups {
        processed += 1;
        if processed % 500 == 0 {
            println!("  …{}/{} lookups done", processed, total);
        }

        let last_play = match result {
            Ok(entry) => entry.last_played_at.filter(|lp| *lp > 0),
            Err(err) => {
                error_log.append(&row.entry_id, "media.get", &err.to_string())?;
                None
            }
        };

        if let Some(policy) =
            classify_policy(row.created_epoch, last_play, asof, short_secs, long_secs)
        {
            candidates.push(Candidate {
                policy: policy_label(policy),
                row,
                last_play,
                reason: "not_watched_within_window",
                storage_bytes: None,
            });
        }
    }

    // Optional storage totals per candidate
    if args.include_storage {
        println!("Totaling flavor storage for {} candidates…", candidates.len());
        let ids: Vec<String> = candidates.iter().map(|c| c.row.entry_id.clone()).collect();
        let sizes = stream::iter(ids.into_iter().map(|entry_id| {
            let client = Arc::clone(&client);
            async move {
                let total = match client.flavors().list(&entry_id).await {
                    Ok(flavors) => Ok(flavors.iter().map(|f| f.byte_size()).sum::<i64>()),
                    Err(err) => Err(err),
                };
                (entry_id, total)
            }
        }))
        .buffer_unordered(args.workers.max(1))
        .collect::<Vec<_>>()
        .await;

        let mut by_id: std::collections::HashMap<String, i64> = std::collections::HashMap::new();
        for (entry_id, total) in sizes {
            match total {
                Ok(bytes) => {
                    by_id.insert(entry_id, bytes);
                }
                Err(err) => {
                    error_log.append(&entry_id, "flavorAsset.list", &err.to_string())?;
                }
            }
        }
        for candidate in candidates.iter_mut() {
            candidate.storage_bytes = by_id.get(&candidate.row.entry_id).copied();
        }
    }

    let mut headers = vec![
        "policy",
        "entry_id",
        "entry_name",
        "media_type",
        "created_on",
        "last_updated",
        "duration_seconds",
        "plays",
        "status",
        "owner",
        "lastPlayedAt",
        "reason",
    ];
    if args.include_storage {
        headers.push("storage_bytes");
    }

    let records = candidates.iter().map(|c| {
        let mut record = vec![
            c.policy.clone(),
            c.row.entry_id.clone(),
            c.row.title.clone(),
            c.row.media_type.clone(),
            format_epoch(c.row.created_epoch, tz),
            c.row
                .last_update_epoch
                .map(|ts| format_epoch(ts, tz))
                .unwrap_or_default(),
            c.row.duration_seconds.to_string(),
            c.row.plays.to_string(),
            c.row.status.clone(),
            c.row.owner.clone(),
            c.last_play.map(|ts| format_epoch(ts, tz)).unwrap_or_default(),
            c.reason.to_string(),
        ];
        if args.include_storage {
            record.push(
                c.storage_bytes
                    .map(|b| b.to_string())
                    .unwrap_or_default(),
            );
        }
        record
    });

    let path = write_csv(
        csv_path(&dir, &stamp, "retention_candidates"),
        &headers,
        records,
    )?;

    println!("\n{} retention candidates written to {:?}", candidates.len(), path);
    if error_log.count > 0 {
        println!(
            "⚠ {} lookups failed; see {:?}",
            error_log.count, error_log.path
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const Y: i64 = SEC_PER_YEAR;

    #[test]
    fn test_parse_export_duration() {
        assert_eq!(parse_export_duration("05:30"), 330);
        assert_eq!(parse_export_duration("1:02:03"), 3723);
        assert_eq!(parse_export_duration("95"), 95);
        assert_eq!(parse_export_duration(""), 0);
        assert_eq!(parse_export_duration("n/a"), 0);
    }

    #[test]
    fn test_parse_export_date() {
        assert_eq!(parse_export_date("1700000000"), Some(1700000000));
        assert_eq!(parse_export_date("2024-01-01"), Some(1704067200));
        assert!(parse_export_date("01/15/2024").is_some());
        assert_eq!(parse_export_date(""), None);
        assert_eq!(parse_export_date("soon"), None);
    }

    #[test]
    fn test_classify_long_window() {
        let asof = 10 * Y;
        // Old and never watched
        assert_eq!(classify_policy(asof - 5 * Y, None, asof, 2 * Y, 4 * Y), Some("long"));
        // Old but watched recently
        assert_eq!(
            classify_policy(asof - 5 * Y, Some(asof - Y), asof, 2 * Y, 4 * Y),
            None
        );
        // Old and last watched long ago
        assert_eq!(
            classify_policy(asof - 5 * Y, Some(asof - 4 * Y), asof, 2 * Y, 4 * Y),
            Some("long")
        );
    }

    #[test]
    fn test_classify_short_window() {
        let asof = 10 * Y;
        // In the 2-4y band, never watched
        assert_eq!(classify_policy(asof - 3 * Y, None, asof, 2 * Y, 4 * Y), Some("short"));
        // In the band, stale playback
        assert_eq!(
            classify_policy(asof - 3 * Y, Some(asof - 2 * Y), asof, 2 * Y, 4 * Y),
            Some("short")
        );
        // Watched within the short window
        assert_eq!(
            classify_policy(asof - 3 * Y, Some(asof - Y), asof, 2 * Y, 4 * Y),
            None
        );
        // Too young entirely
        assert_eq!(classify_policy(asof - Y, None, asof, 2 * Y, 4 * Y), None);
    }

    #[test]
    fn test_merge_dedupes_by_entry_id() {
        let a = vec![
            ExportRow {
                entry_id: "0_a".into(),
                plays: 1,
                ..Default::default()
            },
            ExportRow {
                entry_id: "0_b".into(),
                ..Default::default()
            },
        ];
        let b = vec![ExportRow {
            entry_id: "0_a".into(),
            plays: 99,
            ..Default::default()
        }];
        let merged = merge_exports(vec![a, b]);
        assert_eq!(merged.len(), 2);
        // First occurrence wins
        assert_eq!(merged[0].plays, 1);
    }

    #[test]
    fn test_find_col_ignores_case_and_separators() {
        let headers: Vec<String> = vec!["\u{feff}Entry ID".into(), "Created On".into()];
        assert_eq!(find_col(&headers, &["entry id", "id"]), Some(0));
        assert_eq!(find_col(&headers, &["created on", "created"]), Some(1));
        assert_eq!(find_col(&headers, &["plays"]), None);
    }
}
