//! Entry count and duration per time chunk.
//!
//! The backend refuses queries matching more than 10 000 entries, so the
//! date range is split into chunks and each chunk queried separately.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::client::as_fault;
use crate::api::filters::MEDIA_TYPE_VIDEO;
use crate::api::{EntryFilter, MediaEntry, PlatformClient, MAX_MATCHES};
use crate::cli::commands::reports::UsageArgs;
use crate::config::Config;
use crate::report::{now_stamp_precise, reports_dir, write_csv};
use crate::timeutil::{
    chunk_ranges, date_range_epochs, format_epoch, parse_date, parse_tz, seconds_to_hhmmss,
};

static FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/fileName/([^/]+)/").expect("valid regex"));

const SUMMARY_HEADERS: &[&str] = &["range", "entry_count", "total_duration_minutes"];
const DETAIL_HEADERS: &[&str] = &[
    "entryId",
    "name",
    "duration_sec",
    "duration",
    "created_at",
    "updated_at",
    "owner_id",
    "original_filename",
];

struct ChunkSummary {
    label: String,
    entry_count: usize,
    minutes: f64,
}

pub async fn usage_command(config: &Config, profile: Option<&str>, args: UsageArgs) -> Result<()> {
    let start = parse_date(&args.start)?;
    let end = match &args.end {
        Some(raw) => parse_date(raw)?,
        None => chrono::Local::now().date_naive(),
    };
    if end < start {
        bail!("END date cannot be earlier than START date");
    }
    let tz = parse_tz(&config.settings.timezone)?;

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let mut summary = Vec::new();
    let mut details: Vec<Vec<String>> = Vec::new();

    for (chunk_start, chunk_end) in chunk_ranges(start, end, args.interval) {
        let label = format!("{} to {}", chunk_start, chunk_end);
        println!("Processing: {}", label);

        let entries = fetch_chunk(&client, &args, chunk_start, chunk_end).await?;
        let total_seconds: i64 = entries.iter().filter_map(|e| e.duration).sum();

        for entry in &entries {
            let filename = if args.skip_filenames {
                String::new()
            } else {
                source_filename(&client, entry).await
            };
            details.push(vec![
                entry.id.clone(),
                entry.name.clone(),
                entry.duration.map(|d| d.to_string()).unwrap_or_default(),
                seconds_to_hhmmss(entry.duration.unwrap_or(0)),
                entry
                    .created_at
                    .map(|ts| format_epoch(ts, tz))
                    .unwrap_or_default(),
                entry
                    .updated_at
                    .map(|ts| format_epoch(ts, tz))
                    .unwrap_or_default(),
                entry.user_id.clone().unwrap_or_default(),
                filename,
            ]);
        }

        summary.push(ChunkSummary {
            label,
            entry_count: entries.len(),
            minutes: (total_seconds as f64 / 60.0 * 100.0).round() / 100.0,
        });
    }

    println!("\n--- Summary by Time Chunk ---");
    for chunk in &summary {
        println!(
            "{}: {} entries, {:.2} minutes",
            chunk.label, chunk.entry_count, chunk.minutes
        );
    }

    let total_entries: usize = summary.iter().map(|c| c.entry_count).sum();
    let total_minutes: f64 = summary.iter().map(|c| c.minutes).sum();
    let total_hours = total_minutes / 60.0;
    let total_days = total_hours / 24.0;
    // Average Gregorian month / leap-aware year
    let total_months = total_days / 30.4375;
    let total_years = total_days / 365.25;

    println!("\nTotals");
    println!("{}", "-".repeat(35));
    println!("{:<20}{:>15}", "Entries:", total_entries);
    println!("{:<20}{:>15.2}", "Duration (mins):", total_minutes);
    println!("{:<20}{:>15.2}", "Duration (hours):", total_hours);
    println!("{:<20}{:>15.2}", "Duration (days):", total_days);
    println!("{:<20}{:>15.2}", "Duration (months):", total_months);
    println!("{:<20}{:>15.2}", "Duration (years):", total_years);

    let tag_label = args
        .tag
        .as_deref()
        .map(|t| t.replace(' ', "_"))
        .unwrap_or_else(|| "noTag".to_string());
    let cat_label = args.category.clone().unwrap_or_else(|| "noCategory".to_string());
    let stamp = now_stamp_precise();
    let dir = reports_dir(&config.settings.reports_dir)?;

    let summary_path = dir.join(format!(
        "video_summary_{}_{}_{}_{}.csv",
        tag_label,
        cat_label,
        args.interval.label(),
        stamp
    ));
    write_csv(
        &summary_path,
        SUMMARY_HEADERS,
        summary.iter().map(|c| {
            vec![
                c.label.clone(),
                c.entry_count.to_string(),
                format!("{:.2}", c.minutes),
            ]
        }),
    )?;

    let details_path = dir.join(format!(
        "video_details_{}_{}_{}_{}.csv",
        tag_label,
        cat_label,
        args.interval.label(),
        stamp
    ));
    write_csv(&details_path, DETAIL_HEADERS, details)?;

    println!("\nCSV files created:");
    println!("  - {:?}", summary_path);
    println!("  - {:?}", details_path);
    Ok(())
}

async fn fetch_chunk(
    client: &PlatformClient,
    args: &UsageArgs,
    chunk_start: NaiveDate,
    chunk_end: NaiveDate,
) -> Result<Vec<MediaEntry>> {
    let (start_epoch, end_epoch) = date_range_epochs(chunk_start, chunk_end);
    let filter = EntryFilter {
        media_type_equal: Some(MEDIA_TYPE_VIDEO),
        tags_like: args.tag.clone(),
        categories_ids_match_or: args.category.clone(),
        created_at_greater_than_or_equal: Some(start_epoch),
        created_at_less_than_or_equal: Some(end_epoch),
        ..Default::default()
    };

    let entries = match client.media().list(&filter, 500, Some(MAX_MATCHES)).await {
        Ok(entries) => entries,
        Err(err) if as_fault(&err).is_some_and(|f| f.is_query_cap()) => {
            bail!(
                "The backend refused the query because it exceeds the {} match limit. \
                 Try a smaller --interval (weekly or daily) to reduce each time chunk.",
                MAX_MATCHES
            );
        }
        Err(err) => return Err(err),
    };

    if entries.len() >= MAX_MATCHES {
        bail!(
            "Entry count reached the backend's {} match limit; results for {} to {} \
             would be incomplete. Use a smaller --interval.",
            MAX_MATCHES,
            chunk_start,
            chunk_end
        );
    }
    Ok(entries)
}

/// Resolve the upload filename from the source flavor's delivery URL.
async fn source_filename(client: &PlatformClient, entry: &MediaEntry) -> String {
    let flavors = match client.flavors().list(&entry.id).await {
        Ok(flavors) => flavors,
        Err(err) => {
            println!("Error retrieving filename for entry {}: {}", entry.id, err);
            return String::new();
        }
    };
    let Some(source) = flavors.iter().find(|f| f.is_original) else {
        return String::new();
    };
    match client.flavors().get_url(&source.id).await {
        Ok(url) => extract_filename(&url).unwrap_or_default(),
        Err(err) => {
            println!("Error retrieving filename for entry {}: {}", entry.id, err);
            String::new()
        }
    }
}

fn extract_filename(url: &str) -> Option<String> {
    FILENAME_RE
        .captures(url)
        .map(|caps| crate::timeutil::clean_source_filename(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_filename_from_url() {
        let url = "https://cdn.example.com/p/101/sp/10100/serveFlavor/entryId/0_a/v/2/flavorId/1_b/fileName/lecture_01%20(Source).mp4/name/a.mp4";
        assert_eq!(extract_filename(url).unwrap(), "lecture_01%20.mp4".to_string());

        let plain = "https://cdn.example.com/fileName/talk (Source).mp4/x/";
        assert_eq!(extract_filename(plain).unwrap(), "talk.mp4");
        assert!(extract_filename("https://cdn.example.com/nothing").is_none());
    }
}
