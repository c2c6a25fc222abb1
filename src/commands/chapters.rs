//! Create chapter markers from a CSV file.

use anyhow::{bail, Context, Result};
use log::info;
use std::path::Path;

use crate::api::services::cuepoint::NewChapter;
use crate::api::PlatformClient;
use crate::cli::commands::chapters::AddArgs;
use crate::config::Config;
use crate::select::normalize_header;
use crate::timeutil::{is_valid_timecode, timecode_to_ms};

const EXPECTED_HEADERS: &[&str] = &[
    "entry_id",
    "timecode",
    "chapter_title",
    "chapter_description",
    "search_tags",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ChapterRow {
    pub entry_id: String,
    pub timecode: String,
    pub title: String,
    pub description: String,
    pub tags: String,
}

/// Parse and validate the chapters CSV. The header row must match
/// exactly, ignoring trailing empty columns spreadsheets like to add.
pub fn read_chapter_rows(path: &Path) -> Result<Vec<ChapterRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let headers: Vec<String> = reader
        .headers()
        .context("CSV file has no header row")?
        .iter()
        .map(normalize_header)
        .filter(|h| !h.is_empty())
        .collect();

    if headers != EXPECTED_HEADERS {
        bail!(
            "CSV headers must be exactly: {}",
            EXPECTED_HEADERS.join(", ")
        );
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let get = |i: usize| record.get(i).unwrap_or("").trim().to_string();
        rows.push(ChapterRow {
            entry_id: get(0),
            timecode: get(1),
            title: get(2),
            description: get(3),
            tags: get(4),
        });
    }
    Ok(rows)
}

pub async fn add_command(config: &Config, profile: Option<&str>, args: AddArgs) -> Result<()> {
    let rows = read_chapter_rows(&args.input)?;
    if rows.is_empty() {
        println!("No chapter rows in {:?}. Exiting.", args.input);
        return Ok(());
    }

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let user_id = args.user_id.or_else(|| {
        if profile.user_id.is_empty() {
            None
        } else {
            Some(profile.user_id.clone())
        }
    });

    let mut added = 0usize;
    let mut failed = 0usize;
    for row in &rows {
        if !is_valid_timecode(&row.timecode) {
            println!(
                "✗ Invalid timecode '{}' for entry {}; row skipped",
                row.timecode, row.entry_id
            );
            failed += 1;
            continue;
        }

        let chapter = NewChapter {
            entry_id: row.entry_id.clone(),
            start_time_ms: timecode_to_ms(&row.timecode)?,
            title: row.title.clone(),
            description: row.description.clone(),
            tags: row.tags.clone(),
            user_id: user_id.clone(),
        };

        match client.cue_points().add_chapter(&chapter).await {
            Ok(_) => {
                info!("Added chapter on {} at {}", row.entry_id, row.timecode);
                println!(
                    "Added chapter: {} | {} | {}",
                    row.entry_id, row.timecode, row.title
                );
                added += 1;
            }
            Err(err) => {
                println!("✗ Error adding chapter for entry {}: {}", row.entry_id, err);
                failed += 1;
            }
        }
    }

    println!("\n{} chapters added, {} rows failed.", added, failed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chapters.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_read_chapter_rows() {
        let (_dir, path) = write_csv(
            "entry_id,timecode,chapter_title,chapter_description,search_tags\n\
             0_a,00:01:30,Intro,Welcome,week1\n\
             0_b,00:10:00,Main, ,\n",
        );
        let rows = read_chapter_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Intro");
        assert_eq!(rows[1].description, "");
    }

    #[test]
    fn test_trailing_empty_headers_tolerated() {
        let (_dir, path) = write_csv(
            "entry_id,timecode,chapter_title,chapter_description,search_tags,,\n\
             0_a,00:01:30,Intro,Welcome,week1,,\n",
        );
        assert_eq!(read_chapter_rows(&path).unwrap().len(), 1);
    }

    #[test]
    fn test_wrong_headers_rejected() {
        let (_dir, path) = write_csv("entry,start,title\n0_a,00:01:30,Intro\n");
        let err = read_chapter_rows(&path).unwrap_err();
        assert!(err.to_string().contains("headers must be exactly"));
    }
}
