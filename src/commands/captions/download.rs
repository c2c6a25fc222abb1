//! Download caption files, optionally converting them to plain-text
//! transcripts.

use anyhow::{Context, Result};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::PlatformClient;
use crate::cli::commands::captions::DownloadArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::timeutil::sanitize_filename;

static TIMESTAMP_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}[,.]\d{3}\s+-->\s+\d{2}:\d{2}:\d{2}[,.]\d{3}")
        .expect("valid regex")
});

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Reduce SRT content to its cue text: drop indices, timing lines, and
/// markup; collapse the rest into one paragraph per cue.
pub fn srt_to_transcript(srt: &str) -> String {
    let mut cues: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in srt.lines() {
        let line = line.trim().trim_start_matches('\u{feff}');
        if line.is_empty() {
            if !current.is_empty() {
                cues.push(std::mem::take(&mut current));
            }
            continue;
        }
        // Cue counters and timing lines are structure, not speech
        if line.chars().all(|c| c.is_ascii_digit()) || TIMESTAMP_LINE_RE.is_match(line) {
            continue;
        }
        let text = TAG_RE.replace_all(line, "");
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(text.trim());
    }
    if !current.is_empty() {
        cues.push(current);
    }

    cues.join("\n")
}

pub async fn download_command(
    config: &Config,
    profile: Option<&str>,
    args: DownloadArgs,
) -> Result<()> {
    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;
    let selector = args.selector.to_selector()?;

    let entries = selector.resolve_entries(&client).await?;
    if entries.is_empty() {
        println!("No entries found. Exiting.");
        return Ok(());
    }

    tokio::fs::create_dir_all(&args.folder)
        .await
        .with_context(|| format!("Failed to create folder {:?}", args.folder))?;

    let mut rows = Vec::new();
    for entry in &entries {
        if entry.is_child() && !args.include_children {
            println!("⏭ Skipping child entry {}", entry.id);
            continue;
        }

        let captions = client.captions().list(&entry.id).await?;
        if captions.is_empty() {
            rows.push(vec![entry.id.clone(), entry.name.clone(), String::new(), "NO CAPTIONS".into()]);
            continue;
        }

        for caption in &captions {
            let url = match client.captions().get_url(&caption.id).await {
                Ok(url) => url,
                Err(err) => {
                    warn!("Caption URL lookup failed for {}: {}", caption.id, err);
                    rows.push(vec![
                        entry.id.clone(),
                        entry.name.clone(),
                        caption.id.clone(),
                        format!("NO URL: {}", err),
                    ]);
                    continue;
                }
            };

            let content = match fetch_text(&client, &url).await {
                Ok(content) => content,
                Err(err) => {
                    rows.push(vec![
                        entry.id.clone(),
                        entry.name.clone(),
                        caption.id.clone(),
                        format!("DOWNLOAD FAILED: {}", err),
                    ]);
                    continue;
                }
            };

            let mut stem = format!("{}_{}", sanitize_filename(&entry.name, 80), entry.id);
            if !args.no_label_in_filenames {
                if let Some(label) = &caption.label {
                    stem.push('_');
                    stem.push_str(&sanitize_filename(label, 40));
                }
            }
            let ext = caption.file_ext.as_deref().unwrap_or("srt");
            let path = args.folder.join(format!("{}.{}", stem, ext));
            tokio::fs::write(&path, &content)
                .await
                .with_context(|| format!("Failed to write {:?}", path))?;
            println!("Saved {:?}", path);

            if args.transcripts {
                let txt_path = args.folder.join(format!("{}.txt", stem));
                tokio::fs::write(&txt_path, srt_to_transcript(&content))
                    .await
                    .with_context(|| format!("Failed to write {:?}", txt_path))?;
                println!("Saved {:?}", txt_path);
            }

            rows.push(vec![
                entry.id.clone(),
                entry.name.clone(),
                caption.id.clone(),
                "SAVED".into(),
            ]);
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "caption_downloads"),
        &["entry_id", "entry_name", "caption_id", "status"],
        rows,
    )?;
    println!("\nDone. Report saved to {:?}.", path);
    Ok(())
}

async fn fetch_text(client: &PlatformClient, url: &str) -> Result<String> {
    Ok(client
        .http_client()
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_srt_to_transcript() {
        let srt = "1\n00:00:01,000 --> 00:00:04,000\nHello <i>there</i>,\nwelcome.\n\n\
                   2\n00:00:05,000 --> 00:00:07,500\nSecond cue.\n";
        assert_eq!(srt_to_transcript(srt), "Hello there, welcome.\nSecond cue.");
    }

    #[test]
    fn test_srt_to_transcript_handles_bom_and_dots() {
        let srt = "\u{feff}1\n00:00:01.000 --> 00:00:02.000\nLine.\n";
        assert_eq!(srt_to_transcript(srt), "Line.");
    }

    #[test]
    fn test_empty_srt() {
        assert_eq!(srt_to_transcript(""), "");
    }
}
