//! Download each selected entry's source file.

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use crate::api::services::assets::pick_source_flavor;
use crate::api::{FlavorAsset, PlatformClient};
use crate::cli::commands::entries::DownloadArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::timeutil::sanitize_filename;

const DOWNLOAD_ATTEMPTS: u32 = 3;

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
        .with_context(|| format!("Failed to create download folder {:?}", args.folder))?;

    let mut rows = Vec::new();
    for entry in &entries {
        if entry.is_child() && !args.include_children {
            println!("⏭ Skipping child entry {}", entry.id);
            rows.push(vec![entry.id.clone(), entry.name.clone(), "SKIPPED (child)".into()]);
            continue;
        }

        let flavors = client.flavors().list(&entry.id).await?;
        let Some((source, reason)) = pick_source_flavor(&flavors) else {
            println!("⚠ Entry {} has no flavors; skipping", entry.id);
            rows.push(vec![entry.id.clone(), entry.name.clone(), "NO FLAVORS".into()]);
            continue;
        };

        let url = match client.flavors().get_url(&source.id).await {
            Ok(url) => url,
            Err(err) => {
                println!("⚠ Could not resolve source URL for {}: {}", entry.id, err);
                rows.push(vec![entry.id.clone(), entry.name.clone(), "NO URL".into()]);
                continue;
            }
        };

        let filename = target_filename(&entry.name, &entry.id, source);
        let target = args.folder.join(&filename);
        println!(
            "Downloading {} ({}) -> {:?} [source: {}]",
            entry.id,
            entry.name,
            target,
            reason.as_str()
        );

        match fetch_with_retry(&client, &url, &target).await {
            Ok(bytes) => {
                rows.push(vec![
                    entry.id.clone(),
                    entry.name.clone(),
                    format!("SAVED {} ({} bytes)", filename, bytes),
                ]);
            }
            Err(err) => {
                warn!("Download failed for {}: {}", entry.id, err);
                println!("✗ Giving up on entry {}: {}", entry.id, err);
                rows.push(vec![entry.id.clone(), entry.name.clone(), format!("FAILED: {}", err)]);
            }
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "entry_downloads"),
        &["entry_id", "entry_name", "status"],
        rows,
    )?;
    println!("\nDone. Report saved to {:?}.", path);
    Ok(())
}

fn target_filename(entry_name: &str, entry_id: &str, source: &FlavorAsset) -> String {
    let ext = source.file_ext.as_deref().unwrap_or("mp4");
    format!("{}_{}.{}", sanitize_filename(entry_name, 80), entry_id, ext)
}

/// Stream a URL to disk, retrying with backoff. Returns bytes written.
async fn fetch_with_retry(client: &PlatformClient, url: &str, target: &Path) -> Result<u64> {
    let mut last_error = None;

    for attempt in 1..=DOWNLOAD_ATTEMPTS {
        match fetch_once(client, url, target).await {
            Ok(bytes) => return Ok(bytes),
            Err(err) => {
                println!("⚠ Attempt {}/{} failed: {}", attempt, DOWNLOAD_ATTEMPTS, err);
                last_error = Some(err);
                if attempt < DOWNLOAD_ATTEMPTS {
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt))).await;
                }
            }
        }
    }

    // Leave no truncated file behind
    let _ = tokio::fs::remove_file(target).await;
    Err(last_error.expect("at least one attempt ran"))
}

async fn fetch_once(client: &PlatformClient, url: &str, target: &Path) -> Result<u64> {
    let response = client
        .http_client()
        .get(url)
        .send()
        .await?
        .error_for_status()?;

    let progress = match response.content_length() {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{bar:30} {bytes}/{total_bytes} {bytes_per_sec}")
                    .expect("valid progress template"),
            );
            Some(bar)
        }
        None => None,
    };

    let mut file = tokio::fs::File::create(target)
        .await
        .with_context(|| format!("Failed to create {:?}", target))?;

    let mut written = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        if let Some(bar) = &progress {
            bar.set_position(written);
        }
    }
    file.flush().await?;
    if let Some(bar) = progress {
        bar.finish_and_clear();
    }

    log::info!("Saved {:?} ({} bytes)", target, written);
    Ok(written)
}
