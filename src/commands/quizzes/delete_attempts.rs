//! Batch-delete quiz attempts for given users and entries.

use anyhow::{bail, Context, Result};
use std::path::Path;

use crate::api::client::as_fault;
use crate::api::{PlatformClient, UserEntryFilter};
use crate::cli::commands::quizzes::DeleteAttemptsArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;
use crate::ui::confirm;

/// One ID per line, blanks ignored.
fn ids_from_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {:?}", path))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn gather(list: Option<String>, file: Option<&Path>, what: &str) -> Result<Vec<String>> {
    let ids = match (list, file) {
        (Some(raw), None) => split_ids(&raw),
        (None, Some(path)) => ids_from_file(path)?,
        (None, None) => bail!("Provide {0} with --{0}-ids or --{0}-file", what),
        _ => unreachable!("clap enforces the conflict"),
    };
    if ids.is_empty() {
        bail!("No {} IDs provided", what);
    }
    Ok(ids)
}

pub async fn delete_attempts_command(
    config: &Config,
    profile: Option<&str>,
    args: DeleteAttemptsArgs,
) -> Result<()> {
    let user_ids = gather(args.user_ids, args.user_file.as_deref(), "user")?;
    let entry_ids = gather(args.entry_ids, args.entry_file.as_deref(), "entry")?;

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    // Pass 1: collect every attempt before anything is deleted
    let mut attempts: Vec<(i64, String, String)> = Vec::new();
    let mut rows = Vec::new();
    for user_id in &user_ids {
        for entry_id in &entry_ids {
            let filter = UserEntryFilter {
                entry_id_equal: Some(entry_id.clone()),
                user_id_equal: Some(user_id.clone()),
                quiz_only: true,
                ..Default::default()
            };
            let found = match client.user_entries().list(&filter).await {
                Ok(found) => found,
                Err(err) if as_fault(&err).is_some() => {
                    println!(
                        "✗ Lookup failed for user {} on entry {}: {}",
                        user_id, entry_id, err
                    );
                    rows.push(vec![
                        user_id.clone(),
                        entry_id.clone(),
                        String::new(),
                        format!("LOOKUP FAILED: {}", err),
                    ]);
                    continue;
                }
                Err(err) => return Err(err),
            };

            println!(
                "{} attempts for user {} on entry {}",
                found.len(),
                user_id,
                entry_id
            );
            for user_entry in found {
                rows.push(vec![
                    user_id.clone(),
                    entry_id.clone(),
                    user_entry.id.to_string(),
                    "FOUND".to_string(),
                ]);
                attempts.push((user_entry.id, user_id.clone(), entry_id.clone()));
            }
        }
    }

    if attempts.is_empty() {
        println!("No quiz attempts found. Exiting.");
        return Ok(());
    }

    println!("\n{} quiz attempts collected.", attempts.len());
    if !args.yes
        && !confirm(
            &format!("Delete all {} quiz attempts?", attempts.len()),
            false,
        )?
    {
        println!("Nothing deleted.");
        return Ok(());
    }

    let mut deleted = 0usize;
    for (attempt_id, user_id, entry_id) in &attempts {
        match client.user_entries().delete(*attempt_id).await {
            Ok(()) => {
                println!("Deleted attempt {} (user {}, entry {})", attempt_id, user_id, entry_id);
                rows.push(vec![
                    user_id.clone(),
                    entry_id.clone(),
                    attempt_id.to_string(),
                    "DELETED".to_string(),
                ]);
                deleted += 1;
            }
            Err(err) if as_fault(&err).is_some() => {
                println!("✗ Could not delete attempt {}: {}", attempt_id, err);
                rows.push(vec![
                    user_id.clone(),
                    entry_id.clone(),
                    attempt_id.to_string(),
                    format!("FAILED: {}", err),
                ]);
            }
            Err(err) => return Err(err),
        }
    }

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "quiz_attempts_deleted"),
        &["user_id", "entry_id", "attempt_id", "status"],
        rows,
    )?;
    println!("\n{} attempts deleted. Log saved to {:?}.", deleted, path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_ids_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "student1\n\n  student2  \n").unwrap();
        drop(file);

        assert_eq!(ids_from_file(&path).unwrap(), vec!["student1", "student2"]);
    }

    #[test]
    fn test_gather_requires_a_source() {
        assert!(gather(None, None, "user").is_err());
        assert_eq!(gather(Some("a,b".into()), None, "user").unwrap(), vec!["a", "b"]);
    }
}
