//! Entry selection shared by every bulk command.
//!
//! A selector names a working set of entries one of five ways: explicit
//! IDs, a CSV column, a tag, a category, or an owner. Commands resolve it
//! to entry IDs or full entry objects up front, then loop.

use anyhow::{bail, Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

use crate::api::client::as_fault;
use crate::api::{EntryFilter, MediaEntry, PlatformClient};

#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Explicit entry IDs.
    Ids(Vec<String>),
    /// IDs read from one column of a CSV file.
    Csv { path: PathBuf, column: String },
    /// Entries whose tags contain this string.
    Tag(String),
    /// Entries published in this category (optionally any descendant).
    Category {
        id: String,
        include_descendants: bool,
    },
    /// Entries owned by this user.
    Owner(String),
}

/// Split a comma-delimited ID list, dropping empties.
pub fn split_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalize a CSV header cell: strip BOM, whitespace, surrounding quotes.
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .trim_matches('"')
        .trim()
        .to_string()
}

/// Read the non-empty values of one column from a CSV file.
pub fn column_from_csv(path: &Path, column: &str) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV: {:?}", path))?;

    let headers: Vec<String> = reader
        .headers()
        .context("CSV file has no header row")?
        .iter()
        .map(normalize_header)
        .collect();

    let index = headers
        .iter()
        .position(|h| h == column)
        .with_context(|| {
            format!(
                "Column '{}' not found in {:?} (headers: {})",
                column,
                path,
                headers.join(", ")
            )
        })?;

    let mut values = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(index) {
            let value = value.trim();
            if !value.is_empty() {
                values.push(value.to_string());
            }
        }
    }
    Ok(values)
}

impl Selector {
    /// Short description for confirmation messages.
    pub fn describe(&self) -> String {
        match self {
            Selector::Ids(ids) => format!("{} listed entries", ids.len()),
            Selector::Csv { path, column } => {
                format!("entries from column '{}' of {:?}", column, path)
            }
            Selector::Tag(tag) => format!("entries tagged '{}'", tag),
            Selector::Category { id, .. } => format!("entries in category {}", id),
            Selector::Owner(owner) => format!("entries owned by '{}'", owner),
        }
    }

    fn to_filter(&self) -> Option<EntryFilter> {
        match self {
            Selector::Tag(tag) => Some(EntryFilter {
                tags_like: Some(tag.clone()),
                ..Default::default()
            }),
            Selector::Category {
                id,
                include_descendants,
            } => Some(if *include_descendants {
                EntryFilter {
                    category_ancestor_id_in: Some(id.clone()),
                    ..Default::default()
                }
            } else {
                EntryFilter {
                    categories_ids_match_or: Some(id.clone()),
                    ..Default::default()
                }
            }),
            Selector::Owner(owner) => Some(EntryFilter {
                user_id_equal: Some(owner.clone()),
                ..Default::default()
            }),
            Selector::Ids(_) | Selector::Csv { .. } => None,
        }
    }

    /// Resolve to bare entry IDs without hitting the entry objects.
    pub async fn resolve_ids(&self, client: &PlatformClient) -> Result<Vec<String>> {
        match self {
            Selector::Ids(ids) => Ok(ids.clone()),
            Selector::Csv { path, column } => column_from_csv(path, column),
            _ => Ok(self
                .resolve_entries(client)
                .await?
                .into_iter()
                .map(|e| e.id)
                .collect()),
        }
    }

    /// Resolve to full entry objects. Listed IDs that cannot be fetched
    /// are warned about and skipped, matching interactive expectations.
    pub async fn resolve_entries(&self, client: &PlatformClient) -> Result<Vec<MediaEntry>> {
        if let Some(filter) = self.to_filter() {
            return client.media().list_base(&filter, 500, None).await;
        }

        let ids = match self {
            Selector::Ids(ids) => ids.clone(),
            Selector::Csv { path, column } => column_from_csv(path, column)?,
            _ => unreachable!("filter selectors handled above"),
        };

        let mut entries = Vec::with_capacity(ids.len());
        for id in &ids {
            match client.media().get_base(id).await {
                Ok(entry) => entries.push(entry),
                Err(err) if as_fault(&err).is_some_and(|f| f.is_not_found()) => {
                    warn!("Entry {} not found, skipping", id);
                    println!("⚠ Entry {} not found or not accessible.", id);
                }
                Err(err) => return Err(err),
            }
        }
        Ok(entries)
    }
}

/// Build a selector from mutually exclusive CLI options.
pub fn from_options(
    entry_ids: Option<String>,
    input_csv: Option<PathBuf>,
    csv_column: Option<String>,
    tag: Option<String>,
    category: Option<String>,
    include_descendants: bool,
    owner: Option<String>,
) -> Result<Selector> {
    let mut chosen = Vec::new();
    if entry_ids.is_some() {
        chosen.push("--entry-ids");
    }
    if input_csv.is_some() {
        chosen.push("--input-csv");
    }
    if tag.is_some() {
        chosen.push("--tag");
    }
    if category.is_some() {
        chosen.push("--category");
    }
    if owner.is_some() {
        chosen.push("--owner");
    }

    match chosen.len() {
        0 => bail!("Select entries with one of --entry-ids, --input-csv, --tag, --category, --owner"),
        1 => {}
        _ => bail!("Options {} are mutually exclusive", chosen.join(", ")),
    }

    if let Some(raw) = entry_ids {
        let ids = split_ids(&raw);
        if ids.is_empty() {
            bail!("No valid entry IDs provided");
        }
        return Ok(Selector::Ids(ids));
    }
    if let Some(path) = input_csv {
        let column = csv_column.unwrap_or_else(|| "entry_id".to_string());
        return Ok(Selector::Csv { path, column });
    }
    if let Some(tag) = tag {
        return Ok(Selector::Tag(tag));
    }
    if let Some(id) = category {
        return Ok(Selector::Category {
            id,
            include_descendants,
        });
    }
    Ok(Selector::Owner(owner.expect("owner is the only option left")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_split_ids() {
        assert_eq!(split_ids("0_a, 0_b ,,0_c,"), vec!["0_a", "0_b", "0_c"]);
        assert!(split_ids(" , ").is_empty());
    }

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("\u{feff}entry_id"), "entry_id");
        assert_eq!(normalize_header(" \"Entry ID\" "), "Entry ID");
    }

    #[test]
    fn test_column_from_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "\u{feff}\"entry_id\",title").unwrap();
        writeln!(file, "0_a,First").unwrap();
        writeln!(file, " ,Blank").unwrap();
        writeln!(file, "0_b,Second").unwrap();
        drop(file);

        let ids = column_from_csv(&path, "entry_id").unwrap();
        assert_eq!(ids, vec!["0_a", "0_b"]);

        let err = column_from_csv(&path, "missing").unwrap_err();
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_from_options_requires_exactly_one() {
        assert!(from_options(None, None, None, None, None, false, None).is_err());
        assert!(from_options(
            Some("0_a".into()),
            None,
            None,
            Some("tag".into()),
            None,
            false,
            None
        )
        .is_err());

        let selector = from_options(None, None, None, None, Some("123".into()), true, None)
            .unwrap();
        assert_eq!(
            selector,
            Selector::Category {
                id: "123".into(),
                include_descendants: true
            }
        );
    }

    #[test]
    fn test_empty_id_list_rejected() {
        assert!(from_options(Some(" , ".into()), None, None, None, None, false, None).is_err());
    }
}
