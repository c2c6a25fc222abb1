//! Clone a channel's playlists into another channel.
//!
//! A channel's playlists are recorded as a comma-delimited ID list in a
//! `<Detail><Key>channelPlaylistsIds</Key>...` node of the category's
//! custom-metadata XML document.

use anyhow::{bail, Context, Result};
use log::info;
use std::borrow::Cow;

use crate::api::filters::METADATA_OBJECT_TYPE_CATEGORY;
use crate::api::PlatformClient;
use crate::cli::commands::playlists::DuplicateArgs;
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};

const PLAYLISTS_KEY: &str = "channelPlaylistsIds";

/// Some deployments store the metadata XML URL-encoded.
fn maybe_decode(xml: &str) -> Cow<'_, str> {
    if xml.contains('%') && !xml.contains('<') {
        match urlencoding::decode(xml) {
            Ok(decoded) => Cow::Owned(decoded.into_owned()),
            Err(_) => Cow::Borrowed(xml),
        }
    } else {
        Cow::Borrowed(xml)
    }
}

/// Every `<Detail>` Key/Value pair of the document, in order.
fn detail_pairs(xml: &str) -> Result<(String, Vec<(String, String)>)> {
    let decoded = maybe_decode(xml);
    let doc = roxmltree::Document::parse(&decoded).context("Invalid metadata XML")?;
    let root = doc.root_element();
    let root_tag = root.tag_name().name().to_string();

    let mut pairs = Vec::new();
    for detail in root.children().filter(|n| n.has_tag_name("Detail")) {
        let key = detail
            .children()
            .find(|n| n.has_tag_name("Key"))
            .and_then(|n| n.text())
            .unwrap_or_default()
            .to_string();
        let value = detail
            .children()
            .find(|n| n.has_tag_name("Value"))
            .and_then(|n| n.text())
            .unwrap_or_default()
            .to_string();
        pairs.push((key, value));
    }
    Ok((root_tag, pairs))
}

/// Playlist IDs recorded in the document, empty when the key is absent.
pub fn extract_playlist_ids(xml: &str) -> Result<Vec<String>> {
    let (_, pairs) = detail_pairs(xml)?;
    Ok(pairs
        .iter()
        .find(|(key, _)| key == PLAYLISTS_KEY)
        .map(|(_, value)| {
            value
                .split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default())
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Merge playlist IDs into the document, preserving every other Detail
/// pair and the existing ID order. Creates the node when missing.
pub fn merge_playlist_ids(xml: &str, new_ids: &[String]) -> Result<String> {
    let (root_tag, mut pairs) = detail_pairs(xml)?;

    let merged_value = {
        let mut ids = pairs
            .iter()
            .find(|(key, _)| key == PLAYLISTS_KEY)
            .map(|(_, value)| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        for id in new_ids {
            if !ids.iter().any(|existing| existing == id) {
                ids.push(id.clone());
            }
        }
        ids.join(",")
    };

    match pairs.iter_mut().find(|(key, _)| key == PLAYLISTS_KEY) {
        Some((_, value)) => *value = merged_value,
        None => pairs.push((PLAYLISTS_KEY.to_string(), merged_value)),
    }

    let mut out = format!("<{}>", root_tag);
    for (key, value) in &pairs {
        out.push_str("<Detail><Key>");
        out.push_str(&escape_xml(key));
        out.push_str("</Key><Value>");
        out.push_str(&escape_xml(value));
        out.push_str("</Value></Detail>");
    }
    out.push_str(&format!("</{}>", root_tag));
    Ok(out)
}

pub async fn duplicate_command(
    config: &Config,
    profile: Option<&str>,
    args: DuplicateArgs,
) -> Result<()> {
    let metadata_profile_id = args
        .metadata_profile_id
        .or(config.channels.metadata_profile_id)
        .context(
            "No metadata profile configured; pass --metadata-profile-id or set channels.metadata_profile_id",
        )?;

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let source_category = client.categories().get(args.source_category).await?;
    let source_metadata = client
        .metadata()
        .for_object(
            metadata_profile_id,
            METADATA_OBJECT_TYPE_CATEGORY,
            &args.source_category.to_string(),
        )
        .await?
        .context("No metadata found for source category")?;

    let playlist_ids = extract_playlist_ids(&source_metadata.xml)?;
    println!("{} playlists found.", playlist_ids.len());
    if playlist_ids.is_empty() {
        return Ok(());
    }

    let mut cloned_pairs = Vec::new();
    for playlist_id in &playlist_ids {
        println!("Duplicating {}...", playlist_id);
        let clone = client.playlists().clone_playlist(playlist_id).await?;
        let original = client.playlists().get(playlist_id).await?;
        info!("Cloned playlist {} -> {}", playlist_id, clone.id);
        cloned_pairs.push((original.name, playlist_id.clone(), clone.id));
    }

    let dest_category = client.categories().get(args.dest_category).await?;
    let dest_metadata = client
        .metadata()
        .for_object(
            metadata_profile_id,
            METADATA_OBJECT_TYPE_CATEGORY,
            &args.dest_category.to_string(),
        )
        .await?
        .context("No metadata found for destination category")?;

    let new_ids: Vec<String> = cloned_pairs.iter().map(|(_, _, id)| id.clone()).collect();
    let updated_xml = merge_playlist_ids(&dest_metadata.xml, &new_ids)?;
    client.metadata().update(dest_metadata.id, &updated_xml).await?;

    let rows: Vec<Vec<String>> = cloned_pairs
        .iter()
        .map(|(name, old_id, new_id)| {
            vec![
                name.clone(),
                args.source_category.to_string(),
                source_category.name.clone(),
                old_id.clone(),
                args.dest_category.to_string(),
                dest_category.name.clone(),
                new_id.clone(),
            ]
        })
        .collect();

    let dir = reports_dir(&config.settings.reports_dir)?;
    let path = write_csv(
        csv_path(&dir, &now_stamp(), "duplicate-playlists"),
        &[
            "playlist_name",
            "source_category_id",
            "source_category_name",
            "source_playlist_id",
            "destination_category_id",
            "destination_category_name",
            "destination_playlist_id",
        ],
        rows,
    )?;

    println!(
        "{} playlists added to category {} ({}).",
        cloned_pairs.len(),
        dest_category.name,
        args.dest_category
    );
    println!("Results saved to {:?}.", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = "<metadata>\
        <Detail><Key>channelPlaylistsIds</Key><Value>1_a,1_b</Value></Detail>\
        <Detail><Key>other</Key><Value>keep me</Value></Detail>\
        </metadata>";

    #[test]
    fn test_extract_playlist_ids() {
        assert_eq!(extract_playlist_ids(XML).unwrap(), vec!["1_a", "1_b"]);
        assert!(extract_playlist_ids("<metadata/>").unwrap().is_empty());
    }

    #[test]
    fn test_extract_from_urlencoded_document() {
        let encoded = urlencoding::encode(XML).into_owned();
        assert_eq!(extract_playlist_ids(&encoded).unwrap(), vec!["1_a", "1_b"]);
    }

    #[test]
    fn test_merge_appends_without_duplicates() {
        let merged =
            merge_playlist_ids(XML, &["1_b".to_string(), "1_c".to_string()]).unwrap();
        assert_eq!(
            extract_playlist_ids(&merged).unwrap(),
            vec!["1_a", "1_b", "1_c"]
        );
        // Unrelated pairs survive the rewrite
        assert!(merged.contains("<Key>other</Key><Value>keep me</Value>"));
    }

    #[test]
    fn test_merge_creates_missing_node() {
        let merged = merge_playlist_ids(
            "<metadata><Detail><Key>other</Key><Value>x</Value></Detail></metadata>",
            &["1_z".to_string()],
        )
        .unwrap();
        assert_eq!(extract_playlist_ids(&merged).unwrap(), vec!["1_z"]);
    }
}
