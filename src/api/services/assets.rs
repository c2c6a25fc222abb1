//! Per-entry asset operations: captions, flavors, thumbnails, attachments.

use anyhow::{Context, Result};

use crate::api::client::PlatformClient;
use crate::api::filters::AssetFilter;
use crate::api::models::{AttachmentAsset, CaptionAsset, FlavorAsset, ThumbAsset};
use crate::api::params::ParamList;

/// Why a flavor was chosen as the entry's source rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceReason {
    IsOriginal,
    SourceTag,
    Largest,
}

impl SourceReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceReason::IsOriginal => "isOriginal",
            SourceReason::SourceTag => "tags:source",
            SourceReason::Largest => "largest",
        }
    }
}

/// Pick the flavor to treat as the entry's source file.
///
/// Order: the `isOriginal` flag, then a `source` tag, then the largest
/// file. Returns `None` for an empty list.
pub fn pick_source_flavor(flavors: &[FlavorAsset]) -> Option<(&FlavorAsset, SourceReason)> {
    if let Some(original) = flavors.iter().find(|f| f.is_original) {
        return Some((original, SourceReason::IsOriginal));
    }

    if let Some(tagged) = flavors.iter().find(|f| {
        f.tags
            .as_deref()
            .map(|t| t.to_lowercase().contains("source"))
            .unwrap_or(false)
    }) {
        return Some((tagged, SourceReason::SourceTag));
    }

    flavors
        .iter()
        .max_by_key(|f| f.byte_size())
        .map(|largest| (largest, SourceReason::Largest))
}

pub struct CaptionService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl CaptionService<'_> {
    pub async fn list(&self, entry_id: &str) -> Result<Vec<CaptionAsset>> {
        let base = ParamList::new().nest(
            "filter",
            AssetFilter::for_entry(entry_id).to_params("KalturaCaptionAssetFilter"),
        );
        self.client
            .list_all("caption_captionAsset", "list", base, 500, None)
            .await
    }

    /// Direct download URL for a caption file.
    pub async fn get_url(&self, id: &str) -> Result<String> {
        let params = ParamList::new().set("id", id);
        let value = self
            .client
            .request("caption_captionAsset", "getUrl", params)
            .await?;
        value
            .as_str()
            .map(|s| s.to_string())
            .context("captionAsset.getUrl did not return a URL")
    }

    pub async fn set_visibility(&self, id: &str, display_on_player: bool) -> Result<CaptionAsset> {
        let asset = ParamList::new()
            .set("objectType", "KalturaCaptionAsset")
            .set("displayOnPlayer", if display_on_player { 1 } else { 0 });
        let params = ParamList::new()
            .set("captionAssetId", id)
            .nest("captionAsset", asset);
        self.client
            .call("caption_captionAsset", "update", params)
            .await
    }

    /// Create a caption asset on an entry and pull its content from a URL.
    pub async fn add_from_url(
        &self,
        entry_id: &str,
        source: &CaptionAsset,
        url: &str,
    ) -> Result<CaptionAsset> {
        let asset = ParamList::new()
            .set("objectType", "KalturaCaptionAsset")
            .set_opt("label", source.label.as_ref())
            .set_opt("language", source.language.as_ref())
            .set_opt("format", source.format.as_ref())
            .set("displayOnPlayer", if source.display_on_player { 1 } else { 0 });
        let params = ParamList::new()
            .set("entryId", entry_id)
            .nest("captionAsset", asset);
        let created: CaptionAsset = self
            .client
            .call("caption_captionAsset", "add", params)
            .await?;

        let resource = ParamList::new()
            .set("objectType", "KalturaUrlResource")
            .set("url", url);
        let params = ParamList::new()
            .set("id", &created.id)
            .nest("contentResource", resource);
        self.client
            .call("caption_captionAsset", "setContent", params)
            .await
    }
}

pub struct FlavorService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl FlavorService<'_> {
    pub async fn list(&self, entry_id: &str) -> Result<Vec<FlavorAsset>> {
        let base = ParamList::new().nest(
            "filter",
            AssetFilter::for_entry(entry_id).to_params("KalturaFlavorAssetFilter"),
        );
        self.client
            .list_all("flavorAsset", "list", base, 500, None)
            .await
    }

    pub async fn get_url(&self, id: &str) -> Result<String> {
        let params = ParamList::new().set("id", id);
        let value = self.client.request("flavorAsset", "getUrl", params).await?;
        value
            .as_str()
            .map(|s| s.to_string())
            .context("flavorAsset.getUrl did not return a URL")
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let params = ParamList::new().set("id", id);
        self.client.request("flavorAsset", "delete", params).await?;
        Ok(())
    }
}

pub struct ThumbService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl ThumbService<'_> {
    pub async fn list(&self, entry_id: &str) -> Result<Vec<ThumbAsset>> {
        let base = ParamList::new().nest(
            "filter",
            AssetFilter::for_entry(entry_id).to_params("KalturaThumbAssetFilter"),
        );
        self.client
            .list_all("thumbAsset", "list", base, 500, None)
            .await
    }

    pub async fn get_url(&self, id: &str) -> Result<String> {
        let params = ParamList::new().set("id", id);
        let value = self.client.request("thumbAsset", "getUrl", params).await?;
        value
            .as_str()
            .map(|s| s.to_string())
            .context("thumbAsset.getUrl did not return a URL")
    }

    pub async fn add_from_url(&self, entry_id: &str, url: &str) -> Result<ThumbAsset> {
        let params = ParamList::new().set("entryId", entry_id).set("url", url);
        self.client.call("thumbAsset", "addFromUrl", params).await
    }
}

pub struct AttachmentService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl AttachmentService<'_> {
    pub async fn list(&self, entry_id: &str) -> Result<Vec<AttachmentAsset>> {
        let base = ParamList::new().nest(
            "filter",
            AssetFilter::for_entry(entry_id).to_params("KalturaAttachmentAssetFilter"),
        );
        self.client
            .list_all("attachment_attachmentAsset", "list", base, 500, None)
            .await
    }

    pub async fn get_url(&self, id: &str) -> Result<String> {
        let params = ParamList::new().set("id", id);
        let value = self
            .client
            .request("attachment_attachmentAsset", "getUrl", params)
            .await?;
        value
            .as_str()
            .map(|s| s.to_string())
            .context("attachmentAsset.getUrl did not return a URL")
    }

    pub async fn add_from_url(
        &self,
        entry_id: &str,
        source: &AttachmentAsset,
        url: &str,
    ) -> Result<AttachmentAsset> {
        let asset = ParamList::new()
            .set("objectType", "KalturaAttachmentAsset")
            .set_opt("filename", source.filename.as_ref())
            .set_opt("title", source.title.as_ref());
        let params = ParamList::new()
            .set("entryId", entry_id)
            .nest("attachmentAsset", asset);
        let created: AttachmentAsset = self
            .client
            .call("attachment_attachmentAsset", "add", params)
            .await?;

        let resource = ParamList::new()
            .set("objectType", "KalturaUrlResource")
            .set("url", url);
        let params = ParamList::new()
            .set("id", &created.id)
            .nest("contentResource", resource);
        self.client
            .call("attachment_attachmentAsset", "setContent", params)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flavor(id: &str, original: bool, tags: Option<&str>, bytes: i64) -> FlavorAsset {
        FlavorAsset {
            id: id.to_string(),
            entry_id: "0_e".to_string(),
            is_original: original,
            tags: tags.map(|t| t.to_string()),
            size_in_bytes: Some(bytes),
            ..Default::default()
        }
    }

    #[test]
    fn test_pick_source_prefers_is_original() {
        let flavors = vec![
            flavor("1_a", false, Some("source"), 900),
            flavor("1_b", true, None, 100),
        ];
        let (picked, reason) = pick_source_flavor(&flavors).unwrap();
        assert_eq!(picked.id, "1_b");
        assert_eq!(reason, SourceReason::IsOriginal);
    }

    #[test]
    fn test_pick_source_falls_back_to_tag_then_size() {
        let tagged = vec![
            flavor("1_a", false, Some("web,Source"), 100),
            flavor("1_b", false, None, 900),
        ];
        let (picked, reason) = pick_source_flavor(&tagged).unwrap();
        assert_eq!(picked.id, "1_a");
        assert_eq!(reason, SourceReason::SourceTag);

        let untagged = vec![
            flavor("1_a", false, None, 100),
            flavor("1_b", false, None, 900),
        ];
        let (picked, reason) = pick_source_flavor(&untagged).unwrap();
        assert_eq!(picked.id, "1_b");
        assert_eq!(reason, SourceReason::Largest);
    }

    #[test]
    fn test_pick_source_empty() {
        assert!(pick_source_flavor(&[]).is_none());
    }
}
