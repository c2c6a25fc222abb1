//! Entry operations (`media` and `baseEntry` services).

use anyhow::Result;

use crate::api::client::PlatformClient;
use crate::api::filters::EntryFilter;
use crate::api::models::MediaEntry;
use crate::api::params::ParamList;

/// Fields for `baseEntry.update` / `media.add`. Only set fields are sent.
#[derive(Debug, Clone, Default)]
pub struct EntryFields {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub user_id: Option<String>,
    pub entitled_users_edit: Option<String>,
    pub entitled_users_publish: Option<String>,
    pub media_type: Option<i64>,
    pub parent_entry_id: Option<String>,
}

impl EntryFields {
    fn to_params(&self, object_type: &str) -> ParamList {
        ParamList::new()
            .set("objectType", object_type)
            .set_opt("name", self.name.as_ref())
            .set_opt("description", self.description.as_ref())
            .set_opt("tags", self.tags.as_ref())
            .set_opt("userId", self.user_id.as_ref())
            .set_opt("entitledUsersEdit", self.entitled_users_edit.as_ref())
            .set_opt("entitledUsersPublish", self.entitled_users_publish.as_ref())
            .set_opt("mediaType", self.media_type)
            .set_opt("parentEntryId", self.parent_entry_id.as_ref())
    }
}

pub struct MediaService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl MediaService<'_> {
    pub async fn get(&self, entry_id: &str) -> Result<MediaEntry> {
        let params = ParamList::new().set("entryId", entry_id);
        self.client.call("media", "get", params).await
    }

    pub async fn get_base(&self, entry_id: &str) -> Result<MediaEntry> {
        let params = ParamList::new().set("entryId", entry_id);
        self.client.call("baseEntry", "get", params).await
    }

    /// Paginate `media.list` to exhaustion.
    pub async fn list(
        &self,
        filter: &EntryFilter,
        page_size: u32,
        cap: Option<usize>,
    ) -> Result<Vec<MediaEntry>> {
        let base = ParamList::new().nest(
            "filter",
            filter.to_params("KalturaMediaEntryFilter"),
        );
        self.client
            .list_all("media", "list", base, page_size, cap)
            .await
    }

    /// Paginate `baseEntry.list` to exhaustion.
    pub async fn list_base(
        &self,
        filter: &EntryFilter,
        page_size: u32,
        cap: Option<usize>,
    ) -> Result<Vec<MediaEntry>> {
        let base = ParamList::new().nest(
            "filter",
            filter.to_params("KalturaBaseEntryFilter"),
        );
        self.client
            .list_all("baseEntry", "list", base, page_size, cap)
            .await
    }

    /// Child entries of a multi-stream parent.
    pub async fn children(&self, parent_entry_id: &str) -> Result<Vec<MediaEntry>> {
        let filter = EntryFilter {
            parent_entry_id_equal: Some(parent_entry_id.to_string()),
            ..Default::default()
        };
        self.list_base(&filter, 500, None).await
    }

    pub async fn update(&self, entry_id: &str, fields: &EntryFields) -> Result<MediaEntry> {
        let params = ParamList::new()
            .set("entryId", entry_id)
            .nest("baseEntry", fields.to_params("KalturaBaseEntry"));
        self.client.call("baseEntry", "update", params).await
    }

    /// Permanent deletion. The response carries the final status flags.
    pub async fn delete(&self, entry_id: &str) -> Result<MediaEntry> {
        let params = ParamList::new().set("entryId", entry_id);
        self.client.call("baseEntry", "delete", params).await
    }

    /// Move the entry to its owner's recycle bin.
    pub async fn recycle(&self, entry_id: &str) -> Result<MediaEntry> {
        let params = ParamList::new().set("entryId", entry_id);
        self.client.call("baseEntry", "recycle", params).await
    }

    /// Server-side clone within the same account.
    pub async fn clone_entry(&self, entry_id: &str) -> Result<MediaEntry> {
        let params = ParamList::new().set("entryId", entry_id);
        self.client.call("baseEntry", "clone", params).await
    }

    /// Create a fresh media entry (cross-account duplication).
    pub async fn add(&self, fields: &EntryFields) -> Result<MediaEntry> {
        let params =
            ParamList::new().nest("entry", fields.to_params("KalturaMediaEntry"));
        self.client.call("media", "add", params).await
    }

    /// Ingest content into a new entry by pulling from a URL.
    pub async fn add_content_from_url(&self, entry_id: &str, url: &str) -> Result<MediaEntry> {
        let resource = ParamList::new()
            .set("objectType", "KalturaUrlResource")
            .set("url", url);
        let params = ParamList::new()
            .set("entryId", entry_id)
            .nest("resource", resource);
        self.client.call("media", "addContent", params).await
    }
}
