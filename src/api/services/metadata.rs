//! Custom metadata records (`metadata_metadata` service).
//!
//! Channel playlists live in an XML document attached to the channel's
//! category; see [`crate::commands::playlists`] for the XML handling.

use anyhow::Result;

use crate::api::client::PlatformClient;
use crate::api::filters::MetadataFilter;
use crate::api::models::MetadataObject;
use crate::api::params::ParamList;

const SERVICE: &str = "metadata_metadata";

pub struct MetadataService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl MetadataService<'_> {
    pub async fn list(&self, filter: &MetadataFilter) -> Result<Vec<MetadataObject>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client.list_all(SERVICE, "list", base, 500, None).await
    }

    /// The first metadata record for one object under one profile, if any.
    pub async fn for_object(
        &self,
        metadata_profile_id: i64,
        object_type: i64,
        object_id: &str,
    ) -> Result<Option<MetadataObject>> {
        let filter = MetadataFilter {
            metadata_profile_id_equal: Some(metadata_profile_id),
            metadata_object_type_equal: Some(object_type),
            object_id_equal: Some(object_id.to_string()),
        };
        Ok(self.list(&filter).await?.into_iter().next())
    }

    pub async fn update(&self, id: i64, xml: &str) -> Result<MetadataObject> {
        let params = ParamList::new().set("id", id).set("xmlData", xml);
        self.client.call(SERVICE, "update", params).await
    }
}
