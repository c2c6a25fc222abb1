//! Playlists, user entries (quiz attempts), and the audit trail.

use anyhow::Result;

use crate::api::client::PlatformClient;
use crate::api::filters::{AuditTrailFilter, UserEntryFilter};
use crate::api::models::{AuditTrailEvent, Playlist, UserEntry};
use crate::api::params::ParamList;

pub struct PlaylistService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl PlaylistService<'_> {
    pub async fn get(&self, id: &str) -> Result<Playlist> {
        let params = ParamList::new().set("id", id);
        self.client.call("playlist", "get", params).await
    }

    /// Server-side copy of a playlist within the same account.
    pub async fn clone_playlist(&self, id: &str) -> Result<Playlist> {
        let params = ParamList::new().set("id", id);
        self.client.call("playlist", "clone", params).await
    }
}

pub struct UserEntryService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl UserEntryService<'_> {
    pub async fn list(&self, filter: &UserEntryFilter) -> Result<Vec<UserEntry>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client
            .list_all("userEntry", "list", base, 500, None)
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let params = ParamList::new().set("id", id);
        self.client.request("userEntry", "delete", params).await?;
        Ok(())
    }
}

pub struct AuditTrailService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl AuditTrailService<'_> {
    pub async fn list(&self, filter: &AuditTrailFilter) -> Result<Vec<AuditTrailEvent>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client
            .list_all("audit_auditTrail", "list", base, 500, None)
            .await
    }

    /// Content-replacement events newer than the entry itself.
    pub async fn replacements_for(
        &self,
        entry_id: &str,
        entry_created_at: i64,
    ) -> Result<Vec<AuditTrailEvent>> {
        let filter = AuditTrailFilter {
            entry_id_equal: Some(entry_id.to_string()),
        };
        let events = self.list(&filter).await?;
        Ok(events
            .into_iter()
            .filter(|event| {
                event.entry_point.as_deref() == Some("media::updatecontent")
                    && event.created_at.unwrap_or(0) > entry_created_at
            })
            .collect())
    }
}
