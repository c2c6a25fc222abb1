//! Thin wrappers over the remote services, one accessor per service
//! family. Each call site reads like the vendor API:
//! `client.media().get("0_abc")`.

pub mod assets;
pub mod category;
pub mod cuepoint;
pub mod media;
pub mod metadata;
pub mod misc;

pub use assets::{
    pick_source_flavor, AttachmentService, CaptionService, FlavorService, SourceReason,
    ThumbService,
};
pub use category::{CategoryEntryService, CategoryService, CategoryUserService};
pub use cuepoint::CuePointService;
pub use media::MediaService;
pub use metadata::MetadataService;
pub use misc::{AuditTrailService, PlaylistService, UserEntryService};

use super::client::PlatformClient;

impl PlatformClient {
    pub fn media(&self) -> MediaService<'_> {
        MediaService { client: self }
    }

    pub fn cue_points(&self) -> CuePointService<'_> {
        CuePointService { client: self }
    }

    pub fn captions(&self) -> CaptionService<'_> {
        CaptionService { client: self }
    }

    pub fn flavors(&self) -> FlavorService<'_> {
        FlavorService { client: self }
    }

    pub fn thumbs(&self) -> ThumbService<'_> {
        ThumbService { client: self }
    }

    pub fn attachments(&self) -> AttachmentService<'_> {
        AttachmentService { client: self }
    }

    pub fn categories(&self) -> CategoryService<'_> {
        CategoryService { client: self }
    }

    pub fn category_entries(&self) -> CategoryEntryService<'_> {
        CategoryEntryService { client: self }
    }

    pub fn category_users(&self) -> CategoryUserService<'_> {
        CategoryUserService { client: self }
    }

    pub fn playlists(&self) -> PlaylistService<'_> {
        PlaylistService { client: self }
    }

    pub fn metadata(&self) -> MetadataService<'_> {
        MetadataService { client: self }
    }

    pub fn user_entries(&self) -> UserEntryService<'_> {
        UserEntryService { client: self }
    }

    pub fn audit_trail(&self) -> AuditTrailService<'_> {
        AuditTrailService { client: self }
    }
}
