//! Filter objects for list actions.
//!
//! Each filter flattens into `filter:` form parameters with the wire
//! `objectType` discriminator the backend expects. Only the fields the
//! tools actually query by are modeled.

use super::params::ParamList;

/// Selects base/media entries. One filter covers both `baseEntry.list`
/// and `media.list`; the service wrapper picks the object type.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub id_in: Option<String>,
    pub tags_like: Option<String>,
    pub tags_multi_like_or: Option<String>,
    pub categories_ids_match_or: Option<String>,
    pub category_ancestor_id_in: Option<String>,
    pub user_id_equal: Option<String>,
    pub parent_entry_id_equal: Option<String>,
    pub media_type_equal: Option<i64>,
    pub created_at_greater_than_or_equal: Option<i64>,
    pub created_at_less_than_or_equal: Option<i64>,
}

/// `mediaType` value for plain video entries.
pub const MEDIA_TYPE_VIDEO: i64 = 1;

impl EntryFilter {
    pub fn to_params(&self, object_type: &str) -> ParamList {
        ParamList::new()
            .set("objectType", object_type)
            .set_opt("idIn", self.id_in.as_ref())
            .set_opt("tagsLike", self.tags_like.as_ref())
            .set_opt("tagsMultiLikeOr", self.tags_multi_like_or.as_ref())
            .set_opt("categoriesIdsMatchOr", self.categories_ids_match_or.as_ref())
            .set_opt("categoryAncestorIdIn", self.category_ancestor_id_in.as_ref())
            .set_opt("userIdEqual", self.user_id_equal.as_ref())
            .set_opt("parentEntryIdEqual", self.parent_entry_id_equal.as_ref())
            .set_opt("mediaTypeEqual", self.media_type_equal)
            .set_opt(
                "createdAtGreaterThanOrEqual",
                self.created_at_greater_than_or_equal,
            )
            .set_opt(
                "createdAtLessThanOrEqual",
                self.created_at_less_than_or_equal,
            )
    }
}

#[derive(Debug, Clone, Default)]
pub struct CuePointFilter {
    pub entry_id_equal: Option<String>,
    pub cue_point_type_equal: Option<String>,
}

impl CuePointFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaCuePointFilter")
            .set_opt("entryIdEqual", self.entry_id_equal.as_ref())
            .set_opt("cuePointTypeEqual", self.cue_point_type_equal.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub full_name_equal: Option<String>,
    pub full_name_starts_with: Option<String>,
    pub ancestor_id_in: Option<String>,
}

impl CategoryFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaCategoryFilter")
            .set_opt("fullNameEqual", self.full_name_equal.as_ref())
            .set_opt("fullNameStartsWith", self.full_name_starts_with.as_ref())
            .set_opt("ancestorIdIn", self.ancestor_id_in.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryEntryFilter {
    pub category_id_equal: Option<i64>,
    pub entry_id_equal: Option<String>,
}

impl CategoryEntryFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaCategoryEntryFilter")
            .set_opt("categoryIdEqual", self.category_id_equal)
            .set_opt("entryIdEqual", self.entry_id_equal.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryUserFilter {
    pub user_id_equal: Option<String>,
}

impl CategoryUserFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaCategoryUserFilter")
            .set_opt("userIdEqual", self.user_id_equal.as_ref())
    }
}

/// Per-entry asset filters share one shape on the wire.
#[derive(Debug, Clone, Default)]
pub struct AssetFilter {
    pub entry_id_equal: Option<String>,
}

impl AssetFilter {
    pub fn for_entry(entry_id: &str) -> Self {
        Self {
            entry_id_equal: Some(entry_id.to_string()),
        }
    }

    pub fn to_params(&self, object_type: &str) -> ParamList {
        ParamList::new()
            .set("objectType", object_type)
            .set_opt("entryIdEqual", self.entry_id_equal.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetadataFilter {
    pub metadata_profile_id_equal: Option<i64>,
    pub object_id_equal: Option<String>,
    pub metadata_object_type_equal: Option<i64>,
}

/// `metadataObjectType` for category metadata.
pub const METADATA_OBJECT_TYPE_CATEGORY: i64 = 2;

impl MetadataFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaMetadataFilter")
            .set_opt("metadataProfileIdEqual", self.metadata_profile_id_equal)
            .set_opt("objectIdEqual", self.object_id_equal.as_ref())
            .set_opt("metadataObjectTypeEqual", self.metadata_object_type_equal)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserEntryFilter {
    pub entry_id_equal: Option<String>,
    pub user_id_equal: Option<String>,
    pub user_id_in: Option<String>,
    /// Set to restrict to quiz attempts (`KalturaQuizUserEntryFilter`).
    pub quiz_only: bool,
}

impl UserEntryFilter {
    pub fn to_params(&self) -> ParamList {
        let object_type = if self.quiz_only {
            "KalturaQuizUserEntryFilter"
        } else {
            "KalturaUserEntryFilter"
        };
        ParamList::new()
            .set("objectType", object_type)
            .set_opt("entryIdEqual", self.entry_id_equal.as_ref())
            .set_opt("userIdEqual", self.user_id_equal.as_ref())
            .set_opt("userIdIn", self.user_id_in.as_ref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AuditTrailFilter {
    pub entry_id_equal: Option<String>,
}

impl AuditTrailFilter {
    pub fn to_params(&self) -> ParamList {
        ParamList::new()
            .set("objectType", "KalturaAuditTrailFilter")
            .set_opt("entryIdEqual", self.entry_id_equal.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_filter_only_set_fields() {
        let filter = EntryFilter {
            tags_like: Some("archive-2024".into()),
            ..Default::default()
        };
        let params = filter.to_params("KalturaMediaEntryFilter");
        let keys: Vec<&str> = params.entries().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["objectType", "tagsLike"]);
    }

    #[test]
    fn test_quiz_user_entry_object_type() {
        let filter = UserEntryFilter {
            entry_id_equal: Some("0_abc".into()),
            user_id_equal: Some("jdoe".into()),
            quiz_only: true,
            ..Default::default()
        };
        let params = filter.to_params();
        assert_eq!(params.entries()[0].1, "KalturaQuizUserEntryFilter");
    }
}
