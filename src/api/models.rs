//! Typed views of the remote resources.
//!
//! All of this data is owned by the remote service; these structs are
//! transient per-run snapshots. Fields the tools never touch are omitted,
//! and everything the backend may leave out is an `Option`.

use serde::{Deserialize, Deserializer};

/// Response envelope for every `*.list` action.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub objects: Vec<T>,
    #[serde(rename = "totalCount", default)]
    pub total_count: i64,
}

/// The backend encodes nullable booleans as 0/1 integers in some places and
/// real booleans in others; accept both.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Bool(b)) => b,
        Some(Raw::Int(i)) => i > 0,
        Some(Raw::Str(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        None => false,
    })
}

/// A media entry (or base entry; the tools only need the shared fields).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaEntry {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    /// Owner user ID.
    pub user_id: Option<String>,
    pub creator_id: Option<String>,
    /// Duration in seconds.
    pub duration: Option<i64>,
    pub plays: Option<i64>,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
    pub last_played_at: Option<i64>,
    pub parent_entry_id: Option<String>,
    pub root_entry_id: Option<String>,
    pub media_type: Option<i64>,
    pub status: Option<i64>,
    pub display_in_search: Option<i64>,
    pub categories_ids: Option<String>,
    pub admin_tags: Option<String>,
}

impl MediaEntry {
    /// Child entries of multi-stream recordings carry a parent pointer.
    pub fn is_child(&self) -> bool {
        match &self.parent_entry_id {
            Some(parent) => !parent.is_empty() && *parent != self.id,
            None => false,
        }
    }
}

/// A timestamped annotation on an entry. The list action returns every
/// kind in one response, discriminated by `cuePointType`, so this struct
/// is the union of the fields the tools read.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CuePoint {
    pub id: String,
    pub cue_point_type: String,
    pub entry_id: String,
    /// Offset from the start of the entry, in milliseconds.
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub duration: Option<i64>,
    pub user_id: Option<String>,
    pub tags: Option<String>,
    pub system_name: Option<String>,
    pub partner_data: Option<String>,
    pub partner_sort_value: Option<i64>,
    pub thumb_offset: Option<i64>,
    pub created_at: Option<i64>,
    #[serde(deserialize_with = "flag")]
    pub is_public: bool,
    pub force_stop: Option<i64>,
    pub sub_type: Option<i64>,
    // Chapter fields
    pub title: Option<String>,
    pub description: Option<String>,
    // Annotation fields
    pub text: Option<String>,
    pub parent_id: Option<String>,
    // Quiz question fields
    pub question: Option<String>,
    pub question_type: Option<i64>,
    pub optional_answers: Option<Vec<OptionalAnswer>>,
    // Quiz answer fields
    pub answer_key: Option<String>,
    pub answer: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_correct: bool,
}

/// Cue-point type discriminators used on the wire.
pub mod cue_point_type {
    pub const CHAPTER: &str = "thumbCuePoint.Thumb";
    pub const QUIZ_QUESTION: &str = "quiz.QUIZ_QUESTION";
    pub const QUIZ_ANSWER: &str = "quiz.QUIZ_ANSWER";
    pub const ANNOTATION: &str = "annotation.Annotation";
    pub const AD: &str = "adCuePoint.Ad";
    pub const CODE: &str = "codeCuePoint.Code";
    pub const EVENT: &str = "eventCuePoint.Event";
}

/// Chapter cue points are thumb cue points with this subtype.
pub const CHAPTER_SUB_TYPE: i64 = 2;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OptionalAnswer {
    pub key: Option<String>,
    pub text: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub is_correct: bool,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub full_name: Option<String>,
    pub parent_id: Option<i64>,
    pub owner: Option<String>,
    pub privacy: Option<i64>,
    pub privacy_context: Option<String>,
    pub entries_count: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryEntry {
    pub category_id: i64,
    pub entry_id: String,
    pub status: Option<i64>,
    pub created_at: Option<i64>,
}

/// `categoryEntry.status` value for a fully active association.
pub const CATEGORY_ENTRY_ACTIVE: i64 = 2;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryUser {
    pub category_id: i64,
    pub user_id: String,
    pub permission_level: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptionAsset {
    pub id: String,
    pub entry_id: String,
    pub label: Option<String>,
    pub language: Option<String>,
    pub format: Option<String>,
    pub file_ext: Option<String>,
    #[serde(deserialize_with = "flag")]
    pub display_on_player: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlavorAsset {
    pub id: String,
    pub entry_id: String,
    #[serde(deserialize_with = "flag")]
    pub is_original: bool,
    pub tags: Option<String>,
    /// Size in kilobytes (legacy field).
    pub size: Option<i64>,
    pub size_in_bytes: Option<i64>,
    pub file_ext: Option<String>,
    pub flavor_params_id: Option<i64>,
}

impl FlavorAsset {
    pub fn byte_size(&self) -> i64 {
        self.size_in_bytes
            .filter(|b| *b > 0)
            .or_else(|| self.size.map(|kb| kb * 1024))
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThumbAsset {
    pub id: String,
    pub entry_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttachmentAsset {
    pub id: String,
    pub entry_id: String,
    pub filename: Option<String>,
    pub title: Option<String>,
    pub file_ext: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub playlist_content: Option<String>,
}

/// A custom-metadata record: an XML document attached to some object.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetadataObject {
    pub id: i64,
    pub xml: String,
    pub object_id: Option<String>,
    pub metadata_profile_id: Option<i64>,
}

/// A user's interaction record with an entry (quiz attempts).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserEntry {
    pub id: i64,
    pub entry_id: String,
    pub user_id: Option<String>,
    pub created_at: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuditTrailEvent {
    pub id: i64,
    pub entry_id: Option<String>,
    pub entry_point: Option<String>,
    pub user_id: Option<String>,
    pub created_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_list_response_defaults() {
        let parsed: ListResponse<MediaEntry> =
            serde_json::from_value(json!({"totalCount": 0})).unwrap();
        assert!(parsed.objects.is_empty());
        assert_eq!(parsed.total_count, 0);
    }

    #[test]
    fn test_media_entry_parsing() {
        let parsed: MediaEntry = serde_json::from_value(json!({
            "id": "0_abc",
            "name": "Lecture 1",
            "userId": "jdoe",
            "duration": 3600,
            "plays": 12,
            "createdAt": 1700000000
        }))
        .unwrap();

        assert_eq!(parsed.id, "0_abc");
        assert_eq!(parsed.user_id.as_deref(), Some("jdoe"));
        assert_eq!(parsed.duration, Some(3600));
        assert!(!parsed.is_child());
    }

    #[test]
    fn test_child_detection() {
        let child: MediaEntry = serde_json::from_value(json!({
            "id": "0_kid",
            "name": "cam 2",
            "parentEntryId": "0_parent"
        }))
        .unwrap();
        assert!(child.is_child());

        // Some backends echo the entry's own ID in the parent field.
        let not_child: MediaEntry = serde_json::from_value(json!({
            "id": "0_same",
            "name": "x",
            "parentEntryId": "0_same"
        }))
        .unwrap();
        assert!(!not_child.is_child());
    }

    #[test]
    fn test_flag_accepts_ints_and_bools() {
        let a: FlavorAsset =
            serde_json::from_value(json!({"id": "1_f", "entryId": "0_e", "isOriginal": 1}))
                .unwrap();
        assert!(a.is_original);

        let b: FlavorAsset =
            serde_json::from_value(json!({"id": "1_g", "entryId": "0_e", "isOriginal": false}))
                .unwrap();
        assert!(!b.is_original);
    }

    #[test]
    fn test_flavor_byte_size_fallback() {
        let kb_only: FlavorAsset =
            serde_json::from_value(json!({"id": "1_f", "entryId": "0_e", "size": 2048}))
                .unwrap();
        assert_eq!(kb_only.byte_size(), 2048 * 1024);

        let exact: FlavorAsset = serde_json::from_value(
            json!({"id": "1_f", "entryId": "0_e", "size": 1, "sizeInBytes": 1500}),
        )
        .unwrap();
        assert_eq!(exact.byte_size(), 1500);
    }

    #[test]
    fn test_quiz_cue_point_parsing() {
        let parsed: CuePoint = serde_json::from_value(json!({
            "id": "1_cp",
            "cuePointType": "quiz.QUIZ_QUESTION",
            "entryId": "0_abc",
            "startTime": 15000,
            "question": "2 + 2?",
            "questionType": 1,
            "optionalAnswers": [
                {"key": "1", "text": "4", "isCorrect": 1, "weight": 1},
                {"key": "2", "text": "5", "isCorrect": 0, "weight": 1}
            ]
        }))
        .unwrap();

        assert_eq!(parsed.cue_point_type, cue_point_type::QUIZ_QUESTION);
        let answers = parsed.optional_answers.unwrap();
        assert_eq!(answers.len(), 2);
        assert!(answers[0].is_correct);
        assert!(!answers[1].is_correct);
    }
}
