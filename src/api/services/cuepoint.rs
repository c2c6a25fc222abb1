//! Cue point operations (`cuePoint_cuePoint` service).

use anyhow::{bail, Result};

use crate::api::client::PlatformClient;
use crate::api::filters::CuePointFilter;
use crate::api::models::{cue_point_type, CuePoint, CHAPTER_SUB_TYPE};
use crate::api::params::ParamList;

const SERVICE: &str = "cuePoint_cuePoint";

/// Wire object type for a cue point type discriminator.
pub fn object_type_for(cue_point_type_str: &str) -> Result<&'static str> {
    Ok(match cue_point_type_str {
        cue_point_type::CHAPTER => "KalturaThumbCuePoint",
        cue_point_type::QUIZ_QUESTION => "KalturaQuestionCuePoint",
        cue_point_type::QUIZ_ANSWER => "KalturaAnswerCuePoint",
        cue_point_type::ANNOTATION => "KalturaAnnotation",
        cue_point_type::AD => "KalturaAdCuePoint",
        cue_point_type::CODE => "KalturaCodeCuePoint",
        cue_point_type::EVENT => "KalturaEventCuePoint",
        other => bail!("unknown cue point type: {}", other),
    })
}

/// A chapter marker to create on an entry.
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub entry_id: String,
    pub start_time_ms: i64,
    pub title: String,
    pub description: String,
    pub tags: String,
    pub user_id: Option<String>,
}

/// Flatten a fetched cue point into params for re-creation on another
/// entry (cross-account copy). Quiz questions keep their answer options.
pub fn copy_params(cue: &CuePoint, dest_entry_id: &str) -> Result<ParamList> {
    let object_type = object_type_for(&cue.cue_point_type)?;

    let mut params = ParamList::new()
        .set("objectType", object_type)
        .set("entryId", dest_entry_id)
        .set_opt("startTime", cue.start_time)
        .set_opt("endTime", cue.end_time)
        .set_opt("duration", cue.duration)
        .set_opt("userId", cue.user_id.as_ref())
        .set_opt("tags", cue.tags.as_ref())
        .set_opt("systemName", cue.system_name.as_ref())
        .set_opt("partnerData", cue.partner_data.as_ref())
        .set_opt("partnerSortValue", cue.partner_sort_value)
        .set_opt("thumbOffset", cue.thumb_offset)
        .set_opt("forceStop", cue.force_stop)
        .set_opt("subType", cue.sub_type)
        .set_opt("title", cue.title.as_ref())
        .set_opt("description", cue.description.as_ref())
        .set_opt("text", cue.text.as_ref())
        .set("isPublic", if cue.is_public { 1 } else { 0 });

    if cue.cue_point_type == cue_point_type::QUIZ_QUESTION {
        params = params
            .set(
                "question",
                cue.question.as_deref().unwrap_or("[Missing Question]"),
            )
            .set_opt("questionType", cue.question_type);
        for (i, answer) in cue.optional_answers.iter().flatten().enumerate() {
            let prefix = format!("optionalAnswers:{}", i);
            params = params
                .set(
                    format!("{}:objectType", prefix),
                    "KalturaOptionalAnswer",
                )
                .set_opt(format!("{}:key", prefix), answer.key.as_ref())
                .set_opt(format!("{}:text", prefix), answer.text.as_ref())
                .set(
                    format!("{}:isCorrect", prefix),
                    if answer.is_correct { 1 } else { 0 },
                )
                .set_opt(format!("{}:weight", prefix), answer.weight);
        }
    }

    Ok(params)
}

pub struct CuePointService<'a> {
    pub(crate) client: &'a PlatformClient,
}

impl CuePointService<'_> {
    pub async fn list(&self, filter: &CuePointFilter) -> Result<Vec<CuePoint>> {
        let base = ParamList::new().nest("filter", filter.to_params());
        self.client.list_all(SERVICE, "list", base, 500, None).await
    }

    pub async fn list_for_entry(&self, entry_id: &str) -> Result<Vec<CuePoint>> {
        self.list(&CuePointFilter {
            entry_id_equal: Some(entry_id.to_string()),
            ..Default::default()
        })
        .await
    }

    pub async fn add_chapter(&self, chapter: &NewChapter) -> Result<CuePoint> {
        let cue = ParamList::new()
            .set("objectType", "KalturaThumbCuePoint")
            .set("cuePointType", cue_point_type::CHAPTER)
            .set("entryId", &chapter.entry_id)
            .set("startTime", chapter.start_time_ms)
            .set("title", &chapter.title)
            .set("description", &chapter.description)
            .set("tags", &chapter.tags)
            .set_opt("userId", chapter.user_id.as_ref())
            .set("subType", CHAPTER_SUB_TYPE);
        let params = ParamList::new().nest("cuePoint", cue);
        self.client.call(SERVICE, "add", params).await
    }

    /// Re-create a fetched cue point on another entry.
    pub async fn add_copy(&self, cue: &CuePoint, dest_entry_id: &str) -> Result<CuePoint> {
        let params = ParamList::new().nest("cuePoint", copy_params(cue, dest_entry_id)?);
        self.client.call(SERVICE, "add", params).await
    }

    /// Server-side clone onto another entry in the same account.
    pub async fn clone_to(&self, id: &str, dest_entry_id: &str) -> Result<CuePoint> {
        let params = ParamList::new()
            .set("id", id)
            .set("entryId", dest_entry_id);
        self.client.call(SERVICE, "clone", params).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let params = ParamList::new().set("id", id);
        self.client.request(SERVICE, "delete", params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::OptionalAnswer;

    #[test]
    fn test_object_type_mapping() {
        assert_eq!(
            object_type_for(cue_point_type::CHAPTER).unwrap(),
            "KalturaThumbCuePoint"
        );
        assert_eq!(
            object_type_for(cue_point_type::QUIZ_QUESTION).unwrap(),
            "KalturaQuestionCuePoint"
        );
        assert!(object_type_for("bogus.TYPE").is_err());
    }

    #[test]
    fn test_copy_params_keeps_answer_options() {
        let cue = CuePoint {
            id: "1_cp".into(),
            cue_point_type: cue_point_type::QUIZ_QUESTION.into(),
            entry_id: "0_src".into(),
            start_time: Some(1000),
            question: Some("2 + 2?".into()),
            question_type: Some(1),
            optional_answers: Some(vec![
                OptionalAnswer {
                    key: Some("1".into()),
                    text: Some("4".into()),
                    is_correct: true,
                    weight: Some(1.0),
                },
                OptionalAnswer {
                    key: Some("2".into()),
                    text: Some("5".into()),
                    is_correct: false,
                    weight: Some(1.0),
                },
            ]),
            ..Default::default()
        };

        let params = copy_params(&cue, "0_dest").unwrap();
        let find = |key: &str| {
            params
                .entries()
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        assert_eq!(find("entryId").as_deref(), Some("0_dest"));
        assert_eq!(find("question").as_deref(), Some("2 + 2?"));
        assert_eq!(find("optionalAnswers:0:text").as_deref(), Some("4"));
        assert_eq!(find("optionalAnswers:0:isCorrect").as_deref(), Some("1"));
        assert_eq!(find("optionalAnswers:1:isCorrect").as_deref(), Some("0"));
    }

    #[test]
    fn test_copy_params_rejects_unknown_type() {
        let cue = CuePoint {
            id: "1_cp".into(),
            cue_point_type: "mystery.TYPE".into(),
            ..Default::default()
        };
        assert!(copy_params(&cue, "0_dest").is_err());
    }
}
