//! Tests that requests and responses match the backend's wire shapes:
//! flattened form parameters on the way out, fault envelopes and list
//! responses on the way in.

use serde_json::json;

use mediactl::api::{
    cue_point_type, ApiFault, CuePoint, EntryFilter, ListResponse, MediaEntry, Pager,
    ParamList, RetryableError,
};

fn value_of<'a>(params: &'a ParamList, key: &str) -> Option<&'a str> {
    params
        .entries()
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn test_list_request_parameter_layout() {
    let filter = EntryFilter {
        tags_like: Some("archive".into()),
        created_at_greater_than_or_equal: Some(1_700_000_000),
        ..Default::default()
    };

    let params = ParamList::new()
        .set("ks", "djJ8token")
        .nest("filter", filter.to_params("KalturaMediaEntryFilter"))
        .nest("pager", Pager::with_page_size(100).to_params());

    assert_eq!(value_of(&params, "ks"), Some("djJ8token"));
    assert_eq!(
        value_of(&params, "filter:objectType"),
        Some("KalturaMediaEntryFilter")
    );
    assert_eq!(value_of(&params, "filter:tagsLike"), Some("archive"));
    assert_eq!(
        value_of(&params, "filter:createdAtGreaterThanOrEqual"),
        Some("1700000000")
    );
    assert_eq!(value_of(&params, "pager:pageSize"), Some("100"));
    assert_eq!(value_of(&params, "pager:pageIndex"), Some("1"));
    // Unset filter fields never reach the wire
    assert!(value_of(&params, "filter:userIdEqual").is_none());
}

#[test]
fn test_fault_envelope_detection_and_retry_class() {
    let fault_body = json!({
        "objectType": "KalturaAPIException",
        "code": "QUERY_EXCEEDED_MAX_MATCHES_ALLOWED",
        "message": "Max matches exceeded"
    });

    let fault = ApiFault::from_response(&fault_body).expect("fault recognized");
    assert!(fault.is_query_cap());

    // Faults come back on HTTP 200 and must not be retried
    assert!(!RetryableError::Fault.should_retry());
    assert!(RetryableError::from_status_code(503).should_retry());
}

#[test]
fn test_entry_list_response_parsing() {
    let body = json!({
        "objects": [
            {
                "objectType": "KalturaMediaEntry",
                "id": "0_live1",
                "name": "Orientation",
                "userId": "chair",
                "duration": 1800,
                "plays": 4,
                "createdAt": 1_650_000_000,
                "parentEntryId": ""
            },
            {
                "objectType": "KalturaMediaEntry",
                "id": "0_cam2",
                "name": "Orientation (camera 2)",
                "parentEntryId": "0_live1"
            }
        ],
        "totalCount": 2
    });

    let parsed: ListResponse<MediaEntry> = serde_json::from_value(body).unwrap();
    assert_eq!(parsed.total_count, 2);
    assert!(!parsed.objects[0].is_child());
    assert!(parsed.objects[1].is_child());
    assert_eq!(parsed.objects[0].plays, Some(4));
}

#[test]
fn test_mixed_cue_point_list_parses_every_kind() {
    let body = json!({
        "objects": [
            {
                "objectType": "KalturaThumbCuePoint",
                "id": "1_ch",
                "cuePointType": "thumbCuePoint.Thumb",
                "entryId": "0_e",
                "startTime": 0,
                "title": "Intro",
                "subType": 2
            },
            {
                "objectType": "KalturaQuestionCuePoint",
                "id": "1_q",
                "cuePointType": "quiz.QUIZ_QUESTION",
                "entryId": "0_e",
                "question": "True or false?",
                "questionType": 2,
                "optionalAnswers": [
                    {"key": "1", "text": "True", "isCorrect": 1},
                    {"key": "2", "text": "False", "isCorrect": 0}
                ]
            },
            {
                "objectType": "KalturaAnswerCuePoint",
                "id": "1_a",
                "cuePointType": "quiz.QUIZ_ANSWER",
                "entryId": "0_e",
                "userId": "student9",
                "answer": "True",
                "isCorrect": true,
                "parentId": "1_q"
            }
        ],
        "totalCount": 3
    });

    let parsed: ListResponse<CuePoint> = serde_json::from_value(body).unwrap();
    let kinds: Vec<&str> = parsed
        .objects
        .iter()
        .map(|cp| cp.cue_point_type.as_str())
        .collect();
    assert_eq!(
        kinds,
        vec![
            cue_point_type::CHAPTER,
            cue_point_type::QUIZ_QUESTION,
            cue_point_type::QUIZ_ANSWER
        ]
    );
    assert_eq!(parsed.objects[2].parent_id.as_deref(), Some("1_q"));
    assert!(parsed.objects[2].is_correct);
}
