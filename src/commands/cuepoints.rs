//! Delete cue points of one kind from a set of entries, with a
//! kind-specific CSV report. Deleting quiz answers also removes the
//! matching quiz attempts.

use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::collections::BTreeSet;

use crate::api::client::as_fault;
use crate::api::{
    cue_point_type, CuePoint, CuePointFilter, PlatformClient, UserEntryFilter,
};
use crate::cli::commands::cuepoints::{CuePointKind, DeleteArgs};
use crate::config::Config;
use crate::report::{csv_path, now_stamp, reports_dir, write_csv};
use crate::select::split_ids;
use crate::ui::{confirm, select_index, text_input};

impl CuePointKind {
    fn wire_type(&self) -> &'static str {
        match self {
            CuePointKind::Chapters => cue_point_type::CHAPTER,
            CuePointKind::QuizQuestions => cue_point_type::QUIZ_QUESTION,
            CuePointKind::QuizAnswers => cue_point_type::QUIZ_ANSWER,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CuePointKind::Chapters => "Chapters",
            CuePointKind::QuizQuestions => "Quiz Questions",
            CuePointKind::QuizAnswers => "Quiz Submissions",
        }
    }
}

fn question_type_name(question_type: Option<i64>) -> &'static str {
    match question_type {
        Some(1) => "Multiple Choice",
        Some(2) => "True/False",
        Some(3) => "Reflection Point",
        Some(8) => "Open Question",
        _ => "Unknown",
    }
}

fn format_submitted(epoch: Option<i64>) -> String {
    epoch
        .and_then(|e| Utc.timestamp_opt(e, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_default()
}

/// Shape one deleted cue point into its report row.
fn report_row(kind: CuePointKind, entry_id: &str, entry_title: &str, cue: &CuePoint) -> Vec<String> {
    match kind {
        CuePointKind::Chapters => vec![
            entry_id.to_string(),
            entry_title.to_string(),
            cue.title.clone().unwrap_or_default(),
            cue.description.clone().unwrap_or_default(),
            format!("{}", cue.start_time.unwrap_or(0) as f64 / 1000.0),
        ],
        CuePointKind::QuizQuestions => {
            let answers = cue.optional_answers.as_deref().unwrap_or(&[]);
            let option = |i: usize| {
                answers
                    .get(i)
                    .and_then(|a| a.text.clone())
                    .unwrap_or_default()
            };
            let correct = answers
                .iter()
                .find(|a| a.is_correct)
                .and_then(|a| a.text.clone())
                .unwrap_or_default();
            vec![
                entry_id.to_string(),
                entry_title.to_string(),
                question_type_name(cue.question_type).to_string(),
                cue.question.clone().unwrap_or_default(),
                option(0),
                option(1),
                option(2),
                option(3),
                correct,
            ]
        }
        CuePointKind::QuizAnswers => vec![
            entry_id.to_string(),
            entry_title.to_string(),
            cue.user_id.clone().unwrap_or_default(),
            format_submitted(cue.created_at),
            cue.question.clone().unwrap_or_default(),
            cue.answer.clone().unwrap_or_default(),
            if cue.is_correct { "Yes" } else { "No" }.to_string(),
        ],
    }
}

fn report_spec(kind: CuePointKind) -> (&'static str, &'static [&'static str]) {
    match kind {
        CuePointKind::Chapters => (
            "chapters-deleted",
            &[
                "Entry ID",
                "Entry Title",
                "Chapter Title",
                "Chapter Description",
                "Start Time (Seconds)",
            ],
        ),
        CuePointKind::QuizQuestions => (
            "quiz-questions-deleted",
            &[
                "Entry ID",
                "Entry Title",
                "Question Type",
                "Question",
                "Option 1",
                "Option 2",
                "Option 3",
                "Option 4",
                "Correct Answer",
            ],
        ),
        CuePointKind::QuizAnswers => (
            "quiz-answers-deleted",
            &[
                "Entry ID",
                "Entry Title",
                "User ID",
                "Date Submitted",
                "Question",
                "Answer",
                "Correct",
            ],
        ),
    }
}

pub async fn delete_command(
    config: &Config,
    profile: Option<&str>,
    args: DeleteArgs,
) -> Result<()> {
    let entry_ids = match args.entry_ids {
        Some(raw) => split_ids(&raw),
        None => split_ids(&text_input(
            "Enter a comma-delimited list of entry IDs",
            None,
        )?),
    };
    if entry_ids.is_empty() {
        println!("No valid entry IDs provided. Exiting.");
        return Ok(());
    }

    let kind = match args.kind {
        Some(kind) => kind,
        None => {
            let index = select_index(
                "What kind of cue points do you want to delete?",
                &["Chapters", "Quiz Questions", "Quiz Submissions"],
            )?;
            [
                CuePointKind::Chapters,
                CuePointKind::QuizQuestions,
                CuePointKind::QuizAnswers,
            ][index]
        }
    };
    println!("Deleting {} from the specified entries...", kind.label());

    let profile = config.resolve_profile(profile)?;
    let client = PlatformClient::connect(&profile).await?;

    let mut total_deleted = 0usize;
    let mut affected_users: BTreeSet<String> = BTreeSet::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for entry_id in &entry_ids {
        println!("Processing entry: {}", entry_id);
        println!("--------------------");

        let entry = match client.media().get_base(entry_id).await {
            Ok(entry) => entry,
            Err(err) if as_fault(&err).is_some() => {
                println!("✗ Error processing entry {}: {}", entry_id, err);
                continue;
            }
            Err(err) => return Err(err),
        };

        let filter = CuePointFilter {
            entry_id_equal: Some(entry_id.clone()),
            cue_point_type_equal: Some(kind.wire_type().to_string()),
        };
        let cue_points = client.cue_points().list(&filter).await?;
        println!("Entry {} has {} matching cue points.", entry_id, cue_points.len());

        if cue_points.is_empty() {
            continue;
        }
        if !args.yes {
            let question = format!(
                "{} cue points of type {} found. Delete them?",
                cue_points.len(),
                kind.wire_type()
            );
            if !confirm(&question, false)? {
                println!("Skipping deletion for this entry.");
                continue;
            }
        }

        for cue in &cue_points {
            if kind == CuePointKind::QuizAnswers {
                if let Some(user) = &cue.user_id {
                    affected_users.insert(user.clone());
                }
            }
            rows.push(report_row(kind, entry_id, &entry.name, cue));

            client.cue_points().delete(&cue.id).await?;
            println!("Deleted cue point ID: {}", cue.id);
            total_deleted += 1;
        }

        println!("Finished processing entry: {}", entry_id);
        println!("--------------------");
    }

    // Chapters read better in playback order
    if kind == CuePointKind::Chapters {
        rows.sort_by(|a, b| {
            let parse = |row: &Vec<String>| row[4].parse::<f64>().unwrap_or(0.0);
            parse(a).total_cmp(&parse(b))
        });
    }

    if !rows.is_empty() {
        let (name, headers) = report_spec(kind);
        let dir = reports_dir(&config.settings.reports_dir)?;
        let path = write_csv(csv_path(&dir, &now_stamp(), name), headers, rows)?;
        println!("CSV report generated: {:?}", path);
    }

    if kind == CuePointKind::QuizAnswers && !affected_users.is_empty() {
        println!("Deleting associated quiz attempts...");
        let deleted =
            delete_user_entries(&client, &entry_ids, &affected_users, args.yes).await?;
        println!("Total quiz attempts deleted: {}", deleted);
    }

    println!("Total {} deleted: {}", kind.label(), total_deleted);
    Ok(())
}

/// Remove the quiz attempts belonging to the users whose answers were
/// just deleted, entry by entry.
async fn delete_user_entries(
    client: &PlatformClient,
    entry_ids: &[String],
    user_ids: &BTreeSet<String>,
    skip_confirm: bool,
) -> Result<usize> {
    let user_list = user_ids.iter().cloned().collect::<Vec<_>>().join(",");
    let mut total_deleted = 0usize;

    for entry_id in entry_ids {
        let filter = UserEntryFilter {
            entry_id_equal: Some(entry_id.clone()),
            user_id_in: Some(user_list.clone()),
            ..Default::default()
        };
        let user_entries = match client.user_entries().list(&filter).await {
            Ok(found) => found,
            Err(err) if as_fault(&err).is_some() => {
                println!("✗ Error listing quiz attempts for entry {}: {}", entry_id, err);
                continue;
            }
            Err(err) => return Err(err),
        };

        println!(
            "Entry {} has {} quiz attempt records.",
            entry_id,
            user_entries.len()
        );
        if user_entries.is_empty() {
            continue;
        }
        if !skip_confirm {
            let question = format!(
                "{} quiz attempts found for entry {}. Delete them?",
                user_entries.len(),
                entry_id
            );
            if !confirm(&question, false)? {
                println!("Skipping quiz attempt deletion for this entry.");
                continue;
            }
        }

        for user_entry in &user_entries {
            client.user_entries().delete(user_entry.id).await?;
            println!("Deleted quiz attempt ID: {}", user_entry.id);
            total_deleted += 1;
        }
    }

    Ok(total_deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OptionalAnswer;

    #[test]
    fn test_question_type_names() {
        assert_eq!(question_type_name(Some(1)), "Multiple Choice");
        assert_eq!(question_type_name(Some(8)), "Open Question");
        assert_eq!(question_type_name(Some(99)), "Unknown");
        assert_eq!(question_type_name(None), "Unknown");
    }

    #[test]
    fn test_chapter_row_converts_ms_to_seconds() {
        let cue = CuePoint {
            id: "1_cp".into(),
            cue_point_type: cue_point_type::CHAPTER.into(),
            entry_id: "0_a".into(),
            start_time: Some(90_500),
            title: Some("Intro".into()),
            ..Default::default()
        };
        let row = report_row(CuePointKind::Chapters, "0_a", "Lecture", &cue);
        assert_eq!(row[4], "90.5");
    }

    #[test]
    fn test_question_row_picks_correct_answer() {
        let cue = CuePoint {
            id: "1_cp".into(),
            cue_point_type: cue_point_type::QUIZ_QUESTION.into(),
            entry_id: "0_a".into(),
            question: Some("2+2?".into()),
            question_type: Some(1),
            optional_answers: Some(vec![
                OptionalAnswer {
                    text: Some("3".into()),
                    is_correct: false,
                    ..Default::default()
                },
                OptionalAnswer {
                    text: Some("4".into()),
                    is_correct: true,
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let row = report_row(CuePointKind::QuizQuestions, "0_a", "Quiz", &cue);
        assert_eq!(row[3], "2+2?");
        assert_eq!(row[4], "3");
        assert_eq!(row[5], "4");
        assert_eq!(row[8], "4");
    }

    #[test]
    fn test_answer_row_formats_submission() {
        let cue = CuePoint {
            id: "1_cp".into(),
            cue_point_type: cue_point_type::QUIZ_ANSWER.into(),
            entry_id: "0_a".into(),
            user_id: Some("student1".into()),
            created_at: Some(1700000000),
            answer: Some("4".into()),
            is_correct: true,
            ..Default::default()
        };
        let row = report_row(CuePointKind::QuizAnswers, "0_a", "Quiz", &cue);
        assert_eq!(row[2], "student1");
        assert_eq!(row[3], "2023-11-14 22:13:20");
        assert_eq!(row[6], "Yes");
    }
}
