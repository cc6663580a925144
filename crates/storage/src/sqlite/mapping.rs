use quiz_core::model::{
    AnswerKey, AnswerRow, Difficulty, Question, QuestionId, QuestionType, Quiz, QuizBehavior,
    QuizDraft, QuizId, QuizPatch,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

pub(crate) fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn opt_u32(field: &'static str, v: Option<i64>) -> Result<Option<u32>, StorageError> {
    v.map(|raw| {
        u32::try_from(raw).map_err(|_| StorageError::Serialization(format!("invalid {field}: {raw}")))
    })
    .transpose()
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    Ok(QuizId::new(i64_to_u64("quiz_id", v)?))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

fn flag(row: &SqliteRow, column: &str) -> Result<bool, StorageError> {
    Ok(row.try_get::<i64, _>(column).map_err(ser)? != 0)
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<Quiz, StorageError> {
    let kind: String = row.try_get("kind").map_err(ser)?;
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;
    let subtopics: String = row.try_get("subtopics").map_err(ser)?;

    let behavior = QuizBehavior {
        hide_correct_answers: flag(row, "hide_correct_answers")?,
        has_flash_cards: flag(row, "has_flash_cards")?,
        has_preview: flag(row, "has_preview")?,
        has_multiple_attempts: flag(row, "has_multiple_attempts")?,
        hide_description: flag(row, "hide_description")?,
        hide_final_report: flag(row, "hide_final_report")?,
        quiz_time_limit_mins: opt_u32(
            "quiz_time_limit_mins",
            row.try_get("quiz_time_limit_mins").map_err(ser)?,
        )?,
        question_time_limit_secs: opt_u32(
            "question_time_limit_secs",
            row.try_get("question_time_limit_secs").map_err(ser)?,
        )?,
    };

    QuizDraft {
        title: row.try_get("title").map_err(ser)?,
        description: row.try_get("description").map_err(ser)?,
        language: row.try_get("language").map_err(ser)?,
        kind: kind.parse::<QuestionType>().map_err(ser)?,
        difficulty: difficulty.parse::<Difficulty>().map_err(ser)?,
        topic: row.try_get("topic").map_err(ser)?,
        subtopics: QuizPatch::subtopics_from_text(&subtopics),
        behavior,
        is_public: flag(row, "is_public")?,
        created_by: i64_to_u64("created_by", row.try_get("created_by").map_err(ser)?)?,
    }
    .validate(
        quiz_id_from_i64(row.try_get("id").map_err(ser)?)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_answer_row(row: &SqliteRow) -> Result<AnswerRow, StorageError> {
    Ok(AnswerRow::new(
        row.try_get::<String, _>("answer").map_err(ser)?,
        flag(row, "is_correct")?,
    ))
}

/// Builds a question from its row and its answer rows in position order.
pub(crate) fn map_question_row(
    row: &SqliteRow,
    answers: Vec<AnswerRow>,
) -> Result<Question, StorageError> {
    let kind: QuestionType = row
        .try_get::<String, _>("kind")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let difficulty: Difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let points_raw: i64 = row.try_get("points").map_err(ser)?;
    let points = u32::try_from(points_raw)
        .map_err(|_| StorageError::Serialization(format!("invalid points: {points_raw}")))?;
    let key = AnswerKey::from_rows(kind, answers).map_err(ser)?;

    Question::from_persisted(
        question_id_from_i64(row.try_get("id").map_err(ser)?)?,
        quiz_id_from_i64(row.try_get("quiz_id").map_err(ser)?)?,
        row.try_get("prompt").map_err(ser)?,
        row.try_get("explanation").map_err(ser)?,
        difficulty,
        kind,
        opt_u32("time_limit_secs", row.try_get("time_limit_secs").map_err(ser)?)?,
        points,
        key,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}
