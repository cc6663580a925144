use async_trait::async_trait;
use quiz_core::model::{Quiz, QuizId};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{conn, map_quiz_row, u64_to_i64};
use crate::repository::{QuizRepository, StorageError};

#[async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let behavior = quiz.behavior();
        sqlx::query(
            r"
            INSERT INTO quizzes (
                id, title, description, language, kind, difficulty, topic, subtopics,
                hide_correct_answers, has_flash_cards, has_preview, has_multiple_attempts,
                hide_description, hide_final_report, quiz_time_limit_mins,
                question_time_limit_secs, is_public, created_by, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                language = excluded.language,
                kind = excluded.kind,
                difficulty = excluded.difficulty,
                topic = excluded.topic,
                subtopics = excluded.subtopics,
                hide_correct_answers = excluded.hide_correct_answers,
                has_flash_cards = excluded.has_flash_cards,
                has_preview = excluded.has_preview,
                has_multiple_attempts = excluded.has_multiple_attempts,
                hide_description = excluded.hide_description,
                hide_final_report = excluded.hide_final_report,
                quiz_time_limit_mins = excluded.quiz_time_limit_mins,
                question_time_limit_secs = excluded.question_time_limit_secs,
                is_public = excluded.is_public,
                updated_at = excluded.updated_at
            ",
        )
        .bind(u64_to_i64("quiz_id", quiz.id().value())?)
        .bind(quiz.title())
        .bind(quiz.description())
        .bind(quiz.language())
        .bind(quiz.kind().as_str())
        .bind(quiz.difficulty().as_str())
        .bind(quiz.topic())
        .bind(quiz.subtopics_text())
        .bind(behavior.hide_correct_answers)
        .bind(behavior.has_flash_cards)
        .bind(behavior.has_preview)
        .bind(behavior.has_multiple_attempts)
        .bind(behavior.hide_description)
        .bind(behavior.hide_final_report)
        .bind(behavior.quiz_time_limit_mins.map(i64::from))
        .bind(behavior.question_time_limit_secs.map(i64::from))
        .bind(quiz.is_public())
        .bind(u64_to_i64("created_by", quiz.created_by())?)
        .bind(quiz.created_at())
        .bind(quiz.updated_at())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        debug!(quiz_id = %quiz.id(), "upserted quiz");
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT
                id, title, description, language, kind, difficulty, topic, subtopics,
                hide_correct_answers, has_flash_cards, has_preview, has_multiple_attempts,
                hide_description, hide_final_report, quiz_time_limit_mins,
                question_time_limit_secs, is_public, created_by, created_at, updated_at
            FROM quizzes
            WHERE id = ?1
            ",
        )
        .bind(u64_to_i64("quiz_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_quiz_row).transpose()
    }
}
