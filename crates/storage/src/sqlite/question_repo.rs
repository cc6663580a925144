use std::collections::HashMap;

use async_trait::async_trait;
use quiz_core::model::{AnswerRow, Question, QuestionId, QuizId, ValidatedQuestion};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, Sqlite, Transaction};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{conn, map_answer_row, map_question_row, question_id_from_i64, ser, u64_to_i64};
use crate::repository::{QuestionRepository, StorageError};

const QUESTION_COLUMNS: &str = r"
    id, quiz_id, position, prompt, explanation, difficulty, kind,
    time_limit_secs, points, created_at, updated_at
";

async fn insert_answers(
    tx: &mut Transaction<'_, Sqlite>,
    question_id: i64,
    rows: Vec<AnswerRow>,
) -> Result<(), StorageError> {
    for (position, row) in rows.into_iter().enumerate() {
        let position = i64::try_from(position)
            .map_err(|_| StorageError::Serialization("answer position overflow".into()))?;
        sqlx::query(
            r"
            INSERT INTO answers (question_id, position, answer, is_correct)
            VALUES (?1, ?2, ?3, ?4)
            ",
        )
        .bind(question_id)
        .bind(position)
        .bind(row.text)
        .bind(row.is_correct)
        .execute(&mut **tx)
        .await
        .map_err(conn)?;
    }
    Ok(())
}

impl SqliteRepository {
    async fn answers_for(&self, question_id: i64) -> Result<Vec<AnswerRow>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT answer, is_correct
            FROM answers
            WHERE question_id = ?1
            ORDER BY position ASC
            ",
        )
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_answer_row).collect()
    }
}

fn row_id(row: &SqliteRow) -> Result<i64, StorageError> {
    row.try_get::<i64, _>("id").map_err(ser)
}

#[async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError> {
        let quiz = u64_to_i64("quiz_id", quiz_id.value())?;
        let sql = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions WHERE quiz_id = ?1 ORDER BY position ASC, id ASC"
        );
        let rows = sqlx::query(&sql)
            .bind(quiz)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let answer_rows = sqlx::query(
            r"
            SELECT a.question_id, a.answer, a.is_correct
            FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE q.quiz_id = ?1
            ORDER BY a.question_id ASC, a.position ASC
            ",
        )
        .bind(quiz)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut answers: HashMap<i64, Vec<AnswerRow>> = HashMap::new();
        for row in &answer_rows {
            let question_id: i64 = row.try_get("question_id").map_err(ser)?;
            answers
                .entry(question_id)
                .or_default()
                .push(map_answer_row(row)?);
        }

        let mut questions = Vec::with_capacity(rows.len());
        for row in &rows {
            let id = row_id(row)?;
            questions.push(map_question_row(row, answers.remove(&id).unwrap_or_default())?);
        }
        Ok(questions)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let id = u64_to_i64("question_id", id.value())?;
        let sql = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let answers = self.answers_for(id).await?;
                map_question_row(&row, answers).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn insert_question(&self, question: ValidatedQuestion) -> Result<Question, StorageError> {
        let quiz = u64_to_i64("quiz_id", question.quiz_id.value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let position: i64 = sqlx::query(
            "SELECT COALESCE(MAX(position) + 1, 0) AS next FROM questions WHERE quiz_id = ?1",
        )
        .bind(quiz)
        .fetch_one(&mut *tx)
        .await
        .map_err(conn)?
        .try_get("next")
        .map_err(ser)?;

        let res = sqlx::query(
            r"
            INSERT INTO questions (
                quiz_id, position, prompt, explanation, difficulty, kind,
                time_limit_secs, points, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ",
        )
        .bind(quiz)
        .bind(position)
        .bind(question.prompt.as_str())
        .bind(question.explanation.as_str())
        .bind(question.difficulty.as_str())
        .bind(question.kind.as_str())
        .bind(question.time_limit_secs.map(i64::from))
        .bind(i64::from(question.points))
        .bind(question.created_at)
        .bind(question.created_at)
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        let raw_id = res.last_insert_rowid();
        insert_answers(&mut tx, raw_id, question.key.to_rows()).await?;
        tx.commit().await.map_err(conn)?;

        let question = question.assign_id(question_id_from_i64(raw_id)?);
        debug!(question_id = %question.id(), position, "inserted question");
        Ok(question)
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let id = u64_to_i64("question_id", question.id().value())?;
        let mut tx = self.pool.begin().await.map_err(conn)?;

        let res = sqlx::query(
            r"
            UPDATE questions SET
                prompt = ?2,
                explanation = ?3,
                difficulty = ?4,
                kind = ?5,
                time_limit_secs = ?6,
                points = ?7,
                updated_at = ?8
            WHERE id = ?1
            ",
        )
        .bind(id)
        .bind(question.prompt())
        .bind(question.explanation())
        .bind(question.difficulty().as_str())
        .bind(question.kind().as_str())
        .bind(question.time_limit_secs().map(i64::from))
        .bind(i64::from(question.points()))
        .bind(question.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        sqlx::query("DELETE FROM answers WHERE question_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        insert_answers(&mut tx, id, question.key().to_rows()).await?;
        tx.commit().await.map_err(conn)?;

        debug!(question_id = %question.id(), "updated question");
        Ok(())
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(u64_to_i64("question_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        debug!(question_id = %id, "deleted question");
        Ok(())
    }
}
