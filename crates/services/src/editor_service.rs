use std::sync::Arc;

use quiz_core::model::{
    Question, QuestionDraft, QuestionId, QuestionPatch, Quiz, QuizId, QuizPatch, Response,
};
use storage::repository::{ProgressStore, QuestionRepository, QuizRepository, StorageError};
use tracing::{debug, info};

use crate::Clock;
use crate::error::EditorError;
use crate::sessions::slot_key_for;

/// Outcome of checking an answer in the editor's preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerFeedback {
    Correct,
    TryAgain,
}

impl AnswerFeedback {
    #[must_use]
    pub fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::TryAgain }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        self == Self::Correct
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Correct => "Correct!",
            Self::TryAgain => "Try again",
        }
    }
}

/// Whether a question's explanation is shown in the editor list.
#[must_use]
pub fn reveal_explanation(show_answers: bool, feedback: Option<AnswerFeedback>) -> bool {
    show_answers || feedback.is_some_and(AnswerFeedback::is_correct)
}

/// Orchestrates quiz settings and question authoring.
///
/// Edits that change which questions a quiz has, their answer keys, or their
/// points discard the quiz's saved progress before touching the questions.
#[derive(Clone)]
pub struct QuizEditorService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    progress: Arc<dyn ProgressStore>,
}

impl QuizEditorService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            questions,
            progress,
        }
    }

    /// # Errors
    ///
    /// Returns `EditorError::QuizNotFound` if the quiz does not exist.
    /// Returns `EditorError::Storage` if repository access fails.
    pub async fn load_quiz(&self, id: QuizId) -> Result<Quiz, EditorError> {
        self.quizzes
            .get_quiz(id)
            .await?
            .ok_or(EditorError::QuizNotFound(id))
    }

    /// Apply a settings patch and persist the result.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Quiz` if the patched settings are invalid.
    /// Returns `EditorError::QuizNotFound` or `EditorError::Storage` otherwise.
    pub async fn update_settings(&self, id: QuizId, patch: QuizPatch) -> Result<Quiz, EditorError> {
        let quiz = self.load_quiz(id).await?;
        let updated = quiz.apply_patch(patch, self.clock.now())?;
        self.quizzes.upsert_quiz(&updated).await?;
        info!(quiz_id = %id, "quiz settings updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `EditorError::Storage` if repository access fails.
    pub async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, EditorError> {
        Ok(self.questions.list_questions(quiz_id).await?)
    }

    /// Validate and append a new question.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::Question` for validation failures.
    /// Returns `EditorError::Storage` if persistence fails.
    pub async fn add_question(&self, draft: QuestionDraft) -> Result<Question, EditorError> {
        let validated = draft.validate(self.clock.now())?;
        self.discard_progress(validated.quiz_id).await?;
        let question = self.questions.insert_question(validated).await?;
        debug!(question_id = %question.id(), "question added");
        Ok(question)
    }

    /// # Errors
    ///
    /// Returns `EditorError::QuestionNotFound` if the question does not exist.
    /// Returns `EditorError::Question` if the edit fails validation.
    pub async fn update_question(
        &self,
        id: QuestionId,
        patch: QuestionPatch,
    ) -> Result<Question, EditorError> {
        let question = self.get_question(id).await?;
        let updated = question.apply_patch(patch, self.clock.now())?;
        if updated.key() != question.key() || updated.points() != question.points() {
            self.discard_progress(question.quiz_id()).await?;
        }
        self.questions
            .update_question(&updated)
            .await
            .map_err(|err| not_found_as(err, id))?;
        debug!(question_id = %id, "question updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `EditorError::QuestionNotFound` if the question does not exist.
    pub async fn delete_question(&self, id: QuestionId) -> Result<(), EditorError> {
        let question = self.get_question(id).await?;
        self.discard_progress(question.quiz_id()).await?;
        self.questions
            .delete_question(id)
            .await
            .map_err(|err| not_found_as(err, id))?;
        debug!(question_id = %id, "question deleted");
        Ok(())
    }

    /// Check a response against the question's answer key.
    ///
    /// # Errors
    ///
    /// Returns `EditorError::QuestionNotFound` if the question does not exist.
    pub async fn check_answer(
        &self,
        id: QuestionId,
        response: &Response,
    ) -> Result<AnswerFeedback, EditorError> {
        let question = self.get_question(id).await?;
        Ok(AnswerFeedback::from_correct(question.key().check(response)))
    }

    async fn discard_progress(&self, quiz_id: QuizId) -> Result<(), EditorError> {
        self.progress.clear_slot(&slot_key_for(quiz_id)).await?;
        debug!(%quiz_id, "saved progress discarded after question edit");
        Ok(())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Question, EditorError> {
        self.questions
            .get_question(id)
            .await?
            .ok_or(EditorError::QuestionNotFound(id))
    }
}

fn not_found_as(err: StorageError, id: QuestionId) -> EditorError {
    match err {
        StorageError::NotFound => EditorError::QuestionNotFound(id),
        other => EditorError::Storage(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_messages() {
        assert_eq!(AnswerFeedback::Correct.message(), "Correct!");
        assert_eq!(AnswerFeedback::TryAgain.message(), "Try again");
        assert_eq!(AnswerFeedback::from_correct(false), AnswerFeedback::TryAgain);
    }

    #[test]
    fn explanation_reveal_rule() {
        assert!(reveal_explanation(true, None));
        assert!(reveal_explanation(false, Some(AnswerFeedback::Correct)));
        assert!(!reveal_explanation(false, Some(AnswerFeedback::TryAgain)));
        assert!(!reveal_explanation(false, None));
    }
}
