use std::sync::Arc;

use quiz_core::model::{ConfidenceRating, QuizId};
use quiz_core::snapshot::ProgressSnapshot;
use storage::repository::{ProgressStore, QuestionRepository};
use tracing::{debug, info, warn};

use super::session::QuizSession;
use super::view::QuizIntent;
use crate::error::SessionError;

/// Slot key prefix; one progress slot per quiz.
pub const SLOT_KEY_PREFIX: &str = "quiz_state";

#[must_use]
pub fn slot_key_for(quiz_id: QuizId) -> String {
    format!("{SLOT_KEY_PREFIX}:{quiz_id}")
}

/// Loads sessions and mirrors every transition into the progress store.
///
/// Mirroring is best-effort: a failed write is logged and the in-memory
/// transition still stands.
#[derive(Clone)]
pub struct QuizSessionService {
    questions: Arc<dyn QuestionRepository>,
    progress: Arc<dyn ProgressStore>,
}

impl QuizSessionService {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>, progress: Arc<dyn ProgressStore>) -> Self {
        Self {
            questions,
            progress,
        }
    }

    /// Load the quiz content and resume saved progress when it is valid.
    ///
    /// Missing, unreadable, or invalid snapshots start a fresh session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` if the questions cannot be loaded.
    pub async fn start(&self, quiz_id: QuizId) -> Result<QuizSession, SessionError> {
        let questions = self.questions.list_questions(quiz_id).await?;
        let key = slot_key_for(quiz_id);

        let payload = match self.progress.read_slot(&key).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(%quiz_id, error = %err, "could not read saved progress, starting fresh");
                None
            }
        };

        let session = match payload {
            None => QuizSession::new(quiz_id, &questions),
            Some(payload) => match ProgressSnapshot::decode(&payload)
                .and_then(|snapshot| QuizSession::restore(quiz_id, &questions, &snapshot))
            {
                Ok(session) => {
                    debug!(%quiz_id, index = session.progression().current_index(), "resumed saved progress");
                    session
                }
                Err(err) => {
                    warn!(%quiz_id, error = %err, "discarding invalid saved progress");
                    QuizSession::new(quiz_id, &questions)
                }
            },
        };

        info!(%quiz_id, questions = session.total(), "quiz session started");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `SessionError::Progression` if the quiz is already complete.
    pub async fn rate(
        &self,
        session: &mut QuizSession,
        rating: ConfidenceRating,
    ) -> Result<(), SessionError> {
        session.rate(rating)?;
        debug!(quiz_id = %session.quiz_id(), rating = rating.value(), "rated question");
        self.mirror(session).await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Progression` if the quiz is already complete.
    pub async fn skip(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.skip()?;
        debug!(quiz_id = %session.quiz_id(), "skipped question");
        self.mirror(session).await;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `SessionError::Progression` at the first question or once complete.
    pub async fn previous(&self, session: &mut QuizSession) -> Result<(), SessionError> {
        session.previous()?;
        debug!(quiz_id = %session.quiz_id(), "went back one question");
        self.mirror(session).await;
        Ok(())
    }

    /// Reset progress and clear the saved slot.
    pub async fn restart(&self, session: &mut QuizSession) {
        session.restart();
        let key = slot_key_for(session.quiz_id());
        if let Err(err) = self.progress.clear_slot(&key).await {
            warn!(key = %key, error = %err, "failed to clear saved progress");
        }
        info!(quiz_id = %session.quiz_id(), "quiz restarted");
    }

    /// Dispatch a view intent to the matching transition.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Progression` when the intent is not allowed in
    /// the current state.
    pub async fn apply(
        &self,
        session: &mut QuizSession,
        intent: QuizIntent,
    ) -> Result<(), SessionError> {
        match intent {
            QuizIntent::Rate(rating) => self.rate(session, rating).await,
            QuizIntent::Previous => self.previous(session).await,
            QuizIntent::Skip => self.skip(session).await,
            QuizIntent::Restart => {
                self.restart(session).await;
                Ok(())
            }
        }
    }

    async fn mirror(&self, session: &QuizSession) {
        let key = slot_key_for(session.quiz_id());
        let payload = match session.snapshot().encode() {
            Ok(payload) => payload,
            Err(err) => {
                warn!(key = %key, error = %err, "failed to encode progress snapshot");
                return;
            }
        };
        if let Err(err) = self.progress.write_slot(&key, &payload).await {
            warn!(key = %key, error = %err, "failed to save progress");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_keys_are_per_quiz() {
        assert_eq!(slot_key_for(QuizId::new(1)), "quiz_state:1");
        assert_ne!(slot_key_for(QuizId::new(1)), slot_key_for(QuizId::new(2)));
    }
}
