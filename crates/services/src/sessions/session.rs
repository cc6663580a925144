use quiz_core::model::{ConfidenceRating, Question, QuestionRecord, QuizId};
use quiz_core::progression::{Progression, ProgressionError};
use quiz_core::snapshot::{ProgressSnapshot, SnapshotError};

use super::results::QuizResults;
use super::view::QuizFrame;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory flashcard run over the questions of one quiz.
///
/// Owns the progression state exclusively; the UI only ever sees a
/// [`QuizFrame`] projection.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSession {
    quiz_id: QuizId,
    records: Vec<QuestionRecord>,
    points: Vec<u32>,
    progression: Progression,
}

impl QuizSession {
    #[must_use]
    pub fn new(quiz_id: QuizId, questions: &[Question]) -> Self {
        Self {
            quiz_id,
            records: questions.iter().map(Question::to_record).collect(),
            points: questions.iter().map(Question::points).collect(),
            progression: Progression::new(questions.len()),
        }
    }

    /// Resume from a persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError` if the snapshot does not fit these questions.
    pub fn restore(
        quiz_id: QuizId,
        questions: &[Question],
        snapshot: &ProgressSnapshot,
    ) -> Result<Self, SnapshotError> {
        let mut session = Self::new(quiz_id, questions);
        session.progression = Progression::try_restore(questions.len(), snapshot)?;
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `ProgressionError::Complete` once every question is rated.
    pub fn rate(&mut self, rating: ConfidenceRating) -> Result<(), ProgressionError> {
        self.progression.advance(rating).map(|_| ())
    }

    /// Move on without rating; recorded as "didn't know it".
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError::Complete` once every question is rated.
    pub fn skip(&mut self) -> Result<(), ProgressionError> {
        self.rate(ConfidenceRating::DidNotKnow)
    }

    /// # Errors
    ///
    /// Returns `ProgressionError` at the first question or after completion.
    pub fn previous(&mut self) -> Result<(), ProgressionError> {
        self.progression.retreat().map(|_| ())
    }

    pub fn restart(&mut self) {
        self.progression.restart();
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.progression.is_complete()
    }

    #[must_use]
    pub fn current(&self) -> Option<&QuestionRecord> {
        self.records.get(self.progression.current_index())
    }

    #[must_use]
    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    #[must_use]
    pub fn points(&self) -> &[u32] {
        &self.points
    }

    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progression.snapshot()
    }

    #[must_use]
    pub fn frame(&self) -> QuizFrame {
        let total = self.total();
        QuizFrame {
            current: self.current().cloned(),
            position: (self.progression.current_index() + 1).min(total),
            total,
            progress_fraction: self.progression.progress_fraction(),
            direction: self.progression.direction(),
            is_complete: self.is_complete(),
            score: self.progression.score(),
        }
    }

    /// Per-question breakdown, available once complete.
    #[must_use]
    pub fn results(&self) -> Option<QuizResults> {
        QuizResults::from_session(self)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerKey, Difficulty, QuestionDraft, QuestionId, QuestionType};
    use quiz_core::progression::Direction;
    use quiz_core::time::fixed_now;

    fn questions(n: u64) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                QuestionDraft {
                    quiz_id: QuizId::new(1),
                    prompt: format!("Q{i}"),
                    explanation: format!("E{i}"),
                    difficulty: Difficulty::Easy,
                    kind: QuestionType::ShortAnswer,
                    time_limit_secs: None,
                    points: 5,
                    key: AnswerKey::free_text(format!("A{i}")).unwrap(),
                }
                .validate(fixed_now())
                .unwrap()
                .assign_id(QuestionId::new(i))
            })
            .collect()
    }

    #[test]
    fn frame_tracks_position_and_direction() {
        let mut session = QuizSession::new(QuizId::new(1), &questions(3));
        let frame = session.frame();
        assert_eq!(frame.position, 1);
        assert_eq!(frame.current.as_ref().map(|r| r.prompt.as_str()), Some("Q1"));
        assert!(!frame.can_go_back());

        session.rate(ConfidenceRating::KnewIt).unwrap();
        let frame = session.frame();
        assert_eq!(frame.position, 2);
        assert_eq!(frame.direction, Direction::Forward);
        assert_eq!(frame.current.as_ref().map(|r| r.answer.as_str()), Some("A2"));
        assert!(frame.can_go_back());
    }

    #[test]
    fn skip_records_lowest_rating() {
        let mut session = QuizSession::new(QuizId::new(1), &questions(2));
        session.skip().unwrap();
        assert_eq!(
            session.progression().ratings(),
            &[ConfidenceRating::DidNotKnow]
        );
    }

    #[test]
    fn completed_frame_has_score_and_no_current() {
        let mut session = QuizSession::new(QuizId::new(1), &questions(2));
        session.rate(ConfidenceRating::GotItCorrect).unwrap();
        session.rate(ConfidenceRating::GotItCorrect).unwrap();

        let frame = session.frame();
        assert!(frame.is_complete);
        assert!(frame.current.is_none());
        assert_eq!(frame.position, 2);
        assert_eq!(frame.score, Some(100.0));
        assert!(session.results().is_some());
    }

    #[test]
    fn restore_rejects_snapshot_for_other_content() {
        let snapshot = ProgressSnapshot::new(3, vec![1, 1, 1]);
        assert!(QuizSession::restore(QuizId::new(1), &questions(2), &snapshot).is_err());
        let resumed = QuizSession::restore(QuizId::new(1), &questions(4), &snapshot).unwrap();
        assert_eq!(resumed.frame().position, 4);
    }
}
