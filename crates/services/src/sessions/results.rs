use quiz_core::model::ConfidenceRating;

use super::session::QuizSession;

/// Scores at or above this percentage get the congratulation banner.
pub const CELEBRATE_THRESHOLD: f64 = 50.0;

/// One line of the results breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// 1-based question number.
    pub number: usize,
    pub prompt: String,
    pub rating: ConfidenceRating,
    pub correct_answer: String,
}

impl ResultRow {
    #[must_use]
    pub fn confidence_label(&self) -> &'static str {
        self.rating.label()
    }
}

/// Summary of a finished quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizResults {
    pub score: f64,
    /// Score with each question weighted by its points.
    pub weighted_score: f64,
    pub celebrate: bool,
    pub rows: Vec<ResultRow>,
}

impl QuizResults {
    /// Build results from a completed session; `None` while in progress.
    #[must_use]
    pub fn from_session(session: &QuizSession) -> Option<Self> {
        let progression = session.progression();
        let score = progression.score()?;
        let weighted_score = progression.weighted_score(session.points()).unwrap_or(score);

        let rows = session
            .records()
            .iter()
            .zip(progression.ratings())
            .enumerate()
            .map(|(i, (record, rating))| ResultRow {
                number: i + 1,
                prompt: record.prompt.clone(),
                rating: *rating,
                correct_answer: record.answer.clone(),
            })
            .collect();

        Some(Self {
            score,
            weighted_score,
            celebrate: score >= CELEBRATE_THRESHOLD,
            rows,
        })
    }
}
