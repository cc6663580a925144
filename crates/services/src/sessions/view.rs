use quiz_core::model::{ConfidenceRating, QuestionRecord};
use quiz_core::progression::Direction;

/// Read projection of a quiz session handed to the presentation layer.
///
/// Carries plain values only; formatting is left to the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizFrame {
    /// Question being shown, `None` once the quiz is complete.
    pub current: Option<QuestionRecord>,
    /// 1-based number of the question on screen, capped at `total`.
    pub position: usize,
    pub total: usize,
    pub progress_fraction: f64,
    pub direction: Direction,
    pub is_complete: bool,
    pub score: Option<f64>,
}

impl QuizFrame {
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.is_complete && self.position > 1
    }
}

/// User intents emitted by the quiz view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizIntent {
    Rate(ConfidenceRating),
    Previous,
    Skip,
    Restart,
}
