use quiz_core::model::ConfidenceRating;
use quiz_core::progression::Direction;
use services::QuizFrame;

/// Flashcard face shown to the learner.
#[derive(Clone, Debug, PartialEq)]
pub struct QuizCardVm {
    pub title: String,
    pub prompt: String,
    pub answer: String,
    pub explanation: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuizVm {
    pub card: Option<QuizCardVm>,
    pub position_label: String,
    pub progress_percent: f64,
    pub slide_class: &'static str,
    pub can_go_back: bool,
    pub can_skip: bool,
    pub is_complete: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RatingButtonVm {
    pub rating: ConfidenceRating,
    pub value: u8,
    pub label: &'static str,
    pub id: &'static str,
}

#[must_use]
pub fn map_quiz_frame(frame: &QuizFrame) -> QuizVm {
    let card = frame.current.as_ref().map(|record| QuizCardVm {
        title: format!("Question {}", frame.position),
        prompt: record.prompt.clone(),
        answer: record.answer.clone(),
        explanation: record.explanation.clone(),
    });

    QuizVm {
        card,
        position_label: format!("Question {} of {}", frame.position, frame.total),
        progress_percent: (frame.progress_fraction * 100.0).clamp(0.0, 100.0),
        slide_class: slide_class(frame.direction),
        can_go_back: frame.can_go_back(),
        can_skip: !frame.is_complete,
        is_complete: frame.is_complete,
    }
}

#[must_use]
pub fn slide_class(direction: Direction) -> &'static str {
    match direction {
        Direction::Forward => "quiz-card--from-right",
        Direction::Backward => "quiz-card--from-left",
        Direction::Still => "quiz-card--still",
    }
}

#[must_use]
pub fn rating_buttons() -> [RatingButtonVm; 4] {
    ConfidenceRating::ALL.map(|rating| RatingButtonVm {
        rating,
        value: rating.value(),
        label: rating.label(),
        id: match rating {
            ConfidenceRating::DidNotKnow => "quiz-rate-0",
            ConfidenceRating::MaybeSaw => "quiz-rate-1",
            ConfidenceRating::KnewIt => "quiz-rate-2",
            ConfidenceRating::GotItCorrect => "quiz-rate-3",
        },
    })
}
