pub mod answer_key;
mod ids;
mod question;
mod quiz;
mod rating;

pub use answer_key::{AnswerKey, AnswerKeyError, AnswerRow, Response, TRUE_FALSE_OPTIONS};
pub use ids::{ParseIdError, QuestionId, QuizId};

pub use question::{
    Difficulty, ParseKindError, Question, QuestionDraft, QuestionError, QuestionPatch,
    QuestionRecord, QuestionType, ValidatedQuestion,
};
pub use quiz::{Quiz, QuizBehavior, QuizDraft, QuizError, QuizPatch};
pub use rating::{ConfidenceRating, RatingError};
