use thiserror::Error;

use crate::model::{AnswerKeyError, ParseIdError, ParseKindError, QuestionError, QuizError, RatingError};
use crate::progression::ProgressionError;
use crate::snapshot::SnapshotError;

/// Any error raised by the domain layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Progression(#[from] ProgressionError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Rating(#[from] RatingError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    AnswerKey(#[from] AnswerKeyError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
    #[error(transparent)]
    ParseKind(#[from] ParseKindError),
}
