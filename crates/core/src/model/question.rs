use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answer_key::{AnswerKey, AnswerKeyError};
use crate::model::ids::{QuestionId, QuizId};

//
// ─── QUESTION TYPE & DIFFICULTY ────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Mcq,
    Mmcq,
    OpenEnded,
    ShortAnswer,
    TrueFalse,
}

impl QuestionType {
    pub const ALL: [Self; 5] = [
        Self::Mcq,
        Self::Mmcq,
        Self::OpenEnded,
        Self::ShortAnswer,
        Self::TrueFalse,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mcq => "mcq",
            Self::Mmcq => "mmcq",
            Self::OpenEnded => "open_ended",
            Self::ShortAnswer => "short_answer",
            Self::TrueFalse => "true_false",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Capitalized form used in select boxes.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

/// Error for unknown enum wire names.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {raw}")]
pub struct ParseKindError {
    kind: &'static str,
    raw: String,
}

impl FromStr for QuestionType {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError {
                kind: "question type",
                raw: s.to_owned(),
            })
    }
}

impl FromStr for Difficulty {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseKindError {
                kind: "difficulty",
                raw: s.to_owned(),
            })
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyPrompt,

    #[error("points must be > 0")]
    InvalidPoints,

    #[error("time limit must be > 0 seconds when set")]
    InvalidTimeLimit,

    #[error("answer key does not fit question type {kind}")]
    KeyMismatch { kind: QuestionType },

    #[error(transparent)]
    Key(#[from] AnswerKeyError),
}

//
// ─── FLASHCARD PROJECTION ──────────────────────────────────────────────────────
//

/// Read-only view of a question as the flashcard flow sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    pub prompt: String,
    pub answer: String,
    pub explanation: String,
}

impl QuestionRecord {
    #[must_use]
    pub fn new(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            explanation: explanation.into(),
        }
    }
}

//
// ─── QUESTION TYPES ────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub quiz_id: QuizId,
    pub prompt: String,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub kind: QuestionType,
    pub time_limit_secs: Option<u32>,
    pub points: u32,
    pub key: AnswerKey,
}

impl QuestionDraft {
    /// Validate and normalize the draft.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, points are zero, the time
    /// limit is zero, or the answer key does not fit the question type.
    pub fn validate(self, now: DateTime<Utc>) -> Result<ValidatedQuestion, QuestionError> {
        let prompt = self.prompt.trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if self.points == 0 {
            return Err(QuestionError::InvalidPoints);
        }
        if self.time_limit_secs == Some(0) {
            return Err(QuestionError::InvalidTimeLimit);
        }
        if !self.key.fits(self.kind) {
            return Err(QuestionError::KeyMismatch { kind: self.kind });
        }

        Ok(ValidatedQuestion {
            quiz_id: self.quiz_id,
            prompt,
            explanation: self.explanation.trim().to_owned(),
            difficulty: self.difficulty,
            kind: self.kind,
            time_limit_secs: self.time_limit_secs,
            points: self.points,
            key: self.key,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedQuestion {
    pub quiz_id: QuizId,
    pub prompt: String,
    pub explanation: String,
    pub difficulty: Difficulty,
    pub kind: QuestionType,
    pub time_limit_secs: Option<u32>,
    pub points: u32,
    pub key: AnswerKey,
    pub created_at: DateTime<Utc>,
}

impl ValidatedQuestion {
    #[must_use]
    pub fn assign_id(self, id: QuestionId) -> Question {
        Question {
            id,
            quiz_id: self.quiz_id,
            prompt: self.prompt,
            explanation: self.explanation,
            difficulty: self.difficulty,
            kind: self.kind,
            time_limit_secs: self.time_limit_secs,
            points: self.points,
            key: self.key,
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }
}

/// Field updates coming from the question edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub prompt: Option<String>,
    pub explanation: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub time_limit_secs: Option<Option<u32>>,
    pub points: Option<u32>,
    pub key: Option<AnswerKey>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    quiz_id: QuizId,
    prompt: String,
    explanation: String,
    difficulty: Difficulty,
    kind: QuestionType,
    time_limit_secs: Option<u32>,
    points: u32,
    key: AnswerKey,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Question {
    /// Rehydrate a question from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the stored values no longer validate.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: QuestionId,
        quiz_id: QuizId,
        prompt: String,
        explanation: String,
        difficulty: Difficulty,
        kind: QuestionType,
        time_limit_secs: Option<u32>,
        points: u32,
        key: AnswerKey,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, QuestionError> {
        let draft = QuestionDraft {
            quiz_id,
            prompt,
            explanation,
            difficulty,
            kind,
            time_limit_secs,
            points,
            key,
        };
        let mut question = draft.validate(created_at)?.assign_id(id);
        question.updated_at = updated_at;
        Ok(question)
    }

    /// Apply an edit, returning the updated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the edited question fails validation.
    pub fn apply_patch(&self, patch: QuestionPatch, now: DateTime<Utc>) -> Result<Self, QuestionError> {
        let draft = QuestionDraft {
            quiz_id: self.quiz_id,
            prompt: patch.prompt.unwrap_or_else(|| self.prompt.clone()),
            explanation: patch.explanation.unwrap_or_else(|| self.explanation.clone()),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
            kind: self.kind,
            time_limit_secs: patch.time_limit_secs.unwrap_or(self.time_limit_secs),
            points: patch.points.unwrap_or(self.points),
            key: patch.key.unwrap_or_else(|| self.key.clone()),
        };
        let mut updated = draft.validate(self.created_at)?.assign_id(self.id);
        updated.updated_at = now;
        Ok(updated)
    }

    #[must_use]
    pub fn to_record(&self) -> QuestionRecord {
        QuestionRecord {
            prompt: self.prompt.clone(),
            answer: self.key.display(),
            explanation: self.explanation.clone(),
        }
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> Option<u32> {
        self.time_limit_secs
    }

    #[must_use]
    pub fn points(&self) -> u32 {
        self.points
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn capital_draft() -> QuestionDraft {
        QuestionDraft {
            quiz_id: QuizId::new(1),
            prompt: "  What is the capital of France? ".into(),
            explanation: "Paris is the capital.".into(),
            difficulty: Difficulty::Easy,
            kind: QuestionType::Mcq,
            time_limit_secs: Some(30),
            points: 10,
            key: AnswerKey::single(vec!["London".into(), "Paris".into()], 1).unwrap(),
        }
    }

    #[test]
    fn draft_validates_and_assigns_id() {
        let question = capital_draft()
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuestionId::new(3));
        assert_eq!(question.id(), QuestionId::new(3));
        assert_eq!(question.prompt(), "What is the capital of France?");
        assert_eq!(question.created_at(), question.updated_at());
    }

    #[test]
    fn draft_rejects_blank_prompt_and_zero_points() {
        let mut draft = capital_draft();
        draft.prompt = "   ".into();
        assert_eq!(draft.validate(fixed_now()).unwrap_err(), QuestionError::EmptyPrompt);

        let mut draft = capital_draft();
        draft.points = 0;
        assert_eq!(draft.validate(fixed_now()).unwrap_err(), QuestionError::InvalidPoints);

        let mut draft = capital_draft();
        draft.time_limit_secs = Some(0);
        assert_eq!(draft.validate(fixed_now()).unwrap_err(), QuestionError::InvalidTimeLimit);
    }

    #[test]
    fn draft_rejects_key_of_wrong_shape() {
        let mut draft = capital_draft();
        draft.kind = QuestionType::ShortAnswer;
        assert_eq!(
            draft.validate(fixed_now()).unwrap_err(),
            QuestionError::KeyMismatch {
                kind: QuestionType::ShortAnswer
            }
        );
    }

    #[test]
    fn record_projection_uses_key_display() {
        let question = capital_draft()
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuestionId::new(1));
        let record = question.to_record();
        assert_eq!(record.prompt, "What is the capital of France?");
        assert_eq!(record.answer, "Paris");
        assert_eq!(record.explanation, "Paris is the capital.");
    }

    #[test]
    fn patch_updates_fields_and_timestamp() {
        let question = capital_draft()
            .validate(fixed_now())
            .unwrap()
            .assign_id(QuestionId::new(1));
        let later = fixed_now() + chrono::Duration::minutes(5);
        let patch = QuestionPatch {
            points: Some(20),
            time_limit_secs: Some(None),
            ..QuestionPatch::default()
        };
        let updated = question.apply_patch(patch, later).unwrap();
        assert_eq!(updated.points(), 20);
        assert_eq!(updated.time_limit_secs(), None);
        assert_eq!(updated.prompt(), question.prompt());
        assert_eq!(updated.updated_at(), later);
        assert_eq!(updated.created_at(), question.created_at());
    }

    #[test]
    fn wire_names_parse() {
        assert_eq!("open_ended".parse::<QuestionType>().unwrap(), QuestionType::OpenEnded);
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("essay".parse::<QuestionType>().is_err());
        assert_eq!(QuestionType::TrueFalse.to_string(), "true_false");
    }
}
