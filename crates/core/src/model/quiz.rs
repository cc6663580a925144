use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::{Difficulty, QuestionType};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz time limit must be > 0 minutes when set")]
    InvalidQuizTimeLimit,

    #[error("question time limit must be > 0 seconds when set")]
    InvalidQuestionTimeLimit,
}

//
// ─── BEHAVIOR SETTINGS ─────────────────────────────────────────────────────────
//

/// Toggles and limits from the "Behavior Settings" section of the quiz sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct QuizBehavior {
    pub hide_correct_answers: bool,
    pub has_flash_cards: bool,
    pub has_preview: bool,
    pub has_multiple_attempts: bool,
    pub hide_description: bool,
    pub hide_final_report: bool,
    pub quiz_time_limit_mins: Option<u32>,
    pub question_time_limit_secs: Option<u32>,
}

impl Default for QuizBehavior {
    fn default() -> Self {
        Self {
            hide_correct_answers: false,
            has_flash_cards: true,
            has_preview: true,
            has_multiple_attempts: false,
            hide_description: false,
            hide_final_report: false,
            quiz_time_limit_mins: None,
            question_time_limit_secs: None,
        }
    }
}

impl QuizBehavior {
    fn validate(self) -> Result<Self, QuizError> {
        if self.quiz_time_limit_mins == Some(0) {
            return Err(QuizError::InvalidQuizTimeLimit);
        }
        if self.question_time_limit_secs == Some(0) {
            return Err(QuizError::InvalidQuestionTimeLimit);
        }
        Ok(self)
    }
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizDraft {
    pub title: String,
    pub description: String,
    pub language: String,
    pub kind: QuestionType,
    pub difficulty: Difficulty,
    pub topic: String,
    pub subtopics: Vec<String>,
    pub behavior: QuizBehavior,
    pub is_public: bool,
    pub created_by: u64,
}

impl QuizDraft {
    /// Validate the draft and build a quiz with the given identity.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank or a time limit is zero.
    pub fn validate(
        self,
        id: QuizId,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Quiz, QuizError> {
        let title = self.title.trim().to_owned();
        if title.is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        let behavior = self.behavior.validate()?;

        Ok(Quiz {
            id,
            title,
            description: self.description.trim().to_owned(),
            language: self.language.trim().to_owned(),
            kind: self.kind,
            difficulty: self.difficulty,
            topic: self.topic.trim().to_owned(),
            subtopics: normalize_subtopics(self.subtopics),
            behavior,
            is_public: self.is_public,
            created_by: self.created_by,
            created_at,
            updated_at,
        })
    }
}

/// Partial update from the settings sheet. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub kind: Option<QuestionType>,
    pub difficulty: Option<Difficulty>,
    pub topic: Option<String>,
    pub subtopics: Option<Vec<String>>,
    pub hide_correct_answers: Option<bool>,
    pub has_flash_cards: Option<bool>,
    pub has_preview: Option<bool>,
    pub has_multiple_attempts: Option<bool>,
    pub hide_description: Option<bool>,
    pub hide_final_report: Option<bool>,
    pub quiz_time_limit_mins: Option<Option<u32>>,
    pub question_time_limit_secs: Option<Option<u32>>,
    pub is_public: Option<bool>,
}

impl QuizPatch {
    /// Splits the comma separated subtopics text field.
    #[must_use]
    pub fn subtopics_from_text(text: &str) -> Vec<String> {
        normalize_subtopics(text.split(',').map(str::to_owned).collect())
    }

    /// Parses an optional numeric limit field; blank or non-positive clears it.
    #[must_use]
    pub fn limit_from_text(text: &str) -> Option<u32> {
        text.trim().parse::<u32>().ok().filter(|v| *v > 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    description: String,
    language: String,
    kind: QuestionType,
    difficulty: Difficulty,
    topic: String,
    subtopics: Vec<String>,
    behavior: QuizBehavior,
    is_public: bool,
    created_by: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Apply a settings patch, returning the updated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the patched quiz fails validation.
    pub fn apply_patch(&self, patch: QuizPatch, now: DateTime<Utc>) -> Result<Self, QuizError> {
        let b = self.behavior;
        let behavior = QuizBehavior {
            hide_correct_answers: patch.hide_correct_answers.unwrap_or(b.hide_correct_answers),
            has_flash_cards: patch.has_flash_cards.unwrap_or(b.has_flash_cards),
            has_preview: patch.has_preview.unwrap_or(b.has_preview),
            has_multiple_attempts: patch.has_multiple_attempts.unwrap_or(b.has_multiple_attempts),
            hide_description: patch.hide_description.unwrap_or(b.hide_description),
            hide_final_report: patch.hide_final_report.unwrap_or(b.hide_final_report),
            quiz_time_limit_mins: patch.quiz_time_limit_mins.unwrap_or(b.quiz_time_limit_mins),
            question_time_limit_secs: patch
                .question_time_limit_secs
                .unwrap_or(b.question_time_limit_secs),
        };

        QuizDraft {
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            description: patch.description.unwrap_or_else(|| self.description.clone()),
            language: patch.language.unwrap_or_else(|| self.language.clone()),
            kind: patch.kind.unwrap_or(self.kind),
            difficulty: patch.difficulty.unwrap_or(self.difficulty),
            topic: patch.topic.unwrap_or_else(|| self.topic.clone()),
            subtopics: patch.subtopics.unwrap_or_else(|| self.subtopics.clone()),
            behavior,
            is_public: patch.is_public.unwrap_or(self.is_public),
            created_by: self.created_by,
        }
        .validate(self.id, self.created_at, now)
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    #[must_use]
    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn subtopics(&self) -> &[String] {
        &self.subtopics
    }

    /// Subtopics in the ", " joined form used by the settings text field.
    #[must_use]
    pub fn subtopics_text(&self) -> String {
        self.subtopics.join(", ")
    }

    #[must_use]
    pub fn behavior(&self) -> QuizBehavior {
        self.behavior
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        self.is_public
    }

    #[must_use]
    pub fn created_by(&self) -> u64 {
        self.created_by
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

fn normalize_subtopics(subtopics: Vec<String>) -> Vec<String> {
    subtopics
        .into_iter()
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
