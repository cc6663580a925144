use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::question::QuestionType;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerKeyError {
    #[error("a choice question needs at least two options")]
    TooFewOptions,

    #[error("answer option {index} is empty")]
    EmptyOption { index: usize },

    #[error("correct option {index} is out of range")]
    CorrectOutOfRange { index: usize },

    #[error("exactly one option must be marked correct, found {found}")]
    SingleCorrectRequired { found: usize },

    #[error("at least one option must be marked correct")]
    NoCorrectOption,

    #[error("expected answer cannot be empty")]
    EmptyExpected,
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// The correct answer for a question, resolved once from its question type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerKey {
    /// One correct option among several (multiple choice, true/false).
    SingleAnswer { options: Vec<String>, correct: usize },
    /// Any number of correct options (multi-select).
    MultiAnswer {
        options: Vec<String>,
        correct: BTreeSet<usize>,
    },
    /// Typed answer compared loosely against the expected text.
    FreeText { expected: String },
}

/// A learner's answer as submitted from the editor preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Choice(String),
    Choices(Vec<String>),
    Text(String),
}

/// Flat answer row as stored: option text plus its correctness flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRow {
    pub text: String,
    pub is_correct: bool,
}

impl AnswerRow {
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

pub const TRUE_FALSE_OPTIONS: [&str; 2] = ["True", "False"];

impl AnswerKey {
    /// Builds a single-answer key.
    ///
    /// # Errors
    ///
    /// Returns `AnswerKeyError` if there are fewer than two options, an option is
    /// blank, or `correct` does not point at an option.
    pub fn single(options: Vec<String>, correct: usize) -> Result<Self, AnswerKeyError> {
        let options = normalize_options(options)?;
        if correct >= options.len() {
            return Err(AnswerKeyError::CorrectOutOfRange { index: correct });
        }
        Ok(Self::SingleAnswer { options, correct })
    }

    /// Builds the fixed True/False key.
    #[must_use]
    pub fn true_false(answer: bool) -> Self {
        Self::SingleAnswer {
            options: TRUE_FALSE_OPTIONS.iter().map(|s| (*s).to_owned()).collect(),
            correct: usize::from(!answer),
        }
    }

    /// Builds a multi-answer key.
    ///
    /// # Errors
    ///
    /// Returns `AnswerKeyError` if options are invalid, no option is correct, or
    /// an index is out of range.
    pub fn multi(
        options: Vec<String>,
        correct: impl IntoIterator<Item = usize>,
    ) -> Result<Self, AnswerKeyError> {
        let options = normalize_options(options)?;
        let correct: BTreeSet<usize> = correct.into_iter().collect();
        if correct.is_empty() {
            return Err(AnswerKeyError::NoCorrectOption);
        }
        if let Some(index) = correct.iter().find(|i| **i >= options.len()) {
            return Err(AnswerKeyError::CorrectOutOfRange { index: *index });
        }
        Ok(Self::MultiAnswer { options, correct })
    }

    /// Builds a free-text key.
    ///
    /// # Errors
    ///
    /// Returns `AnswerKeyError::EmptyExpected` if the expected answer is blank.
    pub fn free_text(expected: impl Into<String>) -> Result<Self, AnswerKeyError> {
        let expected = expected.into().trim().to_owned();
        if expected.is_empty() {
            return Err(AnswerKeyError::EmptyExpected);
        }
        Ok(Self::FreeText { expected })
    }

    /// Resolves stored answer rows into the key variant for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `AnswerKeyError` if the rows do not form a valid key for the type.
    pub fn from_rows(kind: QuestionType, rows: Vec<AnswerRow>) -> Result<Self, AnswerKeyError> {
        match kind {
            QuestionType::Mcq | QuestionType::TrueFalse => {
                let found = rows.iter().filter(|r| r.is_correct).count();
                if found != 1 {
                    return Err(AnswerKeyError::SingleCorrectRequired { found });
                }
                let correct = rows
                    .iter()
                    .position(|r| r.is_correct)
                    .ok_or(AnswerKeyError::NoCorrectOption)?;
                Self::single(rows.into_iter().map(|r| r.text).collect(), correct)
            }
            QuestionType::Mmcq => {
                let correct: Vec<usize> = rows
                    .iter()
                    .enumerate()
                    .filter_map(|(i, r)| r.is_correct.then_some(i))
                    .collect();
                Self::multi(rows.into_iter().map(|r| r.text).collect(), correct)
            }
            QuestionType::ShortAnswer | QuestionType::OpenEnded => {
                let expected = rows
                    .into_iter()
                    .find(|r| r.is_correct)
                    .map(|r| r.text)
                    .unwrap_or_default();
                Self::free_text(expected)
            }
        }
    }

    /// Flattens the key back into ordered answer rows.
    #[must_use]
    pub fn to_rows(&self) -> Vec<AnswerRow> {
        match self {
            Self::SingleAnswer { options, correct } => options
                .iter()
                .enumerate()
                .map(|(i, text)| AnswerRow::new(text.clone(), i == *correct))
                .collect(),
            Self::MultiAnswer { options, correct } => options
                .iter()
                .enumerate()
                .map(|(i, text)| AnswerRow::new(text.clone(), correct.contains(&i)))
                .collect(),
            Self::FreeText { expected } => vec![AnswerRow::new(expected.clone(), true)],
        }
    }

    /// Whether this key shape is valid for the given question type.
    #[must_use]
    pub fn fits(&self, kind: QuestionType) -> bool {
        match self {
            Self::SingleAnswer { options, .. } => match kind {
                QuestionType::Mcq => true,
                QuestionType::TrueFalse => {
                    options.len() == 2
                        && options
                            .iter()
                            .zip(TRUE_FALSE_OPTIONS)
                            .all(|(a, b)| a == b)
                }
                _ => false,
            },
            Self::MultiAnswer { .. } => kind == QuestionType::Mmcq,
            Self::FreeText { .. } => {
                matches!(kind, QuestionType::ShortAnswer | QuestionType::OpenEnded)
            }
        }
    }

    /// Options offered to the learner; empty for free text.
    #[must_use]
    pub fn options(&self) -> &[String] {
        match self {
            Self::SingleAnswer { options, .. } | Self::MultiAnswer { options, .. } => options,
            Self::FreeText { .. } => &[],
        }
    }

    /// Correct answers in option order.
    #[must_use]
    pub fn correct_answers(&self) -> Vec<&str> {
        match self {
            Self::SingleAnswer { options, correct } => {
                options.get(*correct).map(String::as_str).into_iter().collect()
            }
            Self::MultiAnswer { options, correct } => correct
                .iter()
                .filter_map(|i| options.get(*i).map(String::as_str))
                .collect(),
            Self::FreeText { expected } => vec![expected.as_str()],
        }
    }

    /// Correct answer text as shown on the back of a flashcard.
    #[must_use]
    pub fn display(&self) -> String {
        self.correct_answers().join(", ")
    }

    /// Checks a response against the key.
    ///
    /// A response of the wrong shape for the key is never correct.
    #[must_use]
    pub fn check(&self, response: &Response) -> bool {
        match (self, response) {
            (Self::SingleAnswer { options, correct }, Response::Choice(choice)) => {
                options.get(*correct) == Some(choice)
            }
            (Self::MultiAnswer { options, correct }, Response::Choices(choices)) => {
                let picked: BTreeSet<&str> = choices.iter().map(String::as_str).collect();
                let expected: BTreeSet<&str> = correct
                    .iter()
                    .filter_map(|i| options.get(*i).map(String::as_str))
                    .collect();
                picked.len() == choices.len() && picked == expected
            }
            (Self::FreeText { expected }, Response::Text(text)) => {
                text.trim().to_lowercase() == expected.to_lowercase()
            }
            _ => false,
        }
    }
}

fn normalize_options(options: Vec<String>) -> Result<Vec<String>, AnswerKeyError> {
    if options.len() < 2 {
        return Err(AnswerKeyError::TooFewOptions);
    }
    options
        .into_iter()
        .enumerate()
        .map(|(index, option)| {
            let option = option.trim().to_owned();
            if option.is_empty() {
                Err(AnswerKeyError::EmptyOption { index })
            } else {
                Ok(option)
            }
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
