use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when converting raw confidence values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("confidence rating must be between 0 and 3, got {0}")]
    OutOfRange(u8),
}

//
// ─── CONFIDENCE RATING ────────────────────────────────────────────────────────
//

/// Four-level self assessment given after revealing a flashcard answer.
///
/// The numeric value (0-3) is what gets summed into the quiz score:
/// - `DidNotKnow`: 0, the learner had no idea
/// - `MaybeSaw`: 1, the question looked familiar
/// - `KnewIt`: 2, the learner knew what was being asked
/// - `GotItCorrect`: 3, answered correctly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ConfidenceRating {
    DidNotKnow,
    MaybeSaw,
    KnewIt,
    GotItCorrect,
}

impl ConfidenceRating {
    /// Highest numeric value a single rating can contribute.
    pub const MAX_VALUE: u8 = 3;

    /// All ratings in ascending order, as offered on the answer side of a card.
    pub const ALL: [Self; 4] = [
        Self::DidNotKnow,
        Self::MaybeSaw,
        Self::KnewIt,
        Self::GotItCorrect,
    ];

    /// Converts a numeric rating (0-3) to a `ConfidenceRating`.
    ///
    /// # Errors
    ///
    /// Returns `RatingError::OutOfRange` if the value is not in the range 0-3.
    pub fn from_u8(value: u8) -> Result<Self, RatingError> {
        match value {
            0 => Ok(Self::DidNotKnow),
            1 => Ok(Self::MaybeSaw),
            2 => Ok(Self::KnewIt),
            3 => Ok(Self::GotItCorrect),
            _ => Err(RatingError::OutOfRange(value)),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        match self {
            Self::DidNotKnow => 0,
            Self::MaybeSaw => 1,
            Self::KnewIt => 2,
            Self::GotItCorrect => 3,
        }
    }

    /// Human readable description shown next to the rating buttons and in results.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DidNotKnow => "Didn't know it",
            Self::MaybeSaw => "Maybe saw this question",
            Self::KnewIt => "Knew the question",
            Self::GotItCorrect => "Got it correct",
        }
    }
}

impl TryFrom<u8> for ConfidenceRating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
    }
}

impl From<ConfidenceRating> for u8 {
    fn from(rating: ConfidenceRating) -> Self {
        rating.value()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
