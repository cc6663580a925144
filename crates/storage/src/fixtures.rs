//! Sample content used by the `seed` command and tests.

use chrono::{DateTime, Utc};
use quiz_core::model::{
    AnswerKey, AnswerKeyError, Difficulty, QuestionDraft, QuestionError, QuestionType, QuizBehavior,
    QuizDraft, QuizError, QuizId,
};
use thiserror::Error;
use tracing::info;

use crate::repository::{Storage, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SeedError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    AnswerKey(#[from] AnswerKeyError),
}

#[must_use]
pub fn sample_quiz() -> QuizDraft {
    QuizDraft {
        title: "General Knowledge Quiz".into(),
        description: "Test your knowledge on various topics!".into(),
        language: "en".into(),
        kind: QuestionType::Mcq,
        difficulty: Difficulty::Medium,
        topic: "General Knowledge".into(),
        subtopics: vec!["Geography".into(), "Science".into(), "Art".into()],
        behavior: QuizBehavior {
            quiz_time_limit_mins: Some(10),
            question_time_limit_secs: Some(30),
            ..QuizBehavior::default()
        },
        is_public: true,
        created_by: 1,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_owned()).collect()
}

/// The five sample questions, one of each question type.
///
/// # Errors
///
/// Returns `AnswerKeyError` if a sample key fails validation.
pub fn sample_questions(quiz_id: QuizId) -> Result<Vec<QuestionDraft>, AnswerKeyError> {
    let question = |prompt: &str,
                    explanation: &str,
                    difficulty: Difficulty,
                    kind: QuestionType,
                    time_limit_secs: u32,
                    points: u32,
                    key: AnswerKey| QuestionDraft {
        quiz_id,
        prompt: prompt.into(),
        explanation: explanation.into(),
        difficulty,
        kind,
        time_limit_secs: Some(time_limit_secs),
        points,
        key,
    };

    Ok(vec![
        question(
            "What is the capital of France?",
            "Paris is the capital and most populous city of France.",
            Difficulty::Easy,
            QuestionType::Mcq,
            30,
            10,
            AnswerKey::single(strings(&["London", "Paris", "Berlin", "Madrid"]), 1)?,
        ),
        question(
            "Which of the following are primary colors?",
            "Red, blue, and yellow are considered primary colors in art.",
            Difficulty::Medium,
            QuestionType::Mmcq,
            45,
            15,
            AnswerKey::multi(strings(&["Red", "Green", "Blue", "Yellow"]), [0, 2, 3])?,
        ),
        question(
            "Is the Earth flat?",
            "The Earth is approximately spherical, not flat.",
            Difficulty::Easy,
            QuestionType::TrueFalse,
            15,
            5,
            AnswerKey::true_false(false),
        ),
        question(
            "Explain the concept of photosynthesis in your own words.",
            "Photosynthesis is the process by which plants use sunlight, water, and carbon \
             dioxide to produce oxygen and energy in the form of sugar.",
            Difficulty::Medium,
            QuestionType::OpenEnded,
            300,
            20,
            AnswerKey::free_text(
                "Plants turn sunlight, water, and carbon dioxide into sugar and oxygen.",
            )?,
        ),
        question(
            "What is the chemical symbol for gold?",
            "Au is the chemical symbol for gold, derived from its Latin name \"aurum\".",
            Difficulty::Easy,
            QuestionType::ShortAnswer,
            30,
            5,
            AnswerKey::free_text("Au")?,
        ),
    ])
}

/// Store the sample quiz under `quiz_id` unless it already exists.
///
/// Returns `false` when the quiz was already present and nothing was written.
///
/// # Errors
///
/// Returns `SeedError` if the sample content fails validation or storage fails.
pub async fn seed_sample(
    storage: &Storage,
    quiz_id: QuizId,
    now: DateTime<Utc>,
) -> Result<bool, SeedError> {
    if storage.quizzes.get_quiz(quiz_id).await?.is_some() {
        info!(%quiz_id, "quiz already present, skipping seed");
        return Ok(false);
    }

    let quiz = sample_quiz().validate(quiz_id, now, now)?;
    storage.quizzes.upsert_quiz(&quiz).await?;

    let drafts = sample_questions(quiz_id)?;
    let count = drafts.len();
    for draft in drafts {
        storage.questions.insert_question(draft.validate(now)?).await?;
    }
    info!(%quiz_id, questions = count, "seeded sample quiz");
    Ok(true)
}
