use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, QuizId, ValidatedQuestion};
use services::slot_key_for;
use storage::repository::{ProgressStore, QuestionRepository, Storage, StorageError};

use super::test_harness::{ViewKind, setup_view_harness, setup_view_harness_with_questions};

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_first_card() {
    let mut harness = setup_view_harness(ViewKind::Quiz, Storage::in_memory()).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 1 of 5"), "missing position in {html}");
    assert!(
        html.contains("What is the capital of France?"),
        "missing prompt in {html}"
    );
    assert!(html.contains("Click to reveal answer"), "missing hint in {html}");
    assert!(html.contains("Previous"), "missing previous in {html}");
    assert!(html.contains("Skip"), "missing skip in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_resumes_saved_progress() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Quiz, storage.clone()).await;
    storage
        .progress
        .write_slot(
            &slot_key_for(harness.quiz_id),
            r#"{"version":1,"index":2,"ratings":[3,0]}"#,
        )
        .await
        .expect("write slot");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Question 3 of 5"), "missing position in {html}");
    assert!(html.contains("Is the Earth flat?"), "missing prompt in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_results_when_complete() {
    let storage = Storage::in_memory();
    let mut harness = setup_view_harness(ViewKind::Quiz, storage.clone()).await;
    storage
        .progress
        .write_slot(
            &slot_key_for(harness.quiz_id),
            r#"{"version":1,"index":5,"ratings":[3,0,3,0,3]}"#,
        )
        .await
        .expect("write slot");

    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Quiz Results"), "missing title in {html}");
    assert!(html.contains("60%"), "missing score in {html}");
    assert!(html.contains("Weighted by points: 36%"), "missing weighted score in {html}");
    assert!(
        html.contains("Congratulations! Great job!"),
        "missing banner in {html}"
    );
    assert!(html.contains("Red, Blue, Yellow"), "missing answer in {html}");
    assert!(html.contains("Take Quiz Again"), "missing restart in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn editor_view_smoke_lists_questions_with_answers_hidden() {
    let mut harness = setup_view_harness(ViewKind::Editor, Storage::in_memory()).await;
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("General Knowledge Quiz"), "missing title in {html}");
    assert!(html.contains("Show Answers"), "missing toggle in {html}");
    assert!(
        html.contains("What is the chemical symbol for gold?"),
        "missing question in {html}"
    );
    assert!(html.contains("Check Answer"), "missing check in {html}");
    assert!(!html.contains("Correct answer:"), "answers leaked in {html}");
    assert!(
        !html.contains("most populous city"),
        "explanation leaked in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn editor_view_smoke_reports_missing_quiz() {
    let storage = Storage::in_memory();
    let questions = Arc::clone(&storage.questions);
    let mut harness = setup_view_harness_with_questions(ViewKind::Editor, storage, questions);
    harness.settle().await;
    let html = harness.render();
    assert!(
        html.contains("That item no longer exists."),
        "missing not-found message in {html}"
    );
}

struct FailingQuestions;

#[async_trait]
impl QuestionRepository for FailingQuestions {
    async fn list_questions(&self, _quiz_id: QuizId) -> Result<Vec<Question>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn get_question(&self, _id: QuestionId) -> Result<Option<Question>, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn insert_question(&self, _question: ValidatedQuestion) -> Result<Question, StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn update_question(&self, _question: &Question) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }

    async fn delete_question(&self, _id: QuestionId) -> Result<(), StorageError> {
        Err(StorageError::Connection("fail".to_string()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_error_state() {
    let mut harness = setup_view_harness_with_questions(
        ViewKind::Quiz,
        Storage::in_memory(),
        Arc::new(FailingQuestions),
    );
    harness.settle().await;
    let html = harness.render();
    assert!(html.contains("Something went wrong"), "missing error in {html}");
    assert!(html.contains("Retry"), "missing retry in {html}");
}
