use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{ConfidenceRating, QuizId};
use quiz_core::progression::ProgressionError;
use quiz_core::snapshot::ProgressSnapshot;
use quiz_core::time::fixed_now;
use services::{QuizIntent, QuizSessionService, SessionError, slot_key_for};
use storage::fixtures::seed_sample;
use storage::repository::{ProgressStore, Storage, StorageError};

async fn seeded() -> (Storage, QuizSessionService, QuizId) {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(1);
    seed_sample(&storage, quiz_id, fixed_now()).await.unwrap();
    let service = QuizSessionService::new(
        Arc::clone(&storage.questions),
        Arc::clone(&storage.progress),
    );
    (storage, service, quiz_id)
}

async fn saved(storage: &Storage, quiz_id: QuizId) -> Option<ProgressSnapshot> {
    storage
        .progress
        .read_slot(&slot_key_for(quiz_id))
        .await
        .unwrap()
        .map(|payload| ProgressSnapshot::decode(&payload).unwrap())
}

#[tokio::test]
async fn full_run_mirrors_progress_and_scores() {
    let (storage, service, quiz_id) = seeded().await;
    let mut session = service.start(quiz_id).await.unwrap();
    assert_eq!(session.total(), 5);

    let intents = [
        QuizIntent::Rate(ConfidenceRating::GotItCorrect),
        QuizIntent::Skip,
        QuizIntent::Rate(ConfidenceRating::GotItCorrect),
        QuizIntent::Rate(ConfidenceRating::DidNotKnow),
        QuizIntent::Rate(ConfidenceRating::GotItCorrect),
    ];
    for intent in intents {
        service.apply(&mut session, intent).await.unwrap();
    }

    let frame = session.frame();
    assert!(frame.is_complete);
    let score = frame.score.unwrap();
    assert!((score - 60.0).abs() < 1e-9);

    let snapshot = saved(&storage, quiz_id).await.expect("slot written");
    assert_eq!(snapshot.index, 5);
    assert_eq!(snapshot.ratings, vec![3, 0, 3, 0, 3]);

    let results = session.results().unwrap();
    assert!(results.celebrate);
    assert_eq!(results.rows[1].confidence_label(), "Didn't know it");
    assert_eq!(results.rows[1].correct_answer, "Red, Blue, Yellow");
}

#[tokio::test]
async fn start_resumes_valid_saved_progress() {
    let (storage, service, quiz_id) = seeded().await;
    let mut session = service.start(quiz_id).await.unwrap();
    service
        .rate(&mut session, ConfidenceRating::KnewIt)
        .await
        .unwrap();
    service
        .rate(&mut session, ConfidenceRating::MaybeSaw)
        .await
        .unwrap();
    service.previous(&mut session).await.unwrap();
    assert_eq!(saved(&storage, quiz_id).await.unwrap().ratings, vec![2]);

    let resumed = service.start(quiz_id).await.unwrap();
    assert_eq!(resumed.progression().current_index(), 1);
    assert_eq!(resumed.progression().ratings(), &[ConfidenceRating::KnewIt]);
    assert_eq!(
        resumed.current().map(|r| r.prompt.as_str()),
        Some("Which of the following are primary colors?")
    );
}

#[tokio::test]
async fn invalid_saved_progress_falls_back_to_fresh() {
    let (storage, service, quiz_id) = seeded().await;
    let key = slot_key_for(quiz_id);
    let cases = [
        "garbage",
        r#"{"currentQuestion":2,"userAnswers":[3,3]}"#,
        r#"{"version":2,"index":0,"ratings":[]}"#,
        r#"{"version":1,"index":2,"ratings":[3]}"#,
        r#"{"version":1,"index":9,"ratings":[0,0,0,0,0,0,0,0,0]}"#,
        r#"{"version":1,"index":1,"ratings":[7]}"#,
    ];
    for payload in cases {
        storage.progress.write_slot(&key, payload).await.unwrap();
        let session = service.start(quiz_id).await.unwrap();
        assert_eq!(session.progression().current_index(), 0, "payload {payload}");
        assert!(session.progression().ratings().is_empty());
    }
}

#[tokio::test]
async fn rejected_transitions_are_not_mirrored() {
    let (storage, service, quiz_id) = seeded().await;
    let mut session = service.start(quiz_id).await.unwrap();

    let err = service.previous(&mut session).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::Progression(ProgressionError::AtStart)
    ));
    assert!(saved(&storage, quiz_id).await.is_none());
}

#[tokio::test]
async fn restart_resets_state_and_clears_slot() {
    let (storage, service, quiz_id) = seeded().await;
    let mut session = service.start(quiz_id).await.unwrap();
    service.skip(&mut session).await.unwrap();
    assert!(saved(&storage, quiz_id).await.is_some());

    service
        .apply(&mut session, QuizIntent::Restart)
        .await
        .unwrap();
    assert_eq!(session.progression().current_index(), 0);
    assert!(session.progression().ratings().is_empty());
    assert!(saved(&storage, quiz_id).await.is_none());
}

#[tokio::test]
async fn empty_quiz_completes_with_zero_score() {
    let storage = Storage::in_memory();
    let service = QuizSessionService::new(
        Arc::clone(&storage.questions),
        Arc::clone(&storage.progress),
    );
    let session = service.start(QuizId::new(42)).await.unwrap();
    assert!(session.is_complete());
    assert_eq!(session.frame().score, Some(0.0));
}

struct BrokenStore;

#[async_trait]
impl ProgressStore for BrokenStore {
    async fn read_slot(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn write_slot(&self, _key: &str, _payload: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn clear_slot(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

#[tokio::test]
async fn unavailable_store_does_not_block_the_quiz() {
    let (storage, _, quiz_id) = seeded().await;
    let service = QuizSessionService::new(Arc::clone(&storage.questions), Arc::new(BrokenStore));

    let mut session = service.start(quiz_id).await.unwrap();
    service
        .rate(&mut session, ConfidenceRating::GotItCorrect)
        .await
        .unwrap();
    assert_eq!(session.progression().current_index(), 1);
    service.restart(&mut session).await;
    assert_eq!(session.progression().current_index(), 0);
}
