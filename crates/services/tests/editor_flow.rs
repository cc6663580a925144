use std::sync::Arc;

use quiz_core::model::{
    AnswerKey, ConfidenceRating, Difficulty, QuestionDraft, QuestionId, QuestionPatch,
    QuestionType, QuizId, QuizPatch, Response,
};
use quiz_core::time::fixed_now;
use services::{
    AnswerFeedback, AppServices, Clock, EditorError, QuizEditorService, slot_key_for,
};
use storage::repository::{ProgressStore, Storage};

async fn services_with_progress(storage: &Storage, quiz_id: QuizId) -> AppServices {
    let services = AppServices::from_storage(storage.clone(), Clock::fixed(fixed_now()), quiz_id)
        .await
        .expect("services");
    let sessions = services.sessions();
    let mut session = sessions.start(quiz_id).await.expect("start");
    sessions
        .rate(&mut session, ConfidenceRating::GotItCorrect)
        .await
        .expect("rate first");
    sessions
        .rate(&mut session, ConfidenceRating::DidNotKnow)
        .await
        .expect("rate second");
    assert!(
        storage
            .progress
            .read_slot(&slot_key_for(quiz_id))
            .await
            .unwrap()
            .is_some()
    );
    services
}

#[tokio::test]
async fn editor_flow_add_edit_check_delete() {
    let storage = Storage::sqlite("sqlite:file:memdb_editor_flow?mode=memory&cache=shared")
        .await
        .expect("connect sqlite");
    let quiz_id = QuizId::new(1);
    let services = AppServices::from_storage(storage, Clock::fixed(fixed_now()), quiz_id)
        .await
        .expect("services");
    let editor = services.editor();

    let questions = editor.list_questions(quiz_id).await.expect("list");
    assert_eq!(questions.len(), 5);

    let added = editor
        .add_question(QuestionDraft {
            quiz_id,
            prompt: "Largest planet?".into(),
            explanation: "Jupiter is the largest planet in the Solar System.".into(),
            difficulty: Difficulty::Easy,
            kind: QuestionType::Mcq,
            time_limit_secs: Some(20),
            points: 5,
            key: AnswerKey::single(vec!["Mars".into(), "Jupiter".into()], 1).unwrap(),
        })
        .await
        .expect("add");

    let feedback = editor
        .check_answer(added.id(), &Response::Choice("Mars".into()))
        .await
        .expect("check");
    assert_eq!(feedback, AnswerFeedback::TryAgain);
    let feedback = editor
        .check_answer(added.id(), &Response::Choice("Jupiter".into()))
        .await
        .expect("check");
    assert_eq!(feedback.message(), "Correct!");

    let edited = editor
        .update_question(
            added.id(),
            QuestionPatch {
                prompt: Some("Largest planet in the Solar System?".into()),
                points: Some(10),
                ..QuestionPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(edited.points(), 10);

    let questions = editor.list_questions(quiz_id).await.expect("list");
    assert_eq!(questions.len(), 6);
    assert_eq!(questions[5].prompt(), "Largest planet in the Solar System?");

    editor.delete_question(added.id()).await.expect("delete");
    assert!(matches!(
        editor.delete_question(added.id()).await,
        Err(EditorError::QuestionNotFound(id)) if id == added.id()
    ));
    assert_eq!(editor.list_questions(quiz_id).await.unwrap().len(), 5);
}

#[tokio::test]
async fn settings_patch_is_validated_and_persisted() {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(3);
    let services = AppServices::from_storage(storage.clone(), Clock::fixed(fixed_now()), quiz_id)
        .await
        .expect("services");
    let editor = services.editor();

    let updated = editor
        .update_settings(
            quiz_id,
            QuizPatch {
                subtopics: Some(QuizPatch::subtopics_from_text("History, Music")),
                hide_correct_answers: Some(true),
                ..QuizPatch::default()
            },
        )
        .await
        .expect("update settings");
    assert_eq!(updated.subtopics_text(), "History, Music");

    let reloaded = editor.load_quiz(quiz_id).await.expect("load");
    assert!(reloaded.behavior().hide_correct_answers);

    let err = editor
        .update_settings(
            quiz_id,
            QuizPatch {
                title: Some("   ".into()),
                ..QuizPatch::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EditorError::Quiz(_)));

    assert!(matches!(
        editor.load_quiz(QuizId::new(404)).await,
        Err(EditorError::QuizNotFound(_))
    ));
}

#[tokio::test]
async fn editing_unknown_question_reports_not_found() {
    let storage = Storage::in_memory();
    let editor = QuizEditorService::new(
        Clock::fixed(fixed_now()),
        Arc::clone(&storage.quizzes),
        Arc::clone(&storage.questions),
        Arc::clone(&storage.progress),
    );
    let missing = QuestionId::new(99);
    assert!(matches!(
        editor.update_question(missing, QuestionPatch::default()).await,
        Err(EditorError::QuestionNotFound(_))
    ));
    assert!(matches!(
        editor
            .check_answer(missing, &Response::Text("Au".into()))
            .await,
        Err(EditorError::QuestionNotFound(_))
    ));
}

#[tokio::test]
async fn deleting_a_question_discards_saved_progress() {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(1);
    let services = services_with_progress(&storage, quiz_id).await;
    let editor = services.editor();

    let first = editor.list_questions(quiz_id).await.unwrap()[0].id();
    editor.delete_question(first).await.expect("delete");

    assert_eq!(
        storage.progress.read_slot(&slot_key_for(quiz_id)).await.unwrap(),
        None
    );

    let remaining = editor.list_questions(quiz_id).await.unwrap();
    let session = services.sessions().start(quiz_id).await.expect("restart");
    let frame = session.frame();
    assert_eq!(frame.position, 1);
    assert_eq!(frame.total, 4);
    assert!(session.progression().ratings().is_empty());
    assert_eq!(
        frame.current.map(|record| record.prompt),
        Some(remaining[0].prompt().to_owned())
    );
}

#[tokio::test]
async fn adding_a_question_discards_saved_progress() {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(1);
    let services = services_with_progress(&storage, quiz_id).await;

    services
        .editor()
        .add_question(QuestionDraft {
            quiz_id,
            prompt: "Chemical symbol for gold?".into(),
            explanation: String::new(),
            difficulty: Difficulty::Easy,
            kind: QuestionType::ShortAnswer,
            time_limit_secs: None,
            points: 5,
            key: AnswerKey::free_text("Au").unwrap(),
        })
        .await
        .expect("add");

    assert_eq!(
        storage.progress.read_slot(&slot_key_for(quiz_id)).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn only_scoring_edits_discard_saved_progress() {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(1);
    let services = services_with_progress(&storage, quiz_id).await;
    let editor = services.editor();
    let key = slot_key_for(quiz_id);
    let first = editor.list_questions(quiz_id).await.unwrap()[0].clone();

    editor
        .update_question(
            first.id(),
            QuestionPatch {
                prompt: Some("What is the capital city of France?".into()),
                ..QuestionPatch::default()
            },
        )
        .await
        .expect("reword");
    assert!(storage.progress.read_slot(&key).await.unwrap().is_some());

    editor
        .update_question(
            first.id(),
            QuestionPatch {
                points: Some(first.points() + 5),
                ..QuestionPatch::default()
            },
        )
        .await
        .expect("re-weight");
    assert_eq!(storage.progress.read_slot(&key).await.unwrap(), None);

    let session = services.sessions().start(quiz_id).await.expect("restart");
    assert_eq!(session.frame().position, 1);
}

#[tokio::test]
async fn deleting_unknown_question_keeps_saved_progress() {
    let storage = Storage::in_memory();
    let quiz_id = QuizId::new(1);
    let services = services_with_progress(&storage, quiz_id).await;

    assert!(matches!(
        services.editor().delete_question(QuestionId::new(404)).await,
        Err(EditorError::QuestionNotFound(_))
    ));
    assert!(
        storage
            .progress
            .read_slot(&slot_key_for(quiz_id))
            .await
            .unwrap()
            .is_some()
    );
}
