use std::sync::Arc;

use quiz_core::model::QuizId;
use storage::fixtures::seed_sample;
use storage::repository::Storage;
use tracing::info;

use crate::Clock;
use crate::editor_service::QuizEditorService;
use crate::error::AppServicesError;
use crate::sessions::QuizSessionService;

/// Assembles app-facing services for a single quiz.
#[derive(Clone)]
pub struct AppServices {
    quiz_id: QuizId,
    sessions: Arc<QuizSessionService>,
    editor: Arc<QuizEditorService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or seeding fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        quiz_id: QuizId,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::from_storage(storage, clock, quiz_id).await
    }

    /// Build services over an existing storage, seeding the sample quiz when
    /// `quiz_id` is not present yet.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError::Seed` if the sample quiz cannot be stored.
    pub async fn from_storage(
        storage: Storage,
        clock: Clock,
        quiz_id: QuizId,
    ) -> Result<Self, AppServicesError> {
        if seed_sample(&storage, quiz_id, clock.now()).await? {
            info!(%quiz_id, "created sample quiz on first launch");
        }

        let sessions = Arc::new(QuizSessionService::new(
            Arc::clone(&storage.questions),
            Arc::clone(&storage.progress),
        ));
        let editor = Arc::new(QuizEditorService::new(
            clock,
            Arc::clone(&storage.quizzes),
            Arc::clone(&storage.questions),
            Arc::clone(&storage.progress),
        ));

        Ok(Self {
            quiz_id,
            sessions,
            editor,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.sessions)
    }

    #[must_use]
    pub fn editor(&self) -> Arc<QuizEditorService> {
        Arc::clone(&self.editor)
    }
}
