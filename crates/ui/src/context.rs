use std::sync::Arc;

use quiz_core::model::QuizId;
use services::{QuizEditorService, QuizSessionService};

/// What the composition root hands to the views.
pub trait UiApp: Send + Sync {
    fn quiz_id(&self) -> QuizId;

    fn sessions(&self) -> Arc<QuizSessionService>;
    fn editor(&self) -> Arc<QuizEditorService>;
}

#[derive(Clone)]
pub struct AppContext {
    quiz_id: QuizId,
    sessions: Arc<QuizSessionService>,
    editor: Arc<QuizEditorService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            quiz_id: app.quiz_id(),
            sessions: app.sessions(),
            editor: app.editor(),
        }
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

// Provided by the composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
