#![forbid(unsafe_code)]

pub mod app_services;
pub mod editor_service;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;

pub use app_services::AppServices;
pub use editor_service::{AnswerFeedback, QuizEditorService, reveal_explanation};
pub use error::{AppServicesError, EditorError, SessionError};

pub use sessions::{
    QuizFrame, QuizIntent, QuizResults, QuizSession, QuizSessionService, ResultRow, slot_key_for,
};
