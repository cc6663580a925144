use async_trait::async_trait;
use quiz_core::model::{Question, QuestionId, Quiz, QuizId, ValidatedQuestion};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for quizzes.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by ID.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;
}

/// Ordered question content for a quiz.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Questions of a quiz in presentation order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on connection or decoding failures.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// Append a question to the end of its quiz and return the stored entity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn insert_question(&self, question: ValidatedQuestion) -> Result<Question, StorageError>;

    /// Replace an existing question, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question does not exist.
    async fn update_question(&self, question: &Question) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the question does not exist.
    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError>;
}

/// Single key-value slot per key holding a serialized progress snapshot.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be read.
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be written.
    async fn write_slot(&self, key: &str, payload: &str) -> Result<(), StorageError>;

    /// Remove the slot. Clearing a missing slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the slot cannot be removed.
    async fn clear_slot(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
    slots: Arc<Mutex<HashMap<String, String>>>,
    last_question_id: Arc<AtomicU64>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(poisoned)?;
        guard.insert(quiz.id(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self.quizzes.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self, quiz_id: QuizId) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        // Ids are handed out in insertion order, so key order is position order.
        Ok(guard
            .values()
            .filter(|q| q.quiz_id() == quiz_id)
            .cloned()
            .collect())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self.questions.lock().map_err(poisoned)?;
        Ok(guard.get(&id).cloned())
    }

    async fn insert_question(&self, question: ValidatedQuestion) -> Result<Question, StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        // Never reuse an id, even after the newest question is deleted.
        let next = self.last_question_id.fetch_add(1, Ordering::Relaxed) + 1;
        let question = question.assign_id(QuestionId::new(next));
        guard.insert(question.id(), question.clone());
        Ok(question)
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        match guard.get_mut(&question.id()) {
            Some(slot) => {
                *slot = question.clone();
                Ok(())
            }
            None => Err(StorageError::NotFound),
        }
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(poisoned)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl ProgressStore for InMemoryRepository {
    async fn read_slot(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.slots.lock().map_err(poisoned)?;
        Ok(guard.get(key).cloned())
    }

    async fn write_slot(&self, key: &str, payload: &str) -> Result<(), StorageError> {
        let mut guard = self.slots.lock().map_err(poisoned)?;
        guard.insert(key.to_owned(), payload.to_owned());
        Ok(())
    }

    async fn clear_slot(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.slots.lock().map_err(poisoned)?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub progress: Arc<dyn ProgressStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let progress: Arc<dyn ProgressStore> = Arc::new(repo);
        Self {
            quizzes,
            questions,
            progress,
        }
    }
}
