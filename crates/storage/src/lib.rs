#![forbid(unsafe_code)]

pub mod fixtures;
pub mod repository;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, ProgressStore, QuestionRepository, QuizRepository, Storage, StorageError,
};
