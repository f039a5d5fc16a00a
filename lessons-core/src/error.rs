//! Error types for lessons-core
//!
//! The progression machine itself is total; only catalog loading, session
//! lookups and keyword lookups can fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from loading or validating a lesson catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate lesson id: {0}")]
    DuplicateLesson(String),

    #[error("Lesson at position {0} has an empty id")]
    EmptyId(usize),

    #[error("Invalid exercise {index} in lesson {lesson}: {reason}")]
    InvalidExercise {
        lesson: String,
        index: usize,
        reason: String,
    },
}

/// Errors from the session layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Lesson not found: {0}")]
    LessonNotFound(String),
}

/// Errors from keyword practice
#[derive(Error, Debug)]
pub enum MasteryError {
    #[error("Failed to parse keywords: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown keyword: {0}")]
    UnknownKeyword(String),

    #[error("Duplicate keyword: {0}")]
    DuplicateKeyword(String),

    #[error("Keyword at position {0} has an empty name")]
    EmptyName(usize),
}
