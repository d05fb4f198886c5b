//! Error types for the task tracker

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Task not found: {0}")]
    TaskNotFound(u32),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No task ids left")]
    IdsExhausted,

    #[error("Input closed")]
    InputClosed,
}

/// Why a single line of a task file could not be decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 7 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid id: {0:?}")]
    InvalidId(String),

    #[error("invalid due date: {0:?}")]
    InvalidDueDate(String),

    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    #[error("duplicate id: {0}")]
    DuplicateId(u32),
}
