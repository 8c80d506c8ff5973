//! Error types for yard-engine operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A single lock or booking record could not be decoded or failed validation.
    /// `index` is the zero-based position of the record in its input array.
    #[error("Malformed {kind} record at index {index}: {message}")]
    MalformedRecord {
        kind: &'static str,
        index: usize,
        message: String,
    },

    /// The input was not a JSON array at all.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid display window: {start}..{end}")]
    InvalidWindow { start: usize, end: usize },

    #[error("Invalid display window '{0}', expected START..END")]
    WindowSyntax(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid clock time: {0}")]
    InvalidClock(String),

    #[error("Invalid time range: {from} to {to} is empty or reversed")]
    InvalidRange { from: String, to: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
