// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for time stream operations

use thiserror::Error;

use crate::frp::Time;

/// Errors that can occur while building, traversing or playing time streams
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeStreamError {
    /// A delay or absolute time was negative
    #[error("Invalid delay: {0} (delays must be non-negative)")]
    InvalidDelay(Time),

    /// A single-use stream was traversed a second time
    #[error("Time stream already consumed: single-use streams can only be traversed once")]
    ExhaustedStreamReuse,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Pattern parsing error
    #[error("Pattern error: {0}")]
    Pattern(String),

    /// I/O error while loading a pattern
    #[error("I/O error: {0}")]
    Io(String),
}

/// Result type for time stream operations
pub type TimeStreamResult<T> = Result<T, TimeStreamError>;

impl From<serde_json::Error> for TimeStreamError {
    fn from(err: serde_json::Error) -> Self {
        TimeStreamError::Pattern(err.to_string())
    }
}

impl From<std::io::Error> for TimeStreamError {
    fn from(err: std::io::Error) -> Self {
        TimeStreamError::Io(err.to_string())
    }
}
