//! Error types for the engine crate.

use thiserror::Error;

use crate::beat::Outcome;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur while running a story.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A story pack failed validation.
    #[error("story error: {0}")]
    Story(String),

    /// A world operation failed.
    #[error(transparent)]
    Core(#[from] gloam_core::CoreError),

    /// An event arrived after the session ended.
    #[error("the session has already ended: {0}")]
    SessionOver(Outcome),
}
