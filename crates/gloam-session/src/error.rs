//! Error types for the session crate.

use thiserror::Error;

use crate::export::ExportError;
use gloam_engine::EngineError;

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while running a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The engine rejected an event or a story.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
