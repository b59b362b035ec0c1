//! Session, transcript, and export management for Gloam.
//!
//! A [`Session`] owns the engine, the ordered event queue, and the
//! append-only [`Transcript`]. Adapters feed it input lines and clock
//! ticks, render the turns it returns, and write out export blobs. Sessions
//! can be snapshotted and resumed without replaying their transcript.

/// Error types for the session crate.
pub mod error;
/// Deterministic transcript export.
pub mod export;
/// Top-level session management.
pub mod session;
/// Resumable session snapshots.
pub mod snapshot;
/// The append-only turn transcript.
pub mod transcript;

/// Re-export error types.
pub use error::{SessionError, SessionResult};
/// Re-export export types.
pub use export::{ExportError, ExportResult, ExportSummary, export};
/// Re-export the session.
pub use session::{Session, SessionTurn};
/// Re-export snapshots.
pub use snapshot::SessionSnapshot;
/// Re-export transcript types.
pub use transcript::{Transcript, TranscriptEntry};
