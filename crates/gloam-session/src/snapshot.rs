//! Resumable session snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gloam_core::WorldSnapshot;
use gloam_engine::PresenceSnapshot;

/// Everything needed to resume a session without replaying its transcript:
/// the session identity, the mutable world and presence state, the consumed
/// one-shot beats, and how many turns have already been recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Session identifier the snapshot is keyed by.
    pub session: Uuid,
    /// Mutable world state.
    pub world: WorldSnapshot,
    /// Mutable presence state.
    pub presence: PresenceSnapshot,
    /// Ids of consumed one-shot beats. Without these, entry and resolution
    /// beats would refire after a resume.
    pub fired_beats: Vec<String>,
    /// Number of transcript entries recorded before the snapshot; the
    /// resumed transcript continues from this offset.
    pub transcript_len: u64,
}
