//! The transcript: an append-only record of a session's turns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One processed event, as recorded.
///
/// Entries are created and appended, never mutated or removed. Tick turns
/// carry an empty input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Turn index. Strictly increases by 1 per processed event.
    pub turn: u64,
    /// The raw input line, or empty for a tick.
    pub input: String,
    /// The rendered output.
    pub output: String,
    /// Wall-clock time the event was processed.
    pub timestamp: DateTime<Utc>,
}

/// The ordered, append-only log of a session's turns.
///
/// Turn indices are assigned here, not by callers, so gaps and repeats are
/// unrepresentable. A resumed session starts from an offset instead of 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    base: u64,
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// An empty transcript starting at turn 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty transcript whose first entry will carry the given turn
    /// index. Used when resuming from a snapshot.
    pub fn with_offset(base: u64) -> Self {
        Self {
            base,
            entries: Vec::new(),
        }
    }

    /// The turn index the next appended entry will carry.
    pub fn next_turn(&self) -> u64 {
        self.base + self.entries.len() as u64
    }

    /// Append an entry stamped with the current wall-clock time.
    pub fn append(&mut self, input: impl Into<String>, output: impl Into<String>) -> &TranscriptEntry {
        self.append_with_timestamp(input, output, Utc::now())
    }

    /// Append an entry with an explicit timestamp.
    pub fn append_with_timestamp(
        &mut self,
        input: impl Into<String>,
        output: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> &TranscriptEntry {
        let entry = TranscriptEntry {
            turn: self.next_turn(),
            input: input.into(),
            output: output.into(),
            timestamp,
        };
        let index = self.entries.len();
        self.entries.push(entry);
        &self.entries[index]
    }

    /// All recorded entries, in turn order.
    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries have been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
