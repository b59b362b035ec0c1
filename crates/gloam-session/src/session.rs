//! Top-level session management.
//!
//! `Session` wires the engine to the event queue and the transcript: the
//! adapter enqueues input lines and clock ticks, the session processes them
//! one at a time, appends one transcript entry per processed event, and
//! hands export blobs back for the adapter to download.

use uuid::Uuid;

use gloam_engine::{Engine, EventQueue, Outcome, StoryPack};

use crate::error::SessionResult;
use crate::export::{ExportSummary, export};
use crate::snapshot::SessionSnapshot;
use crate::transcript::Transcript;

/// What processing one queued event produced, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTurn {
    /// The turn index recorded for this event.
    pub turn: u64,
    /// The input line, or empty for a tick.
    pub input: String,
    /// Rendered output. May be empty (a quiet tick).
    pub output: String,
    /// An export blob, if the player asked for one this turn. The adapter
    /// is responsible for writing it somewhere.
    pub export: Option<String>,
    /// The session outcome, if this turn ended it.
    pub ended: Option<Outcome>,
}

/// An interactive session over a story.
pub struct Session {
    id: Uuid,
    name: String,
    engine: Engine,
    queue: EventQueue,
    transcript: Transcript,
}

impl Session {
    /// Start a fresh session with a new identifier.
    pub fn new(story: StoryPack) -> SessionResult<Self> {
        let name = story.name.clone();
        let engine = Engine::new(story)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            engine,
            queue: EventQueue::new(),
            transcript: Transcript::new(),
        })
    }

    /// Resume a session from a snapshot taken against the same story. The
    /// transcript continues from the snapshot's offset; nothing is replayed.
    pub fn resume(story: StoryPack, snapshot: &SessionSnapshot) -> SessionResult<Self> {
        let name = story.name.clone();
        let mut engine = Engine::new(story)?;
        engine.restore(&snapshot.world, &snapshot.presence, &snapshot.fired_beats)?;
        Ok(Self {
            id: snapshot.session,
            name,
            engine,
            queue: EventQueue::new(),
            transcript: Transcript::with_offset(snapshot.transcript_len),
        })
    }

    /// The session identifier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The story title.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The engine (world, presence, script state).
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The transcript so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The session outcome, once a terminal beat has fired.
    pub fn ended(&self) -> Option<Outcome> {
        self.engine.ended()
    }

    // -----------------------------------------------------------------------
    // Event intake (called by the adapter)
    // -----------------------------------------------------------------------

    /// Enqueue a player input line.
    pub fn enqueue_input(&mut self, line: impl Into<String>) {
        self.queue.push_input(line);
    }

    /// Enqueue a clock tick. Dropped while tick intake is paused.
    pub fn enqueue_tick(&mut self) {
        self.queue.push_tick();
    }

    /// Stop accepting ticks (e.g. while backgrounded). Touches nothing but
    /// the queue's intake switch.
    pub fn pause_ticks(&mut self) {
        self.queue.pause_ticks();
    }

    /// Resume accepting ticks.
    pub fn resume_ticks(&mut self) {
        self.queue.resume_ticks();
    }

    /// Whether tick intake is paused.
    pub fn ticks_paused(&self) -> bool {
        self.queue.ticks_paused()
    }

    // -----------------------------------------------------------------------
    // Processing
    // -----------------------------------------------------------------------

    /// Process the next queued event to completion, appending one transcript
    /// entry. Returns `None` when the queue is drained. After the session
    /// has ended, remaining events drain without effect.
    pub fn process_next(&mut self) -> SessionResult<Option<SessionTurn>> {
        loop {
            let Some(event) = self.queue.pop() else {
                return Ok(None);
            };
            if self.engine.ended().is_some() {
                continue;
            }

            let report = self.engine.process(&event)?;

            let mut lines: Vec<String> = Vec::new();
            if !report.output.is_empty() {
                lines.push(report.output);
            }

            let mut export_blob = None;
            if report.export_requested {
                // The blob records the turns completed before this command;
                // on failure nothing is handed over.
                match self.export() {
                    Ok(blob) => {
                        export_blob = Some(blob);
                        lines.push("The log folds itself into a single page.".to_string());
                    }
                    Err(err) => {
                        lines.push(format!("The export fails and nothing is written: {err}"));
                    }
                }
            }

            let output = lines.join("\n\n");
            let entry = self.transcript.append(report.input, output.clone());
            let turn = entry.turn;
            let input = entry.input.clone();

            return Ok(Some(SessionTurn {
                turn,
                input,
                output,
                export: export_blob,
                ended: report.ended,
            }));
        }
    }

    /// Process every queued event, in order.
    pub fn drain(&mut self) -> SessionResult<Vec<SessionTurn>> {
        let mut turns = Vec::new();
        while let Some(turn) = self.process_next()? {
            turns.push(turn);
        }
        Ok(turns)
    }

    // -----------------------------------------------------------------------
    // Export & snapshots
    // -----------------------------------------------------------------------

    /// Serialize the recorded turns plus a final state summary.
    pub fn export(&self) -> SessionResult<String> {
        let summary = ExportSummary {
            unlocked: self.engine.world().unlocked_ids(),
            phase: self.engine.presence().phase(),
            outcome: self.engine.ended(),
        };
        Ok(export(&self.transcript, &summary)?)
    }

    /// Capture a resumable snapshot of this session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session: self.id,
            world: self.engine.world().snapshot(),
            presence: self.engine.presence().snapshot(),
            fired_beats: self.engine.script().fired_ids(),
            transcript_len: self.transcript.next_turn(),
        }
    }
}
