//! Command interpreter, script beats, and presence controller for Gloam.
//!
//! The engine turns one queued session event at a time into a turn: parse
//! the line, dispatch it against the world, let the presence react, run one
//! script pass. Stories are plain data ([`StoryPack`]) — nodes, beats,
//! presence tuning — so narratives can be rewired without touching code.

/// Narrative beats: triggers, effects, and per-turn signals.
pub mod beat;
/// The per-event dispatcher.
pub mod engine;
/// Error types for the engine crate.
pub mod error;
/// The ordered session event queue.
pub mod event;
/// Command parsing for player input.
pub mod parser;
/// The presence: the adversary escalation state machine.
pub mod presence;
/// The script engine over the beat table.
pub mod script;
/// Story packs: content + beats + tuning as serializable data.
pub mod story;

/// Re-export beat types.
pub use beat::{Beat, Effect, Outcome, Repeat, Resolution, Trigger, TurnSignals};
/// Re-export the dispatcher.
pub use engine::{Engine, TurnReport};
/// Re-export error types.
pub use error::{EngineError, EngineResult};
/// Re-export event types.
pub use event::{EventQueue, SessionEvent};
/// Re-export parser types.
pub use parser::{Command, ParseError, Risk, Verb, parse};
/// Re-export presence types.
pub use presence::{Phase, Presence, PresenceConfig, PresenceSnapshot};
/// Re-export the script engine.
pub use script::{Firing, ScriptEngine};
/// Re-export story packs.
pub use story::StoryPack;
