//! The engine: processes one session event at a time, to completion.
//!
//! Each processed event runs its mutating stages strictly in sequence —
//! command dispatch, presence update, then a single script pass — over
//! exclusively borrowed state, so writers can never interleave. One event is
//! one turn.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use gloam_core::{CoreError, NodeKind, World};

use crate::beat::{Outcome, Resolution, TurnSignals};
use crate::error::{EngineError, EngineResult};
use crate::event::SessionEvent;
use crate::parser::{self, Command, ParseError, Verb};
use crate::presence::{Phase, Presence, PresenceSnapshot};
use crate::script::ScriptEngine;
use crate::story::StoryPack;

/// A whisper may surface every this many scoring idle ticks.
const WHISPER_CADENCE: u64 = 3;

/// What processing one event produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    /// The input line, or empty for a tick.
    pub input: String,
    /// Rendered output for this turn. May be empty.
    pub output: String,
    /// The player asked for a transcript export this turn.
    pub export_requested: bool,
    /// The session outcome, if this turn ended it.
    pub ended: Option<Outcome>,
}

/// Runs a story: owns the world, the beat table, and the presence.
pub struct Engine {
    world: World,
    script: ScriptEngine,
    presence: Presence,
    whispers: Vec<String>,
    rng: StdRng,
    idle_scored: u64,
    ended: Option<Outcome>,
}

impl Engine {
    /// Build an engine from a validated story.
    pub fn new(story: StoryPack) -> EngineResult<Self> {
        story.validate()?;
        let world = World::new(story.content)?;
        Ok(Self {
            world,
            script: ScriptEngine::new(story.beats),
            presence: Presence::new(story.presence),
            whispers: story.whispers,
            rng: StdRng::seed_from_u64(story.seed),
            idle_scored: 0,
            ended: None,
        })
    }

    /// The world model.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The presence.
    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    /// The script engine.
    pub fn script(&self) -> &ScriptEngine {
        &self.script
    }

    /// The session outcome, once a terminal beat has fired.
    pub fn ended(&self) -> Option<Outcome> {
        self.ended
    }

    /// Restore mutable state from snapshots taken against the same story.
    pub fn restore(
        &mut self,
        world: &gloam_core::WorldSnapshot,
        presence: &PresenceSnapshot,
        fired_beats: &[String],
    ) -> EngineResult<()> {
        self.world.restore(world)?;
        self.presence = Presence::from_snapshot(self.presence.config().clone(), presence);
        self.script.mark_fired(fired_beats.iter().cloned());
        Ok(())
    }

    /// Process exactly one event to completion. Errors with
    /// [`EngineError::SessionOver`] if the session already ended.
    pub fn process(&mut self, event: &SessionEvent) -> EngineResult<TurnReport> {
        if let Some(outcome) = self.ended {
            return Err(EngineError::SessionOver(outcome));
        }
        let report = match event {
            SessionEvent::Input(line) => self.process_input(line)?,
            SessionEvent::Tick => self.process_tick()?,
        };
        self.world.bump_turn();
        Ok(report)
    }

    fn process_input(&mut self, line: &str) -> EngineResult<TurnReport> {
        let mut lines: Vec<String> = Vec::new();
        let mut export_requested = false;

        match parser::parse(line) {
            Err(err) => lines.push(rebuff(&err)),
            Ok(cmd) => {
                let mut signals = TurnSignals::default();
                let text = self.dispatch(&cmd, &mut signals, &mut export_requested)?;
                if !text.is_empty() {
                    lines.push(text);
                }

                let update = self.presence.observe_command(cmd.verb.risk());
                signals.entered = update.entered;
                signals.countdown_expired = update.countdown_expired;

                if let Some(firing) =
                    self.script
                        .run_pass(&mut self.world, &mut self.presence, &signals)?
                {
                    if let Some(text) = firing.text {
                        lines.push(text);
                    }
                    if let Some(outcome) = firing.ended {
                        self.ended = Some(outcome);
                    }
                }
            }
        }

        Ok(TurnReport {
            input: line.to_string(),
            output: lines.join("\n\n"),
            export_requested,
            ended: self.ended,
        })
    }

    fn process_tick(&mut self) -> EngineResult<TurnReport> {
        let update = self.presence.observe_tick();
        let signals = TurnSignals {
            entered: update.entered,
            countdown_expired: update.countdown_expired,
            resolution: None,
        };

        let mut lines = Vec::new();
        if let Some(firing) =
            self.script
                .run_pass(&mut self.world, &mut self.presence, &signals)?
        {
            if let Some(text) = firing.text {
                lines.push(text);
            }
            if let Some(outcome) = firing.ended {
                self.ended = Some(outcome);
            }
        } else if update.scored_idle {
            self.idle_scored += 1;
            if self.idle_scored % WHISPER_CADENCE == 0
                && self.presence.phase() >= Phase::Watching
                && !self.whispers.is_empty()
            {
                let pick = self.rng.random_range(0..self.whispers.len());
                lines.push(self.whispers[pick].clone());
            }
        }

        Ok(TurnReport {
            input: String::new(),
            output: lines.join("\n\n"),
            export_requested: false,
            ended: self.ended,
        })
    }

    // -----------------------------------------------------------------------
    // Command dispatch
    // -----------------------------------------------------------------------

    fn dispatch(
        &mut self,
        cmd: &Command,
        signals: &mut TurnSignals,
        export_requested: &mut bool,
    ) -> EngineResult<String> {
        match cmd.verb {
            Verb::Look => Ok(self.do_look(&cmd.target())),
            Verb::Open => self.do_open(&cmd.target()),
            Verb::Go => self.do_go(&cmd.target()),
            Verb::Escape => {
                signals.resolution = Some(Resolution::Escape);
                Ok(String::new())
            }
            Verb::Reclaim => {
                signals.resolution = Some(Resolution::Reclaim);
                Ok(String::new())
            }
            Verb::Export => {
                *export_requested = true;
                Ok(String::new())
            }
            Verb::Help => Ok(help_text()),
        }
    }

    fn do_look(&self, target: &str) -> String {
        if target.is_empty() {
            return self.describe_here();
        }
        let Some(node) = self.world.resolve(target) else {
            return format!("There is no `{target}` here, or anywhere you can see.");
        };
        match node.kind {
            NodeKind::Room => {
                if &node.id == self.world.location() {
                    self.describe_here()
                } else if node.unlocked {
                    format!("The way to {} is open, but you are not there.", node.id)
                } else {
                    node.sealed_hint
                        .clone()
                        .unwrap_or_else(|| format!("The way to {} is sealed.", node.id))
                }
            }
            _ => {
                if node.site.as_ref().is_some_and(|s| s != self.world.location()) {
                    return format!("You don't see {} here.", node.id);
                }
                if node.unlocked {
                    node.content.clone()
                } else {
                    node.sealed_hint
                        .clone()
                        .unwrap_or_else(|| "It's locked.".to_string())
                }
            }
        }
    }

    fn describe_here(&self) -> String {
        let here = self.world.location().clone();
        let Some(room) = self.world.node(&here) else {
            return String::new();
        };

        let mut out = format!("[{}]\n{}", room.id, room.content);

        let artifacts = self.world.nodes_at(&here);
        if !artifacts.is_empty() {
            out.push('\n');
            for node in artifacts {
                let state = if node.unlocked { "open" } else { "sealed" };
                out.push_str(&format!("\n  {} ({}, {state})", node.id, node.kind));
            }
        }

        let ways: Vec<String> = room
            .links
            .iter()
            .map(|link| {
                if self.world.is_unlocked(link) {
                    link.to_string()
                } else {
                    format!("{link} (sealed)")
                }
            })
            .collect();
        if !ways.is_empty() {
            out.push_str(&format!("\n\nWays out: {}", ways.join(", ")));
        }
        out
    }

    fn do_open(&mut self, target: &str) -> EngineResult<String> {
        if target.is_empty() {
            return Ok("Open what?".to_string());
        }
        let Some(node) = self.world.resolve(target) else {
            return Ok(format!("There is no `{target}` to open."));
        };
        let id = node.id.clone();
        let kind = node.kind;
        let content = node.content.clone();
        let sealed_hint = node.sealed_hint.clone();
        let site = node.site.clone();

        if site.as_ref().is_some_and(|s| s != self.world.location()) {
            return Ok(format!("You don't see {id} here."));
        }
        if self.world.unlock(&id)? {
            match kind {
                NodeKind::Room => Ok(format!("The way to {id} stands open.")),
                _ => Ok(content),
            }
        } else {
            Ok(sealed_hint.unwrap_or_else(|| "It's locked.".to_string()))
        }
    }

    fn do_go(&mut self, target: &str) -> EngineResult<String> {
        if target.is_empty() {
            return Ok("Go where?".to_string());
        }
        let Some(node) = self.world.resolve(target) else {
            return Ok(format!("There is no way called `{target}`."));
        };
        let id = node.id.clone();
        match self.world.set_location(&id) {
            Ok(()) => Ok(self.describe_here()),
            Err(CoreError::InvalidLocation { reason, .. }) => {
                Ok(format!("You can't go to {id}: {reason}."))
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// In-fiction text for a parse failure.
fn rebuff(err: &ParseError) -> String {
    match err {
        ParseError::MalformedInput(_) => {
            "The line breaks apart before the terminal can read it.".to_string()
        }
        ParseError::UnknownCommand(verb) => {
            format!("`{verb}` means nothing to this terminal. Try `help`.")
        }
    }
}

/// The in-fiction command surface.
fn help_text() -> String {
    "\
The terminal answers to:
  look [target]      describe this room, or one thing in it
  open <target>      unseal and read an artifact
  go <room>          move through an open way
  escape             abandon the dive while you still can
  reclaim            turn the terminal against what lives in it
  export             compile the session transcript
  help               this text

It accepts some older spellings too (ls, cat, cd, ...)."
        .to_string()
}
